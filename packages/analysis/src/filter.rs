//! Row filtering ahead of binning.
//!
//! Keeps records whose category is on the allow-list and which carry both
//! coordinates. The two steps commute; they are applied category-first so
//! the logged row counts read like a funnel.

use crime_explore_categories::AllowList;
use crime_explore_source_models::IncidentRecord;
use serde::{Deserialize, Serialize};

/// Row counts after each filter step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterReport {
    /// Rows in the input.
    pub total: usize,
    /// Rows left after the category allow-list.
    pub after_category: usize,
    /// Rows left after dropping missing coordinates.
    pub after_coordinates: usize,
}

/// Records that survived filtering, borrowed from the loaded dataset.
#[derive(Debug, Clone, Default)]
pub struct Filtered<'a> {
    /// Surviving records in input order.
    pub records: Vec<&'a IncidentRecord>,
    /// Row counts after each step.
    pub report: FilterReport,
}

/// Keeps records whose category is an exact member of `allow_list`.
/// Records with no category never match.
pub fn filter_by_category<'a, I>(records: I, allow_list: &AllowList) -> Vec<&'a IncidentRecord>
where
    I: IntoIterator<Item = &'a IncidentRecord>,
{
    records
        .into_iter()
        .filter(|record| {
            record
                .category
                .as_deref()
                .is_some_and(|category| allow_list.contains(category))
        })
        .collect()
}

/// Keeps records that have both a longitude and a latitude.
pub fn trim_missing_coordinates<'a, I>(records: I) -> Vec<&'a IncidentRecord>
where
    I: IntoIterator<Item = &'a IncidentRecord>,
{
    records
        .into_iter()
        .filter(|record| record.coordinates().is_some())
        .collect()
}

/// Applies the category allow-list and the missing-coordinate trim.
///
/// The input slice is not modified. An empty result is valid.
#[must_use]
pub fn filter_incidents<'a>(records: &'a [IncidentRecord], allow_list: &AllowList) -> Filtered<'a> {
    log::info!("Dataset: {} rows", records.len());

    let by_category = filter_by_category(records, allow_list);
    log::info!(
        "After category filter ({} allowed categories): {} rows",
        allow_list.len(),
        by_category.len()
    );
    let after_category = by_category.len();

    let kept = trim_missing_coordinates(by_category);
    log::info!("After dropping missing coordinates: {} rows", kept.len());

    Filtered {
        report: FilterReport {
            total: records.len(),
            after_category,
            after_coordinates: kept.len(),
        },
        records: kept,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: Option<&str>, lon: Option<f64>, lat: Option<f64>) -> IncidentRecord {
        IncidentRecord {
            category: category.map(str::to_string),
            longitude: lon,
            latitude: lat,
            ..IncidentRecord::default()
        }
    }

    fn sample() -> Vec<IncidentRecord> {
        vec![
            record(Some("Robbery"), Some(-122.4), Some(37.75)),
            record(Some("Warrant"), Some(-122.4), Some(37.75)),
            record(Some("Robbery"), None, Some(37.75)),
            record(Some("Arson"), Some(-122.41), None),
            record(None, Some(-122.4), Some(37.7)),
            record(Some("Arson"), Some(-122.45), Some(37.78)),
        ]
    }

    #[test]
    fn keeps_exactly_allowed_records_with_coordinates() {
        let records = sample();
        let allow = AllowList::new(["Robbery", "Arson"]);
        let filtered = filter_incidents(&records, &allow);

        for rec in &records {
            let expected = rec
                .category
                .as_deref()
                .is_some_and(|c| allow.contains(c))
                && rec.longitude.is_some()
                && rec.latitude.is_some();
            let kept = filtered.records.iter().any(|r| std::ptr::eq(*r, rec));
            assert_eq!(kept, expected, "{rec:?}");
        }
        assert_eq!(
            filtered.report,
            FilterReport {
                total: 6,
                after_category: 4,
                after_coordinates: 2,
            }
        );
    }

    #[test]
    fn steps_commute() {
        let records = sample();
        let allow = AllowList::new(["Robbery", "Arson"]);

        let category_first = trim_missing_coordinates(filter_by_category(&records, &allow));
        let coordinates_first = filter_by_category(trim_missing_coordinates(&records), &allow);

        assert_eq!(category_first, coordinates_first);
    }

    #[test]
    fn empty_allow_list_keeps_nothing() {
        let records = sample();
        let filtered = filter_incidents(&records, &AllowList::default());
        assert!(filtered.records.is_empty());
        assert_eq!(filtered.report.total, 6);
    }

    #[test]
    fn preserves_input_order() {
        let records = sample();
        let allow = AllowList::new(["Arson", "Robbery"]);
        let filtered = filter_incidents(&records, &allow);
        let categories: Vec<_> = filtered
            .records
            .iter()
            .map(|r| r.category.as_deref())
            .collect();
        assert_eq!(categories, vec![Some("Robbery"), Some("Arson")]);
    }
}
