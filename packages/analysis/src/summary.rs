//! Category summaries for dataset exploration.
//!
//! Answers the questions asked while curating the allow-list: which
//! categories exist, how common each is, and what kinds of incidents a
//! category actually contains.

use std::collections::{BTreeMap, BTreeSet};

use crime_explore_categories::CategoryClass;
use crime_explore_source_models::IncidentRecord;
use serde::{Deserialize, Serialize};

/// Number of rows carrying one category value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// The category string as it appears in the data.
    pub category: String,
    /// Rows with this category.
    pub count: u64,
    /// Curation bucket the category falls in.
    pub class: CategoryClass,
}

/// Counts rows per category, in order of first appearance. Rows with no
/// category are skipped.
pub fn category_counts<'a, I>(records: I) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a IncidentRecord>,
{
    let mut positions: BTreeMap<&str, usize> = BTreeMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for category in records.into_iter().filter_map(|r| r.category.as_deref()) {
        if let Some(&pos) = positions.get(category) {
            counts[pos].count += 1;
        } else {
            positions.insert(category, counts.len());
            counts.push(CategoryCount {
                category: category.to_string(),
                count: 1,
                class: CategoryClass::of(category),
            });
        }
    }

    counts
}

/// What a single category contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDescription {
    /// The category that was described.
    pub category: String,
    /// Rows with this category.
    pub count: u64,
    /// `count` divided by the number of rows in the dataset (0 when empty).
    pub share: f64,
    /// Curation bucket the category falls in.
    pub class: CategoryClass,
    /// Distinct subcategory values, in order of first appearance.
    pub subcategories: Vec<String>,
    /// Distinct description values, in order of first appearance.
    pub descriptions: Vec<String>,
}

/// Collects the distinct subcategories and descriptions recorded under
/// `category`, plus the category's share of all rows.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn describe_category(records: &[IncidentRecord], category: &str) -> CategoryDescription {
    let mut count = 0_u64;
    let mut subcategories = UniqueInOrder::default();
    let mut descriptions = UniqueInOrder::default();

    for record in records
        .iter()
        .filter(|r| r.category.as_deref() == Some(category))
    {
        count += 1;
        subcategories.push(record.subcategory.as_deref());
        descriptions.push(record.description.as_deref());
    }

    let share = if records.is_empty() {
        0.0
    } else {
        count as f64 / records.len() as f64
    };

    CategoryDescription {
        category: category.to_string(),
        count,
        share,
        class: CategoryClass::of(category),
        subcategories: subcategories.values,
        descriptions: descriptions.values,
    }
}

#[derive(Default)]
struct UniqueInOrder {
    seen: BTreeSet<String>,
    values: Vec<String>,
}

impl UniqueInOrder {
    fn push(&mut self, value: Option<&str>) {
        if let Some(value) = value
            && self.seen.insert(value.to_string())
        {
            self.values.push(value.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: Option<&str>, subcategory: &str, description: &str) -> IncidentRecord {
        IncidentRecord {
            category: category.map(str::to_string),
            subcategory: Some(subcategory.to_string()),
            description: Some(description.to_string()),
            ..IncidentRecord::default()
        }
    }

    fn sample() -> Vec<IncidentRecord> {
        vec![
            record(Some("Non-Criminal"), "Other", "Aided Case"),
            record(Some("Robbery"), "Robbery - Street", "Robbery, W/ Force"),
            record(Some("Non-Criminal"), "Other", "Found Property"),
            record(None, "", ""),
            record(Some("Non-Criminal"), "Other", "Aided Case"),
        ]
    }

    #[test]
    fn counts_in_first_appearance_order() {
        let counts = category_counts(&sample());
        let summary: Vec<(&str, u64)> = counts
            .iter()
            .map(|c| (c.category.as_str(), c.count))
            .collect();
        assert_eq!(summary, vec![("Non-Criminal", 3), ("Robbery", 1)]);
        assert_eq!(counts[0].class, CategoryClass::Ignored);
        assert_eq!(counts[1].class, CategoryClass::Used);
    }

    #[test]
    fn counts_sum_to_rows_with_a_category() {
        let records = sample();
        let total: u64 = category_counts(&records).iter().map(|c| c.count).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn describes_unique_values_and_share() {
        let description = describe_category(&sample(), "Non-Criminal");
        assert_eq!(description.count, 3);
        assert!((description.share - 0.6).abs() < 1e-12);
        assert_eq!(description.subcategories, vec!["Other"]);
        assert_eq!(description.descriptions, vec!["Aided Case", "Found Property"]);
    }

    #[test]
    fn describing_unknown_category_is_empty() {
        let description = describe_category(&sample(), "Gambling");
        assert_eq!(description.count, 0);
        assert!(description.descriptions.is_empty());
        assert_eq!(description.class, CategoryClass::Ignored);

        let empty = describe_category(&[], "Gambling");
        assert!(empty.share.abs() < f64::EPSILON);
    }
}
