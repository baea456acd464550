#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Curated incident category lists.
//!
//! The SF Police Department dataset uses free-form category strings. This
//! crate partitions the observed values into categories that indicate an
//! area is dangerous ([`USED_CATEGORIES`]), categories that don't
//! ([`IGNORED_CATEGORIES`]), and ones still under review
//! ([`OTHER_CATEGORIES`]). The partition is a judgment call, not an
//! algorithm.
//!
//! Membership is exact string equality. Near-duplicate spellings in the
//! source data (`Weapons Offense` / `Weapons Offence`) are separate entries.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Categories that indicate an area is dangerous. These form the default
/// allow-list.
pub const USED_CATEGORIES: &[&str] = &[
    "Stolen Property",
    "Offences Against The Family And Children",
    "Larceny Theft",
    "Other Miscellaneous",
    "Assault",
    // not sure about this one
    "Fraud",
    "Burglary",
    // might be too minor, but includes drunk driving
    "Traffic Violation Arrest",
    "Weapons Carrying Etc",
    "Malicious Mischief",
    "Motor Vehicle Theft",
    "Drug Offense",
    // hodgepodge
    "Other Offenses",
    "Robbery",
    "Suspicious Occ",
    "Disorderly Conduct",
    "Weapons Offense",
    "Vandalism",
    "Embezzlement",
    "Sex Offense",
    // firearm, armed while possessing controlled substance
    "Drug Violation",
    // includes hit and runs
    "Traffic Collision",
    "Prostitution",
    "Homicide",
    "Arson",
    "Vehicle Impounded",
    "Liquor Laws",
    // sitting/lying on sidewalks between 7am-11pm
    "Civil Sidewalks",
    "Family Offense",
    "Rape",
    // source typo of "Weapons Offense"
    "Weapons Offence",
    // soliciting a minor to commit a felony
    "Juvenile Offenses",
    "Human Trafficking, Commercial Sex Acts",
    "Human Trafficking (A), Commercial Sex Acts",
    "Motor Vehicle Theft?",
    "Human Trafficking (B), Involuntary Servitude",
];

/// Non-violent categories, or ones that otherwise don't indicate an area is
/// dangerous.
pub const IGNORED_CATEGORIES: &[&str] = &[
    "Warrant",
    "Non-Criminal",
    "Lost Property",
    "Miscellaneous Investigation",
    // death reports: accidental, natural causes, etc.
    "Other",
    "Recovered Vehicle",
    // outside the jurisdiction
    "Courtesy Report",
    "Forgery And Counterfeiting",
    "Case Closure",
    "Suicide",
    "Fire Report",
    // suspicious package
    "Suspicious",
    "Vehicle Misplaced",
    "Gambling",
    "Missing Person",
];

/// Categories still under review.
pub const OTHER_CATEGORIES: &[&str] = &["Missing Person"];

/// Curation bucket for a category string.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryClass {
    /// Listed in [`USED_CATEGORIES`].
    Used,
    /// Listed in [`OTHER_CATEGORIES`].
    Other,
    /// Listed in [`IGNORED_CATEGORIES`].
    Ignored,
    /// Not listed anywhere (new or unexpected value).
    Unclassified,
}

impl CategoryClass {
    /// Classifies a category string.
    ///
    /// A category listed in more than one bucket resolves as
    /// `Used`, then `Other`, then `Ignored`.
    #[must_use]
    pub fn of(category: &str) -> Self {
        if USED_CATEGORIES.contains(&category) {
            Self::Used
        } else if OTHER_CATEGORIES.contains(&category) {
            Self::Other
        } else if IGNORED_CATEGORIES.contains(&category) {
            Self::Ignored
        } else {
            Self::Unclassified
        }
    }
}

/// A fixed set of category strings considered in scope for analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowList {
    categories: BTreeSet<String>,
}

impl AllowList {
    /// Builds an allow-list from any collection of category names.
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact-match membership test.
    #[must_use]
    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains(category)
    }

    /// Number of distinct categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns `true` if nothing is allowed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Iterates over the allowed categories in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }
}

static DEFAULT_ALLOW_LIST: LazyLock<AllowList> =
    LazyLock::new(|| AllowList::new(USED_CATEGORIES.iter().copied()));

/// The allow-list built from [`USED_CATEGORIES`], initialized once.
#[must_use]
pub fn default_allow_list() -> &'static AllowList {
    &DEFAULT_ALLOW_LIST
}
