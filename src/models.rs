//! Data models for the roster analyzer.
//!
//! This module contains all the core data structures used throughout
//! the application for representing member records, frequency buckets,
//! and the derived distribution entries.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column holding the numeric monthly-visit count.
pub const FIELD_VISITS: &str = "Visits per month";

/// Column holding the raw city name.
pub const FIELD_CITY: &str = "City";

/// Columns passed through untouched to the roster table.
pub const ROSTER_COLUMNS: [&str; 5] = [
    "Name",
    "City",
    "Fav game today",
    "Looking to play",
    "How often you want to play",
];

/// One row of the member roster, keyed by column name.
///
/// Fields are not guaranteed present; absent fields read as the empty
/// string. Column order from the source header is preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(flatten)]
    fields: IndexMap<String, String>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field value, replacing any previous value for that column.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Returns the value for a column, or `""` if the column is absent.
    pub fn get(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    /// Returns the column names in source order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

/// Activity-frequency bucket.
///
/// The set of buckets and their labels is a fixed catalog, not derived
/// from data. Catalog order is significant for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrequencyBucket {
    /// More than 8 visits per month.
    VeryActive,
    /// 4 to 8 visits per month (inclusive on both ends).
    Active,
    /// 2 to 4 visits per month (4 excluded).
    Regular,
    /// Fewer than 2 visits per month.
    Occasional,
}

impl FrequencyBucket {
    /// The fixed display order: VeryActive, Active, Regular, Occasional.
    pub const CATALOG: [FrequencyBucket; 4] = [
        FrequencyBucket::VeryActive,
        FrequencyBucket::Active,
        FrequencyBucket::Regular,
        FrequencyBucket::Occasional,
    ];

    /// Classifies a monthly-visit count into a bucket.
    ///
    /// Evaluated in strict precedence order so boundary values are never
    /// double-counted: a member with exactly 8 visits is Active, with
    /// exactly 4 is Active, with exactly 2 is Regular.
    pub fn classify(visits: f64) -> Self {
        if visits > 8.0 {
            FrequencyBucket::VeryActive
        } else if visits >= 4.0 {
            FrequencyBucket::Active
        } else if visits >= 2.0 {
            FrequencyBucket::Regular
        } else {
            FrequencyBucket::Occasional
        }
    }

    /// Returns the display label for this bucket.
    pub fn label(&self) -> &'static str {
        match self {
            FrequencyBucket::VeryActive => "Very Active (>8x/month)",
            FrequencyBucket::Active => "Active (4-8x/month)",
            FrequencyBucket::Regular => "Regular (2-4x/month)",
            FrequencyBucket::Occasional => "Occasional (1-2x/month)",
        }
    }
}

impl fmt::Display for FrequencyBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One row of the activity-frequency distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    /// Fixed bucket label.
    pub label: String,
    /// Number of members in the bucket.
    pub count: usize,
    /// Share of all members, formatted to one decimal (e.g. "23.5").
    pub percentage: String,
}

/// One row of the city distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityEntry {
    /// Normalized city name.
    pub city: String,
    /// Number of members from that city.
    pub count: usize,
    /// Share of all members, formatted to one decimal (e.g. "23.5").
    pub percentage: String,
}

/// Metadata about a generated roster report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// URL or path the roster was loaded from.
    pub source: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Total number of loaded members (the shared percentage denominator).
    pub total_members: usize,
}

/// The complete roster report: metadata, both distributions, and the
/// raw member rows for the pass-through table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterReport {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// Activity-frequency distribution (4 entries, fixed order; empty
    /// when the roster is empty).
    pub frequency: Vec<FrequencyEntry>,
    /// City distribution, descending by count.
    pub cities: Vec<CityEntry>,
    /// The loaded member rows, untouched.
    pub members: Vec<Record>,
}

/// Load-cycle state for the roster source.
///
/// Exactly one transition per cycle: `Loading -> Ready` or
/// `Loading -> Failed`. There are no retries and no recovery from
/// `Failed`; a fresh load starts a new cycle with a new `Loading` value.
#[derive(Debug, Clone)]
pub enum LoadState {
    /// Load requested, outcome not yet known.
    Loading,
    /// Records loaded; aggregation reads from here.
    Ready(Vec<Record>),
    /// Load failed with a human-readable message.
    Failed(String),
}

impl LoadState {
    /// Applies the load outcome. Only a `Loading` state transitions;
    /// a resolved state is returned unchanged.
    pub fn resolve(self, outcome: Result<Vec<Record>, String>) -> Self {
        match self {
            LoadState::Loading => match outcome {
                Ok(records) => LoadState::Ready(records),
                Err(message) => LoadState::Failed(message),
            },
            resolved => resolved,
        }
    }

    /// Returns the loaded records, if ready.
    pub fn records(&self) -> Option<&[Record]> {
        match self {
            LoadState::Ready(records) => Some(records),
            _ => None,
        }
    }

    /// Returns the failure message, if failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Returns true while the load outcome is pending.
    #[allow(dead_code)] // State query for future interactive callers
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}
