use std::collections::BTreeSet;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced by the data layer (loading and filtering).
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}, column '{column}': cannot parse '{value}'")]
    BadCell {
        row: usize,
        column: String,
        value: String,
    },

    #[error("invalid age range: {lo} > {hi}")]
    InvalidRange { lo: i64, hi: i64 },

    #[error("{0}")]
    Format(String),
}

// ---------------------------------------------------------------------------
// CustomerRecord – one row of the source table
// ---------------------------------------------------------------------------

/// The twelve required source column headers, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 12] = [
    "Gender",
    "City",
    "Age",
    "Net Sales",
    "Items Purchased",
    "Discount Amount",
    "Satisfaction Level",
    "Engagement Score",
    "Average Rating",
    "Repeat Purchase Intent",
    "Customer Acquisition Channel",
    "Lead Source",
];

/// A single customer record (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRecord {
    pub gender: String,
    pub city: String,
    pub age: i64,
    pub net_sales: f64,
    pub items_purchased: i64,
    pub discount_amount: f64,
    pub satisfaction_level: String,
    pub engagement_score: f64,
    pub average_rating: f64,
    pub repeat_purchase_intent: String,
    pub acquisition_channel: String,
    pub lead_source: String,
}

// ---------------------------------------------------------------------------
// RecordStore – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed category indices.
/// Immutable after construction; filtering only selects row indices.
#[derive(Debug, Clone)]
pub struct RecordStore {
    /// All records (rows).
    pub records: Vec<CustomerRecord>,
    /// Sorted unique values per categorical column.
    pub genders: BTreeSet<String>,
    pub cities: BTreeSet<String>,
    pub satisfaction_levels: BTreeSet<String>,
    pub repeat_intents: BTreeSet<String>,
    pub acquisition_channels: BTreeSet<String>,
    pub lead_sources: BTreeSet<String>,
    /// Inclusive age span across all rows, `None` for an empty store.
    pub age_span: Option<(i64, i64)>,
}

impl RecordStore {
    /// Build category indices from the loaded records.
    pub fn from_records(records: Vec<CustomerRecord>) -> Self {
        let mut genders = BTreeSet::new();
        let mut cities = BTreeSet::new();
        let mut satisfaction_levels = BTreeSet::new();
        let mut repeat_intents = BTreeSet::new();
        let mut acquisition_channels = BTreeSet::new();
        let mut lead_sources = BTreeSet::new();
        let mut age_span: Option<(i64, i64)> = None;

        for rec in &records {
            genders.insert(rec.gender.clone());
            cities.insert(rec.city.clone());
            satisfaction_levels.insert(rec.satisfaction_level.clone());
            repeat_intents.insert(rec.repeat_purchase_intent.clone());
            acquisition_channels.insert(rec.acquisition_channel.clone());
            lead_sources.insert(rec.lead_source.clone());

            age_span = Some(match age_span {
                Some((lo, hi)) => (lo.min(rec.age), hi.max(rec.age)),
                None => (rec.age, rec.age),
            });
        }

        RecordStore {
            records,
            genders,
            cities,
            satisfaction_levels,
            repeat_intents,
            acquisition_channels,
            lead_sources,
            age_span,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
