//! Data model for the normalization pipeline
//!
//! [`TimeBucket`] and [`RawGroup`] mirror the shape of a grouped
//! GetCostAndUsage response; [`CostRecord`] is the flat normalized output
//! handed to the metric renderer. Records live for one scrape and are never
//! persisted.

use serde::{Deserialize, Serialize};

/// One grouped entry from the billing response.
///
/// `keys` holds one `"<TagKey>$<TagValue>"` string per requested tag
/// dimension, in request order; `amount` is the blended cost as a decimal
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGroup {
    /// Raw `"Key$Value"` strings, one per dimension
    pub keys: Vec<String>,
    /// Cost amount as returned by the API
    pub amount: String,
}

impl RawGroup {
    /// Create a group from raw key strings and an amount string
    pub fn new(keys: Vec<String>, amount: impl Into<String>) -> Self {
        Self {
            keys,
            amount: amount.into(),
        }
    }
}

/// One hourly result bucket holding zero or more raw groups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucket {
    /// Groups seen in this bucket, one per distinct tag-value combination
    pub groups: Vec<RawGroup>,
}

impl TimeBucket {
    /// Create a bucket from its groups
    pub fn new(groups: Vec<RawGroup>) -> Self {
        Self { groups }
    }

    /// True when the bucket holds no groups (no cost incurred)
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Normalized per-tag cost for one scrape.
///
/// `tags` holds the decoded tag values aligned with the configured
/// dimension order; empty strings are legal values. At least one tag value
/// is non-empty by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    /// Decoded tag values, one per dimension, in dimension order
    pub tags: Vec<String>,
    /// Cost at full precision
    pub cost: f64,
}

impl CostRecord {
    /// Create a record from decoded tag values and a cost
    pub fn new(tags: Vec<String>, cost: f64) -> Self {
        Self { tags, cost }
    }

    /// Cost rounded to 2 fractional digits, for display and logging only
    pub fn rounded_cost(&self) -> f64 {
        (self.cost * 100.0).round() / 100.0
    }

    /// True when at least one tag value is non-empty
    pub fn is_tagged(&self) -> bool {
        self.tags.iter().any(|t| !t.is_empty())
    }
}
