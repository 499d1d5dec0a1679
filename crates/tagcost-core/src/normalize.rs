//! Cost normalizer
//!
//! Walks the time-bucketed GetCostAndUsage response and produces the flat
//! ordered sequence of [`CostRecord`]s for one scrape:
//!
//! - Only the first bucket holding at least one raw group is normalized;
//!   zero-group buckets are skipped and later buckets are never inspected.
//! - Each dimension value is decoded by stripping the `"<TagKey>$"` prefix.
//! - Groups whose decoded values are all empty are dropped as untagged.
//! - A malformed group (bad prefix, wrong arity, unparseable amount) is
//!   skipped on its own; it never aborts the scrape.

use crate::error::{ExporterError, Result};
use crate::record::{CostRecord, RawGroup, TimeBucket};
use tracing::{debug, warn};

/// Decode one raw `"<TagKey>$<TagValue>"` string for the given dimension.
///
/// The value may legitimately be empty. A string without the exact
/// `"<TagKey>$"` prefix is a decode error.
pub fn decode_tag_value(dimension: &str, raw: &str) -> Result<String> {
    let prefix = format!("{}$", dimension);
    raw.strip_prefix(prefix.as_str())
        .map(str::to_string)
        .ok_or_else(|| ExporterError::Decode {
            dimension: dimension.to_string(),
            raw: raw.to_string(),
        })
}

/// Select the bucket a scrape normalizes: the first with >= 1 group.
///
/// Buckets with no groups model "no cost incurred this hour" and are
/// skipped. Once a populated bucket is found, later buckets are ignored
/// even when the populated bucket yields no records after filtering.
pub fn first_populated(buckets: &[TimeBucket]) -> Option<&TimeBucket> {
    buckets.iter().find(|b| !b.is_empty())
}

/// Normalizer parameterized by the ordered tag dimension list
#[derive(Debug, Clone)]
pub struct Normalizer {
    dimensions: Vec<String>,
}

impl Normalizer {
    /// Create a normalizer for an ordered dimension list (length >= 1)
    pub fn new(dimensions: Vec<String>) -> Self {
        Self { dimensions }
    }

    /// Tag dimensions this normalizer decodes, in order
    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    /// Convert a bucketed response into the scrape's cost records.
    ///
    /// Records come out in response order; nothing is sorted or
    /// deduplicated. An empty response yields an empty vec.
    pub fn normalize(&self, buckets: &[TimeBucket]) -> Vec<CostRecord> {
        let Some(bucket) = first_populated(buckets) else {
            debug!(buckets = buckets.len(), "No populated bucket in response");
            return Vec::new();
        };

        let mut records = Vec::with_capacity(bucket.groups.len());
        for group in &bucket.groups {
            match self.normalize_group(group) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {
                    debug!(keys = ?group.keys, "Skipping fully untagged group");
                }
                Err(err) => {
                    warn!(keys = ?group.keys, error = %err, "Skipping malformed group");
                }
            }
        }
        records
    }

    /// Decode one group. `Ok(None)` means the group was valid but fully
    /// untagged and must be dropped.
    fn normalize_group(&self, group: &RawGroup) -> Result<Option<CostRecord>> {
        if group.keys.len() != self.dimensions.len() {
            return Err(ExporterError::Decode {
                dimension: self.dimensions.join(","),
                raw: format!("{} group values for {} dimensions", group.keys.len(), self.dimensions.len()),
            });
        }

        let tags = self
            .dimensions
            .iter()
            .zip(&group.keys)
            .map(|(dimension, raw)| decode_tag_value(dimension, raw))
            .collect::<Result<Vec<String>>>()?;

        if tags.iter().all(|t| t.is_empty()) {
            return Ok(None);
        }

        let cost: f64 = group.amount.parse().map_err(|_| ExporterError::Decode {
            dimension: self.dimensions.join(","),
            raw: group.amount.clone(),
        })?;

        Ok(Some(CostRecord::new(tags, cost)))
    }
}
