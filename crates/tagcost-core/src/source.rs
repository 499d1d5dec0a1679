//! Billing collaborator seam

use crate::error::Result;
use crate::record::TimeBucket;
use crate::window::PollWindow;
use async_trait::async_trait;

/// A source of grouped cost-and-usage data.
///
/// One operation: fetch blended cost for the window at HOURLY granularity,
/// grouped by the given tag dimensions in order. Implementations own their
/// auth, pagination, and retry concerns; a failed call maps to
/// [`ExporterError::Fetch`](crate::error::ExporterError::Fetch) and the
/// scrape publishes nothing.
#[async_trait]
pub trait CostSource: Send + Sync {
    /// Fetch the time-bucketed groups for one poll window
    async fn fetch(&self, window: &PollWindow, dimensions: &[String]) -> Result<Vec<TimeBucket>>;
}
