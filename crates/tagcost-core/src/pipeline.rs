//! Scrape pipeline
//!
//! One scrape is a pure function of the current time and the live billing
//! response: build the poll window, fetch, normalize. No caching and no
//! state shared across scrapes; a failed fetch aborts the whole cycle so a
//! partial record set is never emitted.

use crate::config::ExporterConfig;
use crate::error::Result;
use crate::normalize::Normalizer;
use crate::record::CostRecord;
use crate::source::CostSource;
use crate::window::PollWindow;
use tracing::{debug, info};

/// Run one fetch-and-normalize cycle for the current instant
pub async fn collect_records(
    source: &dyn CostSource,
    config: &ExporterConfig,
) -> Result<Vec<CostRecord>> {
    collect_records_for_window(source, config, PollWindow::current()).await
}

/// Run one fetch-and-normalize cycle for an explicit window
pub async fn collect_records_for_window(
    source: &dyn CostSource,
    config: &ExporterConfig,
    window: PollWindow,
) -> Result<Vec<CostRecord>> {
    info!(
        start = %window.start_bound(),
        end = %window.end_bound(),
        dimensions = ?config.dimensions,
        "Fetching cost and usage"
    );

    let buckets = source.fetch(&window, &config.dimensions).await?;
    let records = Normalizer::new(config.dimensions.clone()).normalize(&buckets);

    debug!(buckets = buckets.len(), records = records.len(), "Scrape normalized");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExporterError;
    use crate::record::{RawGroup, TimeBucket};
    use async_trait::async_trait;

    struct FixedSource {
        buckets: Vec<TimeBucket>,
    }

    #[async_trait]
    impl CostSource for FixedSource {
        async fn fetch(&self, _: &PollWindow, _: &[String]) -> Result<Vec<TimeBucket>> {
            Ok(self.buckets.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl CostSource for FailingSource {
        async fn fetch(&self, _: &PollWindow, _: &[String]) -> Result<Vec<TimeBucket>> {
            Err(ExporterError::Fetch("connection reset".to_string()))
        }
    }

    fn config(dims: &[&str]) -> ExporterConfig {
        ExporterConfig::new(dims.iter().map(|d| d.to_string()).collect(), 9150).unwrap()
    }

    #[tokio::test]
    async fn test_collect_records_end_to_end() {
        let source = FixedSource {
            buckets: vec![TimeBucket::new(vec![
                RawGroup::new(
                    vec!["Product$web".to_string(), "App$checkout".to_string()],
                    "12.3456",
                ),
                RawGroup::new(vec!["Product$".to_string(), "App$".to_string()], "4.0"),
            ])],
        };
        let records = collect_records(&source, &config(&["Product", "App"]))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tags, vec!["web".to_string(), "checkout".to_string()]);
        assert_eq!(records[0].cost, 12.3456);
    }

    #[tokio::test]
    async fn test_collect_records_empty_response() {
        let source = FixedSource { buckets: vec![] };
        let records = collect_records(&source, &config(&["Name"])).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let err = collect_records(&FailingSource, &config(&["Name"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ExporterError::Fetch(_)));
    }
}
