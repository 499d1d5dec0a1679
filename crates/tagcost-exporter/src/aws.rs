//! AWS Cost Explorer implementation of [`CostSource`]
//!
//! Issues one GetCostAndUsage call per scrape: blended cost, HOURLY
//! granularity, grouped by the configured tag dimensions in order.
//! Credentials, region, and retries come from the default AWS config chain.

use async_trait::async_trait;
use aws_sdk_costexplorer::error::DisplayErrorContext;
use aws_sdk_costexplorer::types::{
    DateInterval, Granularity, GroupDefinition, GroupDefinitionType,
};
use aws_sdk_costexplorer::Client;
use tagcost_core::error::{ExporterError, Result};
use tagcost_core::record::{RawGroup, TimeBucket};
use tagcost_core::source::CostSource;
use tagcost_core::window::PollWindow;
use tracing::debug;

/// The cost metric requested from Cost Explorer
const COST_METRIC: &str = "BlendedCost";

/// Cost Explorer backed cost source
pub struct AwsCostSource {
    client: Client,
}

impl AwsCostSource {
    /// Create a source using the default AWS credential and region chain
    pub async fn new() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self {
            client: Client::new(&config),
        }
    }

    /// Create a source from an existing client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CostSource for AwsCostSource {
    async fn fetch(&self, window: &PollWindow, dimensions: &[String]) -> Result<Vec<TimeBucket>> {
        let time_period = DateInterval::builder()
            .start(window.start_bound())
            .end(window.end_bound())
            .build()
            .map_err(|e| ExporterError::Fetch(format!("invalid time period: {}", e)))?;

        let group_by: Vec<GroupDefinition> = dimensions
            .iter()
            .map(|dimension| {
                GroupDefinition::builder()
                    .r#type(GroupDefinitionType::Tag)
                    .key(dimension)
                    .build()
            })
            .collect();

        let response = self
            .client
            .get_cost_and_usage()
            .time_period(time_period)
            .granularity(Granularity::Hourly)
            .metrics(COST_METRIC)
            .set_group_by(Some(group_by))
            .send()
            .await
            .map_err(|e| ExporterError::Fetch(format!("{}", DisplayErrorContext(e))))?;

        let buckets: Vec<TimeBucket> = response
            .results_by_time()
            .iter()
            .map(|result| {
                let groups = result
                    .groups()
                    .iter()
                    .map(|group| {
                        // A group without a blended-cost amount decodes to an
                        // empty string; the normalizer skips it with a warning.
                        let amount = group
                            .metrics()
                            .and_then(|m| m.get(COST_METRIC))
                            .and_then(|v| v.amount())
                            .unwrap_or_default()
                            .to_string();
                        RawGroup::new(group.keys().to_vec(), amount)
                    })
                    .collect();
                TimeBucket::new(groups)
            })
            .collect();

        debug!(buckets = buckets.len(), "Cost Explorer response received");
        Ok(buckets)
    }
}
