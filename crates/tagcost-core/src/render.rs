//! Metric rendering
//!
//! Turns one scrape's cost records into the Prometheus text exposition.
//! A fresh registry is built per scrape so the endpoint always reflects the
//! live response, with no samples carried over from earlier scrapes.

use crate::error::{ExporterError, Result};
use crate::record::CostRecord;
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};

/// The one metric this exporter exposes
pub const METRIC_NAME: &str = "aws_project_cost";

/// Help text carried over from the original exporter
pub const METRIC_HELP: &str = "Total amount of costs for project";

/// Render records as the `aws_project_cost` gauge exposition.
///
/// `label_names` must align with each record's tag values (one label per
/// configured dimension). Every record becomes exactly one sample; when two
/// records share a label set the later write wins, which is the sink's own
/// semantics rather than a uniqueness guarantee of this layer.
pub fn render_samples(records: &[CostRecord], label_names: &[String]) -> Result<String> {
    if records.is_empty() {
        // Zero samples is a valid exposition
        return Ok(String::new());
    }

    let registry = Registry::new();
    let names: Vec<&str> = label_names.iter().map(String::as_str).collect();
    let gauge = GaugeVec::new(Opts::new(METRIC_NAME, METRIC_HELP), &names)?;
    registry.register(Box::new(gauge.clone()))?;

    for record in records {
        let values: Vec<&str> = record.tags.iter().map(String::as_str).collect();
        gauge.get_metric_with_label_values(&values)?.set(record.cost);
    }

    let mut buf = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buf)?;
    String::from_utf8(buf).map_err(|e| ExporterError::Metrics(e.to_string()))
}
