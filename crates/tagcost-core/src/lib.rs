//! # tagcost-core
//!
//! Cost-record extraction and normalization for the tagcost exporter:
//! turning a grouped AWS Cost Explorer response into flat per-tag cost
//! records and rendering them as Prometheus gauge samples.
//!
//! ## Pipeline
//!
//! - [`PollWindow`]: the hourly `[day start, hour start)` query interval
//! - [`CostSource`]: the billing collaborator seam (one fetch operation)
//! - [`Normalizer`]: raw grouped buckets -> ordered [`CostRecord`]s
//! - [`render_samples`]: records -> `aws_project_cost` text exposition
//!
//! Each scrape runs [`pipeline::collect_records`] from scratch; nothing is
//! cached or persisted across scrapes.

pub mod config;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod render;
pub mod source;
pub mod window;

// Re-export commonly used types at crate root
pub use config::ExporterConfig;
pub use error::{ExporterError, Result};
pub use normalize::Normalizer;
pub use record::{CostRecord, RawGroup, TimeBucket};
pub use render::{render_samples, METRIC_HELP, METRIC_NAME};
pub use source::CostSource;
pub use window::PollWindow;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
