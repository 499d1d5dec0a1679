//! Exporter configuration
//!
//! All configuration is read from the environment once at startup into an
//! explicit [`ExporterConfig`] that is passed by reference into the pipeline.
//! Core logic never performs ambient environment lookups.

use crate::error::{ExporterError, Result};
use serde::{Deserialize, Serialize};

/// Default tag dimension when none is configured
pub const DEFAULT_DIMENSION: &str = "Name";

/// Default metrics listen port
pub const DEFAULT_PORT: u16 = 9150;

/// Environment variable holding the comma-separated tag dimension list
pub const ENV_TAG_DIMENSIONS: &str = "TAG_DIMENSIONS";

/// Legacy single-dimension environment variable
pub const ENV_TAG_PROJECT: &str = "TAG_PROJECT";

/// Environment variable holding the metrics listen port
pub const ENV_PORT: &str = "PORT";

/// Configuration for one exporter process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Ordered tag dimensions cost is grouped by (length >= 1)
    pub dimensions: Vec<String>,
    /// Listen port for the metrics endpoint
    pub port: u16,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            dimensions: vec![DEFAULT_DIMENSION.to_string()],
            port: DEFAULT_PORT,
        }
    }
}

impl ExporterConfig {
    /// Create a config for an explicit dimension list
    pub fn new(dimensions: Vec<String>, port: u16) -> Result<Self> {
        let config = Self { dimensions, port };
        config.validate()?;
        Ok(config)
    }

    /// Build the config from the process environment.
    ///
    /// `TAG_DIMENSIONS` takes a comma-separated ordered list of tag keys;
    /// `TAG_PROJECT` is honored as a single-dimension fallback for
    /// compatibility with earlier deployments. Default: one dimension,
    /// `Name`, on port 9150.
    pub fn from_env() -> Result<Self> {
        let raw_dims = std::env::var(ENV_TAG_DIMENSIONS)
            .or_else(|_| std::env::var(ENV_TAG_PROJECT))
            .unwrap_or_else(|_| DEFAULT_DIMENSION.to_string());
        let dimensions = parse_dimensions(&raw_dims)?;

        let port = match std::env::var(ENV_PORT) {
            Ok(raw) => parse_port(&raw)?,
            Err(_) => DEFAULT_PORT,
        };

        Self::new(dimensions, port)
    }

    /// Prometheus label names, one per dimension, in dimension order
    pub fn label_names(&self) -> Vec<String> {
        self.dimensions.iter().map(|d| sanitize_label(d)).collect()
    }

    fn validate(&self) -> Result<()> {
        if self.dimensions.is_empty() {
            return Err(ExporterError::Config(
                "at least one tag dimension is required".to_string(),
            ));
        }
        if self.dimensions.iter().any(|d| d.is_empty()) {
            return Err(ExporterError::Config(
                "tag dimension names must be non-empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse a comma-separated dimension list, trimming whitespace
pub fn parse_dimensions(raw: &str) -> Result<Vec<String>> {
    let dims: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if dims.is_empty() {
        return Err(ExporterError::Config(format!(
            "no tag dimensions in {:?}",
            raw
        )));
    }
    Ok(dims)
}

/// Parse a listen port from its environment string form
pub fn parse_port(raw: &str) -> Result<u16> {
    raw.trim()
        .parse::<u16>()
        .map_err(|e| ExporterError::Config(format!("invalid port {:?}: {}", raw, e)))
}

/// Convert a tag dimension name into a Prometheus label name
pub fn sanitize_label(dimension: &str) -> String {
    let mut label: String = dimension
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    // Label names cannot start with a digit
    if label.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        label.insert(0, '_');
    }
    label
}
