//! Error types for the tagcost pipeline
//!
//! Provides a unified error type shared by the fetch, normalize, and
//! render stages.

use thiserror::Error;

/// Result type alias using ExporterError
pub type Result<T> = std::result::Result<T, ExporterError>;

/// Unified error type for exporter operations
#[derive(Debug, Error)]
pub enum ExporterError {
    // Billing collaborator failures (auth, network, throttling, bad shape)
    #[error("Cost fetch failed: {0}")]
    Fetch(String),

    // A raw group value without the expected "<TagKey>$" prefix
    #[error("Malformed group value {raw:?} for tag dimension {dimension:?}")]
    Decode { dimension: String, raw: String },

    // Invalid environment configuration
    #[error("Configuration error: {0}")]
    Config(String),

    // Prometheus registration or encoding failures
    #[error("Metrics error: {0}")]
    Metrics(String),
}

// Implement From for common external error types
impl From<prometheus::Error> for ExporterError {
    fn from(err: prometheus::Error) -> Self {
        ExporterError::Metrics(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExporterError::Fetch("throttled by Cost Explorer".to_string());
        assert!(err.to_string().contains("throttled"));
    }

    #[test]
    fn test_decode_error_names_dimension() {
        let err = ExporterError::Decode {
            dimension: "Product".to_string(),
            raw: "Team#web".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Product"));
        assert!(msg.contains("Team#web"));
    }

    #[test]
    fn test_from_prometheus_error() {
        let err: ExporterError =
            prometheus::Error::Msg("duplicate collector".to_string()).into();
        assert!(matches!(err, ExporterError::Metrics(_)));
    }
}
