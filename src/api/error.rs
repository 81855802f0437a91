/// Error types for the provider API layer
use thiserror::Error;

/// Errors from inventory calls (region enumeration, instance listing).
/// Any of these aborts the scan that triggered the call.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network-related errors
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered with a non-OKAY envelope code
    #[error("Provider error ({code}): {detail}")]
    Api {
        /// Envelope code returned by the API
        code: String,
        /// Human-readable detail, when the API supplied one
        detail: String,
    },

    /// Response body was not the expected JSON shape
    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

/// Failure fetching one metric for one instance. Recovered at the call
/// site by substituting zero; never aborts a scan.
#[derive(Debug, Error)]
#[error("Metric {metric} unavailable for {instance_id}: {source}")]
pub struct MetricError {
    pub metric: String,
    pub instance_id: String,
    #[source]
    pub source: ProviderError,
}
