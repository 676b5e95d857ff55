use thiserror::Error;

/// Errors from [`crate::source::DistanceMatrixSource::fetch`] and from
/// strategies that delegate ordering to a provider.
///
/// URLs recorded here never include query strings, so credentials passed as
/// query parameters stay out of logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// No addresses were provided.
    #[error("at least one address is required")]
    EmptyInput,
    /// The request could not be built.
    #[error("invalid provider request: {message}")]
    InvalidRequest {
        /// Description of the problem.
        message: String,
    },
    /// The provider did not answer within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Endpoint that timed out.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The provider answered with a non-success HTTP status.
    #[error("request to {url} failed with HTTP {status}: {message}")]
    Http {
        /// Endpoint that failed.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error detail.
        message: String,
    },
    /// The provider could not be reached.
    #[error("request to {url} failed: {message}")]
    Network {
        /// Endpoint that could not be reached.
        url: String,
        /// Error detail.
        message: String,
    },
    /// The provider rejected the request.
    #[error("mapping provider rejected the request ({status}): {message}")]
    Service {
        /// Provider status code, e.g. `REQUEST_DENIED`.
        status: String,
        /// Provider message, possibly empty.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse provider response: {message}")]
    Parse {
        /// Error detail.
        message: String,
    },
}
