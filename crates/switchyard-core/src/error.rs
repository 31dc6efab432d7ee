use http::StatusCode;

/// Trait for domain errors that can be converted to HTTP responses
///
/// Implemented by the provider and routing error types so a caller can
/// surface an attempt failure without matching on every variant.
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Machine-readable error type (e.g. `upstream_error`)
    fn error_type(&self) -> &str;

    /// Message safe to expose to API consumers
    fn client_message(&self) -> String;
}
