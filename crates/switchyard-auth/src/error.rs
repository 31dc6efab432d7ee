/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A required credential or signing input was not supplied
    #[error("{0}")]
    MissingCredential(String),

    /// Service-account JSON could not be parsed
    #[error("invalid service account JSON: {0}")]
    InvalidServiceAccount(String),

    /// Private key could not be decoded
    #[error("invalid private key: {0}")]
    InvalidKey(String),

    /// JWT assertion could not be signed
    #[error("failed to sign token assertion: {0}")]
    Signing(String),

    /// HTTP request to the token endpoint failed
    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Token endpoint returned a non-success response
    #[error("Failed to get Google access token: {status} - {body}")]
    TokenExchange {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Token endpoint returned an unexpected payload
    #[error("invalid token response: {0}")]
    InvalidResponse(String),

    /// Request URL could not be parsed for signing
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Computed header value is not a valid HTTP header
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),

    /// Token cache backend failure
    #[error("token cache: {0}")]
    Cache(String),
}
