//! Authentication strategies for upstream providers
//!
//! - Google service-account JWT exchange with a pluggable token cache
//! - AWS Signature Version 4 request signing for Bedrock

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod cache;
mod error;
pub mod gcp;
pub mod sigv4;

pub use cache::{CacheProvider, MemoryTokenCache, StoredToken, TokenFuture};
pub use error::AuthError;
pub use gcp::{CLOUD_PLATFORM_SCOPE, GOOGLE_TOKEN_URI, GoogleTokenIssuer, ServiceAccountKey};
pub use sigv4::{AwsCredentials, SigV4Signer, SignableRequest};
