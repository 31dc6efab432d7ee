//! AWS Signature Version 4 request signing
//!
//! Signs with `hmac` and `sha2` directly; the signer only needs static
//! credentials, so the AWS SDK is not pulled in.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use http::header::{AUTHORIZATION, HOST, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use url::Url;

use crate::AuthError;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const X_AMZ_DATE: &str = "x-amz-date";
const X_AMZ_CONTENT_SHA256: &str = "x-amz-content-sha256";
const X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";

/// Static AWS credentials
#[derive(Debug, Clone)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: SecretString,
    pub session_token: Option<SecretString>,
}

impl AwsCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: SecretString::from(secret_access_key.into()),
            session_token: None,
        }
    }

    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(SecretString::from(token.into()));
        self
    }
}

/// Request parts covered by the signature
#[derive(Debug, Clone, Copy)]
pub struct SignableRequest<'a> {
    pub method: &'a str,
    pub url: &'a str,
    pub headers: &'a HeaderMap,
    pub body: &'a [u8],
}

/// Signs requests for one service in one region
#[derive(Debug, Clone)]
pub struct SigV4Signer {
    service: String,
    region: String,
}

struct CanonicalRequest<'a> {
    method: &'a str,
    uri: String,
    query: String,
    headers: BTreeMap<String, String>,
    payload_hash: String,
}

impl SigV4Signer {
    pub fn new(service: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Sign `request` as of `now`
    ///
    /// Returns the request headers plus `host`, `x-amz-date`,
    /// `x-amz-content-sha256`, `authorization` and, for temporary
    /// credentials, `x-amz-security-token`.
    pub fn sign(
        &self,
        credentials: &AwsCredentials,
        request: &SignableRequest<'_>,
        now: DateTime<Utc>,
    ) -> Result<HeaderMap, AuthError> {
        let url = Url::parse(request.url)?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_owned(),
            (None, _) => return Err(AuthError::MissingCredential("request url has no host".to_owned())),
        };

        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let payload_hash = sha256_hex(request.body);

        let mut signed = BTreeMap::new();
        for (name, value) in request.headers {
            if name == AUTHORIZATION {
                continue;
            }
            let value = value
                .to_str()
                .map_err(|e| AuthError::Signing(format!("header {name} is not visible ASCII: {e}")))?;
            signed.insert(name.as_str().to_owned(), value.trim().to_owned());
        }
        signed.insert(HOST.as_str().to_owned(), host);
        signed.insert(X_AMZ_DATE.to_owned(), amz_date.clone());
        signed.insert(X_AMZ_CONTENT_SHA256.to_owned(), payload_hash.clone());
        if let Some(token) = &credentials.session_token {
            signed.insert(X_AMZ_SECURITY_TOKEN.to_owned(), token.expose_secret().to_owned());
        }

        let canonical = CanonicalRequest {
            method: request.method,
            uri: canonical_path(url.path()),
            query: canonical_query(&url),
            headers: signed,
            payload_hash,
        };

        let authorization = self.authorization_header(credentials, &canonical, now)?;

        let mut headers = request.headers.clone();
        for (name, value) in &canonical.headers {
            let name = HeaderName::try_from(name.as_str()).map_err(|e| AuthError::Signing(e.to_string()))?;
            headers.insert(name, HeaderValue::from_str(value)?);
        }
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&authorization)?);

        tracing::debug!(
            service = %self.service,
            region = %self.region,
            amz_date = %amz_date,
            "signed request"
        );

        Ok(headers)
    }

    fn authorization_header(
        &self,
        credentials: &AwsCredentials,
        request: &CanonicalRequest<'_>,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let date = now.format("%Y%m%d").to_string();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();

        let mut canonical_headers = String::new();
        for (name, value) in &request.headers {
            let _ = writeln!(canonical_headers, "{name}:{value}");
        }
        let signed_headers = request.headers.keys().map(String::as_str).collect::<Vec<_>>().join(";");

        let canonical_request = format!(
            "{}\n{}\n{}\n{canonical_headers}\n{signed_headers}\n{}",
            request.method, request.uri, request.query, request.payload_hash
        );

        let scope = format!("{date}/{}/{}/aws4_request", self.region, self.service);
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
            sha256_hex(canonical_request.as_bytes())
        );

        let signing_key = derive_signing_key(
            credentials.secret_access_key.expose_secret(),
            &date,
            &self.region,
            &self.service,
        )?;
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes())?);

        Ok(format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
            credentials.access_key_id
        ))
    }
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, AuthError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key).map_err(|e| AuthError::Signing(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn derive_signing_key(secret: &str, date: &str, region: &str, service: &str) -> Result<Vec<u8>, AuthError> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

/// URI-encode every byte outside the unreserved set
///
/// Existing `%XX` escapes in paths are kept as they are.
fn uri_encode(input: &str, keep_escapes: bool) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let escaped = keep_escapes
            && b == b'%'
            && bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
            && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);

        if escaped {
            out.push('%');
            out.push(char::from(bytes[i + 1].to_ascii_uppercase()));
            out.push(char::from(bytes[i + 2].to_ascii_uppercase()));
            i += 3;
            continue;
        }

        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(b));
        } else {
            let _ = write!(out, "%{b:02X}");
        }
        i += 1;
    }

    out
}

/// Canonical URI: each path segment encoded once, `/` separators kept
fn canonical_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_owned();
    }

    path.split('/')
        .map(|segment| uri_encode(segment, true))
        .collect::<Vec<_>>()
        .join("/")
}

/// Canonical query string: encoded pairs sorted by name, then value
fn canonical_query(url: &Url) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (uri_encode(&k, false), uri_encode(&v, false)))
        .collect();
    pairs.sort();

    pairs
        .into_iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}
