use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::{DEFAULT_API_BASE_URL, REQUEST_TIMEOUT_MS};

pub const MAX_URL_LENGTH: usize = 2048;
pub const MAX_REQUEST_BODY_SIZE: usize = 50 * 1024 * 1024;
pub const MAX_TIMEOUT_MS: u64 = 300_000;

/// The shell aborts the request once this many milliseconds have passed
/// and reports `crux_http::Error::Timeout`.
pub const TIMEOUT_HEADER: &str = "X-Request-Timeout-Ms";

/// Fixed transport settings shared by every workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    base_url: ValidatedUrl,
    timeout_ms: u64,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, HttpError> {
        let base_url = ValidatedUrl::new(base_url)?;
        let timeout_ms = validate_timeout(timeout)?;
        Ok(Self {
            base_url,
            timeout_ms,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Resolves `path` beneath the base URL, keeping the base URL's own path.
    pub fn url_for(&self, path: &str) -> Result<ValidatedUrl, HttpError> {
        self.url_for_segments(path.split('/').filter(|s| !s.is_empty()))
    }

    /// Like [`Self::url_for`], but percent-encodes each segment.
    pub fn url_for_segments<'a, I>(&self, segments: I) -> Result<ValidatedUrl, HttpError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.base_url.to_url()?;
        {
            let mut path = url.path_segments_mut().map_err(|()| HttpError::InvalidUrl {
                url: self.base_url.as_str().to_string(),
                reason: "base URL cannot carry a path".to_string(),
            })?;
            path.pop_if_empty().extend(segments);
        }
        ValidatedUrl::new(url.to_string())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: ValidatedUrl(DEFAULT_API_BASE_URL.to_string()),
            timeout_ms: REQUEST_TIMEOUT_MS,
        }
    }
}

fn validate_timeout(timeout: Duration) -> Result<u64, HttpError> {
    let ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    if ms == 0 {
        return Err(HttpError::InvalidRequest {
            reason: "timeout cannot be zero".to_string(),
        });
    }
    if ms > MAX_TIMEOUT_MS {
        return Err(HttpError::InvalidRequest {
            reason: format!("timeout exceeds maximum of {MAX_TIMEOUT_MS}ms"),
        });
    }
    Ok(ms)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidatedUrl(String);

impl ValidatedUrl {
    pub fn new(url: impl Into<String>) -> Result<Self, HttpError> {
        let url = url.into();

        if url.trim().is_empty() {
            return Err(HttpError::InvalidUrl {
                url,
                reason: "URL cannot be empty".to_string(),
            });
        }

        if url.len() > MAX_URL_LENGTH {
            return Err(HttpError::InvalidUrl {
                url: truncate_url(&url),
                reason: format!("URL exceeds maximum length of {MAX_URL_LENGTH} bytes"),
            });
        }

        let parsed = Url::parse(&url).map_err(|e| HttpError::InvalidUrl {
            url: truncate_url(&url),
            reason: e.to_string(),
        })?;

        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(HttpError::InvalidUrl {
                url: truncate_url(&url),
                reason: format!("invalid scheme '{scheme}', only 'http' and 'https' are allowed"),
            });
        }

        if parsed.host_str().is_none() {
            return Err(HttpError::InvalidUrl {
                url: truncate_url(&url),
                reason: "URL must have a host".to_string(),
            });
        }

        if !parsed.username().is_empty() || parsed.password().is_some() {
            return Err(HttpError::InvalidUrl {
                url: truncate_url(&url),
                reason: "credentials in URL are not allowed".to_string(),
            });
        }

        Ok(Self(parsed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn to_url(&self) -> Result<Url, HttpError> {
        Url::parse(&self.0).map_err(|e| HttpError::InvalidUrl {
            url: truncate_url(&self.0),
            reason: e.to_string(),
        })
    }
}

impl std::fmt::Display for ValidatedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn truncate_url(url: &str) -> String {
    match url.char_indices().nth(100) {
        Some((idx, _)) => format!("{}...", &url[..idx]),
        None => url.to_string(),
    }
}

pub fn json_body<T: Serialize>(value: &T) -> Result<Vec<u8>, HttpError> {
    serde_json::to_vec(value).map_err(|e| HttpError::SerializationError {
        message: e.to_string(),
    })
}

pub fn checked_body(body: Vec<u8>) -> Result<Vec<u8>, HttpError> {
    if body.len() > MAX_REQUEST_BODY_SIZE {
        return Err(HttpError::BodyTooLarge {
            size: body.len(),
            max: MAX_REQUEST_BODY_SIZE,
        });
    }
    Ok(body)
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum HttpError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request body too large: {size} bytes exceeds maximum of {max} bytes")]
    BodyTooLarge { size: usize, max: usize },

    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("serialization error: {message}")]
    SerializationError { message: String },

    #[error("Network Error")]
    Network { message: String },

    #[error("timeout of {timeout_ms}ms exceeded")]
    Timeout { timeout_ms: u64 },

    #[error("Request failed with status code {status}")]
    HttpStatus { status: u16, body: Option<Vec<u8>> },

    #[error("invalid response: {reason}")]
    InvalidResponse { reason: String },
}

impl HttpError {
    fn from_crux(error: crux_http::Error, timeout_ms: u64) -> Self {
        match error {
            crux_http::Error::Http(e) => HttpError::HttpStatus {
                status: u16::from(e.code),
                body: e.body.filter(|b| !b.is_empty()),
            },
            crux_http::Error::Timeout => HttpError::Timeout { timeout_ms },
            crux_http::Error::Io(message) => HttpError::Network { message },
            crux_http::Error::Url(reason) => HttpError::InvalidUrl {
                url: String::new(),
                reason,
            },
            other => HttpError::InvalidResponse {
                reason: other.to_string(),
            },
        }
    }
}

/// The part of a completed exchange the workflows read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HttpResponse {
    status: u16,
    #[serde(with = "serde_bytes")]
    body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    pub fn ok_json(value: &serde_json::Value) -> Self {
        Self::new(200, value.to_string().into_bytes())
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_slice(&self.body).map_err(|e| HttpError::InvalidResponse {
            reason: format!("failed to parse JSON: {e}"),
        })
    }
}

pub type HttpResult = Result<HttpResponse, HttpError>;

/// Folds what `crux_http` hands a `send` callback into an [`HttpResult`].
/// Any status outside 2xx is a rejection carrying the response body.
pub fn into_http_result(
    result: crux_http::Result<crux_http::Response<Vec<u8>>>,
    timeout_ms: u64,
) -> HttpResult {
    let mut response = result.map_err(|e| HttpError::from_crux(e, timeout_ms))?;
    let status = u16::from(response.status());
    let body = response.take_body().unwrap_or_default();

    let response = HttpResponse::new(status, body);
    if response.is_success() {
        Ok(response)
    } else {
        Err(HttpError::HttpStatus {
            status,
            body: (!response.body.is_empty()).then_some(response.body),
        })
    }
}
