use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::capabilities::{HttpError, PickerError};

pub const GENERIC_ERROR_MESSAGE: &str = "Unknown error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Validation,
    Network,
    Timeout,
    Backend,
    InvalidResponse,
    ImagePicker,
    InvalidRequest,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Network => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Backend => "BACKEND_ERROR",
            Self::InvalidResponse => "INVALID_RESPONSE",
            Self::ImagePicker => "IMAGE_PICKER_ERROR",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    /// Transport-level failures that may succeed on a plain retry.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::Network | Self::Timeout)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub internal_message: Option<String>,
    pub context: HashMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            internal_message: None,
            context: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal_message = Some(internal.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Validation
            | ErrorKind::Network
            | ErrorKind::Timeout
            | ErrorKind::Backend => {
                if self.message.trim().is_empty() {
                    GENERIC_ERROR_MESSAGE.into()
                } else {
                    self.message.clone()
                }
            }
            ErrorKind::InvalidResponse => {
                "The server sent a response the app could not read. Please try again.".into()
            }
            ErrorKind::ImagePicker => {
                "Unable to open your photos. Please try again.".into()
            }
            ErrorKind::InvalidRequest | ErrorKind::Internal => {
                "An unexpected error occurred. Please try again.".into()
            }
        }
    }

    /// Builds the display message for a failed request.
    ///
    /// Preference order: the backend's `message` field, then the response
    /// body as text, then the transport error itself.
    #[must_use]
    pub fn from_http_error(error: &HttpError) -> Self {
        match error {
            HttpError::HttpStatus { status, body } => {
                let message = body
                    .as_deref()
                    .and_then(backend_message)
                    .or_else(|| body.as_deref().and_then(body_as_text))
                    .unwrap_or_else(|| error.to_string());

                Self::new(ErrorKind::Backend, message)
                    .with_context("http_status", status.to_string())
            }
            HttpError::Timeout { timeout_ms } => Self::new(ErrorKind::Timeout, error.to_string())
                .with_context("timeout_ms", timeout_ms.to_string()),
            HttpError::Network { message } => {
                Self::new(ErrorKind::Network, error.to_string()).with_internal(message)
            }
            HttpError::InvalidResponse { reason } => {
                Self::new(ErrorKind::InvalidResponse, error.to_string()).with_internal(reason)
            }
            HttpError::InvalidUrl { .. }
            | HttpError::BodyTooLarge { .. }
            | HttpError::InvalidRequest { .. } => {
                Self::new(ErrorKind::InvalidRequest, error.to_string())
            }
            HttpError::SerializationError { message } => {
                Self::new(ErrorKind::Internal, error.to_string()).with_internal(message)
            }
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal_message {
            write!(f, " (internal: {internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

impl From<HttpError> for AppError {
    fn from(e: HttpError) -> Self {
        Self::from_http_error(&e)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

fn backend_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ApiErrorResponse>(body)
        .ok()
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty())
}

fn body_as_text(body: &[u8]) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    let text = match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value) => value.to_string(),
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequiredField {
    Title,
    Category,
    Ward,
}

impl RequiredField {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Category => "Category",
            Self::Ward => "Ward",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title, Category, and Ward are required.")]
    MissingRequiredFields(Vec<RequiredField>),
    #[error("Comment cannot be empty.")]
    EmptyComment,
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        let error = AppError::new(ErrorKind::Validation, e.to_string());
        match &e {
            ValidationError::MissingRequiredFields(fields) => {
                let missing: Vec<&str> = fields.iter().map(|f| f.label()).collect();
                error.with_context("missing", missing.join(","))
            }
            ValidationError::EmptyComment => error,
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum CoordinateError {
    #[error("Latitude {0} is out of valid range [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("Longitude {0} is out of valid range [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("Coordinate value is not finite (NaN or Infinity)")]
    NonFinite,
}

impl From<CoordinateError> for AppError {
    fn from(e: CoordinateError) -> Self {
        AppError::new(ErrorKind::Validation, e.to_string())
    }
}

impl From<PickerError> for AppError {
    fn from(e: PickerError) -> Self {
        AppError::new(ErrorKind::ImagePicker, e.to_string())
    }
}
