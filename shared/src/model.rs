use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::AppConfig;
use crate::error::{AppError, CoordinateError};
use crate::workflows::listing::ListingState;
use crate::workflows::submission::SubmissionState;

// --- Typed IDs ---

/// Backend-assigned report identifier (`_id`).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ReportId(pub String);

impl ReportId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// --- Categories presented by the submission form ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Roads,
    Water,
    Security,
    Electricity,
    Health,
    Agriculture,
    Other,
}

impl Category {
    pub const ALL: [Self; 7] = [
        Self::Roads,
        Self::Water,
        Self::Security,
        Self::Electricity,
        Self::Health,
        Self::Agriculture,
        Self::Other,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Roads => "Roads",
            Self::Water => "Water",
            Self::Security => "Security",
            Self::Electricity => "Electricity",
            Self::Health => "Health",
            Self::Agriculture => "Agriculture",
            Self::Other => "Other",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Roads
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Report status ---

/// Server status; unrecognised values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReportStatus {
    Open,
    InProgress,
    Resolved,
    Other(String),
}

impl ReportStatus {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "open" => Self::Open,
            "inprogress" => Self::InProgress,
            "resolved" => Self::Resolved,
            _ => Self::Other(raw.to_string()),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in progress",
            Self::Resolved => "resolved",
            Self::Other(raw) => raw,
        }
    }
}

/// A report without a status has no label and takes the default badge.
impl Default for ReportStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for ReportStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<ReportStatus> for String {
    fn from(status: ReportStatus) -> Self {
        match status {
            ReportStatus::Other(raw) => raw,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// --- Location ---

/// Validated longitude/latitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

impl GeoPoint {
    /// Stand-in used until the shell supplies a real fix.
    pub const PLACEHOLDER: Self = Self { lat: 0.0, lng: 0.0 };

    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(CoordinateError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateError::LongitudeOutOfRange(lng));
        }
        Ok(Self { lat, lng })
    }

    #[must_use]
    pub const fn lat(self) -> f64 {
        self.lat
    }

    #[must_use]
    pub const fn lng(self) -> f64 {
        self.lng
    }

    /// GeoJSON point; positions are `[lng, lat]`.
    #[must_use]
    pub fn to_geometry(self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::Point(vec![self.lng, self.lat]))
    }
}

impl Default for GeoPoint {
    fn default() -> Self {
        Self::PLACEHOLDER
    }
}

// --- Server read model ---

/// Reads a field the backend may send as `null` or in an unexpected shape,
/// falling back to the field type's default.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Comment {
    #[serde(default, deserialize_with = "lenient")]
    pub text: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(rename = "_id")]
    pub id: ReportId,
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub ward: String,
    #[serde(default, deserialize_with = "lenient")]
    pub contact: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<geojson::Geometry>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: ReportStatus,
    #[serde(default, deserialize_with = "lenient")]
    pub comments: Vec<Comment>,
}

impl Report {
    /// The attached image, treating an empty URL as none.
    pub fn image(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

// --- Navigation ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Home,
    Submission,
    Listing,
}

impl Screen {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "The Torch",
            Self::Submission => "Submit Report",
            Self::Listing => "All Reports",
        }
    }
}

/// Identifies one mount of a screen. Responses carry the token of the
/// mount that issued them and are dropped once it has been replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MountToken(pub u64);

impl MountToken {
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

// --- Alerts ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    #[default]
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub kind: AlertKind,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>, kind: AlertKind) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new("Success", message, AlertKind::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new("Error", message, AlertKind::Error)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("Validation Error", message, AlertKind::Error)
    }
}

// --- Model ---

#[derive(Debug, Default)]
pub struct Model {
    pub config: AppConfig,
    pub screen: Screen,
    pub mount: MountToken,
    pub location: GeoPoint,
    pub submission: SubmissionState,
    pub listing: ListingState,
    pub active_error: Option<AppError>,
    pub active_alert: Option<Alert>,
}

impl Model {
    /// Replaces the current screen with a fresh mount of `screen`.
    /// Screen-scoped state from the previous mount is discarded.
    pub fn mount_screen(&mut self, screen: Screen) -> MountToken {
        self.screen = screen;
        self.mount = self.mount.next();
        self.submission = SubmissionState::default();
        self.listing = ListingState::default();
        self.mount
    }

    #[must_use]
    pub fn is_live(&self, screen: Screen, mount: MountToken) -> bool {
        self.screen == screen && self.mount == mount
    }

    pub fn set_error(&mut self, error: AppError) {
        self.active_error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.active_error = None;
    }

    pub fn show_alert(&mut self, alert: Alert) {
        self.active_alert = Some(alert);
    }

    pub fn dismiss_alert(&mut self) {
        self.active_alert = None;
    }
}
