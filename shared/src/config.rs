use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::capabilities::{ApiConfig, HttpError};
use crate::model::Screen;

pub const DEFAULT_API_BASE_URL: &str = "http://192.168.100.79:5000/api";
pub const REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(REQUEST_TIMEOUT_MS);

pub const REPORTS_PATH: &str = "/reports";
pub const UPLOAD_PATH: &str = "/upload";
pub const COMMENTS_SEGMENT: &str = "comments";

/// Where the user lands after a report is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitDestination {
    #[default]
    Listing,
    Home,
}

impl SubmitDestination {
    #[must_use]
    pub const fn screen(self) -> Screen {
        match self {
            Self::Listing => Screen::Listing,
            Self::Home => Screen::Home,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub after_submit: SubmitDestination,
}

impl AppConfig {
    #[must_use]
    pub fn with_after_submit(mut self, destination: SubmitDestination) -> Self {
        self.after_submit = destination;
        self
    }

    /// Re-checks a config that arrived from the shell, since deserializing
    /// bypasses `ApiConfig::new`.
    pub fn validated(self) -> Result<Self, HttpError> {
        let api = ApiConfig::new(self.api.base_url(), self.api.timeout())?;
        Ok(Self { api, ..self })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(config.api.timeout(), REQUEST_TIMEOUT);
        assert_eq!(config.after_submit.screen(), Screen::Listing);
    }

    #[test]
    fn test_home_destination() {
        let config = AppConfig::default().with_after_submit(SubmitDestination::Home);
        assert_eq!(config.after_submit.screen(), Screen::Home);
    }

    #[test]
    fn test_shell_config_is_revalidated() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "api": { "base_url": "ftp://files.example.com", "timeout_ms": 10000 },
            "after_submit": "home"
        }))
        .unwrap();
        assert!(config.validated().is_err());

        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "api": { "base_url": "https://torch.example.org/api", "timeout_ms": 5000 },
            "after_submit": "listing"
        }))
        .unwrap();
        let config = config.validated().unwrap();
        assert_eq!(config.api.base_url(), "https://torch.example.org/api");
        assert_eq!(config.api.timeout(), Duration::from_secs(5));
    }
}
