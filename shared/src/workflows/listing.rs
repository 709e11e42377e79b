use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::capabilities::{HttpError, HttpResponse};
use crate::error::ValidationError;
use crate::model::{Report, ReportId, ReportStatus};

pub const NO_COMMENTS_PLACEHOLDER: &str = "No comments yet.";
pub const COMMENT_FAILED_MESSAGE: &str = "Failed to add comment.";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load reports.";

/// Body of `POST /reports/{id}/comments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingState {
    /// Server order, never re-sorted.
    pub reports: Vec<Report>,
    pub drafts: HashMap<ReportId, String>,
    pub preview_url: Option<String>,
    pub is_loading: bool,
    pub load_error: Option<String>,
}

impl ListingState {
    /// Records that cannot be read at all (no `_id`, not an object) are
    /// skipped so the rest of the list still shows.
    pub fn parse_reports(response: &HttpResponse) -> Result<Vec<Report>, HttpError> {
        let records: Vec<serde_json::Value> = response.json()?;
        Ok(records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value(record) {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!(index, error = %e, "skipping unreadable report");
                    None
                }
            })
            .collect())
    }

    pub fn replace_reports(&mut self, reports: Vec<Report>) {
        self.reports = reports;
        self.is_loading = false;
        self.load_error = None;
    }

    pub fn fail_load(&mut self, message: impl Into<String>) {
        self.is_loading = false;
        self.load_error = Some(message.into());
    }

    pub fn draft(&self, report_id: &ReportId) -> &str {
        self.drafts.get(report_id).map_or("", String::as_str)
    }

    pub fn edit_draft(&mut self, report_id: ReportId, text: String) {
        self.drafts.insert(report_id, text);
    }

    /// The comment to post for `report_id`, or why there is none.
    pub fn comment_for(&self, report_id: &ReportId) -> Result<NewComment, ValidationError> {
        let text = self.draft(report_id);
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyComment);
        }
        Ok(NewComment {
            text: text.to_string(),
        })
    }

    /// A posted comment is followed by a full refetch that replaces all
    /// local listing state, drafts included.
    pub fn comment_accepted(&mut self) {
        self.drafts.clear();
    }

    pub fn open_preview(&mut self, url: String) {
        self.preview_url = Some(url);
    }

    pub fn close_preview(&mut self) {
        self.preview_url = None;
    }
}

/// Badge style for a report status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusBadge {
    Open,
    InProgress,
    Resolved,
    Default,
}

impl StatusBadge {
    #[must_use]
    pub fn for_status(status: &ReportStatus) -> Self {
        match status {
            ReportStatus::Open => Self::Open,
            ReportStatus::InProgress => Self::InProgress,
            ReportStatus::Resolved => Self::Resolved,
            ReportStatus::Other(_) => Self::Default,
        }
    }

    #[must_use]
    pub const fn color_hex(self) -> &'static str {
        match self {
            Self::Open => "#007bff",
            Self::InProgress => "#ff9800",
            Self::Resolved => "#28a745",
            Self::Default => "#888",
        }
    }
}
