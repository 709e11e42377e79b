use serde::{Deserialize, Serialize};

use crate::capabilities::{HttpResult, PickerResult};
use crate::config::AppConfig;
use crate::model::{MountToken, ReportId, Screen};
use crate::workflows::submission::FormField;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum Event {
    // Lifecycle & navigation
    AppStarted,
    Configure(AppConfig),
    Navigate {
        to: Screen,
    },
    NavigateBack,
    DismissAlert,
    DismissError,
    LocationUpdated {
        lat: f64,
        lng: f64,
    },

    // Submission
    FieldChanged(FormField),
    SelectImage,
    ImagePicked {
        mount: MountToken,
        result: Box<PickerResult>,
    },
    ClearImage,
    SubmitReport,
    ImageUploaded {
        mount: MountToken,
        result: Box<HttpResult>,
    },
    ReportCreated {
        mount: MountToken,
        result: Box<HttpResult>,
    },

    // Listing
    RefreshReports,
    ReportsLoaded {
        mount: MountToken,
        result: Box<HttpResult>,
    },
    OpenPreview {
        url: String,
    },
    ClosePreview,
    DraftChanged {
        report_id: ReportId,
        text: String,
    },
    SubmitComment {
        report_id: ReportId,
    },
    CommentPosted {
        mount: MountToken,
        report_id: ReportId,
        result: Box<HttpResult>,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AppStarted => "app_started",
            Self::Configure(_) => "configure",
            Self::Navigate { .. } => "navigate",
            Self::NavigateBack => "navigate_back",
            Self::DismissAlert => "dismiss_alert",
            Self::DismissError => "dismiss_error",
            Self::LocationUpdated { .. } => "location_updated",
            Self::FieldChanged(_) => "field_changed",
            Self::SelectImage => "select_image",
            Self::ImagePicked { .. } => "image_picked",
            Self::ClearImage => "clear_image",
            Self::SubmitReport => "submit_report",
            Self::ImageUploaded { .. } => "image_uploaded",
            Self::ReportCreated { .. } => "report_created",
            Self::RefreshReports => "refresh_reports",
            Self::ReportsLoaded { .. } => "reports_loaded",
            Self::OpenPreview { .. } => "open_preview",
            Self::ClosePreview => "close_preview",
            Self::DraftChanged { .. } => "draft_changed",
            Self::SubmitComment { .. } => "submit_comment",
            Self::CommentPosted { .. } => "comment_posted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_snake_case() {
        assert_eq!(Event::SubmitReport.name(), "submit_report");
        assert_eq!(
            Event::DraftChanged {
                report_id: ReportId::new("1"),
                text: String::new()
            }
            .name(),
            "draft_changed"
        );
    }
}
