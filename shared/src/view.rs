use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::model::{Alert, Category, Model, Report, Screen};
use crate::workflows::listing::{ListingState, StatusBadge, NO_COMMENTS_PLACEHOLDER};
use crate::workflows::submission::SubmissionState;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserFacingError {
    pub message: String,
    pub is_transient: bool,
    pub error_code: String,
}

impl From<&AppError> for UserFacingError {
    fn from(e: &AppError) -> Self {
        Self {
            message: e.user_facing_message(),
            is_transient: e.kind.is_transient(),
            error_code: e.code().to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionView {
    pub title: String,
    pub description: String,
    pub category: String,
    pub categories: Vec<String>,
    pub ward: String,
    pub contact: String,
    pub image_url: String,
    /// Local URI of the picked image, for the thumbnail.
    pub image_preview_uri: Option<String>,
    pub error_message: Option<String>,
    /// While true the submit control is replaced by a progress indicator.
    pub submitting: bool,
}

impl From<&SubmissionState> for SubmissionView {
    fn from(state: &SubmissionState) -> Self {
        let form = &state.form;
        Self {
            title: form.title.clone(),
            description: form.description.clone(),
            category: form.category.clone(),
            categories: Category::ALL
                .iter()
                .map(|c| c.as_str().to_string())
                .collect(),
            ward: form.ward.clone(),
            contact: form.contact.clone(),
            image_url: form.image_url.clone(),
            image_preview_uri: form.image.as_ref().map(|asset| asset.uri.clone()),
            error_message: state.error_message.clone(),
            submitting: state.submitting,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub ward: String,
    pub category: Option<String>,
    pub status_label: String,
    pub badge: StatusBadge,
    pub badge_color: String,
    pub image_url: Option<String>,
    pub comments: Vec<String>,
    /// Set when there are no comments to show.
    pub comments_placeholder: Option<String>,
    pub draft: String,
}

impl ReportCard {
    fn build(report: &Report, listing: &ListingState) -> Self {
        let badge = StatusBadge::for_status(&report.status);
        let comments: Vec<String> = report.comments.iter().map(|c| c.text.clone()).collect();
        let comments_placeholder = comments
            .is_empty()
            .then(|| NO_COMMENTS_PLACEHOLDER.to_string());

        Self {
            id: report.id.to_string(),
            title: report.title.clone(),
            description: report.description.clone(),
            ward: report.ward.clone(),
            category: report.category.clone(),
            status_label: report.status.label().to_string(),
            badge,
            badge_color: badge.color_hex().to_string(),
            image_url: report.image().map(str::to_string),
            comments,
            comments_placeholder,
            draft: listing.draft(&report.id).to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListingView {
    pub cards: Vec<ReportCard>,
    pub is_loading: bool,
    pub load_error: Option<String>,
    pub preview_url: Option<String>,
}

impl From<&ListingState> for ListingView {
    fn from(state: &ListingState) -> Self {
        Self {
            cards: state
                .reports
                .iter()
                .map(|report| ReportCard::build(report, state))
                .collect(),
            is_loading: state.is_loading,
            load_error: state.load_error.clone(),
            preview_url: state.preview_url.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ScreenView {
    Home { destinations: Vec<Screen> },
    Submission(SubmissionView),
    Listing(ListingView),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub screen: Screen,
    pub title: String,
    pub can_go_back: bool,
    pub body: ScreenView,
    pub alert: Option<Alert>,
    pub error: Option<UserFacingError>,
}

impl From<&Model> for ViewModel {
    fn from(model: &Model) -> Self {
        let body = match model.screen {
            Screen::Home => ScreenView::Home {
                destinations: vec![Screen::Submission, Screen::Listing],
            },
            Screen::Submission => ScreenView::Submission((&model.submission).into()),
            Screen::Listing => ScreenView::Listing((&model.listing).into()),
        };

        Self {
            screen: model.screen,
            title: model.screen.title().to_string(),
            can_go_back: model.screen != Screen::Home,
            body,
            alert: model.active_alert.clone(),
            error: model.active_error.as_ref().map(UserFacingError::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::PickedAsset;
    use crate::model::{Comment, ReportId, ReportStatus};

    fn report(id: &str, status: &str) -> Report {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "title": "Streetlight out",
            "ward": "Ward 2",
            "status": status,
            "comments": []
        }))
        .unwrap()
    }

    #[test]
    fn test_home_offers_both_destinations() {
        let view = ViewModel::from(&Model::default());
        assert_eq!(view.title, "The Torch");
        assert!(!view.can_go_back);
        assert_eq!(
            view.body,
            ScreenView::Home {
                destinations: vec![Screen::Submission, Screen::Listing]
            }
        );
    }

    #[test]
    fn test_card_without_comments_shows_placeholder() {
        let mut model = Model::default();
        model.mount_screen(Screen::Listing);
        model.listing.replace_reports(vec![report("1", "open")]);

        let view = ViewModel::from(&model);
        assert_eq!(view.title, "All Reports");
        let ScreenView::Listing(listing) = view.body else {
            panic!("expected listing view");
        };
        let card = &listing.cards[0];
        assert_eq!(card.comments_placeholder.as_deref(), Some("No comments yet."));
        assert_eq!(card.badge, StatusBadge::Open);
        assert_eq!(card.badge_color, "#007bff");
        assert_eq!(card.status_label, "open");
        assert!(card.image_url.is_none());
    }

    #[test]
    fn test_card_with_comments_and_draft() {
        let mut model = Model::default();
        model.mount_screen(Screen::Listing);
        let mut r = report("1", "weird");
        r.comments.push(Comment {
            text: "Seen it too".into(),
        });
        model.listing.replace_reports(vec![r]);
        model
            .listing
            .edit_draft(ReportId::new("1"), "any update?".into());

        let ScreenView::Listing(listing) = ViewModel::from(&model).body else {
            panic!("expected listing view");
        };
        let card = &listing.cards[0];
        assert_eq!(card.comments, vec!["Seen it too".to_string()]);
        assert!(card.comments_placeholder.is_none());
        assert_eq!(card.draft, "any update?");
        assert_eq!(card.badge, StatusBadge::Default);
        assert_eq!(card.status_label, "weird");
        assert_eq!(ReportStatus::parse("weird").label(), "weird");
    }

    #[test]
    fn test_submission_view_reflects_form() {
        let mut model = Model::default();
        model.mount_screen(Screen::Submission);
        model.submission.form.image = Some(PickedAsset::new("file:///a.jpg", vec![1, 2]));
        model.submission.submitting = true;

        let view = ViewModel::from(&model);
        assert_eq!(view.title, "Submit Report");
        assert!(view.can_go_back);
        let ScreenView::Submission(form) = view.body else {
            panic!("expected submission view");
        };
        assert_eq!(form.category, "Roads");
        assert_eq!(form.categories.len(), 7);
        assert_eq!(form.image_preview_uri.as_deref(), Some("file:///a.jpg"));
        assert!(form.submitting);
    }
}
