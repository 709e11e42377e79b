mod common;

use common::*;
use proptest::prelude::*;
use crux_http::protocol::HttpResult;
use shared::workflows::submission::FormField;
use shared::{Event, Model, Screen};

fn field_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[ \t\n]{1,4}",
        "[A-Za-z0-9 ]{1,12}",
    ]
}

#[derive(Debug, Clone)]
enum Outcome {
    Status(u16),
    Timeout,
    Io(String),
}

impl Outcome {
    fn succeeds(&self) -> bool {
        matches!(self, Outcome::Status(status) if (200..300).contains(status))
    }

    fn into_result(self) -> HttpResult {
        match self {
            Outcome::Status(status) => {
                json_response(status, &serde_json::json!({ "message": "rejected" }))
            }
            Outcome::Timeout => HttpResult::Err(crux_http::Error::Timeout),
            Outcome::Io(message) => HttpResult::Err(crux_http::Error::Io(message)),
        }
    }
}

fn outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        (200u16..300).prop_map(Outcome::Status),
        (400u16..600).prop_map(Outcome::Status),
        Just(Outcome::Timeout),
        "[a-z ]{0,10}".prop_map(Outcome::Io),
    ]
}

proptest! {
    #[test]
    fn network_only_for_complete_forms(
        title in field_value(),
        category in field_value(),
        ward in field_value(),
    ) {
        let app = Tester::default();
        let mut model = Model::default();
        navigate(&app, &mut model, Screen::Submission);
        app.update(Event::FieldChanged(FormField::Title(title.clone())), &mut model);
        app.update(Event::FieldChanged(FormField::Category(category.clone())), &mut model);
        app.update(Event::FieldChanged(FormField::Ward(ward.clone())), &mut model);

        let update = app.update(Event::SubmitReport, &mut model);
        let complete = [&title, &category, &ward].iter().all(|v| !v.trim().is_empty());

        prop_assert_eq!(api_requests(update.effects).len(), usize::from(complete));
        prop_assert_eq!(model.submission.submitting, complete);
    }

    #[test]
    fn submitting_always_resets(result in outcome()) {
        let app = Tester::default();
        let mut model = Model::default();
        filled_submission(&app, &mut model);

        let update = app.update(Event::SubmitReport, &mut model);
        let mut request = single_api_request(update.effects);
        prop_assert!(model.submission.submitting);

        let succeeded = result.succeeds();
        respond(&app, &mut model, &mut request, result.into_result());

        prop_assert!(!model.submission.submitting);
        if succeeded {
            prop_assert_eq!(model.screen, Screen::Listing);
        } else {
            prop_assert_eq!(model.screen, Screen::Submission);
            prop_assert!(model.submission.error_message.is_some());
        }
    }
}
