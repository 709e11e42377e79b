#![allow(dead_code)]

use crux_core::testing::{AppTester, Update};
use crux_core::Request;
use crux_http::protocol::{HttpRequest, HttpResponse, HttpResult};
use shared::capabilities::PickerOperation;
use shared::workflows::submission::FormField;
use shared::{App, Effect, Event, Model, Screen};

pub type Tester = AppTester<App, Effect>;

pub const BASE_URL: &str = "http://192.168.100.79:5000/api";

pub fn api_requests(effects: Vec<Effect>) -> Vec<Request<HttpRequest>> {
    effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::Http(request) => Some(request),
            _ => None,
        })
        .collect()
}

pub fn picker_requests(effects: Vec<Effect>) -> Vec<Request<PickerOperation>> {
    effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::ImagePicker(request) => Some(request),
            _ => None,
        })
        .collect()
}

pub fn renders(effects: &[Effect]) -> bool {
    effects.iter().any(|effect| matches!(effect, Effect::Render(_)))
}

/// The one HTTP request among `effects`.
pub fn single_api_request(effects: Vec<Effect>) -> Request<HttpRequest> {
    let mut requests = api_requests(effects);
    assert_eq!(requests.len(), 1, "expected exactly one HTTP request");
    requests.remove(0)
}

pub fn http(request: &Request<HttpRequest>) -> &HttpRequest {
    &request.operation
}

pub fn header<'a>(request: &'a Request<HttpRequest>, name: &str) -> Option<&'a str> {
    request
        .operation
        .headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}

pub fn json_body(request: &Request<HttpRequest>) -> serde_json::Value {
    serde_json::from_slice(&request.operation.body).expect("request body should be JSON")
}

/// Resolves `request` and runs every event it produces through the app.
pub fn respond(
    app: &Tester,
    model: &mut Model,
    request: &mut Request<HttpRequest>,
    result: HttpResult,
) -> Vec<Effect> {
    let update = app.resolve(request, result).expect("request should resolve");
    run_events(app, model, update)
}

pub fn json_response(status: u16, body: &serde_json::Value) -> HttpResult {
    HttpResult::Ok(
        HttpResponse::status(status)
            .header("Content-Type", "application/json")
            .body(body.to_string().into_bytes())
            .build(),
    )
}

pub fn respond_json(
    app: &Tester,
    model: &mut Model,
    request: &mut Request<HttpRequest>,
    status: u16,
    body: serde_json::Value,
) -> Vec<Effect> {
    respond(app, model, request, json_response(status, &body))
}

pub fn respond_error(
    app: &Tester,
    model: &mut Model,
    request: &mut Request<HttpRequest>,
    error: crux_http::Error,
) -> Vec<Effect> {
    respond(app, model, request, HttpResult::Err(error))
}

pub fn run_events(app: &Tester, model: &mut Model, update: Update<Effect, Event>) -> Vec<Effect> {
    let mut effects = update.effects;
    for event in update.events {
        effects.extend(app.update(event, model).effects);
    }
    effects
}

pub fn navigate(app: &Tester, model: &mut Model, to: Screen) -> Vec<Effect> {
    app.update(Event::Navigate { to }, model).effects
}

/// A Submission screen with the required fields filled in.
pub fn filled_submission(app: &Tester, model: &mut Model) {
    navigate(app, model, Screen::Submission);
    app.update(Event::FieldChanged(FormField::Title("Pothole".into())), model);
    app.update(
        Event::FieldChanged(FormField::Description("Deep one near the market".into())),
        model,
    );
    app.update(Event::FieldChanged(FormField::Ward("Ward 4".into())), model);
}
