use tracing::{debug, error, info, warn};

use crate::capabilities::{
    checked_body, into_http_result, json_body, Capabilities, HttpError, HttpResult, PickConfig,
    ValidatedUrl, TIMEOUT_HEADER,
};
use crate::config::{COMMENTS_SEGMENT, REPORTS_PATH, UPLOAD_PATH};
use crate::error::AppError;
use crate::event::Event;
use crate::model::{Alert, GeoPoint, Model, MountToken, ReportId, Screen};
use crate::multipart::MultipartForm;
use crate::view::ViewModel;
use crate::workflows::listing::{
    ListingState, NewComment, COMMENT_FAILED_MESSAGE, LOAD_FAILED_MESSAGE,
};
use crate::workflows::submission::UploadResponse;

pub const REPORT_SUBMITTED_MESSAGE: &str = "Report submitted";

#[derive(Default)]
pub struct App;

impl App {
    /// Responses issued by an earlier mount, or by a screen that is no
    /// longer shown, are dropped.
    fn is_live(model: &Model, screen: Screen, mount: MountToken, event_name: &str) -> bool {
        let live = model.is_live(screen, mount);
        if !live {
            debug!(
                event = event_name,
                issued_by = mount.0,
                current = model.mount.0,
                "discarding response for unmounted screen"
            );
        }
        live
    }

    fn navigate(model: &mut Model, caps: &Capabilities, screen: Screen) {
        let mount = model.mount_screen(screen);
        info!(screen = ?screen, mount = mount.0, "screen mounted");

        if screen == Screen::Listing {
            Self::load_reports(model, caps);
        }
    }

    // --- Submission ---

    fn submit_report(model: &mut Model, caps: &Capabilities) {
        if model.submission.submitting {
            debug!("submit ignored: a submission is already in flight");
            return;
        }

        if let Err(e) = model.submission.form.validate() {
            info!(error = %e, "report rejected by validation");
            model.submission.reject(&e);
            model.show_alert(Alert::validation(e.to_string()));
            model.set_error(e.into());
            return;
        }

        model.submission.begin();
        model.clear_error();

        match model.submission.form.upload_form() {
            Some(form) => Self::start_upload(model, caps, &form),
            None => Self::send_create(model, caps),
        }
    }

    fn start_upload(model: &mut Model, caps: &Capabilities, form: &MultipartForm) {
        let (content_type, body) = form.encode();
        let prepared = model
            .config
            .api
            .url_for(UPLOAD_PATH)
            .and_then(|url| Ok((url, checked_body(body.to_vec())?)));
        let (url, body) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => return Self::finish_submission(model, caps, Err(e.into())),
        };

        info!(url = %url, bytes = body.len(), "uploading report image");

        let mount = model.mount;
        let timeout_ms = model.config.api.timeout_ms();
        caps.http
            .post(url.as_str())
            .header("Content-Type", content_type)
            .header(TIMEOUT_HEADER, timeout_ms.to_string())
            .body(body)
            .send(move |result| Event::ImageUploaded {
                mount,
                result: Box::new(into_http_result(result, timeout_ms)),
            });
    }

    fn upload_finished(model: &mut Model, caps: &Capabilities, result: HttpResult) {
        match result.and_then(|response| UploadResponse::from_response(&response)) {
            Ok(upload) => {
                info!(url = %upload.url, "image uploaded");
                model.submission.form.image_url = upload.url;
                Self::send_create(model, caps);
            }
            Err(e) => Self::finish_submission(model, caps, Err(e.into())),
        }
    }

    fn send_create(model: &mut Model, caps: &Capabilities) {
        let payload = model.submission.form.to_request(model.location);
        debug!(
            title = %payload.title,
            category = %payload.category,
            ward = %payload.ward,
            image_url = %payload.image_url,
            "creating report"
        );

        let prepared = model
            .config
            .api
            .url_for(REPORTS_PATH)
            .and_then(|url| Ok((url, json_body(&payload)?)));
        let (url, body) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => return Self::finish_submission(model, caps, Err(e.into())),
        };

        let mount = model.mount;
        let timeout_ms = model.config.api.timeout_ms();
        caps.http
            .post(url.as_str())
            .header("Content-Type", "application/json")
            .header(TIMEOUT_HEADER, timeout_ms.to_string())
            .body(body)
            .send(move |result| Event::ReportCreated {
                mount,
                result: Box::new(into_http_result(result, timeout_ms)),
            });
    }

    /// The single exit of a submission. `submitting` is cleared on every path.
    fn finish_submission(model: &mut Model, caps: &Capabilities, outcome: Result<(), AppError>) {
        match outcome {
            Ok(()) => {
                info!("report submitted");
                model.submission.finish(Ok(()));
                model.show_alert(Alert::success(REPORT_SUBMITTED_MESSAGE));
                let destination = model.config.after_submit.screen();
                Self::navigate(model, caps, destination);
            }
            Err(e) => {
                error!(code = e.code(), error = %e, "report submission failed");
                let message = e.user_facing_message();
                model.submission.finish(Err(message.clone()));
                model.show_alert(Alert::error(message));
                model.set_error(e);
            }
        }
    }

    // --- Listing ---

    fn load_reports(model: &mut Model, caps: &Capabilities) {
        let url = match model.config.api.url_for(REPORTS_PATH) {
            Ok(url) => url,
            Err(e) => {
                let e = AppError::from(e);
                error!(error = %e, "could not build report list request");
                model.listing.fail_load(LOAD_FAILED_MESSAGE);
                model.set_error(e);
                return;
            }
        };

        model.listing.is_loading = true;
        model.listing.load_error = None;

        let mount = model.mount;
        let timeout_ms = model.config.api.timeout_ms();
        caps.http
            .get(url.as_str())
            .header(TIMEOUT_HEADER, timeout_ms.to_string())
            .send(move |result| Event::ReportsLoaded {
                mount,
                result: Box::new(into_http_result(result, timeout_ms)),
            });
    }

    fn reports_loaded(model: &mut Model, result: HttpResult) {
        match result.and_then(|response| ListingState::parse_reports(&response)) {
            Ok(reports) => {
                info!(count = reports.len(), "reports loaded");
                model.listing.replace_reports(reports);
            }
            Err(e) => {
                let e = AppError::from(e);
                warn!(code = e.code(), error = %e, "failed to load reports");
                model.listing.fail_load(LOAD_FAILED_MESSAGE);
                model.set_error(e);
            }
        }
    }

    fn comment_request(
        model: &Model,
        report_id: &ReportId,
        comment: &NewComment,
    ) -> Result<(ValidatedUrl, Vec<u8>), HttpError> {
        let reports = REPORTS_PATH.trim_matches('/');
        let url = model
            .config
            .api
            .url_for_segments([reports, report_id.as_str(), COMMENTS_SEGMENT])?;
        Ok((url, json_body(comment)?))
    }

    fn submit_comment(model: &mut Model, caps: &Capabilities, report_id: ReportId) {
        let comment = match model.listing.comment_for(&report_id) {
            Ok(comment) => comment,
            Err(e) => {
                debug!(report_id = %report_id, "empty comment not sent");
                model.show_alert(Alert::validation(e.to_string()));
                return;
            }
        };

        let (url, body) = match Self::comment_request(model, &report_id, &comment) {
            Ok(prepared) => prepared,
            Err(e) => {
                let e = AppError::from(e);
                error!(report_id = %report_id, error = %e, "could not build comment request");
                model.show_alert(Alert::error(COMMENT_FAILED_MESSAGE));
                model.set_error(e);
                return;
            }
        };

        info!(report_id = %report_id, url = %url, "posting comment");

        let mount = model.mount;
        let timeout_ms = model.config.api.timeout_ms();
        caps.http
            .post(url.as_str())
            .header("Content-Type", "application/json")
            .header(TIMEOUT_HEADER, timeout_ms.to_string())
            .body(body)
            .send(move |result| Event::CommentPosted {
                mount,
                report_id,
                result: Box::new(into_http_result(result, timeout_ms)),
            });
    }

    fn comment_posted(
        model: &mut Model,
        caps: &Capabilities,
        report_id: &ReportId,
        result: HttpResult,
    ) {
        match result {
            Ok(_) => {
                info!(report_id = %report_id, "comment added");
                model.listing.comment_accepted();
                Self::load_reports(model, caps);
            }
            Err(e) => {
                let e = AppError::from(e);
                warn!(report_id = %report_id, code = e.code(), error = %e, "failed to add comment");
                model.show_alert(Alert::error(COMMENT_FAILED_MESSAGE));
                model.set_error(e);
            }
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        debug!(event = event.name(), screen = ?model.screen, "update");

        match event {
            Event::AppStarted => {
                caps.render.render();
            }

            Event::Configure(config) => match config.validated() {
                Ok(config) => {
                    info!(
                        base_url = config.api.base_url(),
                        timeout_ms = config.api.timeout_ms(),
                        after_submit = ?config.after_submit,
                        "configuration applied"
                    );
                    model.config = config;
                }
                Err(e) => {
                    let e = AppError::from(e);
                    warn!(error = %e, "configuration rejected");
                    model.set_error(e);
                    caps.render.render();
                }
            },

            Event::Navigate { to } => {
                Self::navigate(model, caps, to);
                caps.render.render();
            }

            Event::NavigateBack => {
                if model.screen != Screen::Home {
                    Self::navigate(model, caps, Screen::Home);
                    caps.render.render();
                }
            }

            Event::DismissAlert => {
                model.dismiss_alert();
                caps.render.render();
            }

            Event::DismissError => {
                model.clear_error();
                caps.render.render();
            }

            Event::LocationUpdated { lat, lng } => match GeoPoint::new(lat, lng) {
                Ok(point) => {
                    debug!(lat, lng, "location updated");
                    model.location = point;
                }
                Err(e) => warn!(error = %e, "ignoring invalid location fix"),
            },

            Event::FieldChanged(field) => {
                if model.screen == Screen::Submission {
                    model.submission.form.apply(field);
                    caps.render.render();
                }
            }

            Event::SelectImage => {
                if model.screen == Screen::Submission && !model.submission.submitting {
                    let mount = model.mount;
                    caps.image_picker.pick_image(PickConfig::default(), move |result| {
                        Event::ImagePicked {
                            mount,
                            result: Box::new(result),
                        }
                    });
                }
            }

            Event::ImagePicked { mount, result } => {
                if !Self::is_live(model, Screen::Submission, mount, "image_picked") {
                    return;
                }
                match *result {
                    Ok(Some(asset)) => {
                        debug!(?asset, "image selected");
                        model.submission.form.image = Some(asset);
                    }
                    Ok(None) => debug!("image picker dismissed"),
                    Err(e) => {
                        let e = AppError::from(e);
                        warn!(error = %e, "image picker failed");
                        model.show_alert(Alert::error(e.user_facing_message()));
                        model.set_error(e);
                    }
                }
                caps.render.render();
            }

            Event::ClearImage => {
                if model.screen == Screen::Submission && !model.submission.submitting {
                    model.submission.form.image = None;
                    caps.render.render();
                }
            }

            Event::SubmitReport => {
                if model.screen == Screen::Submission {
                    Self::submit_report(model, caps);
                    caps.render.render();
                }
            }

            Event::ImageUploaded { mount, result } => {
                if !Self::is_live(model, Screen::Submission, mount, "image_uploaded") {
                    return;
                }
                Self::upload_finished(model, caps, *result);
                caps.render.render();
            }

            Event::ReportCreated { mount, result } => {
                if !Self::is_live(model, Screen::Submission, mount, "report_created") {
                    return;
                }
                let outcome = (*result).map(|_| ()).map_err(AppError::from);
                Self::finish_submission(model, caps, outcome);
                caps.render.render();
            }

            Event::RefreshReports => {
                if model.screen == Screen::Listing && !model.listing.is_loading {
                    Self::load_reports(model, caps);
                    caps.render.render();
                }
            }

            Event::ReportsLoaded { mount, result } => {
                if !Self::is_live(model, Screen::Listing, mount, "reports_loaded") {
                    return;
                }
                Self::reports_loaded(model, *result);
                caps.render.render();
            }

            Event::OpenPreview { url } => {
                if model.screen == Screen::Listing {
                    model.listing.open_preview(url);
                    caps.render.render();
                }
            }

            Event::ClosePreview => {
                model.listing.close_preview();
                caps.render.render();
            }

            Event::DraftChanged { report_id, text } => {
                if model.screen == Screen::Listing {
                    model.listing.edit_draft(report_id, text);
                    caps.render.render();
                }
            }

            Event::SubmitComment { report_id } => {
                if model.screen == Screen::Listing {
                    Self::submit_comment(model, caps, report_id);
                    caps.render.render();
                }
            }

            Event::CommentPosted {
                mount,
                report_id,
                result,
            } => {
                if !Self::is_live(model, Screen::Listing, mount, "comment_posted") {
                    return;
                }
                Self::comment_posted(model, caps, &report_id, *result);
                caps.render.render();
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel::from(model)
    }
}
