mod http;
mod picker;

pub use self::http::{
    checked_body, into_http_result, json_body, ApiConfig, HttpError, HttpResponse, HttpResult,
    ValidatedUrl, MAX_REQUEST_BODY_SIZE, TIMEOUT_HEADER,
};
pub use self::picker::{
    ImagePicker, PickConfig, PickedAsset, PickerError, PickerOperation, PickerResult,
    DEFAULT_FILE_NAME, DEFAULT_MIME_TYPE,
};

// We use Crux's built-in Render capability directly because it provides
// all necessary functionality for triggering view updates.
pub use crux_core::render::Render;
pub use crux_http::Http;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub http: Http<Event>,
    pub image_picker: ImagePicker<Event>,
    pub render: Render<Event>,
}
