#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod app;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod event;
pub mod model;
pub mod multipart;
pub mod view;
pub mod workflows;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use config::{AppConfig, SubmitDestination};
pub use crux_core::{render::Render, App as CruxApp};
pub use error::{AppError, ErrorKind};
pub use event::Event;
pub use model::{Alert, AlertKind, GeoPoint, Model, MountToken, Report, ReportId, Screen};
pub use view::ViewModel;
