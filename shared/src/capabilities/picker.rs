use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const DEFAULT_FILE_NAME: &str = "photo.jpg";
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";
pub const DEFAULT_PICK_QUALITY: u8 = 80;

/// Camera-roll access. The user may cancel, which is not an error.
pub struct ImagePicker<E> {
    context: CapabilityContext<PickerOperation, E>,
}

impl<Ev> Capability<Ev> for ImagePicker<Ev> {
    type Operation = PickerOperation;
    type MappedSelf<MappedEv> = ImagePicker<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        ImagePicker::new(self.context.map_event(f))
    }
}

impl<E> ImagePicker<E>
where
    E: Send + 'static,
{
    pub fn new(context: CapabilityContext<PickerOperation, E>) -> Self {
        Self { context }
    }

    pub fn pick_image<F>(&self, config: PickConfig, callback: F)
    where
        F: FnOnce(PickerResult) -> E + Send + 'static,
    {
        let context = self.context.clone();
        let config = config.validated();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(PickerOperation::PickImage { config })
                .await;
            context.update_app(callback(result));
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PickerOperation {
    PickImage { config: PickConfig },
}

impl Operation for PickerOperation {
    type Output = PickerResult;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PickConfig {
    pub quality: u8,
    pub allow_editing: bool,
}

impl Default for PickConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_PICK_QUALITY,
            allow_editing: false,
        }
    }
}

impl PickConfig {
    pub fn validated(mut self) -> Self {
        self.quality = self.quality.clamp(1, 100);
        self
    }
}

/// An image chosen by the user, with the raw bytes the shell read for it.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PickedAsset {
    pub uri: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
}

impl PickedAsset {
    pub fn new(uri: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            uri: uri.into(),
            file_name: None,
            mime_type: None,
            data,
        }
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn upload_file_name(&self) -> &str {
        self.file_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(DEFAULT_FILE_NAME)
    }

    pub fn upload_mime_type(&self) -> &str {
        self.mime_type
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
    }
}

// Keeps image bytes out of logs.
impl fmt::Debug for PickedAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickedAsset")
            .field("uri", &self.uri)
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("data_len", &self.data.len())
            .finish()
    }
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum PickerError {
    #[error("photo library permission denied")]
    PermissionDenied,

    #[error("photo library unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("failed to read selected image: {reason}")]
    ReadFailed { reason: String },
}

/// `Ok(None)` means the user dismissed the picker.
pub type PickerResult = Result<Option<PickedAsset>, PickerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_defaults() {
        let asset = PickedAsset::new("file:///tmp/1.jpg", vec![1, 2, 3]);
        assert_eq!(asset.upload_file_name(), "photo.jpg");
        assert_eq!(asset.upload_mime_type(), "image/jpeg");

        let blank = asset.clone().with_file_name("  ").with_mime_type("");
        assert_eq!(blank.upload_file_name(), "photo.jpg");
        assert_eq!(blank.upload_mime_type(), "image/jpeg");
    }

    #[test]
    fn test_upload_uses_asset_metadata() {
        let asset = PickedAsset::new("content://media/42", vec![0xFF])
            .with_file_name("IMG_0042.png")
            .with_mime_type("image/png");
        assert_eq!(asset.upload_file_name(), "IMG_0042.png");
        assert_eq!(asset.upload_mime_type(), "image/png");
    }

    #[test]
    fn test_debug_hides_image_bytes() {
        let asset = PickedAsset::new("file:///a.jpg", vec![7; 16]);
        let debug = format!("{asset:?}");
        assert!(debug.contains("data_len: 16"));
        assert!(!debug.contains("[7, 7"));
    }

    #[test]
    fn test_config_quality_is_clamped() {
        assert_eq!(PickConfig { quality: 250, ..PickConfig::default() }.validated().quality, 100);
        assert_eq!(PickConfig { quality: 0, ..PickConfig::default() }.validated().quality, 1);
    }
}
