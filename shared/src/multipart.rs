//! Minimal `multipart/form-data` encoder for image uploads.

use bytes::{BufMut, Bytes, BytesMut};

use crate::capabilities::PickedAsset;

pub const UPLOAD_FIELD_NAME: &str = "file";

#[derive(Debug, Clone, PartialEq, Eq)]
struct FilePart {
    field_name: String,
    file_name: String,
    content_type: String,
    data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartForm {
    boundary: String,
    parts: Vec<FilePart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::with_boundary(format!("----TorchFormBoundary{}", uuid::Uuid::new_v4().simple()))
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    /// The upload form for a picked image: one `file` part.
    pub fn for_image(asset: &PickedAsset) -> Self {
        Self::new().file(
            UPLOAD_FIELD_NAME,
            asset.upload_file_name(),
            asset.upload_mime_type(),
            Bytes::copy_from_slice(&asset.data),
        )
    }

    #[must_use]
    pub fn file(
        mut self,
        field_name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: Bytes,
    ) -> Self {
        self.parts.push(FilePart {
            field_name: field_name.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        });
        self
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Returns the `Content-Type` header value and the encoded body.
    pub fn encode(&self) -> (String, Bytes) {
        let payload: usize = self.parts.iter().map(|p| p.data.len() + 256).sum();
        let mut buf = BytesMut::with_capacity(payload + self.boundary.len() + 8);

        for part in &self.parts {
            buf.put_slice(b"--");
            buf.put_slice(self.boundary.as_bytes());
            buf.put_slice(b"\r\n");
            buf.put_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    escape_quoted(&part.field_name),
                    escape_quoted(&part.file_name)
                )
                .as_bytes(),
            );
            buf.put_slice(format!("Content-Type: {}\r\n\r\n", part.content_type).as_bytes());
            buf.put_slice(&part.data);
            buf.put_slice(b"\r\n");
        }

        buf.put_slice(b"--");
        buf.put_slice(self.boundary.as_bytes());
        buf.put_slice(b"--\r\n");

        (self.content_type(), buf.freeze())
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_quoted(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .map(|c| if c == '"' { '\'' } else { c })
        .collect()
}
