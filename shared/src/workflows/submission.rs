use serde::{Deserialize, Serialize};

use crate::capabilities::{HttpError, HttpResponse, PickedAsset};
use crate::error::{RequiredField, ValidationError};
use crate::model::{Category, GeoPoint};
use crate::multipart::MultipartForm;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormField {
    Title(String),
    Description(String),
    Category(String),
    Ward(String),
    Contact(String),
    ImageUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub ward: String,
    pub contact: String,
    /// Already-hosted image, typed in or adopted from an upload.
    pub image_url: String,
    /// Locally picked image awaiting upload.
    pub image: Option<PickedAsset>,
}

impl Default for ReportForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: Category::default().as_str().to_string(),
            ward: String::new(),
            contact: String::new(),
            image_url: String::new(),
            image: None,
        }
    }
}

impl ReportForm {
    pub fn apply(&mut self, field: FormField) {
        match field {
            FormField::Title(value) => self.title = value,
            FormField::Description(value) => self.description = value,
            FormField::Category(value) => self.category = value,
            FormField::Ward(value) => self.ward = value,
            FormField::Contact(value) => self.contact = value,
            FormField::ImageUrl(value) => self.image_url = value,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing: Vec<RequiredField> = [
            (RequiredField::Title, &self.title),
            (RequiredField::Category, &self.category),
            (RequiredField::Ward, &self.ward),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingRequiredFields(missing))
        }
    }

    /// The upload that must succeed before the report is created, if any.
    pub fn upload_form(&self) -> Option<MultipartForm> {
        self.image.as_ref().map(MultipartForm::for_image)
    }

    pub fn to_request(&self, location: GeoPoint) -> CreateReportRequest {
        CreateReportRequest {
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            ward: self.ward.clone(),
            contact: self.contact.clone(),
            image_url: self.image_url.clone(),
            location: location.to_geometry(),
        }
    }
}

/// Body of `POST /reports`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub ward: String,
    pub contact: String,
    pub image_url: String,
    pub location: geojson::Geometry,
}

/// Body returned by `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

impl UploadResponse {
    pub fn from_response(response: &HttpResponse) -> Result<Self, HttpError> {
        let parsed: Self = response.json()?;
        if parsed.url.trim().is_empty() {
            return Err(HttpError::InvalidResponse {
                reason: "upload response has an empty url".to_string(),
            });
        }
        Ok(parsed)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionState {
    pub form: ReportForm,
    pub submitting: bool,
    pub error_message: Option<String>,
}

impl SubmissionState {
    /// Enters the submitting phase. Returns `false` if a submission is
    /// already running.
    pub fn begin(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        self.error_message = None;
        true
    }

    /// Leaves the submitting phase. Every exit path of a submission ends here.
    pub fn finish(&mut self, outcome: Result<(), String>) {
        self.submitting = false;
        if let Err(message) = outcome {
            self.error_message = Some(message);
        }
    }

    pub fn reject(&mut self, error: &ValidationError) {
        self.error_message = Some(error.to_string());
    }
}
