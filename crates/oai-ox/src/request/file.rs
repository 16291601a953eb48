use bon::Builder;
use bytes::Bytes;

use oai_ox_common::MultipartForm;

use crate::validation::{Validate, ValidationErrors, Validator};

/// Upload a document for fine-tuning, assistants or batch
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct FileUploadRequest {
    #[builder(into)]
    pub file: Bytes,

    #[builder(into)]
    pub file_name: String,

    /// `fine-tune`, `assistants`, `batch`, ...
    #[builder(into)]
    pub purpose: String,
}

impl FileUploadRequest {
    pub fn to_form(&self) -> MultipartForm {
        MultipartForm::new()
            .file_from_bytes("file", self.file_name.clone(), self.file.clone())
            .text("purpose", self.purpose.clone())
    }
}

impl Validate for FileUploadRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        validator.require_bytes("file", &self.file);
        validator.require_str("file_name", &self.file_name);
        validator.require_str("purpose", &self.purpose);
        validator.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ViolationKind;

    #[test]
    fn empty_upload_is_rejected() {
        let request = FileUploadRequest::builder()
            .file(Bytes::new())
            .file_name("train.jsonl")
            .purpose("")
            .build();
        let errors = request.validate().unwrap_err();
        assert!(errors.contains(ViolationKind::MissingRequired, "file"));
        assert!(errors.contains(ViolationKind::MissingRequired, "purpose"));
    }

    #[test]
    fn form_sends_purpose() {
        let form = FileUploadRequest::builder()
            .file(b"{}\n".to_vec())
            .file_name("train.jsonl")
            .purpose("fine-tune")
            .build()
            .to_form();
        assert_eq!(form.text_value("purpose"), Some("fine-tune"));
        assert_eq!(form.parts()[0].name(), "file");
    }
}
