use bytes::Bytes;

use crate::error::TransportError;

/// A single field of a multipart form
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        filename: String,
        data: Bytes,
        mime_type: String,
    },
}

impl FormPart {
    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

/// Transport-independent multipart form.
///
/// Kept as plain data so it can be inspected (and cloned) before a transport
/// turns it into its own wire representation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    /// Create a new multipart form
    pub fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Add a text field
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Add a text field only when a value is present
    pub fn optional_text<V: ToString>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.text(name, value.to_string()),
            None => self,
        }
    }

    /// Add a file, guessing the MIME type from the file name
    pub fn file_from_bytes(
        self,
        name: impl Into<String>,
        filename: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let filename = filename.into();
        let mime_type = mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        self.file_from_bytes_with_mime(name, filename, data, mime_type)
    }

    /// Add a file with an explicit MIME type
    pub fn file_from_bytes_with_mime(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        data: impl Into<Bytes>,
        mime_type: impl Into<String>,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            filename: filename.into(),
            data: data.into(),
            mime_type: mime_type.into(),
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Look up the value of a text field
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            FormPart::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Build the reqwest form
    pub fn into_reqwest(self) -> Result<reqwest::multipart::Form, TransportError> {
        let mut form = reqwest::multipart::Form::new();
        for part in self.parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name, value),
                FormPart::File {
                    name,
                    filename,
                    data,
                    mime_type,
                } => {
                    let part = reqwest::multipart::Part::bytes(data.to_vec())
                        .file_name(filename)
                        .mime_str(&mime_type)
                        .map_err(|e| {
                            TransportError::InvalidRequest(format!(
                                "invalid MIME type {mime_type}: {e}"
                            ))
                        })?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}
