use bon::Builder;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use oai_ox_common::MultipartForm;

use crate::validation::{Validate, ValidationErrors, Validator, Violation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum ImageSize {
    #[serde(rename = "256x256")]
    #[strum(serialize = "256x256")]
    S256,
    #[serde(rename = "512x512")]
    #[strum(serialize = "512x512")]
    S512,
    #[serde(rename = "1024x1024")]
    #[strum(serialize = "1024x1024")]
    S1024,
    #[serde(rename = "1792x1024")]
    #[strum(serialize = "1792x1024")]
    S1792x1024,
    #[serde(rename = "1024x1792")]
    #[strum(serialize = "1024x1792")]
    S1024x1792,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ImageResponseFormat {
    Url,
    B64Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageQuality {
    Standard,
    Hd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageStyle {
    Vivid,
    Natural,
}

/// Generate images from a prompt (JSON body)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
pub struct ImageCreateRequest {
    #[builder(into)]
    pub prompt: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub model: Option<String>,

    /// 1..=10
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<ImageSize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ImageResponseFormat>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<ImageQuality>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ImageStyle>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub user: Option<String>,
}

impl Validate for ImageCreateRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        validator.require_str("prompt", &self.prompt);
        validator.range("n", self.n, 1, 10);
        validator.finish()
    }
}

/// Edit an image, optionally restricted to the transparent area of `mask`
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct ImageEditCreateRequest {
    /// PNG bytes
    #[builder(into)]
    pub image: Bytes,

    #[builder(into)]
    pub image_name: String,

    #[builder(into)]
    pub mask: Option<Bytes>,

    #[builder(into)]
    pub mask_name: Option<String>,

    #[builder(into)]
    pub prompt: String,

    #[builder(into)]
    pub model: Option<String>,

    pub n: Option<u32>,

    pub size: Option<ImageSize>,

    pub response_format: Option<ImageResponseFormat>,

    #[builder(into)]
    pub user: Option<String>,
}

impl ImageEditCreateRequest {
    pub fn to_form(&self) -> MultipartForm {
        let mut form = MultipartForm::new()
            .file_from_bytes("image", self.image_name.clone(), self.image.clone())
            .text("prompt", self.prompt.clone());
        if let (Some(mask), Some(mask_name)) = (&self.mask, &self.mask_name) {
            form = form.file_from_bytes("mask", mask_name.clone(), mask.clone());
        }
        form.optional_text("model", self.model.as_ref())
            .optional_text("n", self.n)
            .optional_text("size", self.size)
            .optional_text("response_format", self.response_format)
            .optional_text("user", self.user.as_ref())
    }
}

impl Validate for ImageEditCreateRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        validator.require_bytes("image", &self.image);
        validator.require_str("image_name", &self.image_name);
        validator.require_str("prompt", &self.prompt);
        match (&self.mask, &self.mask_name) {
            (Some(_), None) => validator.push(Violation::missing_required("mask_name")),
            (None, Some(_)) => validator.push(Violation::missing_required("mask")),
            _ => {}
        }
        validator.range("n", self.n, 1, 10);
        validator.finish()
    }
}

/// Variations of an existing image
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct ImageVariationCreateRequest {
    #[builder(into)]
    pub image: Bytes,

    #[builder(into)]
    pub image_name: String,

    #[builder(into)]
    pub model: Option<String>,

    pub n: Option<u32>,

    pub size: Option<ImageSize>,

    pub response_format: Option<ImageResponseFormat>,

    #[builder(into)]
    pub user: Option<String>,
}

impl ImageVariationCreateRequest {
    pub fn to_form(&self) -> MultipartForm {
        MultipartForm::new()
            .file_from_bytes("image", self.image_name.clone(), self.image.clone())
            .optional_text("model", self.model.as_ref())
            .optional_text("n", self.n)
            .optional_text("size", self.size)
            .optional_text("response_format", self.response_format)
            .optional_text("user", self.user.as_ref())
    }
}

impl Validate for ImageVariationCreateRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        validator.require_bytes("image", &self.image);
        validator.require_str("image_name", &self.image_name);
        validator.range("n", self.n, 1, 10);
        validator.finish()
    }
}
