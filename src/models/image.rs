use serde::{Deserialize, Serialize};

use crate::canvas::{DisplaySize, Selection};

/// Text-to-image parameters for the single-shot generation client.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            width: None,
            height: None,
        }
    }
}

/// Mask-guided edit parameters. `image` and `mask` are PNG data URIs with
/// identical dimensions; white mask pixels mark the region to regenerate.
#[derive(Debug, Clone)]
pub struct InpaintRequest {
    pub prompt: String,
    pub image: String,
    pub mask: String,
}

/// Body of `POST /api/replicate/generate-image`. Presence of both `image`
/// and `mask` switches the route from text-to-image to inpainting.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageRequest {
    pub prompt: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub mask: Option<String>,
}

/// Body of `POST /api/replicate/edit-image`. The mask arrives either
/// pre-rendered (`mask_data_url`) or as a display-space selection rectangle
/// that the server maps to pixel space and rasterizes itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditImageRequest {
    pub image_url: String,
    pub prompt: String,
    #[serde(default)]
    pub mask_data_url: Option<String>,
    #[serde(default)]
    pub selection: Option<Selection>,
    #[serde(default)]
    pub display: Option<DisplaySize>,
}

/// Body of `POST /api/replicate/enhance-image`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceImageRequest {
    pub image_url: String,
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyImageRequest {
    pub image_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub image_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataUrlResponse {
    pub data_url: String,
}
