pub mod normalize;

pub use normalize::{normalize, resize_mask_to, restore, target_dimensions, Normalized};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::DynamicImage;
use std::io::Cursor;

use crate::error::{EditorError, Result};

pub fn is_data_uri(source: &str) -> bool {
    source.starts_with("data:")
}

/// Extract and decode the base64 payload of a `data:` URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let payload = uri
        .split_once(',')
        .map(|(_, payload)| payload)
        .ok_or_else(|| EditorError::ImageDecode("malformed data URI".into()))?;
    BASE64
        .decode(payload)
        .map_err(|e| EditorError::ImageDecode(format!("invalid base64 payload: {}", e)))
}

/// Encode an image as a PNG data URI, the embeddable form the UI and the
/// generation API both consume.
pub fn encode_data_uri(image: &DynamicImage) -> Result<String> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, image::ImageOutputFormat::Png)
        .map_err(|e| EditorError::Serialization(format!("PNG encoding failed: {}", e)))?;
    Ok(format!(
        "data:image/png;base64,{}",
        BASE64.encode(buffer.into_inner())
    ))
}

/// Fetch raw bytes from a remote URL.
pub async fn fetch_bytes(url: &str, http: &reqwest::Client) -> Result<Vec<u8>> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| EditorError::UpstreamFetch(format!("{}: {}", url, e)))?;
    if !response.status().is_success() {
        return Err(EditorError::UpstreamFetch(format!(
            "{} returned status {}",
            url,
            response.status()
        )));
    }
    response
        .bytes()
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|e| EditorError::UpstreamFetch(format!("reading body from {}: {}", url, e)))
}

/// Decode an input image from either a data URI or a remote URL.
pub async fn load_image(source: &str, http: &reqwest::Client) -> Result<DynamicImage> {
    let bytes = if is_data_uri(source) {
        decode_data_uri(source)?
    } else {
        fetch_bytes(source, http).await?
    };
    image::load_from_memory(&bytes).map_err(|e| EditorError::ImageDecode(e.to_string()))
}

/// Decode a mask data URI. Mask failures are distinguishable from image
/// failures so the caller can report which input was bad.
pub fn load_mask(mask_data_url: &str) -> Result<DynamicImage> {
    let payload = mask_data_url
        .split_once(',')
        .map(|(_, payload)| payload)
        .ok_or_else(|| EditorError::MaskDecode("malformed data URI".into()))?;
    let bytes = BASE64
        .decode(payload)
        .map_err(|e| EditorError::MaskDecode(format!("invalid base64 payload: {}", e)))?;
    image::load_from_memory(&bytes).map_err(|e| EditorError::MaskDecode(e.to_string()))
}

/// Fetch a remote image and re-encode it as a PNG data URI.
pub async fn fetch_as_data_uri(url: &str, http: &reqwest::Client) -> Result<String> {
    let bytes = fetch_bytes(url, http).await?;
    let image =
        image::load_from_memory(&bytes).map_err(|e| EditorError::ImageDecode(e.to_string()))?;
    encode_data_uri(&image)
}
