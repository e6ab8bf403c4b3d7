//! Image preparation: bound and compress user uploads before they cross the
//! provider boundary.
//!
//! Clamps the larger dimension, re-encodes as moderately compressed JPEG,
//! and packages the result as a base64 payload suitable for transport
//! inside JSON.

use crate::error::ExtractError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{codecs::jpeg::JpegEncoder, imageops::FilterType, GenericImageView};

/// Larger image dimension is clamped to this many pixels. Images already
/// within the bound are never upscaled.
pub const MAX_DIMENSION: u32 = 1024;
/// JPEG re-encode quality, favoring size over fidelity.
pub const JPEG_QUALITY: u8 = 70;

/// A self-describing image payload: MIME type plus base64-encoded bytes.
///
/// Transports as a `data:<mime>;base64,<payload>` string. Created by
/// [`prepare`] or parsed from an inbound request; consumed once by the
/// orchestrator and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddableImage {
    pub mime_type: String,
    pub base64_payload: String,
}

impl EmbeddableImage {
    /// Parse a `data:<mime>;base64,<payload>` string, validating that the
    /// payload is decodable base64.
    pub fn parse(data_url: &str) -> Result<Self, ExtractError> {
        let rest = data_url
            .strip_prefix("data:")
            .ok_or_else(|| ExtractError::InvalidDataUrl("missing data: prefix".to_string()))?;

        let (mime, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| ExtractError::InvalidDataUrl("missing base64 marker".to_string()))?;

        if mime.is_empty() {
            return Err(ExtractError::InvalidDataUrl("empty mime type".to_string()));
        }

        STANDARD.decode(payload).map_err(|e| {
            ExtractError::InvalidDataUrl(format!("payload is not valid base64: {e}"))
        })?;

        Ok(Self {
            mime_type: mime.to_string(),
            base64_payload: payload.to_string(),
        })
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_payload)
    }
}

/// Prepare raw upload bytes for the OCR provider.
///
/// Checks the `image/` MIME precondition before any decoding work, clamps
/// the larger dimension to [`MAX_DIMENSION`] preserving aspect ratio, and
/// re-encodes as JPEG at [`JPEG_QUALITY`].
pub fn prepare(bytes: &[u8], mime: &str) -> Result<EmbeddableImage, ExtractError> {
    if !mime.starts_with("image/") {
        return Err(ExtractError::NotAnImage(mime.to_string()));
    }

    let img = image::load_from_memory(bytes)
        .map_err(|e| ExtractError::UnreadableImage(e.to_string()))?;

    let (width, height) = img.dimensions();
    let img = if width.max(height) > MAX_DIMENSION {
        // resize() fits within the box and keeps the aspect ratio
        img.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Lanczos3)
    } else {
        img
    };

    // JPEG has no alpha channel
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    encoder
        .encode_image(&rgb)
        .map_err(|e| ExtractError::Internal(format!("jpeg encode failed: {e}")))?;

    Ok(EmbeddableImage {
        mime_type: "image/jpeg".to_string(),
        base64_payload: STANDARD.encode(&buf),
    })
}
