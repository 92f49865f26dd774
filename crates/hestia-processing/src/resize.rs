use crate::error::{ProcessingError, ProcessingResult};
use hestia_core::models::QualityProfile;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use std::io::Cursor;

/// Image payload ready to be sent to the generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub downscaled: bool,
}

impl Prepared {
    fn untouched(bytes: Vec<u8>, mime_type: &str) -> Self {
        Self {
            bytes,
            mime_type: mime_type.to_string(),
            downscaled: false,
        }
    }
}

/// Raster types the generator accepts
const ACCEPTED_IMAGE_TYPES: [&str; 5] =
    ["image/jpeg", "image/jpg", "image/png", "image/webp", "image/gif"];

/// Check that `mime_type` is an accepted raster type and that the header decodes.
///
/// Returns the image dimensions. Only the header is read, the pixels are not decoded.
pub fn inspect_raster(bytes: &[u8], mime_type: &str) -> ProcessingResult<(u32, u32)> {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if !ACCEPTED_IMAGE_TYPES.contains(&essence.as_str()) {
        return Err(ProcessingError::UnsupportedType(mime_type.to_string()));
    }

    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ProcessingError::Decode(e.to_string()))?
        .into_dimensions()
        .map_err(|e| ProcessingError::Decode(e.to_string()))
}

/// Shrink the image so its longest edge fits the profile's bound.
///
/// The payload is always checked with [`inspect_raster`]. The input bytes are returned
/// unchanged when there is no profile, when the profile has no bound, or when the image
/// already fits. Only a real downscale re-encodes (JPEG).
pub fn downscale_for_profile(
    bytes: Vec<u8>,
    mime_type: &str,
    profile: Option<QualityProfile>,
) -> ProcessingResult<Prepared> {
    let (width, height) = inspect_raster(&bytes, mime_type)?;

    let Some(profile) = profile else {
        return Ok(Prepared::untouched(bytes, mime_type));
    };
    let Some(max_dim) = profile.max_dimension() else {
        return Ok(Prepared::untouched(bytes, mime_type));
    };

    if width.max(height) <= max_dim {
        return Ok(Prepared::untouched(bytes, mime_type));
    }

    let img = decode(&bytes)?;
    let resized = img.resize(max_dim, max_dim, FilterType::Lanczos3);
    let (new_w, new_h) = resized.dimensions();
    tracing::debug!(
        from_width = width,
        from_height = height,
        to_width = new_w,
        to_height = new_h,
        profile = ?profile,
        "Downscaled image before generation"
    );

    Ok(Prepared {
        bytes: encode_jpeg(&resized, profile.jpeg_quality())?,
        mime_type: "image/jpeg".to_string(),
        downscaled: true,
    })
}

pub(crate) fn decode(bytes: &[u8]) -> ProcessingResult<DynamicImage> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ProcessingError::Decode(e.to_string()))?
        .decode()
        .map_err(|e| ProcessingError::Decode(e.to_string()))
}

/// JPEG has no alpha channel, so the image is flattened to RGB first.
pub(crate) fn encode_jpeg(img: &DynamicImage, quality: u8) -> ProcessingResult<Vec<u8>> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let mut buffer = Vec::with_capacity((width * height) as usize);
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .encode_image(&rgb)
        .map_err(|e| ProcessingError::Encode(e.to_string()))?;
    Ok(buffer)
}
