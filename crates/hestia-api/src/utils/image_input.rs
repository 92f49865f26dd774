//! Turn a request's base64 image into bytes ready for the generator.

use crate::error::HttpAppError;
use hestia_core::models::QualityProfile;
use hestia_core::AppError;
use hestia_processing::{decode_base64_payload, downscale_for_profile, Prepared};

/// Decode `image_data` (bare base64 or a data URL).
pub fn decode_image(image_data: &str) -> Result<Vec<u8>, HttpAppError> {
    let bytes = decode_base64_payload(image_data)?;
    if bytes.is_empty() {
        return Err(HttpAppError(AppError::InvalidInput(
            "imageData is empty".to_string(),
        )));
    }
    Ok(bytes)
}

/// Check the payload is a supported raster image and downscale it for the quality profile,
/// on the blocking pool.
pub async fn prepare_for_profile(
    bytes: Vec<u8>,
    mime_type: &str,
    quality: Option<QualityProfile>,
) -> Result<Prepared, HttpAppError> {
    let mime_type = mime_type.to_string();
    let prepared =
        tokio::task::spawn_blocking(move || downscale_for_profile(bytes, &mime_type, quality))
            .await
            .map_err(|e| AppError::Internal(format!("Image preparation task failed: {}", e)))??;

    if prepared.downscaled {
        tracing::debug!(
            quality = ?quality,
            bytes = prepared.bytes.len(),
            "Image downscaled for quality profile"
        );
    }
    Ok(prepared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hestia_core::ErrorMetadata;

    #[test]
    fn test_decode_accepts_data_url_and_bare_base64() {
        assert_eq!(decode_image("data:image/png;base64,AQID").unwrap(), vec![1, 2, 3]);
        assert_eq!(decode_image("AQID").unwrap(), vec![1, 2, 3]);
        assert!(decode_image("not base64!").is_err());
        assert!(decode_image("").is_err());
    }

    fn png() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(16, 16, image::Rgb([200, 180, 160]));
        let mut out = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    #[tokio::test]
    async fn test_prepare_without_profile_is_byte_identical() {
        let bytes = png();
        let prepared = prepare_for_profile(bytes.clone(), "image/png", None)
            .await
            .unwrap();
        assert_eq!(prepared.bytes, bytes);
        assert!(!prepared.downscaled);
    }

    #[tokio::test]
    async fn test_prepare_rejects_non_images() {
        let err = prepare_for_profile(b"hello world".to_vec(), "text/plain", None)
            .await
            .unwrap_err();
        assert_eq!(err.0.http_status_code(), 400);

        let err = prepare_for_profile(vec![0xde, 0xad, 0xbe, 0xef], "image/png", None)
            .await
            .unwrap_err();
        assert_eq!(err.0.http_status_code(), 400);
    }
}
