//! Local stand-in for the generator: a filter pass over the original photo.
//!
//! Used when the provider is throttled or the caller's quota is zero, so the user still gets
//! an image. The look approximates the requested theme or enhancement.

use crate::error::ProcessingResult;
use crate::filters::{FilterOp, ImageFilters};
use crate::resize::{decode, encode_jpeg};
use hestia_core::models::{DesignTheme, EnhancementType, GeneratedImage};

const REDESIGN_JPEG_QUALITY: u8 = 90;
const ENHANCE_JPEG_QUALITY: u8 = 92;
const VIGNETTE_ALPHA: f32 = 0.12;

/// Which look the fallback should approximate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackStyle {
    Redesign(DesignTheme),
    Enhance {
        enhancement: EnhancementType,
        theme: Option<DesignTheme>,
    },
}

impl FallbackStyle {
    pub fn filters(self) -> Vec<FilterOp> {
        match self {
            FallbackStyle::Redesign(theme) => redesign_filters(theme),
            FallbackStyle::Enhance { enhancement, theme } => {
                let mut ops = enhancement_filters(enhancement);
                if let Some(theme) = theme {
                    ops.extend(enhancement_theme_filters(theme));
                }
                ops
            }
        }
    }

    fn jpeg_quality(self) -> u8 {
        match self {
            FallbackStyle::Redesign(_) => REDESIGN_JPEG_QUALITY,
            FallbackStyle::Enhance { .. } => ENHANCE_JPEG_QUALITY,
        }
    }
}

fn redesign_filters(theme: DesignTheme) -> Vec<FilterOp> {
    use FilterOp::*;
    match theme {
        DesignTheme::Modern => vec![Saturate(1.1), Contrast(1.05)],
        DesignTheme::Minimalist => vec![Grayscale(0.3), Saturate(0.9), Brightness(1.05)],
        DesignTheme::Industrial => vec![Grayscale(0.6), Contrast(1.15)],
        DesignTheme::Scandinavian => vec![Saturate(0.95), Brightness(1.08), HueRotate(-10.0)],
        DesignTheme::Traditional => vec![Saturate(1.05), Brightness(1.02), HueRotate(10.0)],
        DesignTheme::Bohemian => vec![Saturate(1.35), HueRotate(20.0)],
        DesignTheme::Rustic => vec![Sepia(0.4), Saturate(1.05)],
        DesignTheme::Coastal => vec![Saturate(1.05), Brightness(1.06), HueRotate(-20.0)],
        DesignTheme::Vintage => vec![Sepia(0.6), Contrast(1.05)],
        DesignTheme::Luxury => vec![Saturate(1.15), Contrast(1.12)],
    }
}

fn enhancement_filters(enhancement: EnhancementType) -> Vec<FilterOp> {
    use FilterOp::*;
    match enhancement {
        EnhancementType::Professional => vec![Brightness(1.06), Contrast(1.08), Saturate(1.07)],
        EnhancementType::Brightness => vec![Brightness(1.15)],
        EnhancementType::Contrast => vec![Contrast(1.15)],
        EnhancementType::Color => vec![Saturate(1.2)],
    }
}

fn enhancement_theme_filters(theme: DesignTheme) -> Vec<FilterOp> {
    use FilterOp::*;
    match theme {
        DesignTheme::Modern => vec![Contrast(1.1), Saturate(1.05)],
        DesignTheme::Minimalist => vec![Contrast(1.05), Saturate(0.9)],
        DesignTheme::Industrial => vec![Contrast(1.15), Brightness(0.98)],
        DesignTheme::Scandinavian => vec![Brightness(1.05), Saturate(0.95)],
        DesignTheme::Traditional => vec![Brightness(1.04), Saturate(1.02)],
        DesignTheme::Bohemian => vec![Saturate(1.2)],
        DesignTheme::Rustic => vec![Sepia(0.15), Saturate(1.05)],
        DesignTheme::Coastal => vec![Saturate(1.1), HueRotate(5.0)],
        DesignTheme::Vintage => vec![Sepia(0.35), Contrast(1.05)],
        DesignTheme::Luxury => vec![Contrast(1.2), Brightness(1.05)],
    }
}

/// Renders fallback images. Pure CPU work; call it from `spawn_blocking` on large inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackRenderer;

impl FallbackRenderer {
    pub fn render(&self, bytes: &[u8], style: FallbackStyle) -> ProcessingResult<GeneratedImage> {
        let img = decode(bytes)?;
        let mut out = ImageFilters::apply(img, &style.filters());
        if matches!(style, FallbackStyle::Redesign(_)) {
            out = ImageFilters::apply_vignette(out, VIGNETTE_ALPHA);
        }

        tracing::debug!(?style, "Rendered local fallback image");

        Ok(GeneratedImage {
            bytes: encode_jpeg(&out, style.jpeg_quality())?,
            mime_type: "image/jpeg".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn photo() -> Vec<u8> {
        let img = RgbImage::from_fn(64, 48, |x, y| Rgb([(x * 4) as u8, (y * 5) as u8, 120]));
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn test_redesign_fallback_is_jpeg_of_same_size() {
        let rendered = FallbackRenderer
            .render(&photo(), FallbackStyle::Redesign(DesignTheme::Scandinavian))
            .unwrap();
        assert_eq!(rendered.mime_type, "image/jpeg");
        let img = image::load_from_memory(&rendered.bytes).unwrap();
        assert_eq!(img.dimensions(), (64, 48));
    }

    #[test]
    fn test_every_theme_has_a_preset() {
        for theme in DesignTheme::ALL {
            assert!(!FallbackStyle::Redesign(theme).filters().is_empty());
        }
    }

    #[test]
    fn test_enhancement_theme_adds_on_top_of_base() {
        let plain = FallbackStyle::Enhance {
            enhancement: EnhancementType::Professional,
            theme: None,
        };
        let themed = FallbackStyle::Enhance {
            enhancement: EnhancementType::Professional,
            theme: Some(DesignTheme::Luxury),
        };
        assert_eq!(plain.filters().len(), 3);
        assert_eq!(
            themed.filters()[3..],
            [FilterOp::Contrast(1.2), FilterOp::Brightness(1.05)]
        );
    }

    #[test]
    fn test_undecodable_input_fails() {
        let style = FallbackStyle::Enhance {
            enhancement: EnhancementType::Color,
            theme: None,
        };
        assert!(FallbackRenderer.render(b"not an image", style).is_err());
    }
}
