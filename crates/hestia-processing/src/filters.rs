//! Pixel filters with CSS `filter` semantics.
//!
//! Every amount is a multiplier where `1.0` is the identity (`brightness(1.1)`,
//! `saturate(0.9)`), except grayscale and sepia which take a blend amount in `0..=1`
//! and hue-rotate which takes degrees. Filters run in order and clamp after each step.

use image::{DynamicImage, Rgba, RgbaImage};

/// One step of a filter chain
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOp {
    Brightness(f32),
    Contrast(f32),
    Saturate(f32),
    /// Degrees, negative rotates the other way
    HueRotate(f32),
    Grayscale(f32),
    Sepia(f32),
}

type ColorMatrix = [[f32; 3]; 3];

impl FilterOp {
    /// Linear form `out = matrix * rgb + offset` on 0..=255 channels.
    fn linear(self) -> (ColorMatrix, f32) {
        match self {
            FilterOp::Brightness(a) => (scale(a), 0.0),
            FilterOp::Contrast(a) => (scale(a), 127.5 * (1.0 - a)),
            FilterOp::Saturate(s) => (saturate_matrix(s), 0.0),
            FilterOp::HueRotate(deg) => (hue_rotate_matrix(deg), 0.0),
            FilterOp::Grayscale(a) => (grayscale_matrix(a.clamp(0.0, 1.0)), 0.0),
            FilterOp::Sepia(a) => (sepia_matrix(a.clamp(0.0, 1.0)), 0.0),
        }
    }
}

fn scale(a: f32) -> ColorMatrix {
    [[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]]
}

fn saturate_matrix(s: f32) -> ColorMatrix {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn hue_rotate_matrix(deg: f32) -> ColorMatrix {
    let (sin, cos) = deg.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

fn grayscale_matrix(a: f32) -> ColorMatrix {
    let k = 1.0 - a;
    [
        [0.2126 + 0.7874 * k, 0.7152 - 0.7152 * k, 0.0722 - 0.0722 * k],
        [0.2126 - 0.2126 * k, 0.7152 + 0.2848 * k, 0.0722 - 0.0722 * k],
        [0.2126 - 0.2126 * k, 0.7152 - 0.7152 * k, 0.0722 + 0.9278 * k],
    ]
}

fn sepia_matrix(a: f32) -> ColorMatrix {
    let k = 1.0 - a;
    [
        [0.393 + 0.607 * k, 0.769 - 0.769 * k, 0.189 - 0.189 * k],
        [0.349 - 0.349 * k, 0.686 + 0.314 * k, 0.168 - 0.168 * k],
        [0.272 - 0.272 * k, 0.534 - 0.534 * k, 0.131 + 0.869 * k],
    ]
}

pub struct ImageFilters;

impl ImageFilters {
    /// Apply `ops` in order. Alpha is preserved.
    pub fn apply(img: DynamicImage, ops: &[FilterOp]) -> DynamicImage {
        if ops.is_empty() {
            return img;
        }
        let mut rgba8 = img.to_rgba8();
        let steps: Vec<(ColorMatrix, f32)> = ops.iter().map(|op| op.linear()).collect();

        for pixel in rgba8.pixels_mut() {
            let Rgba([r, g, b, a]) = *pixel;
            let mut rgb = [r as f32, g as f32, b as f32];
            for (matrix, offset) in &steps {
                rgb = apply_matrix(matrix, *offset, rgb);
            }
            *pixel = Rgba([rgb[0].round() as u8, rgb[1].round() as u8, rgb[2].round() as u8, a]);
        }

        DynamicImage::ImageRgba8(rgba8)
    }

    /// Darken the edges with a radial black overlay.
    ///
    /// Transparent inside `min(w, h) / 4` of the centre, reaching `max_alpha` at
    /// `max(w, h) / 1.2`.
    pub fn apply_vignette(img: DynamicImage, max_alpha: f32) -> DynamicImage {
        let mut rgba8: RgbaImage = img.to_rgba8();
        let (width, height) = rgba8.dimensions();
        let (w, h) = (width as f32, height as f32);
        let (cx, cy) = (w / 2.0, h / 2.0);
        let inner = w.min(h) / 4.0;
        let outer = w.max(h) / 1.2;
        let span = (outer - inner).max(f32::EPSILON);

        for (x, y, pixel) in rgba8.enumerate_pixels_mut() {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let t = ((dx.hypot(dy) - inner) / span).clamp(0.0, 1.0);
            let keep = 1.0 - max_alpha * t;
            for channel in pixel.0.iter_mut().take(3) {
                *channel = (*channel as f32 * keep).round().clamp(0.0, 255.0) as u8;
            }
        }

        DynamicImage::ImageRgba8(rgba8)
    }
}

fn apply_matrix(m: &ColorMatrix, offset: f32, rgb: [f32; 3]) -> [f32; 3] {
    let mut out = [0.0f32; 3];
    for (i, row) in m.iter().enumerate() {
        let v = row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2] + offset;
        out[i] = v.clamp(0.0, 255.0);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    fn solid(r: u8, g: u8, b: u8) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([r, g, b, 200])))
    }

    fn first_pixel(img: &DynamicImage) -> [u8; 4] {
        img.get_pixel(0, 0).0
    }

    #[test]
    fn test_identity_amounts_leave_pixels_unchanged() {
        let img = solid(120, 64, 200);
        let out = ImageFilters::apply(
            img,
            &[
                FilterOp::Brightness(1.0),
                FilterOp::Contrast(1.0),
                FilterOp::Saturate(1.0),
                FilterOp::HueRotate(0.0),
                FilterOp::Grayscale(0.0),
                FilterOp::Sepia(0.0),
            ],
        );
        assert_eq!(first_pixel(&out), [120, 64, 200, 200]);
    }

    #[test]
    fn test_brightness_scales_and_clamps() {
        let out = ImageFilters::apply(solid(100, 250, 0), &[FilterOp::Brightness(1.2)]);
        assert_eq!(first_pixel(&out), [120, 255, 0, 200]);
    }

    #[test]
    fn test_contrast_pivots_on_mid_grey() {
        let out = ImageFilters::apply(solid(200, 55, 128), &[FilterOp::Contrast(2.0)]);
        let [r, g, b, _] = first_pixel(&out);
        assert_eq!(r, 255);
        assert_eq!(g, 0);
        assert!((128..=129).contains(&b));
    }

    #[test]
    fn test_full_grayscale_equalises_channels() {
        let out = ImageFilters::apply(solid(200, 30, 90), &[FilterOp::Grayscale(1.0)]);
        let [r, g, b, a] = first_pixel(&out);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(a, 200);
    }

    #[test]
    fn test_zero_saturation_is_grey() {
        let out = ImageFilters::apply(solid(220, 40, 40), &[FilterOp::Saturate(0.0)]);
        let [r, g, b, _] = first_pixel(&out);
        assert!(r.abs_diff(g) <= 1 && g.abs_diff(b) <= 1);
    }

    #[test]
    fn test_sepia_warms_neutral_grey() {
        let out = ImageFilters::apply(solid(128, 128, 128), &[FilterOp::Sepia(1.0)]);
        let [r, g, b, _] = first_pixel(&out);
        assert!(r > g && g > b);
    }

    #[test]
    fn test_hue_rotate_moves_red_towards_green() {
        let out = ImageFilters::apply(solid(200, 0, 0), &[FilterOp::HueRotate(90.0)]);
        let [r, g, _, _] = first_pixel(&out);
        assert!(g > 0);
        assert!(r < 200);
    }

    #[test]
    fn test_vignette_keeps_centre_and_darkens_corners() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            100,
            100,
            Rgba([200, 200, 200, 255]),
        ));
        let out = ImageFilters::apply_vignette(img, 0.12);
        assert_eq!(out.get_pixel(50, 50).0[0], 200);
        let corner = out.get_pixel(0, 0).0[0];
        assert!(corner < 200);
        assert!(corner >= 176);
    }
}
