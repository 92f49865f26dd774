use hestia_processing::encode_base64;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Small, decodable PNG so fallback rendering has real pixels to work with.
pub fn sample_png() -> Vec<u8> {
    let img = RgbImage::from_fn(48, 32, |x, y| Rgb([(x * 5) as u8, (y * 7) as u8, 120]));
    let mut out = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    out
}

pub fn sample_png_base64() -> String {
    encode_base64(&sample_png())
}

pub fn data_url(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, encode_base64(bytes))
}
