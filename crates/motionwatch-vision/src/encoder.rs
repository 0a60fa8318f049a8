//! 사진 인코더.
//!
//! JPEG / PNG / WebP 인코딩.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use motionwatch_core::config::PhotoFormat;
use motionwatch_core::error::CoreError;
use tracing::debug;

/// 포맷별 인코딩
pub fn encode(image: &RgbImage, format: PhotoFormat, quality: u8) -> Result<Vec<u8>, CoreError> {
    let quality = quality.clamp(1, 100);
    let encoded = match format {
        PhotoFormat::Jpeg => encode_jpeg(image, quality)?,
        PhotoFormat::Png => encode_png(image)?,
        PhotoFormat::Webp => encode_webp(image, quality),
    };

    debug!(
        "{:?} 인코딩: {}x{} → {}bytes",
        format,
        image.width(),
        image.height(),
        encoded.len()
    );

    Ok(encoded)
}

/// JPEG 인코딩
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, CoreError> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(buf)
}

/// PNG 인코딩 (무손실)
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, CoreError> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(buf)
}

/// WebP 인코딩
pub fn encode_webp(image: &RgbImage, quality: u8) -> Vec<u8> {
    let encoder = webp::Encoder::from_rgb(image.as_raw(), image.width(), image.height());
    encoder.encode(quality as f32).to_vec()
}
