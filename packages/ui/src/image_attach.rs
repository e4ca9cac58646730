//! Shrink an attached image into an inline JPEG `data:` URL.
//!
//! Announcement images are stored inline on the announcement itself, so
//! they are downscaled on the client first. The width is capped at the
//! configured bound with the aspect ratio kept; smaller images keep their
//! size. The result is always re-encoded as JPEG at a fixed quality.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use thiserror::Error;

const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Could not read the selected image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("Could not encode the image: {0}")]
    Encode(#[source] image::ImageError),
    #[error("The selected image is empty")]
    Empty,
}

/// Target size for a `width` × `height` image bounded by `max_width`.
pub fn scaled_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width || width == 0 {
        return (width, height);
    }
    let scaled = (u64::from(height) * u64::from(max_width) + u64::from(width) / 2) / u64::from(width);
    let scaled = u32::try_from(scaled).unwrap_or(u32::MAX).max(1);
    (max_width, scaled)
}

/// Decode `bytes`, shrink to `max_width`, and re-encode as a JPEG data URL.
pub fn downscale_to_data_url(bytes: &[u8], max_width: u32, quality: u8) -> Result<String, ImageError> {
    let source = image::load_from_memory(bytes).map_err(ImageError::Decode)?;
    if source.width() == 0 || source.height() == 0 {
        return Err(ImageError::Empty);
    }

    let (width, height) = scaled_dimensions(source.width(), source.height(), max_width);
    let resized = if (width, height) == (source.width(), source.height()) {
        source
    } else {
        source.resize_exact(width, height, FilterType::Triangle)
    };

    let mut jpeg = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg, quality.clamp(1, 100));
    encoder
        .encode_image(&resized.to_rgb8())
        .map_err(ImageError::Encode)?;

    tracing::debug!(width, height, bytes = jpeg.len(), "image downscaled");
    Ok(format!("{DATA_URL_PREFIX}{}", STANDARD.encode(&jpeg)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    fn data_url_bytes(data_url: &str) -> Option<Vec<u8>> {
        let encoded = data_url.strip_prefix(DATA_URL_PREFIX)?;
        STANDARD.decode(encoded).ok()
    }

    fn data_url_dimensions(data_url: &str) -> Option<(u32, u32)> {
        let bytes = data_url_bytes(data_url)?;
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .ok()?;
        reader.into_dimensions().ok()
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([200, 40, 90])));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_scaled_dimensions() {
        assert_eq!(scaled_dimensions(1600, 900, 800), (800, 450));
        assert_eq!(scaled_dimensions(1000, 333, 800), (800, 266));
        assert_eq!(scaled_dimensions(801, 601, 800), (800, 600));
        assert_eq!(scaled_dimensions(800, 1200, 800), (800, 1200));
        assert_eq!(scaled_dimensions(20, 10, 800), (20, 10));
        assert_eq!(scaled_dimensions(5000, 1, 800), (800, 1));
    }

    #[test]
    fn test_wide_image_is_shrunk_to_bound() {
        let url = downscale_to_data_url(&png(1600, 1200), 800, 70).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
        assert_eq!(data_url_dimensions(&url), Some((800, 600)));
    }

    #[test]
    fn test_narrow_image_keeps_size() {
        let url = downscale_to_data_url(&png(320, 240), 800, 70).unwrap();
        assert_eq!(data_url_dimensions(&url), Some((320, 240)));
    }

    #[test]
    fn test_output_is_jpeg() {
        let url = downscale_to_data_url(&png(10, 10), 800, 70).unwrap();
        let bytes = data_url_bytes(&url).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_garbage_is_rejected() {
        let err = downscale_to_data_url(b"definitely not an image", 800, 70).unwrap_err();
        assert!(matches!(err, ImageError::Decode(_)));
    }
}
