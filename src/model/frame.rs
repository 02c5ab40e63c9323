//! Encoded still frames shared by camera capture and file intake.

use image::codecs::jpeg::JpegEncoder;
use image::{ImageResult, RgbaImage};

use crate::constants::DEFAULT_JPEG_QUALITY;

/// A captured or uploaded image, JPEG-encoded and ready to hand to a classifier.
///
/// Both intake paths produce this same representation so consumers never need
/// to know where an image came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl EncodedImage {
    /// Encoded JPEG bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// (width, height) in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Media type of the encoded bytes.
    pub fn mime_type(&self) -> &'static str {
        "image/jpeg"
    }

    /// Decode back to RGBA pixels.
    pub fn decode(&self) -> ImageResult<RgbaImage> {
        Ok(image::load_from_memory(&self.bytes)?.to_rgba8())
    }
}

/// Encodes RGBA frames to JPEG at a fixed quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameEncoder {
    quality: u8,
}

impl FrameEncoder {
    /// Create an encoder; quality is clamped to 1..=100.
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    /// Configured JPEG quality.
    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encode an RGBA frame. Alpha is dropped since JPEG has no alpha channel.
    pub fn encode(&self, frame: &RgbaImage) -> ImageResult<EncodedImage> {
        let rgb = image::DynamicImage::ImageRgba8(frame.clone()).to_rgb8();
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, self.quality).encode_image(&rgb)?;

        log::trace!(
            "Encoded {}x{} frame as JPEG (q={}, {} bytes)",
            rgb.width(),
            rgb.height(),
            self.quality,
            bytes.len()
        );

        Ok(EncodedImage {
            bytes,
            width: rgb.width(),
            height: rgb.height(),
        })
    }
}

impl Default for FrameEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_encode_produces_jpeg() {
        let frame = RgbaImage::from_pixel(16, 8, Rgba([40, 160, 60, 255]));
        let encoded = FrameEncoder::default().encode(&frame).unwrap();

        assert_eq!(encoded.dimensions(), (16, 8));
        assert_eq!(encoded.mime_type(), "image/jpeg");
        // JPEG SOI marker
        assert!(encoded.bytes().starts_with(&[0xFF, 0xD8, 0xFF]));
    }

    #[test]
    fn test_encoded_frame_decodes() {
        let frame = RgbaImage::from_pixel(10, 12, Rgba([200, 30, 30, 255]));
        let encoded = FrameEncoder::new(80).encode(&frame).unwrap();
        let decoded = encoded.decode().unwrap();
        assert_eq!(decoded.dimensions(), (10, 12));
    }

    #[test]
    fn test_quality_is_clamped() {
        assert_eq!(FrameEncoder::new(0).quality(), 1);
        assert_eq!(FrameEncoder::new(255).quality(), 100);
    }
}
