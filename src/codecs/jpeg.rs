use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;

use super::decode_rgba;
use crate::{CodecCapabilities, CodecError, EncodeOutput, Image, ImageCodec, ImageFormat};

/// Quality used when none is given.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

static CAPS: CodecCapabilities = CodecCapabilities::new()
    .with_decode(true)
    .with_encode(true)
    .with_lossy(true)
    .with_quality(true);

/// Single-pass baseline JPEG backend. Alpha is dropped on encode and
/// decoded images are fully opaque.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JpegCodec {
    quality: u8,
}

impl Default for JpegCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl JpegCodec {
    pub const fn new() -> Self {
        Self {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Set encode quality, clamped to `1..=100`.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl ImageCodec for JpegCodec {
    fn format(&self) -> ImageFormat {
        ImageFormat::Jpeg
    }

    fn capabilities(&self) -> &'static CodecCapabilities {
        &CAPS
    }

    fn decode(&self, data: &[u8]) -> Result<Image, CodecError> {
        decode_rgba(data, ImageFormat::Jpeg)
    }

    fn encode(&self, image: &Image) -> Result<EncodeOutput, CodecError> {
        if image.is_empty() {
            return Err(CodecError::EmptyImage);
        }
        let data = encode_rgb(
            &image.to_rgb_bytes(),
            image.width(),
            image.height(),
            self.quality,
        )
        .map_err(CodecError::codec(ImageFormat::Jpeg))?;
        Ok(EncodeOutput::new(
            data,
            ImageFormat::Jpeg,
            image.width(),
            image.height(),
        ))
    }

    fn encode_with_quality(
        &self,
        image: &Image,
        quality: u8,
    ) -> Result<EncodeOutput, CodecError> {
        self.with_quality(quality).encode(image)
    }
}

/// Encode packed RGB8 at `quality` (clamped to `1..=100`).
pub(crate) fn encode_rgb(
    rgb: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, image::ImageError> {
    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
    encoder.encode(rgb, width, height, ExtendedColorType::Rgb8)?;
    Ok(out)
}
