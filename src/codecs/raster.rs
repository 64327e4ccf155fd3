use std::io::Cursor;

use image::ExtendedColorType;

use super::{decode_rgba, image_rs_format};
use crate::{CodecCapabilities, CodecError, EncodeOutput, Image, ImageCodec, ImageFormat};

static LOSSLESS_CAPS: CodecCapabilities = CodecCapabilities::new()
    .with_decode(true)
    .with_encode(true)
    .with_lossless(true)
    .with_alpha(true);

// GIF is palette-based; more than 256 colors get quantized.
static GIF_CAPS: CodecCapabilities = CodecCapabilities::new()
    .with_decode(true)
    .with_encode(true)
    .with_lossy(true)
    .with_alpha(true);

/// Backend for the non-JPEG formats. Pixels are written as RGBA8.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RasterCodec {
    format: ImageFormat,
}

impl RasterCodec {
    /// Codec for `format`, or `None` for `Unspecified` and JPEG (see
    /// [`JpegCodec`](super::JpegCodec)).
    pub const fn new(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Unspecified | ImageFormat::Jpeg => None,
            _ => Some(Self { format }),
        }
    }

    pub const fn png() -> Self {
        Self {
            format: ImageFormat::Png,
        }
    }

    pub const fn bmp() -> Self {
        Self {
            format: ImageFormat::Bmp,
        }
    }

    pub const fn gif() -> Self {
        Self {
            format: ImageFormat::Gif,
        }
    }

    pub const fn tga() -> Self {
        Self {
            format: ImageFormat::Tga,
        }
    }

    pub const fn pnm() -> Self {
        Self {
            format: ImageFormat::Pnm,
        }
    }

    pub const fn tiff() -> Self {
        Self {
            format: ImageFormat::Tiff,
        }
    }

    pub const fn webp() -> Self {
        Self {
            format: ImageFormat::WebP,
        }
    }
}

impl ImageCodec for RasterCodec {
    fn format(&self) -> ImageFormat {
        self.format
    }

    fn capabilities(&self) -> &'static CodecCapabilities {
        match self.format {
            ImageFormat::Gif => &GIF_CAPS,
            _ => &LOSSLESS_CAPS,
        }
    }

    fn decode(&self, data: &[u8]) -> Result<Image, CodecError> {
        decode_rgba(data, self.format)
    }

    fn encode(&self, image: &Image) -> Result<EncodeOutput, CodecError> {
        if image.is_empty() {
            return Err(CodecError::EmptyImage);
        }
        let fmt = image_rs_format(self.format).ok_or(CodecError::NoCodec(self.format))?;

        // TIFF needs Seek, so everything goes through an in-memory cursor.
        let mut out = Cursor::new(Vec::new());
        image::write_buffer_with_format(
            &mut out,
            image.as_bytes(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
            fmt,
        )
        .map_err(CodecError::codec(self.format))?;

        Ok(EncodeOutput::new(
            out.into_inner(),
            self.format,
            image.width(),
            image.height(),
        ))
    }
}
