//! Built-in backends on top of the `image` crate.
//!
//! - [`RasterCodec`]: PNG, BMP, GIF, TGA, PNM, TIFF, WebP (RGBA8 in and out)
//! - [`JpegCodec`]: baseline JPEG with a fixed quality setting

mod jpeg;
mod raster;

pub use jpeg::{DEFAULT_JPEG_QUALITY, JpegCodec};
pub use raster::RasterCodec;

pub(crate) use jpeg::encode_rgb;

use rgb::FromSlice;

use crate::{CodecError, Image, ImageFormat, MAX_IMAGE_SIZE};

/// Map to the `image` crate's format enum.
pub(crate) fn image_rs_format(format: ImageFormat) -> Option<image::ImageFormat> {
    Some(match format {
        ImageFormat::Unspecified => return None,
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        ImageFormat::Bmp => image::ImageFormat::Bmp,
        ImageFormat::Gif => image::ImageFormat::Gif,
        ImageFormat::Tga => image::ImageFormat::Tga,
        ImageFormat::Pnm => image::ImageFormat::Pnm,
        ImageFormat::Tiff => image::ImageFormat::Tiff,
        ImageFormat::WebP => image::ImageFormat::WebP,
    })
}

/// Decode `data` as `format` and expand to RGBA8.
pub(crate) fn decode_rgba(data: &[u8], format: ImageFormat) -> Result<Image, CodecError> {
    let fmt = image_rs_format(format).ok_or(CodecError::NoCodec(format))?;
    let decoded =
        image::load_from_memory_with_format(data, fmt).map_err(CodecError::codec(format))?;

    let (width, height) = (decoded.width(), decoded.height());
    if width > MAX_IMAGE_SIZE || height > MAX_IMAGE_SIZE {
        return Err(CodecError::TooLarge {
            width,
            height,
            max: MAX_IMAGE_SIZE,
        });
    }

    let rgba = decoded.into_rgba8();
    let pixels = rgba.as_raw().as_rgba().to_vec();
    Ok(Image::from_vec(width as usize, height as usize, pixels))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_concrete_format_maps() {
        for format in ImageFormat::ALL {
            assert!(image_rs_format(format).is_some(), "{format}");
        }
        assert!(image_rs_format(ImageFormat::Unspecified).is_none());
    }

    #[test]
    fn decode_garbage_is_codec_error() {
        let err = decode_rgba(b"definitely not a png", ImageFormat::Png).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Codec {
                format: ImageFormat::Png,
                ..
            }
        ));
    }

    #[test]
    fn decode_unspecified_has_no_codec() {
        let err = decode_rgba(&[], ImageFormat::Unspecified).unwrap_err();
        assert!(matches!(err, CodecError::NoCodec(ImageFormat::Unspecified)));
    }
}
