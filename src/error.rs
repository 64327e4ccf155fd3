//! Error types for the codec and encoder layers.
//!
//! [`Image`](crate::Image) methods report plain success/failure; these
//! types carry the cause below that surface and are what gets logged.

use std::io;

use crate::format::ImageFormat;

/// Failure inside the dispatch/codec layer.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CodecError {
    #[error("image is empty")]
    EmptyImage,

    #[error("could not determine the image format")]
    UnknownFormat,

    #[error("no codec registered for {0}")]
    NoCodec(ImageFormat),

    #[error("{format} codec does not support {operation}")]
    Unsupported {
        format: ImageFormat,
        operation: &'static str,
    },

    #[error("decoded image is {width}x{height}, larger than the {max}px limit")]
    TooLarge { width: u32, height: u32, max: u32 },

    #[error("{format} codec failed: {source}")]
    Codec {
        format: ImageFormat,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl CodecError {
    pub(crate) fn codec(format: ImageFormat) -> impl FnOnce(image::ImageError) -> Self {
        move |source| CodecError::Codec { format, source }
    }
}

/// Failure inside a perceptual JPEG encoder.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PerceptualError {
    #[error("distortion target must be finite and positive, got {0}")]
    InvalidTarget(f32),

    #[error("quality range {min}..={max} is empty")]
    InvalidQualityRange { min: u8, max: u8 },

    #[error("expected {expected} RGB bytes for {width}x{height}, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("cannot encode a {width}x{height} image")]
    EmptyInput { width: u32, height: u32 },

    #[error("JPEG round trip failed at quality {quality}: {source}")]
    Jpeg {
        quality: u8,
        #[source]
        source: image::ImageError,
    },
}
