//! Dense RGBA8 image buffer with pluggable codec dispatch.
//!
//! - [`Image`]: the pixel buffer and its constructors (sized, filled,
//!   generated, copied from `imgref` grids, loaded through a dispatcher)
//! - [`Image::apply_alpha_from`] / [`Image::with_alpha_mask`]: alpha
//!   compositing from a second image's red channel
//! - [`FormatDispatch`] / [`FormatRegistry`]: format resolution and
//!   load/save routing to [`ImageCodec`] backends
//! - [`perceptual`]: JPEG encoding against a distortion target
//! - [`BinaryWriter`]: atomic file output used by every save path
//!
//! Nothing here keeps global state: the dispatcher or encoder an operation
//! needs is passed in by the caller. All operations are synchronous.
//!
//! Failures are reported as `false` or as the empty image rather than errors.
//! Sizes beyond [`MAX_IMAGE_SIZE`] silently produce the empty image.

#![forbid(unsafe_code)]

mod alpha;
mod buffer;
mod capabilities;
pub mod codecs;
mod dispatch;
mod error;
mod format;
mod output;
pub mod perceptual;
mod persist;
mod pixel;
mod traits;
mod writer;

pub use buffer::{Image, MAX_IMAGE_SIZE};
pub use capabilities::CodecCapabilities;
pub use codecs::{JpegCodec, RasterCodec};
pub use dispatch::{FormatDispatch, FormatRegistry};
pub use error::{CodecError, PerceptualError};
pub use format::ImageFormat;
pub use output::EncodeOutput;
pub use perceptual::{PerceptualJpegEncoder, PerceptualParams, QualitySearch};
pub use pixel::{Pixel, PixelF, Vec2, from_pixel_f, rgba, to_pixel_f};
pub use traits::ImageCodec;
pub use writer::BinaryWriter;

// Re-exports for callers building grids and colors.
pub use imgref::{Img, ImgRef, ImgVec};
pub use rgb;
pub use rgb::{Rgb, Rgba};
