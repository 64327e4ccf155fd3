//! Backend codec trait.
//!
//! Each file format is handled by one [`ImageCodec`] registered with a
//! [`FormatRegistry`](crate::FormatRegistry). The trait covers execution
//! only; format-specific settings (JPEG quality and the like) live on the
//! concrete codec types.

use std::io::Write;

use crate::{CodecCapabilities, CodecError, EncodeOutput, Image, ImageFormat};

/// A format backend: decodes bytes into an [`Image`] and encodes it back.
///
/// Implementations are stateless apart from their configuration, so a
/// registry can share them across threads.
pub trait ImageCodec: Send + Sync {
    /// The format this codec handles. Never [`ImageFormat::Unspecified`].
    fn format(&self) -> ImageFormat;

    /// What this codec supports.
    fn capabilities(&self) -> &'static CodecCapabilities;

    /// Whether `header` looks like this codec's format.
    ///
    /// Default: magic-byte detection via [`ImageFormat::detect`].
    fn is_header(&self, header: &[u8]) -> bool {
        ImageFormat::detect(header) == Some(self.format())
    }

    /// Decode a complete file held in memory.
    fn decode(&self, data: &[u8]) -> Result<Image, CodecError>;

    /// Encode a non-empty image.
    fn encode(&self, image: &Image) -> Result<EncodeOutput, CodecError>;

    /// Encode at a caller-chosen `quality` (1–100).
    ///
    /// Only codecs whose capabilities include `quality` support this; the
    /// default refuses.
    fn encode_with_quality(
        &self,
        image: &Image,
        quality: u8,
    ) -> Result<EncodeOutput, CodecError> {
        let _ = (image, quality);
        Err(CodecError::Unsupported {
            format: self.format(),
            operation: "quality-controlled encoding",
        })
    }

    /// Encode and write the result to `writer`, returning the byte count.
    fn encode_to(&self, image: &Image, writer: &mut dyn Write) -> Result<usize, CodecError> {
        let output = self.encode(image)?;
        Ok(output.write_to(writer)?)
    }
}
