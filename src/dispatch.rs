//! Format resolution and codec dispatch.
//!
//! [`FormatDispatch`] is the contract [`Image`] uses for every load and
//! save; callers pass an implementation in explicitly. [`FormatRegistry`]
//! is the standard implementation, a list of [`ImageCodec`] backends keyed
//! by [`ImageFormat`].
//!
//! Failures never escape this layer as errors: loads produce the empty
//! image and saves report `false`. The cause is logged.

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};

use crate::codecs::{JpegCodec, RasterCodec};
use crate::{BinaryWriter, CodecError, Image, ImageCodec, ImageFormat};

/// Load/save operations an [`Image`] delegates to.
pub trait FormatDispatch {
    /// Format for `path`, from its extension. `Unspecified` when unknown
    /// or when no backend handles it.
    fn format_from_path(&self, path: &Path) -> ImageFormat;

    /// Read and decode a file. Empty image on failure.
    fn load(&self, path: &Path) -> Image;

    /// Decode everything `reader` yields. `Unspecified` sniffs magic bytes.
    /// Empty image on failure.
    fn decode(&self, reader: &mut dyn Read, format: ImageFormat) -> Image;

    /// Encode `image` as `format` and write it to `path`.
    fn save(&self, image: &Image, format: ImageFormat, path: &Path) -> bool;

    /// Encode `image` as JPEG at `quality` into an open writer.
    /// The caller commits the writer.
    fn encode_jpeg(&self, writer: &mut BinaryWriter, image: &Image, quality: u8) -> bool;
}

/// Registry of backend codecs, at most one per format.
pub struct FormatRegistry {
    codecs: Vec<Box<dyn ImageCodec>>,
}

impl Default for FormatRegistry {
    /// A registry with every built-in backend.
    fn default() -> Self {
        Self::new()
            .with_codec(RasterCodec::png())
            .with_codec(JpegCodec::new())
            .with_codec(RasterCodec::bmp())
            .with_codec(RasterCodec::gif())
            .with_codec(RasterCodec::tga())
            .with_codec(RasterCodec::pnm())
            .with_codec(RasterCodec::tiff())
            .with_codec(RasterCodec::webp())
    }
}

impl FormatRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self { codecs: Vec::new() }
    }

    /// Add `codec`, replacing any backend already registered for its format.
    pub fn register(&mut self, codec: impl ImageCodec + 'static) -> &mut Self {
        let format = codec.format();
        match self.codecs.iter().position(|c| c.format() == format) {
            Some(i) => self.codecs[i] = Box::new(codec),
            None => self.codecs.push(Box::new(codec)),
        }
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_codec(mut self, codec: impl ImageCodec + 'static) -> Self {
        self.register(codec);
        self
    }

    /// Backend for `format`, if registered.
    pub fn codec(&self, format: ImageFormat) -> Option<&dyn ImageCodec> {
        self.codecs
            .iter()
            .find(|c| c.format() == format)
            .map(|c| &**c)
    }

    /// Registered formats, in registration order.
    pub fn formats(&self) -> impl Iterator<Item = ImageFormat> + '_ {
        self.codecs.iter().map(|c| c.format())
    }

    /// Sniff the format of `data` among the registered backends.
    pub fn detect(&self, data: &[u8]) -> ImageFormat {
        self.codecs
            .iter()
            .find(|c| c.is_header(data))
            .map_or(ImageFormat::Unspecified, |c| c.format())
    }

    fn require(&self, format: ImageFormat) -> Result<&dyn ImageCodec, CodecError> {
        if format == ImageFormat::Unspecified {
            return Err(CodecError::UnknownFormat);
        }
        self.codec(format).ok_or(CodecError::NoCodec(format))
    }

    /// Decode in-memory file contents. `Unspecified` sniffs magic bytes.
    pub fn try_decode(&self, data: &[u8], format: ImageFormat) -> Result<Image, CodecError> {
        let format = match format {
            ImageFormat::Unspecified => self.detect(data),
            f => f,
        };
        let codec = self.require(format)?;
        if !codec.capabilities().decode() {
            return Err(CodecError::Unsupported {
                format,
                operation: "decoding",
            });
        }
        debug!("decoding {} bytes as {format}", data.len());
        codec.decode(data)
    }

    /// Read and decode a file. Magic bytes win; the extension is the fallback.
    pub fn try_load(&self, path: &Path) -> Result<Image, CodecError> {
        let data = fs::read(path)?;
        let format = match self.detect(&data) {
            ImageFormat::Unspecified => self.format_from_path(path),
            f => f,
        };
        self.try_decode(&data, format)
    }

    /// Encode and atomically write `image` to `path`. Returns bytes written.
    pub fn try_save(
        &self,
        image: &Image,
        format: ImageFormat,
        path: &Path,
    ) -> Result<u64, CodecError> {
        if image.is_empty() {
            return Err(CodecError::EmptyImage);
        }
        let codec = self.require(format)?;
        if !codec.capabilities().encode() {
            return Err(CodecError::Unsupported {
                format,
                operation: "encoding",
            });
        }

        let output = codec.encode(image)?;
        let mut writer = BinaryWriter::create(path)?;
        output.write_to(&mut writer)?;
        let written = writer.commit()?;
        debug!(
            "saved {image:?} as {format} to {} ({written} bytes, {:.2} B/px)",
            path.display(),
            output.bytes_per_pixel()
        );
        Ok(written)
    }
}

impl FormatRegistry {
    /// Encode through the registered JPEG backend at `quality` into `writer`.
    /// Returns bytes written. The caller commits the writer.
    pub fn try_encode_jpeg(
        &self,
        writer: &mut BinaryWriter,
        image: &Image,
        quality: u8,
    ) -> Result<usize, CodecError> {
        if image.is_empty() {
            return Err(CodecError::EmptyImage);
        }
        let codec = self.require(ImageFormat::Jpeg)?;
        let caps = codec.capabilities();
        if !caps.encode() || !caps.quality() {
            return Err(CodecError::Unsupported {
                format: ImageFormat::Jpeg,
                operation: "quality-controlled encoding",
            });
        }
        let output = codec.encode_with_quality(image, quality)?;
        Ok(output.write_to(writer)?)
    }
}

impl FormatDispatch for FormatRegistry {
    fn format_from_path(&self, path: &Path) -> ImageFormat {
        let format = ImageFormat::from_path(path);
        if self.codec(format).is_some() {
            format
        } else {
            ImageFormat::Unspecified
        }
    }

    fn load(&self, path: &Path) -> Image {
        self.try_load(path).unwrap_or_else(|err| {
            warn!("failed to load {}: {err}", path.display());
            Image::new()
        })
    }

    fn decode(&self, reader: &mut dyn Read, format: ImageFormat) -> Image {
        let mut data = Vec::new();
        if let Err(err) = reader.read_to_end(&mut data) {
            warn!("failed to read image data: {err}");
            return Image::new();
        }
        self.try_decode(&data, format).unwrap_or_else(|err| {
            warn!("failed to decode image: {err}");
            Image::new()
        })
    }

    fn save(&self, image: &Image, format: ImageFormat, path: &Path) -> bool {
        match self.try_save(image, format, path) {
            Ok(_) => true,
            Err(err) => {
                warn!("failed to save {}: {err}", path.display());
                false
            }
        }
    }

    fn encode_jpeg(&self, writer: &mut BinaryWriter, image: &Image, quality: u8) -> bool {
        match self.try_encode_jpeg(writer, image, quality) {
            Ok(n) => {
                debug!("encoded {image:?} as JPEG q{quality} ({n} bytes)");
                true
            }
            Err(err) => {
                warn!("JPEG encode to {} failed: {err}", writer.path().display());
                false
            }
        }
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.formats()).finish()
    }
}
