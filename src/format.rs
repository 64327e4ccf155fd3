//! Image format identifiers, detection, and metadata.

use std::path::Path;

/// Formats understood by the built-in codecs.
///
/// [`Unspecified`](ImageFormat::Unspecified) asks the caller to infer the
/// format (from a path extension or from magic bytes). It is also the
/// "no format" answer when inference fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    #[default]
    Unspecified,
    Png,
    Jpeg,
    Bmp,
    Gif,
    Tga,
    Pnm,
    Tiff,
    WebP,
}

impl ImageFormat {
    /// Every concrete format, in registration order.
    pub const ALL: [ImageFormat; 8] = [
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::Bmp,
        ImageFormat::Gif,
        ImageFormat::Tga,
        ImageFormat::Pnm,
        ImageFormat::Tiff,
        ImageFormat::WebP,
    ];

    /// Detect format from magic bytes. Returns `None` if unrecognized.
    ///
    /// TGA has no signature and is never detected.
    pub fn detect(data: &[u8]) -> Option<Self> {
        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(ImageFormat::Png);
        }

        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(ImageFormat::Gif);
        }

        // WebP: "RIFF....WEBP"
        if data.len() >= 12 && data[..4] == *b"RIFF" && data[8..12] == *b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        // TIFF: little-endian "II*\0" or big-endian "MM\0*"
        if data.starts_with(b"II*\0") || data.starts_with(b"MM\0*") {
            return Some(ImageFormat::Tiff);
        }

        if data.starts_with(b"BM") {
            return Some(ImageFormat::Bmp);
        }

        // PNM family: P1-P7
        if data.len() >= 2 && data[0] == b'P' && matches!(data[1], b'1'..=b'7') {
            return Some(ImageFormat::Pnm);
        }

        None
    }

    /// Detect format from file extension (case-insensitive, no leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" | "jpe" | "jfif" => Some(ImageFormat::Jpeg),
            "bmp" | "dib" => Some(ImageFormat::Bmp),
            "gif" => Some(ImageFormat::Gif),
            "tga" => Some(ImageFormat::Tga),
            "pnm" | "ppm" | "pgm" | "pbm" | "pam" => Some(ImageFormat::Pnm),
            "tif" | "tiff" => Some(ImageFormat::Tiff),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    /// Format implied by a path's extension; `Unspecified` when there is none
    /// or it is not recognized.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .unwrap_or_default()
    }

    /// MIME type string.
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Unspecified => "application/octet-stream",
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Tga => "image/x-tga",
            ImageFormat::Pnm => "image/x-portable-anymap",
            ImageFormat::Tiff => "image/tiff",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Common file extensions, preferred one first.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            ImageFormat::Unspecified => &[],
            ImageFormat::Png => &["png"],
            ImageFormat::Jpeg => &["jpg", "jpeg", "jpe", "jfif"],
            ImageFormat::Bmp => &["bmp", "dib"],
            ImageFormat::Gif => &["gif"],
            ImageFormat::Tga => &["tga"],
            ImageFormat::Pnm => &["pnm", "ppm", "pgm", "pbm", "pam"],
            ImageFormat::Tiff => &["tif", "tiff"],
            ImageFormat::WebP => &["webp"],
        }
    }

    /// Whether the built-in encoder for this format loses information.
    pub fn supports_lossy(self) -> bool {
        matches!(self, ImageFormat::Jpeg | ImageFormat::Gif)
    }

    /// Whether the built-in encoder reproduces RGBA8 pixels exactly.
    pub fn supports_lossless(self) -> bool {
        matches!(
            self,
            ImageFormat::Png
                | ImageFormat::Bmp
                | ImageFormat::Tga
                | ImageFormat::Pnm
                | ImageFormat::Tiff
                | ImageFormat::WebP
        )
    }

    /// Whether the format can carry an alpha channel.
    pub fn supports_alpha(self) -> bool {
        !matches!(self, ImageFormat::Unspecified | ImageFormat::Jpeg)
    }
}

impl core::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            ImageFormat::Unspecified => "unspecified",
            ImageFormat::Png => "PNG",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Bmp => "BMP",
            ImageFormat::Gif => "GIF",
            ImageFormat::Tga => "TGA",
            ImageFormat::Pnm => "PNM",
            ImageFormat::Tiff => "TIFF",
            ImageFormat::WebP => "WebP",
        })
    }
}
