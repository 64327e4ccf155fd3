//! Encoded file contents, ready to hand to a [`BinaryWriter`](crate::BinaryWriter).

use std::io::{self, Write};

use crate::ImageFormat;

/// A complete encoded file plus the format and pixel size it holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeOutput {
    data: Vec<u8>,
    format: ImageFormat,
    width: u32,
    height: u32,
}

impl EncodeOutput {
    pub fn new(data: Vec<u8>, format: ImageFormat, width: u32, height: u32) -> Self {
        Self {
            data,
            format,
            width,
            height,
        }
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Encoded size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Pixel dimensions of the encoded image.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Encoded bytes per pixel; `0.0` for a zero-area image.
    pub fn bytes_per_pixel(&self) -> f64 {
        let area = u64::from(self.width) * u64::from(self.height);
        if area == 0 {
            return 0.0;
        }
        self.data.len() as f64 / area as f64
    }

    /// Write the whole file to `writer`. Returns the byte count.
    pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<usize> {
        writer.write_all(&self.data)?;
        Ok(self.data.len())
    }
}

impl AsRef<[u8]> for EncodeOutput {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_format_and_size() {
        let output = EncodeOutput::new(vec![0x89, b'P', b'N', b'G'], ImageFormat::Png, 2, 1);
        assert_eq!(output.format(), ImageFormat::Png);
        assert_eq!(output.dimensions(), (2, 1));
        assert_eq!(output.len(), 4);
        assert_eq!(output.as_ref(), output.bytes());
        assert_eq!(output.into_vec()[1], b'P');
    }

    #[test]
    fn bytes_per_pixel_handles_zero_area() {
        assert_eq!(EncodeOutput::new(vec![1; 8], ImageFormat::Bmp, 2, 2).bytes_per_pixel(), 2.0);
        assert_eq!(EncodeOutput::new(vec![1; 8], ImageFormat::Bmp, 0, 2).bytes_per_pixel(), 0.0);
    }

    #[test]
    fn write_to_appends_everything() {
        let output = EncodeOutput::new(vec![7; 5], ImageFormat::Tga, 1, 1);
        let mut sink = vec![1];
        assert_eq!(output.write_to(&mut sink).unwrap(), 5);
        assert_eq!(sink, [1, 7, 7, 7, 7, 7]);
        assert!(!output.is_empty());
    }
}
