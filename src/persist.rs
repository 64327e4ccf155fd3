//! Saving an [`Image`] to disk.
//!
//! Every path runs `validate → open → encode → write`, stopping at the
//! first failure. Output goes through [`BinaryWriter`], so a failed save
//! never leaves a partial file behind.

use std::io::Write;
use std::path::Path;

use log::warn;

use crate::perceptual::{PerceptualJpegEncoder, PerceptualParams};
use crate::{BinaryWriter, FormatDispatch, Image, ImageFormat};

impl Image {
    /// Save through `dispatch`. With [`ImageFormat::Unspecified`] the format
    /// comes from the path's extension.
    ///
    /// Returns `false` for an empty image, an unresolvable format, or any
    /// backend or I/O failure.
    pub fn save(
        &self,
        path: impl AsRef<Path>,
        format: ImageFormat,
        dispatch: &dyn FormatDispatch,
    ) -> bool {
        if self.is_empty() {
            return false;
        }
        let path = path.as_ref();
        let format = match format {
            ImageFormat::Unspecified => dispatch.format_from_path(path),
            f => f,
        };
        dispatch.save(self, format, path)
    }

    /// Save as JPEG with a fixed `quality` (1–100).
    pub fn save_jpeg(
        &self,
        path: impl AsRef<Path>,
        quality: u8,
        dispatch: &dyn FormatDispatch,
    ) -> bool {
        if self.is_empty() {
            return false;
        }
        let path = path.as_ref();
        let mut writer = match BinaryWriter::create(path) {
            Ok(writer) => writer,
            Err(err) => {
                warn!("cannot open {}: {err}", path.display());
                return false;
            }
        };

        if !dispatch.encode_jpeg(&mut writer, self, quality) {
            return false;
        }
        commit(writer)
    }

    /// Save as JPEG, searching for the smallest encoding whose distortion
    /// stays within `target` (see [`PerceptualParams::target_distance`]).
    ///
    /// Much slower than [`save_jpeg`](Self::save_jpeg) and produces
    /// different bytes for the same image.
    pub fn save_perceptual_jpeg(
        &self,
        path: impl AsRef<Path>,
        target: f64,
        encoder: &dyn PerceptualJpegEncoder,
    ) -> bool {
        if self.is_empty() {
            return false;
        }
        let path = path.as_ref();
        let mut writer = match BinaryWriter::create(path) {
            Ok(writer) => writer,
            Err(err) => {
                warn!("cannot open {}: {err}", path.display());
                return false;
            }
        };

        let params = PerceptualParams::default().with_target(target as f32);
        let rgb = self.to_rgb_bytes();
        let output = match encoder.process(&params, &rgb, self.width(), self.height()) {
            Ok(output) => output,
            Err(err) => {
                warn!("perceptual JPEG encode for {} failed: {err}", path.display());
                return false;
            }
        };

        if let Err(err) = writer.write_all(output.bytes()) {
            warn!("write to {} failed: {err}", path.display());
            return false;
        }
        commit(writer)
    }
}

fn commit(writer: BinaryWriter) -> bool {
    let path = writer.path().to_path_buf();
    match writer.commit() {
        Ok(_) => true,
        Err(err) => {
            warn!("cannot finish {}: {err}", path.display());
            false
        }
    }
}
