//! Alpha compositing from a second image's red channel.

use std::path::Path;

use rgb::{Rgb, Rgba};

use crate::{FormatDispatch, Image};

impl Image {
    /// Copy `source`'s red channel into this image's alpha channel.
    ///
    /// Only the top-left-aligned overlap of the two images is touched; the
    /// sizes need not match. Returns `false` and leaves `self` unchanged if
    /// either image is empty.
    pub fn apply_alpha_from(&mut self, source: &Image) -> bool {
        if self.is_empty() || source.is_empty() {
            return false;
        }

        let dst_step = self.width() as usize;
        let src_step = source.width() as usize;
        let w = dst_step.min(src_step);
        let h = self.height().min(source.height()) as usize;

        let dst_rows = self.pixels_mut().chunks_exact_mut(dst_step);
        let src_rows = source.pixels().chunks_exact(src_step);
        for (dst, src) in dst_rows.zip(src_rows).take(h) {
            for (d, s) in dst[..w].iter_mut().zip(&src[..w]) {
                d.a = s.r;
            }
        }
        true
    }

    /// Load `alpha_path` and copy its red channel into this image's alpha.
    ///
    /// Fails without loading anything if `self` is empty, and fails if the
    /// file cannot be loaded.
    pub fn apply_alpha_from_r_channel(
        &mut self,
        alpha_path: impl AsRef<Path>,
        dispatch: &dyn FormatDispatch,
    ) -> bool {
        if self.is_empty() {
            return false;
        }
        let source = Image::load(alpha_path, dispatch);
        self.apply_alpha_from(&source)
    }

    /// Tint a mask: every pixel gets `color` for RGB and the mask's red
    /// channel for alpha. The result has the mask's full size.
    pub fn with_alpha_mask(color: Rgb<u8>, mask: &Image) -> Self {
        let pixels = mask
            .iter()
            .map(|m| Rgba {
                r: color.r,
                g: color.g,
                b: color.b,
                a: m.r,
            })
            .collect();
        Image::from_vec(mask.width() as usize, mask.height() as usize, pixels)
    }

    /// [`with_alpha_mask`](Self::with_alpha_mask) on a mask loaded from
    /// `alpha_path`. Empty if the mask cannot be loaded.
    pub fn from_alpha_mask(
        color: Rgb<u8>,
        alpha_path: impl AsRef<Path>,
        dispatch: &dyn FormatDispatch,
    ) -> Self {
        let mask = Image::load(alpha_path, dispatch);
        if mask.is_empty() {
            return Image::new();
        }
        Self::with_alpha_mask(color, &mask)
    }
}
