//! Owned RGBA8 pixel buffer.
//!
//! [`Image`] stores `width × height` pixels contiguously in row-major order
//! (stride == width). Both dimensions are capped at [`MAX_IMAGE_SIZE`]; any
//! constructor or resize that asks for more produces the empty image instead
//! of failing. Callers check [`Image::is_empty`].

use std::fmt;
use std::io::Read;
use std::path::Path;

use imgref::{Img, ImgRef, ImgVec};
use rgb::ComponentBytes;

use crate::dispatch::FormatDispatch;
use crate::format::ImageFormat;
use crate::pixel::{Pixel, PixelF, Vec2, from_pixel_f};

/// Largest accepted width or height, in pixels.
pub const MAX_IMAGE_SIZE: u32 = 16384;

#[inline]
const fn is_valid_size(width: usize, height: usize) -> bool {
    width <= MAX_IMAGE_SIZE as usize && height <= MAX_IMAGE_SIZE as usize
}

/// A dense, row-major RGBA8 image.
///
/// Invariant: `pixels.len() == width * height`. An image with no pixels is
/// "empty"; this is also the result of every invalid-size request.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Image {
    pixels: Vec<Pixel>,
    width: u32,
    height: u32,
}

impl Image {
    /// The empty image.
    pub const fn new() -> Self {
        Self {
            pixels: Vec::new(),
            width: 0,
            height: 0,
        }
    }

    /// Zero-initialized image of `width × height`.
    ///
    /// Returns the empty image if either dimension exceeds [`MAX_IMAGE_SIZE`].
    pub fn with_size(width: usize, height: usize) -> Self {
        Self::filled(width, height, Pixel::default())
    }

    /// Image of `width × height` with every pixel set to `color`.
    ///
    /// Returns the empty image if either dimension exceeds [`MAX_IMAGE_SIZE`].
    pub fn filled(width: usize, height: usize, color: Pixel) -> Self {
        if !is_valid_size(width, height) {
            return Self::new();
        }
        Self {
            pixels: vec![color; width * height],
            width: width as u32,
            height: height as u32,
        }
    }

    /// Adopt an existing row-major pixel vector.
    ///
    /// Returns the empty image if the size is invalid or `pixels.len()`
    /// does not equal `width * height`.
    pub fn from_vec(width: usize, height: usize, pixels: Vec<Pixel>) -> Self {
        if !is_valid_size(width, height) || pixels.len() != width * height {
            return Self::new();
        }
        Self {
            pixels,
            width: width as u32,
            height: height as u32,
        }
    }

    /// Fill a new image by calling `generator` once per pixel, in row-major order.
    pub fn generate(width: usize, height: usize, mut generator: impl FnMut() -> Pixel) -> Self {
        let mut image = Self::with_size(width, height);
        for pixel in &mut image.pixels {
            *pixel = generator();
        }
        image
    }

    /// Fill a new image by calling `generator` with each pixel's position
    /// mapped onto the closed unit square: `(x / (width - 1), y / (height - 1))`.
    ///
    /// A dimension of exactly 1 makes the scale factor infinite, so that
    /// axis's coordinate is NaN for every pixel (`inf * 0`). This is kept
    /// as is; generators that care must handle it.
    pub fn generate_0_1(
        width: usize,
        height: usize,
        mut generator: impl FnMut(Vec2) -> Pixel,
    ) -> Self {
        let mut image = Self::with_size(width, height);
        if image.is_empty() {
            return image;
        }

        let sx = 1.0 / (width - 1) as f64;
        let sy = 1.0 / (height - 1) as f64;

        for (y, row) in image.pixels.chunks_exact_mut(width).enumerate() {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = generator(Vec2::new(sx * x as f64, sy * y as f64));
            }
        }
        image
    }

    /// Copy pixels out of a borrowed 8-bit grid (any stride).
    pub fn from_img(img: ImgRef<'_, Pixel>) -> Self {
        let mut image = Self::with_size(img.width(), img.height());
        if image.is_empty() {
            return image;
        }

        if img.stride() == img.width() {
            let len = image.pixels.len();
            image.pixels.copy_from_slice(&img.buf()[..len]);
        } else {
            for (dst, src) in image.pixels.chunks_exact_mut(img.width()).zip(img.rows()) {
                dst.copy_from_slice(src);
            }
        }
        image
    }

    /// Narrow a float grid to 8 bits per channel (clamped, rounded).
    pub fn from_img_f32(img: ImgRef<'_, PixelF>) -> Self {
        let mut image = Self::with_size(img.width(), img.height());
        if image.is_empty() {
            return image;
        }

        for (dst, src) in image.pixels.iter_mut().zip(img.pixels()) {
            *dst = from_pixel_f(src);
        }
        image
    }

    /// Load a file through `dispatch`. Any failure yields the empty image.
    pub fn load(path: impl AsRef<Path>, dispatch: &dyn FormatDispatch) -> Self {
        dispatch.load(path.as_ref())
    }

    /// Decode from a reader through `dispatch`.
    ///
    /// With [`ImageFormat::Unspecified`] the format is sniffed from the data.
    pub fn decode(
        reader: &mut dyn Read,
        format: ImageFormat,
        dispatch: &dyn FormatDispatch,
    ) -> Self {
        dispatch.decode(reader, format)
    }

    /// Load `rgb_path`, then take its alpha from the red channel of `alpha_path`.
    ///
    /// If the alpha file cannot be loaded the RGB image is returned unchanged.
    pub fn load_with_alpha(
        rgb_path: impl AsRef<Path>,
        alpha_path: impl AsRef<Path>,
        dispatch: &dyn FormatDispatch,
    ) -> Self {
        let mut image = Self::load(rgb_path, dispatch);
        image.apply_alpha_from_r_channel(alpha_path, dispatch);
        image
    }

    /// Move the contents out, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * core::mem::size_of::<Pixel>()
    }

    #[inline]
    pub fn num_pixels(&self) -> usize {
        self.pixels.len()
    }

    /// Total pixel storage in bytes.
    #[inline]
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * core::mem::size_of::<Pixel>()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Release all pixels and reset both dimensions to zero.
    pub fn clear(&mut self) {
        self.pixels.clear();
        self.width = 0;
        self.height = 0;
    }

    /// Resize, keeping the existing pixel sequence up to the new length.
    ///
    /// Rows are not re-laid out: after a width change, pixel `(x, y)` does
    /// not correspond to its old position. New pixels are zeroed. Resizing
    /// to the current size does nothing; an invalid size clears the image.
    pub fn resize(&mut self, width: usize, height: usize) {
        if !is_valid_size(width, height) {
            return self.clear();
        }
        if width == self.width as usize && height == self.height as usize {
            return;
        }

        self.pixels.resize(width * height, Pixel::default());
        self.width = width as u32;
        self.height = height as u32;
    }

    /// Resize and overwrite every pixel with `fill`.
    ///
    /// Resizing to the current size does nothing (contents are kept); an
    /// invalid size clears the image.
    pub fn resize_filled(&mut self, width: usize, height: usize, fill: Pixel) {
        if !is_valid_size(width, height) {
            return self.clear();
        }
        if width == self.width as usize && height == self.height as usize {
            return;
        }

        self.pixels.clear();
        self.pixels.resize(width * height, fill);
        self.width = width as u32;
        self.height = height as u32;
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: Pixel) {
        self.pixels.fill(color);
    }

    /// All pixels, row-major.
    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    /// Raw `r, g, b, a` bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_bytes()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    pub fn get(&self, x: u32, y: u32) -> Option<Pixel> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set the pixel at `(x, y)`. Returns `false` outside the image.
    pub fn set(&mut self, x: u32, y: u32, pixel: Pixel) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixels[i] = pixel;
                true
            }
            None => false,
        }
    }

    /// Row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &[Pixel] {
        assert!(y < self.height, "row {y} out of bounds (height {})", self.height);
        let w = self.width as usize;
        let start = y as usize * w;
        &self.pixels[start..start + w]
    }

    /// Mutable row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row_mut(&mut self, y: u32) -> &mut [Pixel] {
        assert!(y < self.height, "row {y} out of bounds (height {})", self.height);
        let w = self.width as usize;
        let start = y as usize * w;
        &mut self.pixels[start..start + w]
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Pixel]> {
        self.pixels.chunks(self.width.max(1) as usize)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Pixel> {
        self.pixels.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, Pixel> {
        self.pixels.iter_mut()
    }

    /// Borrow as an `imgref` view. `None` for the empty image.
    pub fn as_img(&self) -> Option<ImgRef<'_, Pixel>> {
        if self.is_empty() {
            return None;
        }
        Some(Img::new(
            &self.pixels[..],
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Packed `R, G, B` bytes in pixel order; alpha is dropped.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.pixels.len() * 3);
        for p in &self.pixels {
            rgb.extend_from_slice(&[p.r, p.g, p.b]);
        }
        rgb
    }
}

impl From<ImgVec<Pixel>> for Image {
    fn from(img: ImgVec<Pixel>) -> Self {
        let (buf, width, height) = img.into_contiguous_buf();
        Self::from_vec(width, height, buf)
    }
}

impl<'a> IntoIterator for &'a Image {
    type Item = &'a Pixel;
    type IntoIter = core::slice::Iter<'a, Pixel>;

    fn into_iter(self) -> Self::IntoIter {
        self.pixels.iter()
    }
}

impl<'a> IntoIterator for &'a mut Image {
    type Item = &'a mut Pixel;
    type IntoIter = core::slice::IterMut<'a, Pixel>;

    fn into_iter(self) -> Self::IntoIter {
        self.pixels.iter_mut()
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Image({}x{})", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::rgba;
    use rgb::Rgba;

    const RED: Pixel = rgba(255, 0, 0, 255);

    fn assert_empty(image: &Image) {
        assert_eq!(image.width(), 0);
        assert_eq!(image.height(), 0);
        assert_eq!(image.num_pixels(), 0);
        assert!(image.is_empty());
    }

    #[test]
    fn with_size_zero_fills() {
        let image = Image::with_size(3, 2);
        assert_eq!(image.width(), 3);
        assert_eq!(image.height(), 2);
        assert_eq!(image.num_pixels(), 6);
        assert_eq!(image.size_bytes(), 24);
        assert_eq!(image.stride(), 12);
        assert!(image.iter().all(|p| *p == rgba(0, 0, 0, 0)));
    }

    #[test]
    fn filled_uses_color() {
        let image = Image::filled(4, 4, RED);
        assert_eq!(image.num_pixels(), 16);
        assert!(image.iter().all(|p| *p == RED));
    }

    #[test]
    fn max_size_is_inclusive() {
        let image = Image::with_size(MAX_IMAGE_SIZE as usize, 1);
        assert_eq!(image.width(), MAX_IMAGE_SIZE);
        assert_eq!(image.num_pixels(), MAX_IMAGE_SIZE as usize);
    }

    #[test]
    fn oversize_yields_empty() {
        let too_big = MAX_IMAGE_SIZE as usize + 1;
        assert_empty(&Image::with_size(too_big, 1));
        assert_empty(&Image::filled(1, too_big, RED));
        assert_empty(&Image::generate(too_big, too_big, || RED));
    }

    #[test]
    fn zero_width_keeps_height() {
        let image = Image::with_size(0, 5);
        assert!(image.is_empty());
        assert_eq!(image.height(), 5);
        assert_eq!(image.num_pixels(), 0);
    }

    #[test]
    fn from_vec_rejects_length_mismatch() {
        assert_empty(&Image::from_vec(2, 2, vec![RED; 3]));
        let image = Image::from_vec(2, 2, vec![RED; 4]);
        assert_eq!(image.num_pixels(), 4);
    }

    #[test]
    fn generate_calls_in_row_major_order() {
        let mut calls = 0u8;
        let image = Image::generate(3, 2, || {
            let p = rgba(calls, 0, 0, 255);
            calls += 1;
            p
        });
        assert_eq!(calls, 6);
        for y in 0..2u32 {
            for x in 0..3u32 {
                assert_eq!(image.get(x, y).map(|p| p.r), Some((y * 3 + x) as u8));
            }
        }
    }

    #[test]
    fn generate_empty_never_calls() {
        let mut calls = 0;
        let image = Image::generate(0, 10, || {
            calls += 1;
            RED
        });
        assert!(image.is_empty());
        assert_eq!(calls, 0);
    }

    #[test]
    fn generate_0_1_spans_unit_square() {
        let mut seen = Vec::new();
        let image = Image::generate_0_1(3, 5, |v| {
            seen.push(v);
            rgba((v.x * 100.0) as u8, (v.y * 100.0) as u8, 0, 255)
        });
        assert_eq!(seen.len(), 15);
        assert_eq!(seen[0], Vec2::new(0.0, 0.0));
        assert_eq!(seen[1], Vec2::new(0.5, 0.0));
        assert_eq!(seen[14], Vec2::new(1.0, 1.0));
        assert_eq!(image.get(2, 4), Some(rgba(100, 100, 0, 255)));
        assert_eq!(image.get(0, 2), Some(rgba(0, 50, 0, 255)));
    }

    // A single column divides by zero: the x coordinate is inf * 0 = NaN.
    #[test]
    fn generate_0_1_single_column_is_degenerate() {
        let mut seen = Vec::new();
        let image = Image::generate_0_1(1, 3, |v| {
            seen.push(v);
            RED
        });
        assert_eq!(image.num_pixels(), 3);
        assert!(seen.iter().all(|v| !v.x.is_finite()));
        assert_eq!(seen[2].y, 1.0);
    }

    #[test]
    fn from_img_copies_contiguous() {
        let buf: Vec<Pixel> = (0..6).map(|i| rgba(i, i, i, 255)).collect();
        let img = Img::new(&buf[..], 3, 2);
        let image = Image::from_img(img);
        assert_eq!(image.pixels(), &buf[..]);
    }

    #[test]
    fn from_img_honors_stride() {
        let buf: Vec<Pixel> = (0..8).map(|i| rgba(i, 0, 0, 255)).collect();
        let img = Img::new_stride(&buf[..], 3, 2, 4);
        let image = Image::from_img(img);
        let reds: Vec<u8> = image.iter().map(|p| p.r).collect();
        assert_eq!(reds, vec![0, 1, 2, 4, 5, 6]);
    }

    #[test]
    fn from_img_f32_narrows() {
        let buf = vec![
            Rgba {
                r: 1.0f32,
                g: 0.5,
                b: 0.0,
                a: 2.0,
            };
            4
        ];
        let image = Image::from_img_f32(Img::new(&buf[..], 2, 2));
        assert!(image.iter().all(|p| *p == rgba(255, 128, 0, 255)));
    }

    #[test]
    fn from_imgvec() {
        let img = ImgVec::new(vec![RED; 6], 2, 3);
        let image = Image::from(img);
        assert_eq!((image.width(), image.height()), (2, 3));
    }

    #[test]
    fn take_leaves_empty() {
        let mut a = Image::filled(2, 2, RED);
        let b = a.take();
        assert_empty(&a);
        assert_eq!(b.num_pixels(), 4);
    }

    #[test]
    fn resize_same_size_is_noop() {
        let mut image = Image::filled(2, 2, RED);
        image.set(1, 1, rgba(1, 2, 3, 4));
        let before = image.pixels().as_ptr();

        image.resize(2, 2);
        image.resize_filled(2, 2, rgba(9, 9, 9, 9));

        assert_eq!(image.pixels().as_ptr(), before);
        assert_eq!(image.get(1, 1), Some(rgba(1, 2, 3, 4)));
        assert_eq!(image.get(0, 0), Some(RED));
    }

    #[test]
    fn resize_keeps_leading_pixels() {
        let mut image = Image::generate(2, 2, {
            let mut n = 0u8;
            move || {
                n += 1;
                rgba(n, 0, 0, 255)
            }
        });
        image.resize(3, 2);
        let reds: Vec<u8> = image.iter().map(|p| p.r).collect();
        assert_eq!(reds, vec![1, 2, 3, 4, 0, 0]);
        assert_eq!(image.width(), 3);
    }

    #[test]
    fn resize_filled_overwrites() {
        let mut image = Image::filled(2, 2, RED);
        image.resize_filled(1, 3, rgba(0, 255, 0, 255));
        assert_eq!(image.num_pixels(), 3);
        assert!(image.iter().all(|p| *p == rgba(0, 255, 0, 255)));
    }

    #[test]
    fn resize_invalid_clears() {
        let mut image = Image::filled(2, 2, RED);
        image.resize(MAX_IMAGE_SIZE as usize + 1, 2);
        assert_empty(&image);

        let mut image = Image::filled(2, 2, RED);
        image.resize_filled(2, MAX_IMAGE_SIZE as usize + 1, RED);
        assert_empty(&image);
    }

    #[test]
    fn get_set_bounds() {
        let mut image = Image::with_size(2, 2);
        assert!(image.set(1, 0, RED));
        assert!(!image.set(2, 0, RED));
        assert_eq!(image.get(1, 0), Some(RED));
        assert_eq!(image.get(0, 2), None);
        assert_eq!(image.row(0)[1], RED);
    }

    #[test]
    fn rows_iterate_by_width() {
        let image = Image::with_size(3, 4);
        assert_eq!(image.rows().count(), 4);
        assert!(image.rows().all(|r| r.len() == 3));
        assert_eq!(Image::new().rows().count(), 0);
    }

    #[test]
    fn as_img_none_when_empty() {
        assert!(Image::new().as_img().is_none());
        let image = Image::filled(2, 3, RED);
        let img = image.as_img().unwrap();
        assert_eq!((img.width(), img.height()), (2, 3));
    }

    #[test]
    fn rgb_bytes_drop_alpha() {
        let image = Image::from_vec(2, 1, vec![rgba(10, 20, 30, 255), rgba(40, 50, 60, 0)]);
        assert_eq!(image.to_rgb_bytes(), vec![10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn rgb_bytes_of_empty_is_empty() {
        assert!(Image::new().to_rgb_bytes().is_empty());
    }

    #[test]
    fn as_bytes_is_rgba_order() {
        let image = Image::from_vec(1, 1, vec![rgba(1, 2, 3, 4)]);
        assert_eq!(image.as_bytes(), &[1, 2, 3, 4]);
    }

    #[test]
    fn debug_shows_dimensions() {
        assert_eq!(format!("{:?}", Image::with_size(3, 2)), "Image(3x2)");
    }
}
