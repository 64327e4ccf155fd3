//! Pixel types and 8-bit ↔ float conversions.
//!
//! Pixels are `rgb::Rgba<u8>`: four unsigned channels, `Copy`, and laid out
//! as `r, g, b, a` bytes so a pixel slice can be viewed as raw bytes.

use rgb::Rgba;

/// An 8-bit RGBA pixel.
pub type Pixel = Rgba<u8>;

/// A floating-point RGBA pixel with channels nominally in `[0, 1]`.
pub type PixelF = Rgba<f32>;

/// A point in normalized coordinates, passed to
/// [`Image::generate_0_1`](crate::Image::generate_0_1) generators.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Build a pixel from its four channels.
#[inline]
pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Pixel {
    Rgba { r, g, b, a }
}

/// Narrow one float channel to 8 bits: clamp to `[0, 1]`, scale, round half up.
#[inline]
fn narrow(v: f32) -> u8 {
    // NaN clamps to NaN and then saturates to 0 in the cast.
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

/// Convert a float pixel to 8 bits per channel.
pub fn from_pixel_f(p: PixelF) -> Pixel {
    Rgba {
        r: narrow(p.r),
        g: narrow(p.g),
        b: narrow(p.b),
        a: narrow(p.a),
    }
}

/// Widen an 8-bit pixel to floats in `[0, 1]`.
pub fn to_pixel_f(p: Pixel) -> PixelF {
    Rgba {
        r: f32::from(p.r) / 255.0,
        g: f32::from(p.g) / 255.0,
        b: f32::from(p.b) / 255.0,
        a: f32::from(p.a) / 255.0,
    }
}
