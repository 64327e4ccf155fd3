use std::fmt;

use butteraugli::{ButteraugliParams, butteraugli};
use imgref::Img;
use log::debug;
use rgb::FromSlice;

/// Measures how different a candidate encoding looks from the reference.
///
/// Both buffers are packed RGB8 of the same `width × height`. Larger means
/// worse; identical inputs score `0.0`. `None` means the metric cannot
/// score images of this size.
pub trait DistortionMetric {
    fn distance(
        &self,
        reference: &[u8],
        candidate: &[u8],
        width: u32,
        height: u32,
    ) -> Option<f32>;
}

/// Butteraugli distance: `1.0` is about the threshold of a visible
/// difference, larger values are increasingly obvious.
///
/// Images narrower or shorter than [`MIN_DIMENSION`](Self::MIN_DIMENSION)
/// pixels are not scored.
#[derive(Default)]
pub struct Butteraugli {
    params: ButteraugliParams,
}

impl fmt::Debug for Butteraugli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Butteraugli")
    }
}

impl Butteraugli {
    /// Smallest width and height butteraugli accepts.
    pub const MIN_DIMENSION: u32 = 8;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: ButteraugliParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ButteraugliParams {
        &self.params
    }
}

impl DistortionMetric for Butteraugli {
    fn distance(
        &self,
        reference: &[u8],
        candidate: &[u8],
        width: u32,
        height: u32,
    ) -> Option<f32> {
        if width < Self::MIN_DIMENSION || height < Self::MIN_DIMENSION {
            return None;
        }
        let (w, h) = (width as usize, height as usize);
        let len = w * h * 3;
        if reference.len() != len || candidate.len() != len {
            return None;
        }

        let a = Img::new(reference.as_rgb(), w, h);
        let b = Img::new(candidate.as_rgb(), w, h);
        match butteraugli(a, b, &self.params) {
            Ok(result) => Some(result.score as f32),
            Err(err) => {
                debug!("butteraugli cannot score {width}x{height}: {err}");
                None
            }
        }
    }
}
