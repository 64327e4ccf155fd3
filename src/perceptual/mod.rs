//! Perceptual-target JPEG encoding.
//!
//! Unlike [`JpegCodec`](crate::JpegCodec), which encodes once at a fixed
//! quality, a [`PerceptualJpegEncoder`] is given a distortion *target* and
//! searches for the most compact encoding that stays within it.
//!
//! [`QualitySearch`] is the built-in encoder: it bisects the JPEG quality
//! range, measuring each candidate with a [`DistortionMetric`]
//! ([`Butteraugli`] by default).

mod metric;
mod search;

pub use metric::{Butteraugli, DistortionMetric};
pub use search::QualitySearch;

use crate::PerceptualError;

/// Settings for a perceptual encode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerceptualParams {
    /// Largest acceptable butteraugli distance; `1.0` is roughly "just
    /// noticeable".
    pub target_distance: f32,
    /// Lowest JPEG quality the search may pick.
    pub min_quality: u8,
    /// Highest JPEG quality the search may pick; also the fallback.
    pub max_quality: u8,
}

impl Default for PerceptualParams {
    fn default() -> Self {
        Self {
            target_distance: 1.0,
            min_quality: 1,
            max_quality: 100,
        }
    }
}

impl PerceptualParams {
    pub fn with_target(mut self, target: f32) -> Self {
        self.target_distance = target;
        self
    }

    /// Set the quality search range (each bound clamped to `1..=100`).
    pub fn with_quality_range(mut self, min: u8, max: u8) -> Self {
        self.min_quality = min.clamp(1, 100);
        self.max_quality = max.clamp(1, 100);
        self
    }

    pub(crate) fn validate(&self) -> Result<(), PerceptualError> {
        if !self.target_distance.is_finite() || self.target_distance <= 0.0 {
            return Err(PerceptualError::InvalidTarget(self.target_distance));
        }
        if self.min_quality == 0 || self.min_quality > self.max_quality {
            return Err(PerceptualError::InvalidQualityRange {
                min: self.min_quality,
                max: self.max_quality,
            });
        }
        Ok(())
    }
}

/// One candidate encoding tried during a search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Probe {
    pub quality: u8,
    pub distance: f32,
    pub bytes: usize,
}

/// What a search did and what it settled on.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessStats {
    /// Every candidate, in the order tried.
    pub probes: Vec<Probe>,
    pub chosen_quality: u8,
    /// `None` when the metric could not score the image.
    pub chosen_distance: Option<f32>,
    /// Whether the chosen encoding is within the target.
    pub target_met: bool,
}

/// Result of a successful perceptual encode.
#[derive(Clone, Debug)]
pub struct PerceptualOutput {
    data: Vec<u8>,
    stats: ProcessStats,
}

impl PerceptualOutput {
    pub fn new(data: Vec<u8>, stats: ProcessStats) -> Self {
        Self { data, stats }
    }

    /// The encoded JPEG file.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    pub fn stats(&self) -> &ProcessStats {
        &self.stats
    }
}

/// An encoder that meets a distortion target by its own internal search.
pub trait PerceptualJpegEncoder {
    /// Encode packed RGB8 (`width * height * 3` bytes, row-major).
    fn process(
        &self,
        params: &PerceptualParams,
        rgb: &[u8],
        width: u32,
        height: u32,
    ) -> Result<PerceptualOutput, PerceptualError>;
}
