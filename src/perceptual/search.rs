use log::debug;

use super::{
    Butteraugli, DistortionMetric, PerceptualJpegEncoder, PerceptualOutput, PerceptualParams,
    Probe, ProcessStats,
};
use crate::PerceptualError;
use crate::codecs::encode_rgb;

/// Bisects JPEG quality for the lowest setting whose decoded result stays
/// within the distortion target.
///
/// Each probe is a full encode, decode, and measurement, so a search over
/// the default range costs about seven single-pass encodes. Distortion is
/// assumed to fall as quality rises; if nothing in range meets the target,
/// or the metric cannot score the image at all, the `max_quality` encoding
/// is returned.
#[derive(Clone, Copy, Debug, Default)]
pub struct QualitySearch<M = Butteraugli> {
    metric: M,
}

impl QualitySearch {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: DistortionMetric> QualitySearch<M> {
    pub fn with_metric(metric: M) -> Self {
        Self { metric }
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    fn probe(
        &self,
        rgb: &[u8],
        width: u32,
        height: u32,
        quality: u8,
    ) -> Result<(Vec<u8>, Option<f32>), PerceptualError> {
        let jpeg_err = |source| PerceptualError::Jpeg { quality, source };

        let data = encode_rgb(rgb, width, height, quality).map_err(jpeg_err)?;
        let decoded = image::load_from_memory_with_format(&data, image::ImageFormat::Jpeg)
            .map_err(jpeg_err)?
            .into_rgb8();
        let distance = self
            .metric
            .distance(rgb, decoded.as_raw(), width, height);
        Ok((data, distance))
    }
}

impl<M: DistortionMetric> PerceptualJpegEncoder for QualitySearch<M> {
    fn process(
        &self,
        params: &PerceptualParams,
        rgb: &[u8],
        width: u32,
        height: u32,
    ) -> Result<PerceptualOutput, PerceptualError> {
        params.validate()?;
        if width == 0 || height == 0 {
            return Err(PerceptualError::EmptyInput { width, height });
        }
        let expected = width as usize * height as usize * 3;
        if rgb.len() != expected {
            return Err(PerceptualError::SizeMismatch {
                width,
                height,
                expected,
                actual: rgb.len(),
            });
        }

        let target = params.target_distance;
        let mut stats = ProcessStats::default();
        let mut best: Option<(u8, f32, Vec<u8>)> = None;
        let mut ceiling: Option<(u8, f32, Vec<u8>)> = None;

        let (mut lo, mut hi) = (u32::from(params.min_quality), u32::from(params.max_quality));
        while lo <= hi {
            let quality = ((lo + hi) / 2) as u8;
            let (data, distance) = self.probe(rgb, width, height, quality)?;
            let Some(distance) = distance else {
                debug!("{width}x{height} cannot be scored, using quality {}", params.max_quality);
                break;
            };
            debug!(
                "quality {quality}: distance {distance:.3} ({} bytes)",
                data.len()
            );
            stats.probes.push(Probe {
                quality,
                distance,
                bytes: data.len(),
            });

            if distance <= target {
                best = Some((quality, distance, data));
                hi = u32::from(quality) - 1;
            } else {
                if quality == params.max_quality {
                    ceiling = Some((quality, distance, data));
                }
                lo = u32::from(quality) + 1;
            }
        }

        let (quality, distance, data) = match best.or(ceiling) {
            Some((quality, distance, data)) => (quality, Some(distance), data),
            None => {
                let (data, distance) = self.probe(rgb, width, height, params.max_quality)?;
                (params.max_quality, distance, data)
            }
        };

        stats.chosen_quality = quality;
        stats.chosen_distance = distance;
        stats.target_met = distance.is_some_and(|d| d <= target);
        debug!(
            "chose quality {quality} after {} probes (distance {distance:?}, target {target})",
            stats.probes.len()
        );
        Ok(PerceptualOutput::new(data, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Colorful high-frequency pattern that JPEG cannot reproduce exactly.
    fn pattern(width: u32, height: u32) -> Vec<u8> {
        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                rgb.push(((x * 53 + y * 11) % 256) as u8);
                rgb.push(((x * 7 + y * 91) % 256) as u8);
                rgb.push(((x ^ y) * 29 % 256) as u8);
            }
        }
        rgb
    }

    /// Scores every candidate the same.
    struct Constant(f32);

    impl DistortionMetric for Constant {
        fn distance(&self, _: &[u8], _: &[u8], _: u32, _: u32) -> Option<f32> {
            Some(self.0)
        }
    }

    /// Cannot score anything.
    struct Blind;

    impl DistortionMetric for Blind {
        fn distance(&self, _: &[u8], _: &[u8], _: u32, _: u32) -> Option<f32> {
            None
        }
    }

    #[test]
    fn loose_target_picks_min_quality() {
        let rgb = pattern(16, 16);
        let params = PerceptualParams::default().with_target(1000.0);
        let out = QualitySearch::new().process(&params, &rgb, 16, 16).unwrap();
        assert_eq!(out.stats().chosen_quality, 1);
        assert!(out.stats().target_met);
        assert!(out.bytes().starts_with(&[0xFF, 0xD8, 0xFF]));
    }

    #[test]
    fn unreachable_target_falls_back_to_max_quality() {
        let rgb = pattern(16, 16);
        let params = PerceptualParams::default().with_target(1e-6);
        let out = QualitySearch::new().process(&params, &rgb, 16, 16).unwrap();
        assert_eq!(out.stats().chosen_quality, 100);
        assert!(!out.stats().target_met);
        assert_eq!(out.stats().probes.last().map(|p| p.quality), Some(100));
    }

    #[test]
    fn chosen_encoding_meets_target_on_butteraugli_scale() {
        let rgb = pattern(32, 32);
        let params = PerceptualParams::default().with_target(2.0);
        let out = QualitySearch::new().process(&params, &rgb, 32, 32).unwrap();
        let stats = out.stats();
        if stats.target_met {
            let decoded = image::load_from_memory(out.bytes()).unwrap().into_rgb8();
            let rescored = Butteraugli::new()
                .distance(&rgb, decoded.as_raw(), 32, 32)
                .unwrap();
            assert!(rescored <= 2.0, "{rescored}");
            assert_eq!(stats.chosen_distance, Some(rescored));
        } else {
            assert_eq!(stats.chosen_quality, 100);
        }
    }

    #[test]
    fn small_image_falls_back_to_max_quality() {
        let rgb = pattern(4, 6);
        let out = QualitySearch::new()
            .process(&PerceptualParams::default(), &rgb, 4, 6)
            .unwrap();
        let stats = out.stats();
        assert_eq!(stats.chosen_quality, 100);
        assert_eq!(stats.chosen_distance, None);
        assert!(!stats.target_met);
        assert!(stats.probes.is_empty());
        assert!(out.bytes().starts_with(&[0xFF, 0xD8, 0xFF]));
    }

    #[test]
    fn unscorable_metric_uses_configured_ceiling() {
        let rgb = pattern(8, 8);
        let params = PerceptualParams::default().with_quality_range(40, 90);
        let out = QualitySearch::with_metric(Blind)
            .process(&params, &rgb, 8, 8)
            .unwrap();
        assert_eq!(out.stats().chosen_quality, 90);
        assert!(!out.stats().target_met);
    }

    #[test]
    fn search_is_logarithmic() {
        let rgb = pattern(16, 16);
        let out = QualitySearch::with_metric(Constant(2.0))
            .process(&PerceptualParams::default(), &rgb, 16, 16)
            .unwrap();
        let probes = &out.stats().probes;
        assert!(!probes.is_empty() && probes.len() <= 7, "{probes:?}");
    }

    #[test]
    fn chosen_bytes_match_chosen_probe() {
        let rgb = pattern(16, 8);
        let search = QualitySearch::with_metric(Constant(0.5));
        let params = PerceptualParams::default().with_quality_range(60, 100);
        let out = search.process(&params, &rgb, 16, 8).unwrap();
        // Every probe passes, so the search walks down to the floor.
        assert_eq!(out.stats().chosen_quality, 60);
        let probe = out
            .stats()
            .probes
            .iter()
            .find(|p| p.quality == 60)
            .unwrap();
        assert_eq!(probe.bytes, out.bytes().len());
    }

    #[test]
    fn single_quality_range() {
        let rgb = pattern(8, 8);
        let params = PerceptualParams::default().with_quality_range(85, 85);
        let out = QualitySearch::with_metric(Constant(5.0))
            .process(&params, &rgb, 8, 8)
            .unwrap();
        assert_eq!(out.stats().probes.len(), 1);
        assert_eq!(out.stats().chosen_quality, 85);
        assert_eq!(out.stats().chosen_distance, Some(5.0));
        assert!(!out.stats().target_met);
    }

    #[test]
    fn rejects_size_mismatch() {
        let err = QualitySearch::new()
            .process(&PerceptualParams::default(), &[0; 5], 2, 1)
            .unwrap_err();
        assert!(matches!(
            err,
            PerceptualError::SizeMismatch {
                expected: 6,
                actual: 5,
                ..
            }
        ));
    }

    #[test]
    fn rejects_empty_and_bad_target() {
        let search = QualitySearch::new();
        assert!(matches!(
            search.process(&PerceptualParams::default(), &[], 0, 0),
            Err(PerceptualError::EmptyInput { .. })
        ));
        let params = PerceptualParams::default().with_target(f32::NAN);
        assert!(matches!(
            search.process(&params, &[0; 3], 1, 1),
            Err(PerceptualError::InvalidTarget(_))
        ));
    }
}
