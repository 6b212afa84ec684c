use serde_derive::{Deserialize, Serialize};

use crate::error::Error;
use crate::history::HISTORY_CAPACITY;

/// Tunables for one tracking session.
///
/// Constructed once and validated up front; a running session only swaps
/// configurations between frames via `Session::apply_config`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Frames of memory in the background estimate.
    pub history_length: u32,

    /// Squared-deviation multiple a pixel must exceed to count as foreground.
    pub variance_threshold: f32,

    /// Radius of the box-blur prefilter applied before the model update;
    /// 0 disables it.
    pub blur_radius: usize,

    /// Side of the square structuring element used by the opening pass.
    pub morphology_kernel_size: usize,

    /// Foreground regions with fewer pixels are dropped as noise.
    pub min_area: f32,

    /// Keep only this many largest regions, when set.
    pub max_regions: Option<usize>,

    /// Keep only regions whose area lies within `median ± ratio * median`,
    /// when set.
    pub size_band_ratio: Option<f32>,

    /// Matches farther than this many pixels are rejected.
    pub max_jump_distance: f32,

    /// Consecutive unmatched frames tolerated before a track is evicted.
    pub track_ttl: u32,

    /// Newest history samples consumed by the flap test.
    pub classifier_window: usize,

    /// Spectrum bin whose energy marks flapping motion.
    pub classifier_target_bin: usize,

    /// Spectral ratio above which a track is called periodic.
    pub classifier_threshold: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_length: 60,
            variance_threshold: 16.0,
            blur_radius: 1,
            morphology_kernel_size: 3,
            min_area: 400.0,
            max_regions: None,
            size_band_ratio: None,
            max_jump_distance: 50.0,
            track_ttl: 10,
            classifier_window: 12,
            classifier_target_bin: 4,
            classifier_threshold: 3.0,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), Error> {
        if self.history_length == 0 {
            return Err(Error::HistoryLength);
        }

        if !self.variance_threshold.is_finite() || self.variance_threshold <= 0.0 {
            return Err(Error::VarianceThreshold(self.variance_threshold));
        }

        if self.morphology_kernel_size == 0 {
            return Err(Error::MorphologyKernel);
        }

        if !self.min_area.is_finite() || self.min_area < 0.0 {
            return Err(Error::MinArea(self.min_area));
        }

        if self.max_regions == Some(0) {
            return Err(Error::MaxRegions);
        }

        if let Some(ratio) = self.size_band_ratio {
            if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 {
                return Err(Error::SizeBandRatio(ratio));
            }
        }

        if !self.max_jump_distance.is_finite() || self.max_jump_distance <= 0.0 {
            return Err(Error::MaxJumpDistance(self.max_jump_distance));
        }

        if self.track_ttl == 0 {
            return Err(Error::TrackTtl);
        }

        if self.classifier_window < 4 || self.classifier_window > HISTORY_CAPACITY {
            return Err(Error::ClassifierWindow {
                got: self.classifier_window,
                max: HISTORY_CAPACITY,
            });
        }

        let max_bin = self.classifier_window / 2;
        if self.classifier_target_bin == 0 || self.classifier_target_bin > max_bin {
            return Err(Error::ClassifierBin {
                got: self.classifier_target_bin,
                max: max_bin,
                window: self.classifier_window,
            });
        }

        if !self.classifier_threshold.is_finite() || self.classifier_threshold <= 0.0 {
            return Err(Error::ClassifierThreshold(self.classifier_threshold));
        }

        Ok(())
    }
}
