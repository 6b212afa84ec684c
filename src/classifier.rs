use std::sync::Arc;

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::config::Config;
use crate::history::History;
use crate::math;

const SPECTRAL_EPSILON: f32 = 1e-6;

/// Frequency-domain flap test over a track's vertical history.
///
/// Rapid periodic motion concentrates energy at the target bin, smooth
/// translation at the bottom of the spectrum; the verdict is the ratio of
/// the two magnitudes against a threshold.
pub struct MotionClassifier {
    fft: Arc<dyn Fft<f32>>,
    window: usize,
    target_bin: usize,
    threshold: f32,
}

impl MotionClassifier {
    pub fn new(config: &Config) -> Self {
        let mut planner = FftPlanner::new();

        Self {
            fft: planner.plan_fft_forward(config.classifier_window),
            window: config.classifier_window,
            target_bin: config.classifier_target_bin,
            threshold: config.classifier_threshold,
        }
    }

    /// Magnitude at the target bin over magnitude at the lowest non-zero
    /// bin, mean removed first. `None` until the history holds a full
    /// window.
    pub fn spectral_ratio(&self, history: &History) -> Option<f32> {
        let samples: Vec<f32> = history.recent(self.window)?.collect();
        let mean = math::mean(&samples);

        let mut buffer: Vec<Complex<f32>> = samples
            .iter()
            .map(|&s| Complex::new(s - mean, 0.0))
            .collect();

        self.fft.process(&mut buffer);

        let target = buffer[self.target_bin].norm();
        let fundamental = buffer[1].norm();

        Some(target / (fundamental + SPECTRAL_EPSILON))
    }

    /// Flap verdict; a short history is simply not periodic.
    pub fn is_periodic(&self, history: &History) -> bool {
        self.spectral_ratio(history)
            .map_or(false, |ratio| ratio > self.threshold)
    }
}
