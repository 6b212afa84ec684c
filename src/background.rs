use log::warn;
use ndarray::{Array2, Zip};

/// Fresh pixels start with this spread (15 luma levels squared) so a
/// newly seeded model is neither blind nor trigger-happy.
const INITIAL_VARIANCE: f32 = 225.0;

/// Variance floor applied at classification time; a perfectly static
/// patch must not shrink the decision margin to nothing.
const VARIANCE_FLOOR: f32 = 4.0;

/// Exponentially-weighted per-pixel background estimate.
///
/// Keeps a running mean and variance of the luma plane with an effective
/// memory of `history_length` frames. A pixel is foreground when its
/// squared deviation from the mean exceeds `variance_threshold` times the
/// pixel's variance.
pub struct BackgroundModel {
    alpha: f32,
    variance_threshold: f32,
    state: Option<State>,
}

struct State {
    mean: Array2<f32>,
    variance: Array2<f32>,
}

impl BackgroundModel {
    pub fn new(history_length: u32, variance_threshold: f32) -> Self {
        Self {
            alpha: 1.0 / history_length as f32,
            variance_threshold,
            state: None,
        }
    }

    /// Retunes the learning rate and threshold without dropping the
    /// accumulated scene estimate.
    pub(crate) fn set_params(&mut self, history_length: u32, variance_threshold: f32) {
        self.alpha = 1.0 / history_length as f32;
        self.variance_threshold = variance_threshold;
    }

    /// Absorbs one luma plane and returns its foreground mask.
    ///
    /// The first frame (and the first after a resolution change) only
    /// seeds the model; its mask comes back all-background.
    pub fn apply(&mut self, luma: &Array2<f32>) -> Array2<bool> {
        match &mut self.state {
            Some(state) if state.mean.dim() == luma.dim() => {
                let mut mask = Array2::from_elem(luma.dim(), false);
                let alpha = self.alpha;
                let threshold = self.variance_threshold;

                Zip::from(&mut mask)
                    .and(&mut state.mean)
                    .and(&mut state.variance)
                    .and(luma)
                    .for_each(|fg, mean, variance, &x| {
                        let d = x - *mean;
                        let d2 = d * d;

                        *fg = d2 > threshold * variance.max(VARIANCE_FLOOR);

                        *mean += alpha * d;
                        *variance = (1.0 - alpha) * *variance + alpha * d2;
                    });

                mask
            }
            state => {
                if state.is_some() {
                    warn!(
                        "frame dims changed to {:?}, reseeding background model",
                        luma.dim()
                    );
                }

                *state = Some(State {
                    mean: luma.clone(),
                    variance: Array2::from_elem(luma.dim(), INITIAL_VARIANCE),
                });

                Array2::from_elem(luma.dim(), false)
            }
        }
    }
}
