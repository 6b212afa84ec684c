use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("history_length must be at least 1 frame")]
    HistoryLength,

    #[error("variance_threshold must be positive and finite, got {0}")]
    VarianceThreshold(f32),

    #[error("morphology_kernel_size must be at least 1 pixel")]
    MorphologyKernel,

    #[error("min_area must be non-negative and finite, got {0}")]
    MinArea(f32),

    #[error("max_regions must be at least 1 when set")]
    MaxRegions,

    #[error("size_band_ratio must lie within (0, 1], got {0}")]
    SizeBandRatio(f32),

    #[error("max_jump_distance must be positive and finite, got {0}")]
    MaxJumpDistance(f32),

    #[error("track_ttl must be at least 1 frame")]
    TrackTtl,

    #[error("classifier_window must lie within 4..={max}, got {got}")]
    ClassifierWindow { got: usize, max: usize },

    #[error("classifier_target_bin must lie within 1..={max} for a window of {window}, got {got}")]
    ClassifierBin {
        got: usize,
        max: usize,
        window: usize,
    },

    #[error("classifier_threshold must be positive and finite, got {0}")]
    ClassifierThreshold(f32),

    #[error("frame buffer of {len} bytes does not match {width}x{height}")]
    FrameGeometry { width: u32, height: u32, len: usize },
}
