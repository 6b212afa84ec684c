use log::debug;

use crate::bbox::BoundingBox;
use crate::classifier::MotionClassifier;
use crate::config::Config;
use crate::error::Error;
use crate::frame::Frame;
use crate::segmenter::MotionSegmenter;
use crate::tracker::{ObjectTracker, TrackTable};

/// One tracking session: a background model, a track table and a flap
/// classifier advancing in lock step, one frame at a time.
///
/// All state is frame-synchronous. A session is single-threaded by
/// construction; run one session per camera to parallelize.
pub struct Session {
    config: Config,
    segmenter: MotionSegmenter,
    tracker: ObjectTracker,
    classifier: MotionClassifier,
}

impl Session {
    pub fn new(config: Config) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    pub(crate) fn from_validated(config: Config) -> Self {
        Self {
            segmenter: MotionSegmenter::new(&config),
            tracker: ObjectTracker::new(&config),
            classifier: MotionClassifier::new(&config),
            config,
        }
    }

    /// Full pipeline step: motion segmentation feeding the tracker.
    pub fn process_frame(&mut self, frame: &Frame) -> &TrackTable {
        let detections = self.segmenter.segment(frame);
        self.tracker.update(&detections)
    }

    /// Detector-supplied boxes, bypassing motion segmentation.
    pub fn process_detections(&mut self, detections: &[BoundingBox]) -> &TrackTable {
        self.tracker.update(detections)
    }

    #[inline]
    pub fn tracks(&self) -> &TrackTable {
        self.tracker.tracks()
    }

    /// Flap verdict for one track; unknown ids are simply not periodic.
    pub fn is_periodic(&self, id: u32) -> bool {
        self.tracks()
            .get(&id)
            .map_or(false, |track| self.classifier.is_periodic(track.history()))
    }

    /// Ids of every track currently classified as periodic.
    pub fn periodic_tracks(&self) -> Vec<u32> {
        self.tracks()
            .iter()
            .filter(|(_, track)| self.classifier.is_periodic(track.history()))
            .map(|(&id, _)| id)
            .collect()
    }

    /// Swaps the configuration between frames. The background model and
    /// the track table survive; the classifier is re-planned.
    pub fn apply_config(&mut self, config: Config) -> Result<(), Error> {
        config.validate()?;

        self.segmenter.reconfigure(&config);
        self.tracker.reconfigure(&config);
        self.classifier = MotionClassifier::new(&config);
        self.config = config;

        debug!("session configuration updated");

        Ok(())
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
