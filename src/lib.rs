pub mod background;
pub mod bbox;
pub mod classifier;
pub mod config;
pub mod error;
pub mod frame;
pub mod math;
pub mod segmenter;
pub mod session;
pub mod tracker;

mod history;
mod track;

pub use bbox::BoundingBox;
pub use config::Config;
pub use error::Error;
pub use frame::Frame;
pub use history::{History, HISTORY_CAPACITY};
pub use session::Session;
pub use track::Track;
pub use tracker::TrackTable;

use std::collections::HashMap;

/// Front door for hosts juggling several feeds: one independent session
/// per named source, created lazily from a shared configuration template.
pub struct MotionTracker {
    config: Config,
    feeds: HashMap<String, Session>,
}

impl MotionTracker {
    pub fn new(config: Config) -> Result<Self, Error> {
        config.validate()?;

        Ok(Self {
            config,
            feeds: HashMap::new(),
        })
    }

    fn feed_mut(&mut self, src: &str) -> &mut Session {
        let config = &self.config;

        self.feeds
            .entry(src.to_string())
            .or_insert_with(|| Session::from_validated(config.clone()))
    }

    pub fn process_frame(&mut self, src: &str, frame: &Frame) -> &TrackTable {
        self.feed_mut(src).process_frame(frame)
    }

    pub fn process_detections(&mut self, src: &str, detections: &[BoundingBox]) -> &TrackTable {
        self.feed_mut(src).process_detections(detections)
    }

    #[inline]
    pub fn session(&self, src: &str) -> Option<&Session> {
        self.feeds.get(src)
    }

    #[inline]
    pub fn session_mut(&mut self, src: &str) -> Option<&mut Session> {
        self.feeds.get_mut(src)
    }

    #[inline]
    pub fn tracks(&self, src: &str) -> Option<&TrackTable> {
        self.feeds.get(src).map(Session::tracks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(cx: f32, cy: f32) -> BoundingBox {
        BoundingBox::new(cx - 10.0, cy - 10.0, 20.0, 20.0)
    }

    #[test]
    fn feeds_are_isolated() {
        let mut tracker = MotionTracker::new(Config::default()).unwrap();

        tracker.process_detections("north", &[det(10.0, 10.0)]);
        tracker.process_detections("south", &[det(500.0, 500.0), det(40.0, 80.0)]);

        assert_eq!(tracker.tracks("north").unwrap().len(), 1);
        assert_eq!(tracker.tracks("south").unwrap().len(), 2);
        assert!(tracker.tracks("west").is_none());

        // Ids restart per feed: sessions do not share a counter.
        assert!(tracker.tracks("north").unwrap().contains_key(&0));
        assert!(tracker.tracks("south").unwrap().contains_key(&0));
    }

    #[test]
    fn invalid_template_is_rejected() {
        let cfg = Config {
            history_length: 0,
            ..Config::default()
        };

        assert!(MotionTracker::new(cfg).is_err());
    }
}
