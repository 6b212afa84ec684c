use nalgebra as na;

use crate::history::History;

/// Persistent unit of identity produced by the tracker.
#[derive(Debug, Clone)]
pub struct Track {
    id: u32,
    centroid: na::Point2<f32>,
    miss_count: u32,
    history: History,
}

impl Track {
    pub(crate) fn new(id: u32, centroid: na::Point2<f32>) -> Self {
        let mut history = History::new();
        history.push(centroid.y);

        Self {
            id,
            centroid,
            miss_count: 0,
            history,
        }
    }

    /// Folds a matched detection in: position replaced, age cleared, one
    /// vertical sample appended.
    pub(crate) fn matched(&mut self, centroid: na::Point2<f32>) {
        self.centroid = centroid;
        self.miss_count = 0;
        self.history.push(centroid.y);
    }

    /// Ages one frame without a match, recording `sample`.
    pub(crate) fn missed(&mut self, sample: f32) {
        self.miss_count += 1;
        self.history.push(sample);
    }

    #[inline(always)]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Latest known position.
    #[inline(always)]
    pub fn centroid(&self) -> na::Point2<f32> {
        self.centroid
    }

    /// Consecutive frames without a matching detection.
    #[inline(always)]
    pub fn miss_count(&self) -> u32 {
        self.miss_count
    }

    #[inline(always)]
    pub fn history(&self) -> &History {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_track_seeds_history_with_y() {
        let track = Track::new(3, na::Point2::new(10.0, 42.0));

        assert_eq!(track.id(), 3);
        assert_eq!(track.miss_count(), 0);
        assert_eq!(track.history().last(), Some(42.0));
        assert_eq!(track.history().len(), 1);
    }

    #[test]
    fn matched_resets_age_and_appends() {
        let mut track = Track::new(0, na::Point2::new(0.0, 1.0));
        track.missed(1.0);
        track.missed(1.0);
        assert_eq!(track.miss_count(), 2);

        track.matched(na::Point2::new(5.0, 7.0));
        assert_eq!(track.miss_count(), 0);
        assert_eq!(track.centroid(), na::Point2::new(5.0, 7.0));
        assert_eq!(track.history().last(), Some(7.0));
        assert_eq!(track.history().len(), 4);
    }
}
