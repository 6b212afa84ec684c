use std::collections::BTreeMap;

use log::debug;
use nalgebra as na;
use ndarray::Array2;

use crate::bbox::BoundingBox;
use crate::config::Config;
use crate::track::Track;

/// Mapping from stable id to live track. Iteration order is ascending id,
/// which is also creation order, so output is deterministic frame to
/// frame.
pub type TrackTable = BTreeMap<u32, Track>;

/// Assigns stable identities to per-frame detections.
///
/// Matching is the greedy sorted-argmin heuristic: rows are visited in
/// ascending order of their best distance and each row gets one shot at
/// its single nearest column. A row whose nearest column was already
/// claimed stays unmatched even if a farther column is free; this
/// first-claim-wins behavior, including its tie order, is part of the
/// observable contract and is not an optimal bipartite matching.
pub struct ObjectTracker {
    table: TrackTable,
    next_id: u32,
    max_jump_distance: f32,
    track_ttl: u32,
}

impl ObjectTracker {
    pub fn new(config: &Config) -> Self {
        Self {
            table: TrackTable::new(),
            next_id: 0,
            max_jump_distance: config.max_jump_distance,
            track_ttl: config.track_ttl,
        }
    }

    pub(crate) fn reconfigure(&mut self, config: &Config) {
        self.max_jump_distance = config.max_jump_distance;
        self.track_ttl = config.track_ttl;
    }

    #[inline]
    pub fn tracks(&self) -> &TrackTable {
        &self.table
    }

    /// Advances the table by exactly one frame of detections. Each
    /// detection is consumed at most once; duplicates are both eligible.
    pub fn update(&mut self, detections: &[BoundingBox]) -> &TrackTable {
        if detections.is_empty() {
            self.age_all();
            return &self.table;
        }

        if self.table.is_empty() {
            for det in detections {
                self.spawn(det.centroid());
            }
            return &self.table;
        }

        let ids: Vec<u32> = self.table.keys().copied().collect();
        let origins: Vec<na::Point2<f32>> = ids.iter().map(|id| self.table[id].centroid()).collect();
        let targets: Vec<na::Point2<f32>> = detections.iter().map(BoundingBox::centroid).collect();

        let dist = Array2::from_shape_fn((origins.len(), targets.len()), |(r, c)| {
            na::distance(&origins[r], &targets[c])
        });

        // Rows ranked by their best available distance; equal minima keep
        // table order (ascending id) under the stable sort.
        let row_best: Vec<(usize, f32)> = dist
            .rows()
            .into_iter()
            .map(|row| {
                let mut best = (0, f32::INFINITY);
                for (c, &d) in row.iter().enumerate() {
                    if d < best.1 {
                        best = (c, d);
                    }
                }
                best
            })
            .collect();

        let mut order: Vec<usize> = (0..ids.len()).collect();
        order.sort_by(|&a, &b| {
            row_best[a]
                .1
                .partial_cmp(&row_best[b].1)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut claimed = vec![false; targets.len()];
        let mut row_matched = vec![false; ids.len()];

        for &r in &order {
            let (c, d) = row_best[r];

            if claimed[c] || d > self.max_jump_distance {
                continue;
            }

            claimed[c] = true;
            row_matched[r] = true;

            if let Some(track) = self.table.get_mut(&ids[r]) {
                track.matched(targets[c]);
            }
        }

        // Unmatched tracks age and repeat their own last y. A globally
        // empty frame records a zero sample instead (see age_all); the two
        // paths stay distinct.
        let mut evicted = Vec::new();

        for (r, id) in ids.iter().enumerate() {
            if row_matched[r] {
                continue;
            }

            if let Some(track) = self.table.get_mut(id) {
                let carry = track.centroid().y;
                track.missed(carry);

                if track.miss_count() >= self.track_ttl {
                    evicted.push(*id);
                }
            }
        }

        self.evict(&evicted);

        for (c, target) in targets.iter().enumerate() {
            if !claimed[c] {
                self.spawn(*target);
            }
        }

        &self.table
    }

    fn age_all(&mut self) {
        let mut evicted = Vec::new();

        for (id, track) in self.table.iter_mut() {
            track.missed(0.0);

            if track.miss_count() >= self.track_ttl {
                evicted.push(*id);
            }
        }

        self.evict(&evicted);
    }

    fn evict(&mut self, ids: &[u32]) {
        for id in ids {
            self.table.remove(id);
            debug!("track {} evicted after {} missed frames", id, self.track_ttl);
        }
    }

    fn spawn(&mut self, centroid: na::Point2<f32>) {
        let id = self.next_id;
        self.next_id += 1;

        debug!("track {} created at ({:.1}, {:.1})", id, centroid.x, centroid.y);
        self.table.insert(id, Track::new(id, centroid));
    }
}
