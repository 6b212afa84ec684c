use std::collections::VecDeque;

/// Samples retained per track.
pub const HISTORY_CAPACITY: usize = 20;

/// Bounded FIFO of vertical-centroid samples for one track. Newest sample
/// last; the oldest is evicted once the buffer is full.
#[derive(Debug, Clone, Default)]
pub struct History {
    samples: VecDeque<f32>,
}

impl History {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    pub fn push(&mut self, sample: f32) {
        if self.samples.len() == HISTORY_CAPACITY {
            self.samples.pop_front();
        }

        self.samples.push_back(sample);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn last(&self) -> Option<f32> {
        self.samples.back().copied()
    }

    /// Oldest to newest.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().copied()
    }

    /// Newest `n` samples in arrival order, or `None` while fewer are held.
    pub fn recent(&self, n: usize) -> Option<impl Iterator<Item = f32> + '_> {
        if self.samples.len() < n {
            return None;
        }

        Some(self.samples.iter().copied().skip(self.samples.len() - n))
    }
}
