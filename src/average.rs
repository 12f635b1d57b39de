//! Time-windowed moving average of a 2D signal.
//!
//! Used to smooth the vehicle velocity for the camera. Samples are stored in
//! arrival order together with the run time they were taken at; every insert
//! evicts samples that fell out of the window, and the sample count is capped
//! so a very high frame rate cannot grow the buffer without bound.

use std::collections::VecDeque;
use std::time::Duration;

use glam::DVec2;

#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: Duration,
    capacity: usize,
    samples: VecDeque<(Duration, DVec2)>,
}

impl MovingAverage {
    pub fn new(window: Duration, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window,
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Record `value` taken at run time `now`.
    pub fn sample(&mut self, now: Duration, value: DVec2) {
        let horizon = now.saturating_sub(self.window);
        while let Some(&(taken, _)) = self.samples.front() {
            if taken >= horizon {
                break;
            }
            self.samples.pop_front();
        }

        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back((now, value));
    }

    /// Arithmetic mean of the retained samples, or zero when empty.
    pub fn average(&self) -> DVec2 {
        if self.samples.is_empty() {
            return DVec2::ZERO;
        }
        let sum: DVec2 = self.samples.iter().map(|&(_, v)| v).sum();
        sum / self.samples.len() as f64
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
