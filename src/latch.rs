//! Threshold edge detection with a hysteresis band.
//!
//! Status indicators and alert channels follow a scalar (usually the
//! acceleration stress) that hovers around a threshold. Acting on the level
//! every frame would re-send the same controller message or restart the same
//! alert clip dozens of times per second. `Hysteresis` reports only the
//! frames where the state actually changes:
//!
//! ```text
//!     value   2.7   2.9   2.95  2.6
//!     active  off   on    on    off
//!     edge    -     Rose  -     Fell
//! ```
//!
//! The band between `off_below` and `on_above` absorbs jitter: a value that
//! dips a hair under the rising threshold does not switch the latch off.

/// Direction of a state change reported by [`Hysteresis::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rose,
    Fell,
}

#[derive(Debug, Clone, Copy)]
pub struct Hysteresis {
    on_above: f64,
    off_below: f64,
    inclusive: bool,
    active: bool,
}

impl Hysteresis {
    /// Latch that switches on when the value exceeds `on_above` and off when
    /// it drops below `off_below`.
    pub fn new(on_above: f64, off_below: f64) -> Self {
        Self {
            on_above,
            off_below: off_below.min(on_above),
            inclusive: false,
            active: false,
        }
    }

    /// Latch with a single threshold: on at `value >= threshold`, off below it.
    pub fn at(threshold: f64) -> Self {
        Self {
            on_above: threshold,
            off_below: threshold,
            inclusive: true,
            active: false,
        }
    }

    pub fn update(&mut self, value: f64) -> Option<Edge> {
        let rises = if self.inclusive {
            value >= self.on_above
        } else {
            value > self.on_above
        };

        if !self.active && rises {
            self.active = true;
            Some(Edge::Rose)
        } else if self.active && value < self.off_below {
            self.active = false;
            Some(Edge::Fell)
        } else {
            None
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_each_crossing_once() {
        let mut latch = Hysteresis::new(2.8, 2.75);
        let edges: Vec<_> = [2.7, 2.9, 2.95, 2.6]
            .iter()
            .map(|&v| latch.update(v))
            .collect();
        assert_eq!(edges, vec![None, Some(Edge::Rose), None, Some(Edge::Fell)]);
    }

    #[test]
    fn band_absorbs_jitter() {
        let mut latch = Hysteresis::new(2.8, 2.75);
        let edges: Vec<_> = [2.81, 2.79, 2.81, 2.78, 2.82]
            .iter()
            .filter_map(|&v| latch.update(v))
            .collect();
        assert_eq!(edges, vec![Edge::Rose]);
        assert!(latch.is_active());
    }

    #[test]
    fn single_threshold_is_inclusive() {
        let mut latch = Hysteresis::at(2.8);
        assert_eq!(latch.update(2.8), Some(Edge::Rose));
        assert_eq!(latch.update(2.8), None);
        assert_eq!(latch.update(2.79), Some(Edge::Fell));
    }
}
