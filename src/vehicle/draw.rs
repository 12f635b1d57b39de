use std::time::Duration;

use glam::DVec2;

/// Interval between jet-flicker and explosion frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(50);
/// Frames in the explosion animation.
pub const EXPLOSION_FRAMES: u32 = 12;
/// Scale the explosion is drawn at.
pub const EXPLOSION_SCALE: f64 = 10.0;

/// Which way the main jet fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JetDirection {
    Forward,
    Reverse,
    Idle,
}

impl JetDirection {
    /// Direction implied by the right deck fader, with a dead zone around
    /// the center.
    pub fn from_balance(balance: f64) -> Self {
        if balance > 0.55 {
            JetDirection::Forward
        } else if balance < 0.45 {
            JetDirection::Reverse
        } else {
            JetDirection::Idle
        }
    }
}

/// What the renderer should draw for one vehicle this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Intact {
        position: DVec2,
        body_rotation: f64,
        engine_rotation: f64,
        /// Current over maximum stability thrust.
        stability_jet: f64,
        /// Current over maximum main thrust, signed.
        engine_jet: f64,
        jet: JetDirection,
        /// Alternates between 0 and 1.
        flicker: u32,
    },
    Explosion {
        position: DVec2,
        rotation: f64,
        frame: u32,
        scale: f64,
    },
}

/// Animation frame `elapsed` into a sequence ticking every [`FRAME_INTERVAL`].
pub(crate) fn frame_index(elapsed: Duration) -> u32 {
    (elapsed.as_millis() / FRAME_INTERVAL.as_millis()).min(u128::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jet_dead_zone() {
        assert_eq!(JetDirection::from_balance(1.0), JetDirection::Forward);
        assert_eq!(JetDirection::from_balance(0.5), JetDirection::Idle);
        assert_eq!(JetDirection::from_balance(0.55), JetDirection::Idle);
        assert_eq!(JetDirection::from_balance(0.2), JetDirection::Reverse);
    }

    #[test]
    fn frame_index_ticks_every_interval() {
        assert_eq!(frame_index(Duration::ZERO), 0);
        assert_eq!(frame_index(Duration::from_millis(49)), 0);
        assert_eq!(frame_index(Duration::from_millis(50)), 1);
        assert_eq!(frame_index(Duration::from_millis(599)), 11);
    }
}
