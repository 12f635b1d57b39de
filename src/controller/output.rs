use std::time::Duration;

use crate::controller::{CHAN_LEFT, CHAN_RIGHT, KEY_PLAY, KEY_SYNC, LED_ON};
use crate::io::midi::MidiEvent;
use crate::latch::{Edge, Hysteresis};
use crate::vehicle::SpinUp;

/// Stress above which the warning indicator lights.
pub const STRESS_LED_THRESHOLD: f64 = 2.8;
/// Half period of the spin-up indicator blink.
pub const SPINUP_BLINK: Duration = Duration::from_millis(250);

/*
Status indicators

    right deck sync   stress warning, on while stress >= 2.8
    left deck play    spin-up progress

The spin-up indicator blinks while the engine spins up, goes steady once the
level reaches 1.0 and switches off if the play button is released before
that. Messages are sent only when an indicator actually changes state, so
an idle frame produces nothing.
*/

/// Turns flight state into indicator messages, one frame at a time.
#[derive(Debug, Clone)]
pub struct StatusEncoder {
    stress: Hysteresis,
    spin_up_lit: Option<bool>,
}

impl Default for StatusEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusEncoder {
    pub fn new() -> Self {
        Self {
            stress: Hysteresis::at(STRESS_LED_THRESHOLD),
            spin_up_lit: None,
        }
    }

    /// Produce this frame's indicator changes.
    ///
    /// Finishing or abandoning a spin-up is recorded on `spin_up`, which ends
    /// the blink sequence until the next one starts.
    pub fn encode(
        &mut self,
        spin_up: &mut SpinUp,
        stress: f64,
        held: bool,
        now: Duration,
    ) -> Vec<MidiEvent> {
        let mut out = Vec::new();

        match self.stress.update(stress) {
            Some(Edge::Rose) => out.push(led(CHAN_RIGHT, KEY_SYNC, true)),
            Some(Edge::Fell) => out.push(led(CHAN_RIGHT, KEY_SYNC, false)),
            None => {}
        }

        if let (Some(started), false) = (spin_up.started(), spin_up.is_done()) {
            let lit = if spin_up.level() >= 1.0 {
                spin_up.finish();
                true
            } else if !held {
                spin_up.abandon();
                false
            } else {
                let elapsed = now.saturating_sub(started);
                (elapsed.as_millis() / SPINUP_BLINK.as_millis()) % 2 == 1
            };

            if self.spin_up_lit != Some(lit) {
                self.spin_up_lit = Some(lit);
                out.push(led(CHAN_LEFT, KEY_PLAY, lit));
            }
        }

        out
    }
}

fn led(channel: u8, key: u8, on: bool) -> MidiEvent {
    if on {
        MidiEvent::NoteOn {
            channel,
            key,
            velocity: LED_ON,
        }
    } else {
        MidiEvent::NoteOff {
            channel,
            key,
            velocity: 0,
        }
    }
}
