use crate::controller::{
    CHAN_LEFT, CHAN_MIDDLE, CHAN_RIGHT, CTRL_BALANCE_MSB, CTRL_BANK_SELECT_MSB, CTRL_PAN,
    CTRL_RIM, KEY_PLAY, KEY_SYNC, VAL_PAN_CCW, VAL_PAN_CW,
};
use crate::io::midi::MidiEvent;

/// Continuous control state decoded from the controller.
///
/// Pan ticks are per-frame deltas and restart from zero on every decode
/// pass. Balances are absolute fader positions in `[0.0, 1.0]` and persist
/// until the fader moves again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlInputState {
    pub left_pan_ticks: i64,
    pub right_pan_ticks: i64,
    pub left_balance: f64,
    pub right_balance: f64,
    pub middle_balance: f64,
    /// Play button on the left deck is held down.
    pub hold: bool,
}

impl Default for ControlInputState {
    fn default() -> Self {
        Self {
            left_pan_ticks: 0,
            right_pan_ticks: 0,
            left_balance: 0.0,
            right_balance: 0.5,
            middle_balance: 0.5,
            hold: false,
        }
    }
}

/// What a decode pass saw, beyond the state it updated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    /// The sync button was pressed at least once this frame.
    pub sync_pressed: bool,
    pub recognized: usize,
    pub ignored: usize,
}

impl ControlInputState {
    /// Apply one frame's worth of controller messages.
    ///
    /// Unknown channels, keys, controllers and values are skipped; a garbled
    /// message never aborts the rest of the batch.
    pub fn decode(&mut self, events: &[MidiEvent]) -> DecodeSummary {
        self.left_pan_ticks = 0;
        self.right_pan_ticks = 0;

        let mut summary = DecodeSummary::default();
        for event in events {
            if self.apply(event, &mut summary) {
                summary.recognized += 1;
            } else {
                summary.ignored += 1;
            }
        }
        summary
    }

    fn apply(&mut self, event: &MidiEvent, summary: &mut DecodeSummary) -> bool {
        match *event {
            MidiEvent::NoteOn {
                channel: CHAN_LEFT,
                key: KEY_PLAY,
                ..
            } => self.hold = true,
            MidiEvent::NoteOn {
                channel: CHAN_LEFT,
                key: KEY_SYNC,
                ..
            } => summary.sync_pressed = true,
            MidiEvent::NoteOff {
                channel: CHAN_LEFT,
                key: KEY_PLAY,
                ..
            } => self.hold = false,

            MidiEvent::ControlChange {
                channel,
                controller: CTRL_RIM | CTRL_PAN,
                value,
            } => {
                let ticks = match channel {
                    CHAN_LEFT => &mut self.left_pan_ticks,
                    CHAN_RIGHT => &mut self.right_pan_ticks,
                    _ => return false,
                };
                match value {
                    VAL_PAN_CCW => *ticks -= 1,
                    VAL_PAN_CW => *ticks += 1,
                    _ => return false,
                }
            }
            MidiEvent::ControlChange {
                channel: CHAN_LEFT,
                controller: CTRL_BALANCE_MSB,
                value,
            } => self.left_balance = scale_7bit(value),
            MidiEvent::ControlChange {
                channel: CHAN_RIGHT,
                controller: CTRL_BALANCE_MSB,
                value,
            } => self.right_balance = scale_7bit(value),
            MidiEvent::ControlChange {
                channel: CHAN_MIDDLE,
                controller: CTRL_BANK_SELECT_MSB,
                value,
            } => self.middle_balance = scale_7bit(value),

            _ => return false,
        }
        true
    }
}

/// Map a 7-bit controller value onto `[0.0, 1.0]`.
fn scale_7bit(value: u8) -> f64 {
    f64::from(value.min(127)) / 127.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cc(channel: u8, controller: u8, value: u8) -> MidiEvent {
        MidiEvent::ControlChange {
            channel,
            controller,
            value,
        }
    }

    #[test]
    fn opposite_ticks_cancel() {
        let mut state = ControlInputState::default();
        state.decode(&[
            cc(CHAN_LEFT, CTRL_PAN, VAL_PAN_CCW),
            cc(CHAN_LEFT, CTRL_RIM, VAL_PAN_CW),
        ]);
        assert_eq!(state.left_pan_ticks, 0);
    }

    #[test]
    fn ticks_reset_every_pass() {
        let mut state = ControlInputState::default();
        state.decode(&[
            cc(CHAN_RIGHT, CTRL_PAN, VAL_PAN_CW),
            cc(CHAN_RIGHT, CTRL_PAN, VAL_PAN_CW),
            cc(CHAN_LEFT, CTRL_RIM, VAL_PAN_CCW),
        ]);
        assert_eq!(state.right_pan_ticks, 2);
        assert_eq!(state.left_pan_ticks, -1);

        state.decode(&[]);
        assert_eq!(state.right_pan_ticks, 0);
        assert_eq!(state.left_pan_ticks, 0);
    }

    #[test]
    fn balances_persist_across_frames() {
        let mut state = ControlInputState::default();
        state.decode(&[
            cc(CHAN_LEFT, CTRL_BALANCE_MSB, 127),
            cc(CHAN_RIGHT, CTRL_BALANCE_MSB, 0),
            cc(CHAN_MIDDLE, CTRL_BANK_SELECT_MSB, 127),
        ]);
        state.decode(&[]);

        assert_eq!(state.left_balance, 1.0);
        assert_eq!(state.right_balance, 0.0);
        assert_eq!(state.middle_balance, 1.0);
    }

    #[test]
    fn play_and_sync_buttons() {
        let mut state = ControlInputState::default();
        let summary = state.decode(&[
            MidiEvent::NoteOn {
                channel: CHAN_LEFT,
                key: KEY_PLAY,
                velocity: 0x7F,
            },
            MidiEvent::NoteOn {
                channel: CHAN_LEFT,
                key: KEY_SYNC,
                velocity: 0x7F,
            },
        ]);
        assert!(state.hold);
        assert!(summary.sync_pressed);

        let summary = state.decode(&[MidiEvent::NoteOff {
            channel: CHAN_LEFT,
            key: KEY_PLAY,
            velocity: 0,
        }]);
        assert!(!state.hold);
        assert!(!summary.sync_pressed);
    }

    #[test]
    fn unrecognized_messages_are_ignored() {
        let mut state = ControlInputState::default();
        let before = state;
        let summary = state.decode(&[
            cc(9, CTRL_PAN, VAL_PAN_CW),             // unknown channel
            cc(CHAN_LEFT, 0x50, 10),                 // unknown controller
            cc(CHAN_LEFT, CTRL_PAN, 0x40),           // not a detent value
            cc(CHAN_MIDDLE, CTRL_BALANCE_MSB, 100),  // fader on the wrong channel
            MidiEvent::NoteOn {
                channel: CHAN_RIGHT,
                key: KEY_PLAY,
                velocity: 0x7F,
            },
            MidiEvent::PitchBend {
                channel: CHAN_LEFT,
                value: 100,
            },
        ]);

        assert_eq!(state, before);
        assert_eq!(summary.recognized, 0);
        assert_eq!(summary.ignored, 6);
    }
}
