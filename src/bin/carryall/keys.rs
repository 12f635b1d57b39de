//! Keyboard stand-in for the DJ controller.
//!
//! ```text
//!     space      toggle the play button (hold)
//!     y          sync button
//!     a / d      left jog wheel, one detent each way
//!     j / l      right jog wheel
//!     w / s      left fader up/down
//!     i / k      right fader up/down
//!     u / o      crossfader toward stability / main
//!     arrows     debug nudges
//! ```
//!
//! Terminals report key presses, not key state, so the play button toggles
//! and nudges last one frame.

use carryall::controller::{
    CHAN_LEFT, CHAN_MIDDLE, CHAN_RIGHT, CTRL_BALANCE_MSB, CTRL_BANK_SELECT_MSB, CTRL_PAN,
    KEY_PLAY, KEY_SYNC, LED_ON, VAL_PAN_CCW, VAL_PAN_CW,
};
use carryall::io::MidiEvent;
use carryall::vehicle::Nudge;
use crossterm::event::KeyCode;

/// Fader travel per key press, in 7-bit steps.
const FADER_STEP: u8 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Handled,
    Quit,
    Ignored,
}

/// Accumulates one frame of controller messages from key presses.
pub struct KeyBridge {
    hold: bool,
    left: u8,
    right: u8,
    middle: u8,
    pending: Vec<MidiEvent>,
    nudge: Nudge,
}

impl KeyBridge {
    pub fn new() -> Self {
        Self {
            hold: false,
            left: 0,
            right: 64,
            middle: 64,
            pending: Vec::new(),
            nudge: Nudge::default(),
        }
    }

    pub fn handle(&mut self, key: KeyCode) -> KeyAction {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return KeyAction::Quit,

            KeyCode::Char(' ') => {
                self.hold = !self.hold;
                let event = if self.hold {
                    MidiEvent::NoteOn {
                        channel: CHAN_LEFT,
                        key: KEY_PLAY,
                        velocity: LED_ON,
                    }
                } else {
                    MidiEvent::NoteOff {
                        channel: CHAN_LEFT,
                        key: KEY_PLAY,
                        velocity: 0,
                    }
                };
                self.pending.push(event);
            }
            KeyCode::Char('y') => self.pending.push(MidiEvent::NoteOn {
                channel: CHAN_LEFT,
                key: KEY_SYNC,
                velocity: LED_ON,
            }),

            KeyCode::Char('a') => self.pan(CHAN_LEFT, VAL_PAN_CCW),
            KeyCode::Char('d') => self.pan(CHAN_LEFT, VAL_PAN_CW),
            KeyCode::Char('j') => self.pan(CHAN_RIGHT, VAL_PAN_CCW),
            KeyCode::Char('l') => self.pan(CHAN_RIGHT, VAL_PAN_CW),

            KeyCode::Char('w') => self.fader(Fader::Left, true),
            KeyCode::Char('s') => self.fader(Fader::Left, false),
            KeyCode::Char('i') => self.fader(Fader::Right, true),
            KeyCode::Char('k') => self.fader(Fader::Right, false),
            KeyCode::Char('o') => self.fader(Fader::Middle, true),
            KeyCode::Char('u') => self.fader(Fader::Middle, false),

            KeyCode::Left => self.nudge.left = true,
            KeyCode::Right => self.nudge.right = true,
            KeyCode::Up => self.nudge.up = true,
            KeyCode::Down => self.nudge.down = true,

            _ => return KeyAction::Ignored,
        }
        KeyAction::Handled
    }

    /// Take this frame's messages and nudges.
    pub fn drain(&mut self) -> (Vec<MidiEvent>, Nudge) {
        (
            std::mem::take(&mut self.pending),
            std::mem::take(&mut self.nudge),
        )
    }

    pub fn hold(&self) -> bool {
        self.hold
    }

    fn pan(&mut self, channel: u8, value: u8) {
        self.pending.push(MidiEvent::ControlChange {
            channel,
            controller: CTRL_PAN,
            value,
        });
    }

    fn fader(&mut self, fader: Fader, up: bool) {
        let (channel, controller, position) = match fader {
            Fader::Left => (CHAN_LEFT, CTRL_BALANCE_MSB, &mut self.left),
            Fader::Right => (CHAN_RIGHT, CTRL_BALANCE_MSB, &mut self.right),
            Fader::Middle => (CHAN_MIDDLE, CTRL_BANK_SELECT_MSB, &mut self.middle),
        };
        *position = if up {
            position.saturating_add(FADER_STEP).min(127)
        } else {
            position.saturating_sub(FADER_STEP)
        };
        self.pending.push(MidiEvent::ControlChange {
            channel,
            controller,
            value: *position,
        });
    }
}

enum Fader {
    Left,
    Right,
    Middle,
}
