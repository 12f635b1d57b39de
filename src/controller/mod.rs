//! Hardware controller mapping.
//!
//! The vehicle is flown with a two-deck DJ-style controller: each deck has a
//! jog wheel (rim and platter both send relative "pan" ticks), a play button
//! and a balance fader; the mixer section's crossfader splits power between
//! the stability jets and the main engine.
//!
//! ```text
//!     left deck   (channel 1)  jog → body rotation, fader → stability power
//!     right deck  (channel 2)  jog → engine rotation, fader → main thrust
//!     mixer       (channel 0)  crossfader → stability / main split
//! ```
//!
//! The identifiers below are fixed for the supported controller.

/// Controller message decoding into [`input::ControlInputState`].
pub mod input;
/// Status indicator messages derived from flight state.
pub mod output;

pub use input::{ControlInputState, DecodeSummary};
pub use output::StatusEncoder;

/// Left deck channel.
pub const CHAN_LEFT: u8 = 1;
/// Right deck channel.
pub const CHAN_RIGHT: u8 = 2;
/// Mixer section channel.
pub const CHAN_MIDDLE: u8 = 0;

/// Play button. Held on the left deck to spin up the engine.
pub const KEY_PLAY: u8 = 0x0B;
/// Sync button. Quick-starts the spin-up from a preset.
pub const KEY_SYNC: u8 = 0x0C;

/// Jog wheel rim.
pub const CTRL_RIM: u8 = 0x21;
/// Jog wheel platter.
pub const CTRL_PAN: u8 = 0x0A;
/// Deck fader.
pub const CTRL_BALANCE_MSB: u8 = 0x08;
/// Crossfader, sent as bank select MSB on the mixer channel.
pub const CTRL_BANK_SELECT_MSB: u8 = 0x00;

/// Relative encoder value for one counter-clockwise detent.
pub const VAL_PAN_CCW: u8 = 0x7F;
/// Relative encoder value for one clockwise detent.
pub const VAL_PAN_CW: u8 = 0x01;

/// Velocity used to switch an indicator on.
pub const LED_ON: u8 = 0x7F;
