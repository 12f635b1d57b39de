//! Sound sources and the small DSP primitives behind them.
//!
//! Every source here is allocation-free once constructed and keeps all of its
//! generator state (phase accumulators, noise rows, read cursors) inside the
//! struct, so the sampling thread can own it outright. The only values shared
//! with the simulation thread are single scalars behind atomics.

/// Decoded sample playback (looping and one-shot).
pub mod clip;
/// One-pole gain smoother.
pub mod filter;
/// Control-rate oscillator helpers.
pub mod lfo;
/// Voss-McCartney pink noise.
pub mod noise;
/// Additive sine oscillator with sub-octave partials.
pub mod oscillator;
/// Frequency-swept drone built on the oscillator.
pub mod vibrato;

pub use clip::{ClipPlayer, DecodedClip};
pub use filter::OnePole;
pub use noise::PinkNoise;
pub use oscillator::Oscillator;
pub use vibrato::{FrequencyHandle, Vibrato};
