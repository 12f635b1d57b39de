use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::dsp::lfo::{bipolar_to_unipolar, SineLfo};
use crate::dsp::oscillator::Oscillator;
use crate::sid::Source;

/*
Vibrato Drone
=============

The engine drone is an additive oscillator whose frequency is swept slowly
between two multipliers of a settable base:

    f(t) = base · (low + (high - low) · unipolar(lfo(t)))

With the engine defaults (base 20 Hz, multipliers 1.02 .. 1.05, LFO at
0.75 Hz) the pitch wobbles by a few percent, so the thrust-driven pitch
changes coming from the simulation blend into a continuously moving tone
instead of stepping once per frame.

Cross-thread control
--------------------

The simulation thread retunes the base frequency every frame while the
sampling thread reads it every sample. The base lives in a
`FrequencyHandle`: an `f32` stored as bits in an `AtomicU32`. Reads and
writes are single relaxed atomic operations, so neither side ever waits on
the other.
*/

/// Default partial count for the drone.
pub const VIBRATO_ALIQUOTS: usize = 3;
/// Default LFO speed in Hz.
pub const VIBRATO_RATE: f32 = 0.75;

/// Shared, lock-free target frequency.
#[derive(Debug, Clone)]
pub struct FrequencyHandle {
    bits: Arc<AtomicU32>,
}

impl FrequencyHandle {
    pub fn new(frequency: f32) -> Self {
        Self {
            bits: Arc::new(AtomicU32::new(frequency.max(0.0).to_bits())),
        }
    }

    pub fn set(&self, frequency: f32) {
        self.bits
            .store(frequency.max(0.0).to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

pub struct Vibrato {
    osc: Oscillator,
    lfo: SineLfo,
    base: FrequencyHandle,
    low: f32,
    high: f32,
}

impl Vibrato {
    /// Drone at `base` Hz swept between `low` and `high` multipliers.
    pub fn new(base: f32, low: f32, high: f32) -> Self {
        Self::with_shape(base, low, high, VIBRATO_ALIQUOTS, VIBRATO_RATE)
    }

    pub fn with_shape(base: f32, low: f32, high: f32, aliquots: usize, rate: f32) -> Self {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        Self {
            osc: Oscillator::new(base * low, aliquots),
            lfo: SineLfo::new(rate),
            base: FrequencyHandle::new(base),
            low,
            high,
        }
    }

    /// Handle for retuning the base frequency from another thread.
    pub fn frequency_handle(&self) -> FrequencyHandle {
        self.base.clone()
    }

    pub fn set_frequency(&self, frequency: f32) {
        self.base.set(frequency);
    }

    /// Frequency the drone oscillator ran at for the last sample.
    pub fn current_frequency(&self) -> f32 {
        self.osc.frequency()
    }

    pub fn oscillator(&self) -> &Oscillator {
        &self.osc
    }
}

impl Source for Vibrato {
    fn generate(&mut self, volume: f32, sample_rate: f32) -> f32 {
        let sweep = bipolar_to_unipolar(self.lfo.next_bipolar(sample_rate));
        let multiplier = self.low + (self.high - self.low) * sweep;
        self.osc.set_frequency(self.base.get() * multiplier);
        self.osc.next_sample(volume, sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_stays_between_multipliers() {
        let mut vib = Vibrato::with_shape(20.0, 1.02, 1.05, 3, 5.0);
        for _ in 0..44_100 {
            vib.generate(1.0, 44_100.0);
            let f = vib.current_frequency();
            assert!(
                (20.0 * 1.02 - 1e-3..=20.0 * 1.05 + 1e-3).contains(&f),
                "frequency {f} left the sweep range"
            );
        }
    }

    #[test]
    fn handle_retunes_running_source() {
        let mut vib = Vibrato::new(20.0, 1.0, 1.0);
        let handle = vib.frequency_handle();

        vib.generate(1.0, 44_100.0);
        assert!((vib.current_frequency() - 20.0).abs() < 1e-6);

        handle.set(42.0);
        vib.generate(1.0, 44_100.0);
        assert!((vib.current_frequency() - 42.0).abs() < 1e-6);
    }

    #[test]
    fn multipliers_are_ordered() {
        let mut vib = Vibrato::with_shape(100.0, 1.5, 1.0, 1, 1.0);
        vib.generate(1.0, 1000.0);
        let f = vib.current_frequency();
        assert!((100.0..=150.0).contains(&f));
    }

    #[test]
    fn negative_frequencies_clamp_to_zero() {
        let handle = FrequencyHandle::new(-3.0);
        assert_eq!(handle.get(), 0.0);
        handle.set(-1.0);
        assert_eq!(handle.get(), 0.0);
    }
}
