use std::f32::consts::TAU;

use crate::sid::Source;

/*
Additive Sine Oscillator
========================

The engine drone is not a pure sine. A single sine at 20-40 Hz is barely
audible on small speakers, so the oscillator stacks a handful of partials
below the base frequency ("aliquots"), each one an octave under the last:

    partial   harmonic index   frequency
    0         1                f
    1         2                f / 2
    2         4                f / 4
    ...       ...              ...
    n-1       2^(n-1)          f / 2^(n-1)

Every partial keeps its own phase accumulator. The accumulator advances by
(partial frequency / sample rate) per sample and is wrapped back into [0, 1)
with `fract()` rather than clamped. Letting the phase grow without bound
would slowly eat the mantissa: at 44.1 kHz an f32 phase loses sub-sample
resolution within minutes.

Amplitude
---------

    sample = Σ sin(2π · phase_k) · volume / 2 / n

The output is split evenly across the n partials and halved, so the
summed signal stays inside ±volume/2 even when all partials peak together.
*/

/// Highest supported number of partials.
pub const MAX_ALIQUOTS: usize = 8;

pub struct Oscillator {
    frequency: f32,
    aliquots: usize,
    phases: [f32; MAX_ALIQUOTS],
}

impl Oscillator {
    /// Oscillator at `frequency` Hz with `aliquots` partials (clamped to
    /// `1..=MAX_ALIQUOTS`).
    pub fn new(frequency: f32, aliquots: usize) -> Self {
        Self {
            frequency: frequency.max(0.0),
            aliquots: aliquots.clamp(1, MAX_ALIQUOTS),
            phases: [0.0; MAX_ALIQUOTS],
        }
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency.max(0.0);
    }

    pub fn aliquots(&self) -> usize {
        self.aliquots
    }

    /// Phase accumulators of the active partials, each in `[0, 1)`.
    pub fn phases(&self) -> &[f32] {
        &self.phases[..self.aliquots]
    }

    pub fn reset(&mut self) {
        self.phases = [0.0; MAX_ALIQUOTS];
    }

    #[inline]
    pub fn next_sample(&mut self, volume: f32, sample_rate: f32) -> f32 {
        let amplitude = volume / 2.0 / self.aliquots as f32;
        let mut sample = 0.0;

        for (k, phase) in self.phases[..self.aliquots].iter_mut().enumerate() {
            sample += (TAU * *phase).sin() * amplitude;

            let harmonic = (1u32 << k) as f32;
            let increment = self.frequency / harmonic / sample_rate;
            *phase = (*phase + increment).fract();
        }

        sample
    }
}

impl Source for Oscillator {
    fn generate(&mut self, volume: f32, sample_rate: f32) -> f32 {
        self.next_sample(volume, sample_rate)
    }
}
