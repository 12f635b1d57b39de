//! Low Frequency Oscillator helpers.

use std::f32::consts::TAU;

/*
Low Frequency Oscillators
=========================

An LFO is an oscillator running at control rate (well under 20 Hz). Its
output is never heard directly; it moves a parameter of something that is.

  bipolar     Output swings -1.0 to +1.0. Natural for symmetric effects.
  unipolar    Output stays in 0.0 to 1.0. Natural for "between A and B"
              sweeps, which is what the engine vibrato needs: the drone
              frequency moves between two multipliers of its base, never
              below the lower one.

    unipolar = (bipolar + 1.0) * 0.5

    bipolar   unipolar
    -1.0      0.0
     0.0      0.5
    +1.0      1.0

Typical speeds:

    0.1 - 1 Hz    slow drift, "breathing" engines
    2 - 7 Hz      classic musical vibrato
    > 15 Hz       approaching audio rate (FM/AM territory)
*/

/// Convert bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

/// Convert unipolar signal (0.0 to 1.0) to bipolar (-1.0 to +1.0).
#[inline]
pub fn unipolar_to_bipolar(unipolar: f32) -> f32 {
    (unipolar * 2.0) - 1.0
}

/// Free-running sine LFO with a wrapped phase accumulator.
#[derive(Debug, Clone, Copy)]
pub struct SineLfo {
    frequency: f32,
    phase: f32,
}

impl SineLfo {
    pub fn new(frequency: f32) -> Self {
        Self {
            frequency: frequency.max(0.0),
            phase: 0.0,
        }
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Advance one sample and return the bipolar value at the previous phase.
    #[inline]
    pub fn next_bipolar(&mut self, sample_rate: f32) -> f32 {
        let value = (TAU * self.phase).sin();
        self.phase = (self.phase + self.frequency / sample_rate).fract();
        value
    }
}
