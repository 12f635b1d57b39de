use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::sid::Source;

/*
Pink Noise (Voss-McCartney)
===========================

White noise has equal energy per Hz and sounds like hiss. Wind and airflow
sit closer to pink noise, whose energy falls off at 3 dB per octave (1/f).

The Voss-McCartney construction sums several white-noise "rows", each one
refreshed half as often as the previous:

    sample   0 1 2 3 4 5 6 7 8 ...
    row 0    x x x x x x x x x      every sample
    row 1    x   x   x   x   x      every 2nd sample
    row 2    x       x       x      every 4th sample
    row 3    x               x      every 8th sample

Which row to refresh is read off a running counter: the number of trailing
zeros of the counter picks the row, so exactly one row changes per sample
and the running sum can be updated incrementally.

The mean of the rows stays in [-1, 1]; the channel volume scales it.
*/

/// Highest supported number of rows.
pub const MAX_OCTAVES: usize = 16;

pub struct PinkNoise {
    rows: [f32; MAX_OCTAVES],
    octaves: usize,
    running_sum: f32,
    counter: u32,
    rng: SmallRng,
}

impl PinkNoise {
    pub fn new(octaves: usize) -> Self {
        Self::with_seed(octaves, rand::random())
    }

    /// Deterministic generator, for tests and offline renders.
    pub fn with_seed(octaves: usize, seed: u64) -> Self {
        let octaves = octaves.clamp(1, MAX_OCTAVES);
        let mut rng = SmallRng::seed_from_u64(seed);

        let mut rows = [0.0; MAX_OCTAVES];
        for row in rows.iter_mut().take(octaves) {
            *row = rng.random_range(-1.0..=1.0);
        }
        let running_sum = rows.iter().take(octaves).sum();

        Self {
            rows,
            octaves,
            running_sum,
            counter: 0,
            rng,
        }
    }

    pub fn octaves(&self) -> usize {
        self.octaves
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        self.counter = self.counter.wrapping_add(1);
        let row = (self.counter.trailing_zeros() as usize).min(self.octaves - 1);

        let fresh: f32 = self.rng.random_range(-1.0..=1.0);
        self.running_sum += fresh - self.rows[row];
        self.rows[row] = fresh;

        (self.running_sum / self.octaves as f32).clamp(-1.0, 1.0)
    }
}

impl Source for PinkNoise {
    fn generate(&mut self, volume: f32, _sample_rate: f32) -> f32 {
        self.next_sample() * volume
    }
}
