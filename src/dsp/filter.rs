/*
One-Pole Smoother
=================

    y[n] = y[n-1] + a · (x[n] - y[n-1])

The simplest lowpass there is. With `a = 1.0` the output follows the input;
smaller coefficients trade response time for smoothness:

| coefficient | 63% rise at 44.1 kHz |
| ----------- | -------------------- |
| 1.0         | immediate            |
| 0.01        | ~100 samples (2 ms)  |
| 0.001       | ~1000 samples (23 ms)|

The mixer runs channel gains through one of these. Volumes are updated once
per simulation frame (~60 Hz), and stepping a gain 60 times a second is
audible as "zipper" noise on sustained tones like the engine drone.
*/

#[derive(Debug, Clone, Copy)]
pub struct OnePole {
    coefficient: f32,
    state: f32,
}

impl OnePole {
    /// Smoother with coefficient clamped to `[0.0, 1.0]`, starting at `initial`.
    pub fn new(coefficient: f32, initial: f32) -> Self {
        Self {
            coefficient: coefficient.clamp(0.0, 1.0),
            state: initial,
        }
    }

    #[inline]
    pub fn next_sample(&mut self, target: f32) -> f32 {
        self.state += self.coefficient * (target - self.state);
        self.state
    }

    pub fn value(&self) -> f32 {
        self.state
    }

    pub fn reset(&mut self, value: f32) {
        self.state = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_coefficient_passes_through() {
        let mut smoother = OnePole::new(1.0, 0.0);
        assert!((smoother.next_sample(0.7) - 0.7).abs() < 1e-6);
        assert!((smoother.next_sample(0.2) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn converges_monotonically() {
        let mut smoother = OnePole::new(0.01, 0.0);
        let mut last = 0.0;
        for _ in 0..2000 {
            let v = smoother.next_sample(1.0);
            assert!(v >= last && v <= 1.0);
            last = v;
        }
        assert!((last - 1.0).abs() < 1e-3);
    }
}
