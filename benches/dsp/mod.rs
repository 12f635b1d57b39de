//! Benchmarks for individual sources.

mod clip;
mod noise;
mod oscillator;

pub use clip::bench_clip;
pub use noise::bench_noise;
pub use oscillator::bench_oscillator;
