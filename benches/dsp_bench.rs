//! Benchmarks for the sound sources and the mixing loop.
//!
//! Run with: cargo bench
//!
//! Every source is pulled one sample at a time on the audio thread, so a
//! block costs `block size × per-sample cost`. Reference deadlines at 48kHz:
//!   - 64 samples  = 1.33ms
//!   - 256 samples = 5.33ms
//!   - 1024 samples = 21.3ms
//!
//! Benchmark groups:
//!   - dsp/*        Individual sources (oscillator, vibrato, noise, clip)
//!   - scenarios/*  The full carryall channel set through `SidRenderer`

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

pub const SAMPLE_RATE: f32 = 48_000.0;

criterion_group!(
    benches,
    dsp::bench_oscillator,
    dsp::bench_noise,
    dsp::bench_clip,
    scenarios::bench_mix,
);
criterion_main!(benches);
