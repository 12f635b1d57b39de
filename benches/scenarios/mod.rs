//! Benchmarks for the mixing engine with the vehicle's channel set.

mod mix;

pub use mix::bench_mix;
