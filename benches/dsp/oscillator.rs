//! Benchmarks for the additive oscillator and the vibrato drone.

use std::hint::black_box;

use carryall::dsp::{Oscillator, Vibrato};
use carryall::sid::Source;
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn fill(source: &mut impl Source, buffer: &mut [f32]) {
    for sample in buffer.iter_mut() {
        *sample = source.generate(0.5, SAMPLE_RATE);
    }
}

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Partial count sets the number of sin() calls per sample
        for aliquots in [1, 3, 8] {
            let mut osc = Oscillator::new(110.0, aliquots);
            group.bench_with_input(
                BenchmarkId::new(format!("aliquots_{aliquots}"), size),
                &size,
                |b, _| b.iter(|| fill(&mut osc, black_box(&mut buffer))),
            );
        }

        // Drone: oscillator plus LFO sweep and an atomic frequency load
        let mut drone = Vibrato::new(20.0, 1.02, 1.05);
        group.bench_with_input(BenchmarkId::new("vibrato", size), &size, |b, _| {
            b.iter(|| fill(&mut drone, black_box(&mut buffer)))
        });
    }

    group.finish();
}
