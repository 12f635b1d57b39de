//! Benchmarks for pink noise.

use std::hint::black_box;

use carryall::dsp::PinkNoise;
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/noise");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for octaves in [5, 16] {
            let mut noise = PinkNoise::with_seed(octaves, 1);
            group.bench_with_input(
                BenchmarkId::new(format!("octaves_{octaves}"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        for sample in black_box(&mut buffer).iter_mut() {
                            *sample = noise.next_sample();
                        }
                    })
                },
            );
        }
    }

    group.finish();
}
