//! Benchmarks for clip playback.

use std::hint::black_box;

use carryall::dsp::{ClipPlayer, DecodedClip};
use carryall::sid::Source;
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn test_clip(rate: f32) -> DecodedClip {
    let samples = (0..rate as usize)
        .map(|i| (i as f32 * 0.01).sin())
        .collect();
    DecodedClip::from_samples(samples, rate).expect("valid clip")
}

pub fn bench_clip(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/clip");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Matching rates: integer cursor steps
        let mut player = ClipPlayer::looping(test_clip(SAMPLE_RATE));
        group.bench_with_input(BenchmarkId::new("native_rate", size), &size, |b, _| {
            b.iter(|| {
                for sample in black_box(&mut buffer).iter_mut() {
                    *sample = player.generate(1.0, SAMPLE_RATE);
                }
            })
        });

        // 44.1k clip on a 48k device: interpolated reads
        let mut player = ClipPlayer::looping(test_clip(44_100.0));
        group.bench_with_input(BenchmarkId::new("resampled", size), &size, |b, _| {
            b.iter(|| {
                for sample in black_box(&mut buffer).iter_mut() {
                    *sample = player.generate(1.0, SAMPLE_RATE);
                }
            })
        });
    }

    group.finish();
}
