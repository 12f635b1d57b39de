//! Benchmarks for the six-channel carryall mix.
//!
//! Measures `SidRenderer::render` with every source installed, in flight
//! (drone, whoosh and creak running, alerts paused) and with every channel
//! playing.

use std::hint::black_box;

use carryall::dsp::DecodedClip;
use carryall::sid::{Mixer, Sid, SidRenderer};
use carryall::vehicle::{carryall_channels, ClipSet, NoiseMapper};
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn clip(len: usize) -> DecodedClip {
    let samples = (0..len).map(|i| ((i % 100) as f32 / 50.0) - 1.0).collect();
    DecodedClip::from_samples(samples, 44_100.0).expect("valid clip")
}

fn engine() -> (Sid, SidRenderer, NoiseMapper) {
    let (mut sid, renderer) = Sid::new(&carryall_channels(), SAMPLE_RATE).expect("engine");
    let clips = ClipSet {
        creaking: clip(44_100),
        ground_alert: clip(22_050),
        stress_alert: clip(22_050),
        explosion: clip(88_200),
    };
    let mapper = NoiseMapper::install(&mut sid, clips).expect("install");
    (sid, renderer, mapper)
}

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/mix");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === IN FLIGHT: drone + whoosh + creak ===
        let (sid, mut renderer, mapper) = engine();
        let ch = *mapper.channels();
        sid.resume(ch.creaking);
        for id in [ch.engine, ch.engine_whoosh, ch.creaking] {
            sid.set_volume(id, 0.2);
        }
        group.bench_with_input(BenchmarkId::new("in_flight", size), &size, |b, _| {
            b.iter(|| renderer.render(black_box(&mut buffer)))
        });

        // === EVERYTHING: all six channels audible ===
        let (sid, mut renderer, mapper) = engine();
        let ch = *mapper.channels();
        for id in [
            ch.engine,
            ch.engine_whoosh,
            ch.creaking,
            ch.ground_alert,
            ch.stress_alert,
            ch.explosion,
        ] {
            sid.resume(id);
            sid.set_volume(id, 0.15);
        }
        group.bench_with_input(BenchmarkId::new("all_channels", size), &size, |b, _| {
            b.iter(|| renderer.render(black_box(&mut buffer)))
        });
    }

    group.finish();
}
