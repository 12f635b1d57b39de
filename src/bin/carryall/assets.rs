//! Clip loading. Every clip is decoded up front; a missing or unreadable
//! file stops the program before the first frame.

use std::env;
use std::path::{Path, PathBuf};

use carryall::dsp::DecodedClip;
use carryall::vehicle::ClipSet;
use color_eyre::eyre::{Result, WrapErr};
use hound::{SampleFormat, WavReader};
use log::info;

const ASSET_ENV: &str = "CARRYALL_ASSETS";

pub fn asset_dir() -> PathBuf {
    env::var_os(ASSET_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets"))
}

pub fn load_clips(dir: &Path) -> Result<ClipSet> {
    Ok(ClipSet {
        creaking: load_wav(&dir.join("creaking.wav"))?,
        ground_alert: load_wav(&dir.join("ground_alert.wav"))?,
        stress_alert: load_wav(&dir.join("stress_alert.wav"))?,
        explosion: load_wav(&dir.join("explosion.wav"))?,
    })
}

fn load_wav(path: &Path) -> Result<DecodedClip> {
    let mut reader =
        WavReader::open(path).wrap_err_with(|| format!("failed to open {}", path.display()))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .wrap_err_with(|| format!("failed to decode {}", path.display()))?,
        SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<std::result::Result<_, _>>()
                .wrap_err_with(|| format!("failed to decode {}", path.display()))?
        }
    };

    let clip = DecodedClip::from_interleaved(
        &samples,
        usize::from(spec.channels),
        spec.sample_rate as f32,
    )
    .wrap_err_with(|| format!("invalid clip {}", path.display()))?;

    info!(
        "loaded {} ({:.2}s at {} Hz)",
        path.display(),
        clip.duration_secs(),
        spec.sample_rate
    );
    Ok(clip)
}
