use std::sync::Arc;

use crate::error::{Error, Result};
use crate::sid::Source;

/// Pre-decoded mono sample buffer.
///
/// Decoding compressed formats happens elsewhere, ahead of time; the engine
/// only ever sees finished `f32` samples at the clip's own sample rate.
#[derive(Debug, Clone)]
pub struct DecodedClip {
    samples: Arc<[f32]>,
    sample_rate: f32,
}

impl DecodedClip {
    pub fn from_samples(samples: Vec<f32>, sample_rate: f32) -> Result<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(Error::InvalidClip(format!("sample rate {sample_rate}")));
        }
        Ok(Self {
            samples: samples.into(),
            sample_rate,
        })
    }

    /// Downmix interleaved frames to mono.
    pub fn from_interleaved(samples: &[f32], channels: usize, sample_rate: f32) -> Result<Self> {
        if channels == 0 {
            return Err(Error::InvalidClip("zero channels".to_string()));
        }
        let mono = samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();
        Self::from_samples(mono, sample_rate)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate
    }
}

/// Streams a [`DecodedClip`], looping or one-shot.
///
/// The read cursor advances by `clip_rate / output_rate` per output sample
/// and reads with linear interpolation, so clips play at their natural pitch
/// regardless of the device rate. A one-shot clip goes silent at its end and
/// stays silent until rewound.
pub struct ClipPlayer {
    clip: DecodedClip,
    looping: bool,
    cursor: f64,
    finished: bool,
}

impl ClipPlayer {
    pub fn new(clip: DecodedClip, looping: bool) -> Self {
        let finished = clip.is_empty();
        Self {
            clip,
            looping,
            cursor: 0.0,
            finished,
        }
    }

    pub fn looping(clip: DecodedClip) -> Self {
        Self::new(clip, true)
    }

    pub fn one_shot(clip: DecodedClip) -> Self {
        Self::new(clip, false)
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Current read position in clip samples.
    pub fn position(&self) -> f64 {
        self.cursor
    }

    /// Jump to `seconds` into the clip.
    pub fn seek(&mut self, seconds: f32) {
        let len = self.clip.len() as f64;
        let target = (seconds.max(0.0) * self.clip.sample_rate) as f64;
        if self.looping && len > 0.0 {
            self.cursor = target % len;
            self.finished = false;
        } else {
            self.cursor = target.min(len);
            self.finished = target >= len;
        }
    }

    pub fn rewind(&mut self) {
        self.seek(0.0);
    }

    #[inline]
    fn read(&self) -> f32 {
        let len = self.clip.len();
        let index = self.cursor as usize;
        let frac = (self.cursor - index as f64) as f32;

        let a = self.clip.samples[index.min(len - 1)];
        let b = match index + 1 {
            next if next < len => self.clip.samples[next],
            _ if self.looping => self.clip.samples[0],
            _ => 0.0,
        };
        a + (b - a) * frac
    }
}

impl Source for ClipPlayer {
    fn generate(&mut self, volume: f32, sample_rate: f32) -> f32 {
        if self.finished {
            return 0.0;
        }

        let sample = self.read() * volume;

        let len = self.clip.len() as f64;
        self.cursor += (self.clip.sample_rate / sample_rate) as f64;
        if self.cursor >= len {
            if self.looping {
                self.cursor %= len;
            } else {
                self.cursor = len;
                self.finished = true;
            }
        }

        sample
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}
