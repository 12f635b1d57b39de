//! Multi-channel mixing engine.
//!
//! The engine is split in two halves that live on different threads:
//!
//! - [`Sid`] stays with the simulation. It registers channels, swaps sources
//!   and exposes pause/resume/volume setters through the [`Mixer`] trait.
//! - [`SidRenderer`] moves into the audio callback. It owns every source
//!   outright and pulls one sample per channel per output tick.
//!
//! Nothing the two halves share is ever locked. Pause flags and volumes are
//! per-channel atomics; sources travel from `Sid` to the renderer over a
//! lock-free ring and replaced sources travel back over a second ring, so the
//! sampling thread neither blocks nor frees memory.

mod channel;

pub use channel::{ChannelId, ChannelSpec};

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::error::{Error, Result};
use channel::{ChannelControl, ChannelVoice};

/// Capacity of the source hand-over rings.
const SOURCE_QUEUE_CAPACITY: usize = 64;

/// Anything that produces one sample at a time.
///
/// `generate` runs on the sampling thread once per output tick. It must not
/// block, allocate, or perform I/O.
pub trait Source: Send {
    fn generate(&mut self, volume: f32, sample_rate: f32) -> f32;

    /// True once the source will only ever produce silence (one-shot clips).
    fn is_finished(&self) -> bool {
        false
    }
}

/// Allow boxed sources to be used as sources (for dynamic dispatch)
impl Source for Box<dyn Source> {
    fn generate(&mut self, volume: f32, sample_rate: f32) -> f32 {
        (**self).generate(volume, sample_rate)
    }

    fn is_finished(&self) -> bool {
        (**self).is_finished()
    }
}

/// Channel operations used by the simulation side.
///
/// All methods take `&self` and are safe to call while the renderer runs.
pub trait Mixer {
    fn set_volume(&self, channel: ChannelId, volume: f32);
    fn pause(&self, channel: ChannelId);
    fn resume(&self, channel: ChannelId);
    fn is_paused(&self, channel: ChannelId) -> bool;
}

struct Shared {
    channels: Vec<ChannelControl>,
    running: AtomicBool,
    /// Sources the renderer had to drop because the retirement ring was full.
    overflowed: AtomicUsize,
}

struct SourceSwap {
    channel: ChannelId,
    source: Box<dyn Source>,
}

/// Simulation-side handle of the mixing engine.
pub struct Sid {
    shared: Arc<Shared>,
    swaps: Producer<SourceSwap>,
    retired: Consumer<Box<dyn Source>>,
}

impl Sid {
    /// Register `specs` and return the control handle plus the renderer to
    /// hand to the audio device.
    pub fn new(specs: &[ChannelSpec], sample_rate: f32) -> Result<(Sid, SidRenderer)> {
        for (i, spec) in specs.iter().enumerate() {
            if specs[..i].iter().any(|other| other.name == spec.name) {
                return Err(Error::DuplicateChannel(spec.name.clone()));
            }
            debug!("registered channel `{}` at volume {}", spec.name, spec.volume);
        }

        let shared = Arc::new(Shared {
            channels: specs.iter().map(ChannelControl::new).collect(),
            running: AtomicBool::new(true),
            overflowed: AtomicUsize::new(0),
        });
        let (swap_tx, swap_rx) = RingBuffer::new(SOURCE_QUEUE_CAPACITY);
        let (retired_tx, retired_rx) = RingBuffer::new(SOURCE_QUEUE_CAPACITY);

        let sid = Sid {
            shared: Arc::clone(&shared),
            swaps: swap_tx,
            retired: retired_rx,
        };
        let renderer = SidRenderer {
            shared,
            voices: specs.iter().map(ChannelVoice::new).collect(),
            swaps: swap_rx,
            retired: retired_tx,
            sample_rate,
            tap: None,
            released: false,
        };
        Ok((sid, renderer))
    }

    /// Resolve a channel name registered at construction.
    pub fn channel_id(&self, name: &str) -> Result<ChannelId> {
        self.shared
            .channels
            .iter()
            .position(|c| c.name() == name)
            .map(ChannelId)
            .ok_or_else(|| Error::UnknownChannel(name.to_string()))
    }

    pub fn channel_name(&self, channel: ChannelId) -> Option<&str> {
        self.shared.channels.get(channel.0).map(|c| c.name())
    }

    pub fn channel_count(&self) -> usize {
        self.shared.channels.len()
    }

    pub fn volume(&self, channel: ChannelId) -> f32 {
        self.shared
            .channels
            .get(channel.0)
            .map_or(0.0, |c| c.volume())
    }

    /// Replace the source playing on `channel`.
    ///
    /// The swap takes effect on the renderer's next sample; the previous
    /// source comes back through [`Sid::collect_retired`].
    pub fn set_source(&mut self, channel: ChannelId, source: impl Source + 'static) -> Result<()> {
        self.collect_retired();

        let name = self
            .channel_name(channel)
            .ok_or_else(|| Error::UnknownChannel(format!("#{}", channel.0)))?
            .to_string();

        self.swaps
            .push(SourceSwap {
                channel,
                source: Box::new(source),
            })
            .map_err(|_| Error::SourceQueueFull(name.clone()))?;

        debug!("queued new source for channel `{name}`");
        Ok(())
    }

    /// Drop sources the renderer has handed back. Returns how many.
    pub fn collect_retired(&mut self) -> usize {
        let mut count = 0;
        while self.retired.pop().is_ok() {
            count += 1;
        }
        if self.retired.is_abandoned() && count > 0 {
            debug!("collected {count} sources after renderer shutdown");
        }
        let overflowed = self.shared.overflowed.swap(0, Ordering::Relaxed);
        if overflowed > 0 {
            warn!("retirement queue full, {overflowed} sources dropped on the audio thread");
        }
        count
    }

    /// Stop the sampling side. The renderer releases every source and emits
    /// silence from its next block on.
    pub fn close(&self) {
        if self.shared.running.swap(false, Ordering::AcqRel) {
            info!("mixing engine shut down");
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }
}

impl Mixer for Sid {
    fn set_volume(&self, channel: ChannelId, volume: f32) {
        if let Some(c) = self.shared.channels.get(channel.0) {
            c.set_volume(volume);
        }
    }

    fn pause(&self, channel: ChannelId) {
        if let Some(c) = self.shared.channels.get(channel.0) {
            c.set_paused(true);
        }
    }

    fn resume(&self, channel: ChannelId) {
        if let Some(c) = self.shared.channels.get(channel.0) {
            c.set_paused(false);
        }
    }

    fn is_paused(&self, channel: ChannelId) -> bool {
        self.shared
            .channels
            .get(channel.0)
            .map_or(true, |c| c.is_paused())
    }
}

impl Drop for Sid {
    fn drop(&mut self) {
        self.close();
    }
}

/// Sampling-side half of the mixing engine.
pub struct SidRenderer {
    shared: Arc<Shared>,
    voices: Vec<ChannelVoice>,
    swaps: Consumer<SourceSwap>,
    retired: Producer<Box<dyn Source>>,
    sample_rate: f32,
    tap: Option<Producer<f32>>,
    released: bool,
}

impl SidRenderer {
    /// Forward every mixed sample to `tap`; samples are dropped while it is full.
    pub fn with_tap(mut self, tap: Producer<f32>) -> Self {
        self.tap = Some(tap);
        self
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate.is_finite() && sample_rate > 0.0 {
            self.sample_rate = sample_rate;
        } else {
            warn!("ignoring invalid sample rate {sample_rate}");
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Mix one block of mono output.
    pub fn render(&mut self, out: &mut [f32]) {
        if !self.is_running() {
            self.release_sources();
            out.fill(0.0);
            return;
        }

        for sample in out.iter_mut() {
            *sample = self.next_frame();
        }
    }

    /// Mix a single output sample.
    #[inline]
    pub fn next_frame(&mut self) -> f32 {
        self.apply_swaps();

        let mut mix = 0.0;
        for (voice, control) in self.voices.iter_mut().zip(&self.shared.channels) {
            mix += voice.next_sample(control, self.sample_rate);
        }
        let mix = mix.clamp(-1.0, 1.0);

        if let Some(tap) = self.tap.as_mut() {
            let _ = tap.push(mix);
        }
        mix
    }

    fn apply_swaps(&mut self) {
        while let Ok(SourceSwap { channel, source }) = self.swaps.pop() {
            let Some(voice) = self.voices.get_mut(channel.0) else {
                self.retire(source);
                continue;
            };
            if let Some(previous) = voice.source.replace(source) {
                self.retire(previous);
            }
        }
    }

    fn retire(&mut self, source: Box<dyn Source>) {
        // A full ring means the simulation stopped collecting.
        if self.retired.push(source).is_err() {
            self.shared.overflowed.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn release_sources(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        while let Ok(swap) = self.swaps.pop() {
            self.retire(swap.source);
        }
        for i in 0..self.voices.len() {
            if let Some(source) = self.voices[i].source.take() {
                self.retire(source);
            }
        }
    }
}
