use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::filter::OnePole;
use crate::sid::Source;

/// Handle to a registered channel, resolved once from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(pub(crate) usize);

impl ChannelId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Static description of a channel, fixed when the engine is created.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSpec {
    pub name: String,
    /// Initial volume in `[0.0, 1.0]`.
    pub volume: f32,
    /// One-pole coefficient applied to gain changes, if any.
    pub smoothing: Option<f32>,
}

impl ChannelSpec {
    pub fn new(name: impl Into<String>, volume: f32) -> Self {
        Self {
            name: name.into(),
            volume,
            smoothing: None,
        }
    }

    pub fn smoothed(mut self, coefficient: f32) -> Self {
        self.smoothing = Some(coefficient);
        self
    }
}

/// Control block shared between the simulation and sampling threads.
///
/// Each field is a single atomic; a setter is one store and the sampling
/// side reads each field once per sample.
#[derive(Debug)]
pub(crate) struct ChannelControl {
    name: String,
    paused: AtomicBool,
    volume: AtomicU32,
}

impl ChannelControl {
    pub(crate) fn new(spec: &ChannelSpec) -> Self {
        Self {
            name: spec.name.clone(),
            paused: AtomicBool::new(false),
            volume: AtomicU32::new(spec.volume.clamp(0.0, 1.0).to_bits()),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Relaxed);
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    pub(crate) fn set_volume(&self, volume: f32) {
        let volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.volume.store(volume.to_bits(), Ordering::Relaxed);
    }

    pub(crate) fn volume(&self) -> f32 {
        f32::from_bits(self.volume.load(Ordering::Relaxed))
    }
}

/// Sampling-side half of a channel: the active source and its gain smoother.
pub(crate) struct ChannelVoice {
    pub(crate) source: Option<Box<dyn Source>>,
    gain: Option<OnePole>,
}

impl ChannelVoice {
    pub(crate) fn new(spec: &ChannelSpec) -> Self {
        Self {
            source: None,
            gain: spec
                .smoothing
                .map(|c| OnePole::new(c, spec.volume.clamp(0.0, 1.0))),
        }
    }

    #[inline]
    pub(crate) fn next_sample(&mut self, control: &ChannelControl, sample_rate: f32) -> f32 {
        if control.is_paused() {
            return 0.0;
        }
        let Some(source) = self.source.as_mut() else {
            return 0.0;
        };

        let target = control.volume();
        let volume = match self.gain.as_mut() {
            Some(smoother) => smoother.next_sample(target),
            None => target,
        };
        source.generate(volume, sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dc;

    impl Source for Dc {
        fn generate(&mut self, volume: f32, _sample_rate: f32) -> f32 {
            volume
        }
    }

    #[test]
    fn volume_is_clamped_and_sanitized() {
        let control = ChannelControl::new(&ChannelSpec::new("x", 2.0));
        assert_eq!(control.volume(), 1.0);

        control.set_volume(-0.5);
        assert_eq!(control.volume(), 0.0);

        control.set_volume(f32::NAN);
        assert_eq!(control.volume(), 0.0);

        control.set_volume(0.3);
        assert_eq!(control.volume(), 0.3);
    }

    #[test]
    fn smoothed_voice_glides_to_new_volume() {
        let spec = ChannelSpec::new("x", 0.0).smoothed(0.5);
        let control = ChannelControl::new(&spec);
        let mut voice = ChannelVoice::new(&spec);
        voice.source = Some(Box::new(Dc));

        control.set_volume(1.0);
        let a = voice.next_sample(&control, 44_100.0);
        let b = voice.next_sample(&control, 44_100.0);
        assert_eq!(a, 0.5);
        assert_eq!(b, 0.75);
    }

    #[test]
    fn paused_voice_is_silent() {
        let spec = ChannelSpec::new("x", 1.0);
        let control = ChannelControl::new(&spec);
        let mut voice = ChannelVoice::new(&spec);
        voice.source = Some(Box::new(Dc));

        control.set_paused(true);
        assert_eq!(voice.next_sample(&control, 44_100.0), 0.0);
        control.set_paused(false);
        assert_eq!(voice.next_sample(&control, 44_100.0), 1.0);
    }
}
