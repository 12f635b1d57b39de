//! Vehicle sound design: the channel set and the per-frame parameter mapper.
//!
//! ```text
//!     channel        source                       driven by
//!     engine         vibrato drone, 20 Hz base    speed, spin-up, throttle
//!     engineWhoosh   pink noise, 5 octaves        drag
//!     creaking       looping clip                 stress above 1.5
//!     groundAlert    looping clip                 predicted ground contact
//!     stressAlert    looping clip                 stress above 2.8
//!     explosion      one-shot clip                destruction
//! ```
//!
//! Thresholds go through [`Hysteresis`] so a stress value hovering at a
//! boundary does not restart an alert every frame.

use log::info;

use crate::dsp::{ClipPlayer, DecodedClip, FrequencyHandle, PinkNoise, Vibrato};
use crate::error::Result;
use crate::latch::{Edge, Hysteresis};
use crate::sid::{ChannelId, ChannelSpec, Mixer, Sid};
use crate::vehicle::Carryall;

pub const CHAN_ENGINE: &str = "engine";
pub const CHAN_ENGINE_WHOOSH: &str = "engineWhoosh";
pub const CHAN_CREAKING: &str = "creaking";
pub const CHAN_GROUND_ALERT: &str = "groundAlert";
pub const CHAN_STRESS_ALERT: &str = "stressAlert";
pub const CHAN_EXPLOSION: &str = "explosion";

/// Gain smoothing for channels whose volume changes every frame.
const GAIN_SMOOTHING: f32 = 0.001;

const ENGINE_BASE_HZ: f32 = 20.0;
const ENGINE_VIBRATO_LOW: f32 = 1.02;
const ENGINE_VIBRATO_HIGH: f32 = 1.05;
const ENGINE_VOLUME: f64 = 0.2;
const ENGINE_SILENT_BELOW: f64 = 0.05;
const WHOOSH_OCTAVES: usize = 5;
const WHOOSH_VOLUME: f64 = 0.02;
const WHOOSH_EXPONENT: f64 = 1.8;

const STRESS_ALERT_ON: f64 = 2.8;
const STRESS_ALERT_OFF: f64 = 2.75;
const CREAK_ON: f64 = 1.5;
const CREAK_OFF: f64 = 1.45;
const CREAK_RANGE: f64 = 2.3;

/// Ticks of velocity the ground alert looks ahead.
const GROUND_LOOKAHEAD: f64 = 3.0;
/// Minimum speed for the ground alert.
const GROUND_ALERT_SPEED: f64 = 30.0;

/// The carryall's channel set with initial volumes.
pub fn carryall_channels() -> Vec<ChannelSpec> {
    vec![
        ChannelSpec::new(CHAN_ENGINE, 0.0).smoothed(GAIN_SMOOTHING),
        ChannelSpec::new(CHAN_ENGINE_WHOOSH, 0.0).smoothed(GAIN_SMOOTHING),
        ChannelSpec::new(CHAN_CREAKING, 0.0).smoothed(GAIN_SMOOTHING),
        ChannelSpec::new(CHAN_GROUND_ALERT, 0.2),
        ChannelSpec::new(CHAN_STRESS_ALERT, 0.2),
        ChannelSpec::new(CHAN_EXPLOSION, 0.25),
    ]
}

/// Channel handles resolved once at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarryallChannels {
    pub engine: ChannelId,
    pub engine_whoosh: ChannelId,
    pub creaking: ChannelId,
    pub ground_alert: ChannelId,
    pub stress_alert: ChannelId,
    pub explosion: ChannelId,
}

impl CarryallChannels {
    pub fn resolve(sid: &Sid) -> Result<Self> {
        Ok(Self {
            engine: sid.channel_id(CHAN_ENGINE)?,
            engine_whoosh: sid.channel_id(CHAN_ENGINE_WHOOSH)?,
            creaking: sid.channel_id(CHAN_CREAKING)?,
            ground_alert: sid.channel_id(CHAN_GROUND_ALERT)?,
            stress_alert: sid.channel_id(CHAN_STRESS_ALERT)?,
            explosion: sid.channel_id(CHAN_EXPLOSION)?,
        })
    }

    /// Everything but the explosion.
    fn flight(&self) -> [ChannelId; 5] {
        [
            self.engine,
            self.engine_whoosh,
            self.creaking,
            self.ground_alert,
            self.stress_alert,
        ]
    }
}

/// Decoded clips for the sample-based channels.
pub struct ClipSet {
    pub creaking: DecodedClip,
    pub ground_alert: DecodedClip,
    pub stress_alert: DecodedClip,
    pub explosion: DecodedClip,
}

/// Translates vehicle state into mixer operations once per frame.
#[derive(Debug)]
pub struct NoiseMapper {
    channels: CarryallChannels,
    engine_frequency: FrequencyHandle,
    stress_alert: Hysteresis,
    creak: Hysteresis,
    destruction_handled: bool,
}

impl NoiseMapper {
    /// Install the vehicle's sources on `sid` and return a mapper driving them.
    ///
    /// Alert and explosion channels start paused.
    pub fn install(sid: &mut Sid, clips: ClipSet) -> Result<Self> {
        let channels = CarryallChannels::resolve(sid)?;

        let drone = Vibrato::new(ENGINE_BASE_HZ, ENGINE_VIBRATO_LOW, ENGINE_VIBRATO_HIGH);
        let engine_frequency = drone.frequency_handle();
        sid.set_source(channels.engine, drone)?;
        sid.set_source(channels.engine_whoosh, PinkNoise::new(WHOOSH_OCTAVES))?;
        sid.set_source(channels.creaking, ClipPlayer::looping(clips.creaking))?;
        sid.set_source(channels.ground_alert, ClipPlayer::looping(clips.ground_alert))?;
        sid.set_source(channels.stress_alert, ClipPlayer::looping(clips.stress_alert))?;
        sid.set_source(channels.explosion, ClipPlayer::one_shot(clips.explosion))?;

        for id in [
            channels.creaking,
            channels.ground_alert,
            channels.stress_alert,
            channels.explosion,
        ] {
            sid.pause(id);
        }

        Ok(Self::new(channels, engine_frequency))
    }

    pub fn new(channels: CarryallChannels, engine_frequency: FrequencyHandle) -> Self {
        Self {
            channels,
            engine_frequency,
            stress_alert: Hysteresis::new(STRESS_ALERT_ON, STRESS_ALERT_OFF),
            creak: Hysteresis::new(CREAK_ON, CREAK_OFF),
            destruction_handled: false,
        }
    }

    pub fn channels(&self) -> &CarryallChannels {
        &self.channels
    }

    pub fn destruction_handled(&self) -> bool {
        self.destruction_handled
    }

    pub fn make_noise(&mut self, vehicle: &Carryall, mixer: &impl Mixer) {
        if self.destruction_handled {
            return;
        }
        let ch = self.channels;

        if vehicle.is_destroying() {
            for id in ch.flight() {
                mixer.pause(id);
            }
            mixer.resume(ch.explosion);
            self.destruction_handled = true;
            info!("vehicle destroyed, explosion audio started");
            return;
        }

        let stress = vehicle.acceleration_stress();
        match self.stress_alert.update(stress) {
            Some(Edge::Rose) => mixer.resume(ch.stress_alert),
            Some(Edge::Fell) => mixer.pause(ch.stress_alert),
            None => {}
        }

        let velocity = vehicle.velocity();
        let projected = vehicle.position() + velocity * GROUND_LOOKAHEAD;
        if projected.y < vehicle.tunables().ground_level && velocity.length() > GROUND_ALERT_SPEED
        {
            if mixer.is_paused(ch.ground_alert) {
                mixer.resume(ch.ground_alert);
            }
        } else if !mixer.is_paused(ch.ground_alert) {
            mixer.pause(ch.ground_alert);
        }

        match self.creak.update(stress) {
            Some(Edge::Rose) => mixer.resume(ch.creaking),
            Some(Edge::Fell) => mixer.pause(ch.creaking),
            None => {}
        }
        if self.creak.is_active() {
            mixer.set_volume(ch.creaking, creak_volume(stress) as f32);
        }

        let drag = vehicle.current_drag().length().min(1.0);
        mixer.set_volume(
            ch.engine_whoosh,
            (WHOOSH_VOLUME * drag.powf(WHOOSH_EXPONENT)) as f32,
        );

        let spin_up = vehicle.spin_up().level();
        self.engine_frequency
            .set((vehicle.velocity().length().sqrt() + spin_up * 10.0 + 5.0) as f32);
        mixer.set_volume(
            ch.engine,
            engine_volume(vehicle.controls().hold, spin_up, vehicle.throttle()) as f32,
        );
    }
}

fn creak_volume(stress: f64) -> f64 {
    ((stress - CREAK_ON) / CREAK_RANGE).clamp(0.0, 1.0).sqrt() * 0.25 + 0.05
}

fn engine_volume(held: bool, spin_up: f64, throttle: f64) -> f64 {
    if spin_up < ENGINE_SILENT_BELOW {
        0.0
    } else if held {
        (throttle * 0.75 + 0.5).min(1.0) * ENGINE_VOLUME
    } else {
        (throttle * 0.75 + 0.25) * ENGINE_VOLUME
    }
}
