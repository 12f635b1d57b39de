/*
Carryall flight model

A carryall is a single rigid body with two thrusters:

    stability jets   fixed to the body, push along the body's up axis
    main engine      on a swivel, its own rotation relative to the body

                ^ stability
                |
           [==body==]  ->  main (rotated by body, then by swivel)

Each tick:

    spin-up     ramps toward 1.0 while the play control is held
    rotations   integrate jog-wheel ticks, clamped to their limits
    pressure    falls linearly with altitude, scales every force
    thrust      faders split power between stability and main
    integrate   v += drag + stability + main + gravity; p += v * factor
    ground      bounce, or crash if the body is tilted past the upset angle
    overstress  crash when the velocity change per tick is too large

The integration step is a fixed factor, not the frame's wall-clock time, so
a run replays identically for the same input sequence. Once a crash puts
the vehicle into `Destroying`, every mutating operation is a no-op and only
the explosion animation advances.
*/

pub mod audio;
mod draw;
mod spin_up;
mod tunables;

pub use audio::{carryall_channels, CarryallChannels, ClipSet, NoiseMapper};
pub use draw::{DrawCommand, JetDirection, EXPLOSION_FRAMES, EXPLOSION_SCALE, FRAME_INTERVAL};
pub use spin_up::SpinUp;
pub use tunables::VehicleTunables;

use std::f64::consts::{FRAC_PI_2, PI};
use std::sync::Arc;
use std::time::Duration;

use glam::DVec2;
use log::{debug, info};

use crate::average::MovingAverage;
use crate::clock::Clock;
use crate::controller::{ControlInputState, StatusEncoder};
use crate::io::midi::MidiEvent;

/// Velocity added per frame by each held debug nudge.
pub const NUDGE_STEP: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightState {
    Flying,
    /// Crashed at run time `since`. Terminal.
    Destroying { since: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashCause {
    /// Touched the ground tilted beyond the upset angle.
    Tilt,
    /// Velocity changed faster than the airframe can take.
    Overstress,
}

/// What a call to [`Carryall::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Already destroying; nothing changed.
    Frozen,
    Airborne,
    Bounced,
    Crashed(CrashCause),
}

/// Held debug nudge directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Nudge {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

pub struct Carryall {
    tunables: VehicleTunables,
    clock: Arc<dyn Clock>,
    controls: ControlInputState,
    encoder: StatusEncoder,
    spin_up: SpinUp,

    position: DVec2,
    velocity: DVec2,
    body_rotation: f64,
    engine_rotation: f64,

    current_stability_power: f64,
    current_engine_power: f64,
    atmo_pressure: f64,
    acceleration_stress: f64,
    current_drag: DVec2,
    avg_velocity: MovingAverage,

    state: FlightState,
}

impl Carryall {
    /// A carryall at the origin, falling at one tick of gravity.
    pub fn new(tunables: VehicleTunables, clock: Arc<dyn Clock>) -> Self {
        let avg_velocity = MovingAverage::new(tunables.average_window, tunables.average_capacity);
        Self {
            controls: ControlInputState::default(),
            encoder: StatusEncoder::new(),
            spin_up: SpinUp::default(),
            position: DVec2::ZERO,
            velocity: DVec2::new(0.0, tunables.gravity.y),
            body_rotation: 0.0,
            engine_rotation: -FRAC_PI_2,
            current_stability_power: 0.0,
            current_engine_power: 0.0,
            atmo_pressure: 1.0,
            acceleration_stress: 0.0,
            current_drag: DVec2::ZERO,
            avg_velocity,
            state: FlightState::Flying,
            tunables,
            clock,
        }
    }

    pub fn with_position(mut self, position: DVec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_velocity(mut self, velocity: DVec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Start tilted by `rotation`, clamped to the body limit.
    pub fn with_body_rotation(mut self, rotation: f64) -> Self {
        let limit = self.tunables.body_rotation_limit;
        self.body_rotation = rotation.clamp(-limit, limit);
        self
    }

    /// Advance the flight model by one tick.
    ///
    /// `_dt` is the frame's wall-clock time. Integration always uses the
    /// fixed factor from [`VehicleTunables`].
    pub fn step(&mut self, _dt: f64) -> StepOutcome {
        if self.is_destroying() {
            return StepOutcome::Frozen;
        }
        let now = self.clock.elapsed();
        let t = &self.tunables;
        let factor = t.integration_factor;
        let controls = self.controls;

        self.spin_up
            .advance(controls.hold, t.spin_up_rise, t.spin_up_fall, now);
        let spin_up = self.spin_up.level();

        let body_step = factor * PI * controls.left_pan_ticks as f64 * t.body_rotation_speed;
        self.body_rotation = (self.body_rotation - body_step)
            .clamp(-t.body_rotation_limit, t.body_rotation_limit);

        let engine_step = factor * PI * controls.right_pan_ticks as f64 * t.engine_rotation_speed;
        self.engine_rotation = (self.engine_rotation - engine_step).clamp(
            -FRAC_PI_2 - t.engine_rotation_limit,
            -FRAC_PI_2 + t.engine_rotation_limit,
        );

        self.atmo_pressure = t.pressure_at(self.position.y);
        let pressure = self.atmo_pressure;

        self.current_stability_power = controls.left_balance
            * (t.stability_power * (1.0 - controls.middle_balance))
            * spin_up
            * pressure;
        self.current_engine_power = (controls.right_balance - 0.5)
            * 2.0
            * (t.engine_power * controls.middle_balance)
            * spin_up
            * pressure;

        let body = DVec2::from_angle(self.body_rotation);
        let stability_thrust = body.rotate(DVec2::new(0.0, self.current_stability_power));
        let engine_thrust = DVec2::from_angle(self.engine_rotation)
            .rotate(body.rotate(DVec2::new(0.0, self.current_engine_power)));

        self.current_drag = -t.drag * self.velocity * pressure;

        let before = self.velocity;
        self.velocity += self.current_drag + stability_thrust + engine_thrust + t.gravity;
        self.position += self.velocity * factor;
        self.acceleration_stress = (before - self.velocity).length();

        let mut outcome = StepOutcome::Airborne;
        if self.position.y < t.ground_level {
            if self.body_rotation.abs() > t.upset_tilt {
                outcome = StepOutcome::Crashed(CrashCause::Tilt);
            } else {
                self.velocity *= t.bounce_damping;
                self.position.y = t.ground_level;
                self.body_rotation = 0.0;
                self.acceleration_stress = (before - self.velocity).length() / t.shock_absorption;
                debug!("bounce, stress {:.3}", self.acceleration_stress);
                outcome = StepOutcome::Bounced;
            }
        }

        if outcome != StepOutcome::Crashed(CrashCause::Tilt)
            && now > t.crash_grace
            && self.acceleration_stress > t.crash_stress
        {
            outcome = StepOutcome::Crashed(CrashCause::Overstress);
        }

        if let StepOutcome::Crashed(cause) = outcome {
            self.state = FlightState::Destroying { since: now };
            info!(
                "carryall crashed ({cause:?}) at {:.2}s, stress {:.3}",
                now.as_secs_f64(),
                self.acceleration_stress
            );
        }

        let ceiling = self.tunables.average_velocity_ceiling;
        self.avg_velocity
            .sample(now, self.velocity.clamp_length_max(ceiling));

        outcome
    }

    /// Apply this frame's controller messages.
    pub fn midi_input(&mut self, events: &[MidiEvent]) {
        if self.is_destroying() {
            return;
        }
        let summary = self.controls.decode(events);
        if summary.sync_pressed {
            let now = self.clock.elapsed();
            self.spin_up.restart(self.tunables.sync_preset, now);
            debug!("spin-up restarted from {}", self.tunables.sync_preset);
        }
    }

    /// Apply held debug nudges.
    pub fn input(&mut self, nudge: Nudge) {
        if self.is_destroying() {
            return;
        }
        if nudge.left {
            self.velocity.x -= NUDGE_STEP;
        }
        if nudge.right {
            self.velocity.x += NUDGE_STEP;
        }
        if nudge.up {
            self.velocity.y += NUDGE_STEP;
        }
        if nudge.down {
            self.velocity.y -= NUDGE_STEP;
        }
    }

    /// Status indicator changes for this frame.
    pub fn midi_output(&mut self) -> Vec<MidiEvent> {
        let now = self.clock.elapsed();
        self.encoder.encode(
            &mut self.spin_up,
            self.acceleration_stress,
            self.controls.hold,
            now,
        )
    }

    /// Draw command for this frame, or `None` once the explosion has played
    /// out.
    pub fn draw(&self) -> Option<DrawCommand> {
        let now = self.clock.elapsed();
        match self.state {
            FlightState::Flying => Some(DrawCommand::Intact {
                position: self.position,
                body_rotation: self.body_rotation,
                engine_rotation: self.engine_rotation,
                stability_jet: self.current_stability_power / self.tunables.stability_power,
                engine_jet: self.current_engine_power / self.tunables.engine_power,
                jet: JetDirection::from_balance(self.controls.right_balance),
                flicker: draw::frame_index(now) % 2,
            }),
            FlightState::Destroying { since } => {
                let frame = draw::frame_index(now.saturating_sub(since));
                (frame < EXPLOSION_FRAMES).then_some(DrawCommand::Explosion {
                    position: self.position,
                    rotation: self.body_rotation,
                    frame,
                    scale: EXPLOSION_SCALE,
                })
            }
        }
    }

    /// Wrap the horizontal position into `[0, width)`.
    pub fn wrap_horizontal(&mut self, width: f64) {
        if width <= 0.0 {
            return;
        }
        if self.position.x < 0.0 {
            self.position.x += width;
        } else if self.position.x >= width {
            self.position.x -= width;
        }
    }

    pub fn state(&self) -> FlightState {
        self.state
    }

    pub fn is_destroying(&self) -> bool {
        matches!(self.state, FlightState::Destroying { .. })
    }

    pub fn tunables(&self) -> &VehicleTunables {
        &self.tunables
    }

    pub fn controls(&self) -> &ControlInputState {
        &self.controls
    }

    pub fn spin_up(&self) -> &SpinUp {
        &self.spin_up
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn body_rotation(&self) -> f64 {
        self.body_rotation
    }

    pub fn engine_rotation(&self) -> f64 {
        self.engine_rotation
    }

    pub fn current_stability_power(&self) -> f64 {
        self.current_stability_power
    }

    pub fn current_engine_power(&self) -> f64 {
        self.current_engine_power
    }

    pub fn atmo_pressure(&self) -> f64 {
        self.atmo_pressure
    }

    pub fn acceleration_stress(&self) -> f64 {
        self.acceleration_stress
    }

    pub fn current_drag(&self) -> DVec2 {
        self.current_drag
    }

    /// Smoothed, magnitude-capped velocity.
    pub fn avg_velocity(&self) -> DVec2 {
        self.avg_velocity.average()
    }

    /// Combined throttle in `[0.0, 1.0]`.
    pub fn throttle(&self) -> f64 {
        (self.current_stability_power + self.current_engine_power.abs())
            / self.tunables.max_power()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::controller::{
        CHAN_LEFT, CHAN_MIDDLE, CHAN_RIGHT, CTRL_BALANCE_MSB, CTRL_BANK_SELECT_MSB, CTRL_PAN,
        KEY_PLAY, KEY_SYNC, VAL_PAN_CCW, VAL_PAN_CW,
    };

    fn vehicle() -> (Carryall, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let c = Carryall::new(VehicleTunables::default(), clock.clone());
        (c, clock)
    }

    fn pan(channel: u8, value: u8) -> MidiEvent {
        MidiEvent::ControlChange {
            channel,
            controller: CTRL_PAN,
            value,
        }
    }

    fn cc(channel: u8, controller: u8, value: u8) -> MidiEvent {
        MidiEvent::ControlChange {
            channel,
            controller,
            value,
        }
    }

    fn press(key: u8) -> MidiEvent {
        MidiEvent::NoteOn {
            channel: CHAN_LEFT,
            key,
            velocity: 0x7F,
        }
    }

    #[test]
    fn initial_state() {
        let (c, _) = vehicle();
        assert_eq!(c.velocity(), DVec2::new(0.0, -0.15));
        assert_eq!(c.engine_rotation(), -FRAC_PI_2);
        assert_eq!(c.controls().middle_balance, 0.5);
        assert_eq!(c.state(), FlightState::Flying);
    }

    #[test]
    fn rotations_stay_within_limits() {
        let (c, _) = vehicle();
        let mut c = c.with_position(DVec2::new(0.0, 5000.0));
        let limit = c.tunables().body_rotation_limit;

        let ccw: Vec<_> = (0..40)
            .flat_map(|_| [pan(CHAN_LEFT, VAL_PAN_CCW), pan(CHAN_RIGHT, VAL_PAN_CCW)])
            .collect();
        let cw: Vec<_> = (0..40)
            .flat_map(|_| [pan(CHAN_LEFT, VAL_PAN_CW), pan(CHAN_RIGHT, VAL_PAN_CW)])
            .collect();

        for batch in [&ccw, &cw, &ccw] {
            for _ in 0..50 {
                c.midi_input(batch);
                c.step(1.0 / 60.0);
                assert!(c.body_rotation().abs() <= limit + 1e-12);
                assert!((c.engine_rotation() + FRAC_PI_2).abs() <= limit + 1e-12);
            }
        }
        // Counter-clockwise ticks tilt the body to positive angles.
        assert!((c.body_rotation() - limit).abs() < 1e-12);
    }

    #[test]
    fn no_thrust_without_spin_up() {
        let (c, _) = vehicle();
        let mut c = c.with_position(DVec2::new(0.0, 500.0));
        c.midi_input(&[
            cc(CHAN_LEFT, CTRL_BALANCE_MSB, 127),
            cc(CHAN_RIGHT, CTRL_BALANCE_MSB, 127),
        ]);
        c.step(1.0 / 60.0);
        assert_eq!(c.current_stability_power(), 0.0);
        assert_eq!(c.current_engine_power(), 0.0);
    }

    #[test]
    fn thrust_split_follows_crossfader() {
        let (c, _) = vehicle();
        let mut c = c.with_position(DVec2::new(0.0, 500.0));
        c.midi_input(&[
            press(KEY_SYNC),
            cc(CHAN_LEFT, CTRL_BALANCE_MSB, 127),
            cc(CHAN_RIGHT, CTRL_BALANCE_MSB, 0),
            cc(CHAN_MIDDLE, CTRL_BANK_SELECT_MSB, 0),
        ]);
        c.step(1.0 / 60.0);

        // Crossfader fully toward stability: main thrust is zero.
        assert!(c.current_stability_power() > 0.0);
        assert_eq!(c.current_engine_power(), 0.0);

        c.midi_input(&[cc(CHAN_MIDDLE, CTRL_BANK_SELECT_MSB, 127)]);
        c.step(1.0 / 60.0);
        assert_eq!(c.current_stability_power(), 0.0);
        // Right fader at the bottom is full reverse.
        assert!(c.current_engine_power() < 0.0);
    }

    #[test]
    fn sync_key_restarts_spin_up() {
        let (mut c, clock) = vehicle();
        clock.set(Duration::from_secs(1));
        c.midi_input(&[press(KEY_SYNC)]);
        assert_eq!(c.spin_up().level(), 0.9);
        assert_eq!(c.spin_up().started(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn held_play_spins_up() {
        let (c, _) = vehicle();
        let mut c = c.with_position(DVec2::new(0.0, 5000.0));
        c.midi_input(&[press(KEY_PLAY)]);
        for _ in 0..10 {
            c.step(1.0 / 60.0);
        }
        assert!((c.spin_up().level() - 10.0 * 0.25 * 0.02).abs() < 1e-12);
    }

    #[test]
    fn pressure_drops_with_altitude() {
        let (c, _) = vehicle();
        let mut c = c.with_position(DVec2::new(0.0, 2000.0));
        c.step(1.0 / 60.0);
        assert!(c.atmo_pressure() > 0.49 && c.atmo_pressure() < 0.51);
    }

    #[test]
    fn overstress_needs_grace_period() {
        let (c, clock) = vehicle();
        let mut c = c.with_position(DVec2::new(0.0, 500.0));

        // At this speed drag alone changes velocity beyond the crash stress.
        for _ in 0..80 {
            c.input(Nudge {
                up: true,
                ..Nudge::default()
            });
        }
        assert_eq!(c.step(1.0 / 60.0), StepOutcome::Airborne);
        assert!(c.acceleration_stress() > c.tunables().crash_stress);

        clock.set(Duration::from_secs(4));
        assert_eq!(c.step(1.0 / 60.0), StepOutcome::Crashed(CrashCause::Overstress));
        assert_eq!(
            c.state(),
            FlightState::Destroying {
                since: Duration::from_secs(4)
            }
        );
    }

    #[test]
    fn destroyed_vehicle_ignores_input() {
        let (c, _) = vehicle();
        let mut c = c
            .with_position(DVec2::new(10.0, 167.5))
            .with_velocity(DVec2::new(0.0, -50.0))
            .with_body_rotation(1.0);
        assert_eq!(c.step(1.0 / 60.0), StepOutcome::Crashed(CrashCause::Tilt));

        let velocity = c.velocity();
        c.input(Nudge {
            left: true,
            up: true,
            ..Nudge::default()
        });
        c.midi_input(&[press(KEY_SYNC), pan(CHAN_LEFT, VAL_PAN_CW)]);
        assert_eq!(c.step(1.0 / 60.0), StepOutcome::Frozen);
        assert_eq!(c.velocity(), velocity);
        assert_eq!(c.spin_up().level(), 0.0);
    }

    #[test]
    fn explosion_plays_out_then_disappears() {
        let (c, clock) = vehicle();
        let mut c = c
            .with_position(DVec2::new(10.0, 167.5))
            .with_velocity(DVec2::new(0.0, -50.0))
            .with_body_rotation(-1.0);
        clock.set(Duration::from_secs(5));
        c.step(1.0 / 60.0);

        clock.advance(Duration::from_millis(120));
        match c.draw() {
            Some(DrawCommand::Explosion { frame, scale, .. }) => {
                assert_eq!(frame, 2);
                assert_eq!(scale, EXPLOSION_SCALE);
            }
            other => panic!("expected explosion, got {other:?}"),
        }

        clock.advance(Duration::from_millis(600));
        assert_eq!(c.draw(), None);
    }

    #[test]
    fn horizontal_wrap() {
        let (c, _) = vehicle();
        let mut c = c.with_position(DVec2::new(-5.0, 300.0));
        c.wrap_horizontal(100.0);
        assert_eq!(c.position().x, 95.0);

        let mut c = c.with_position(DVec2::new(100.0, 300.0));
        c.wrap_horizontal(100.0);
        assert_eq!(c.position().x, 0.0);
    }

    #[test]
    fn average_velocity_is_capped() {
        let (c, clock) = vehicle();
        let mut c = c
            .with_position(DVec2::new(0.0, 5000.0))
            .with_velocity(DVec2::new(0.0, 400.0));
        for _ in 0..5 {
            clock.advance(Duration::from_millis(16));
            c.step(1.0 / 60.0);
        }
        assert!(c.avg_velocity().length() <= 100.0 + 1e-9);
        assert!(c.avg_velocity().y > 99.0);
    }
}
