//! Frame loop: keyboard → controller messages → flight step → status
//! indicators and sound mapping → draw.

use std::sync::Arc;
use std::time::{Duration, Instant};

use carryall::clock::{Clock, MonotonicClock};
use carryall::output::AudioOutput;
use carryall::sid::Sid;
use carryall::vehicle::{carryall_channels, Carryall, ClipSet, NoiseMapper, VehicleTunables};
use color_eyre::eyre::{Result, WrapErr};
use crossterm::event::{self, Event, KeyEventKind};
use glam::DVec2;
use log::info;
use ratatui::DefaultTerminal;
use rtrb::RingBuffer;

use super::keys::{KeyAction, KeyBridge};
use super::ui::{Indicators, Ui};

/// Target frame time (~60 fps).
const FRAME: Duration = Duration::from_millis(16);
/// Sample rate assumed until the device reports its own.
const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;
/// Audio tap capacity, a little over one frame at 48 kHz.
const TAP_CAPACITY: usize = 4096;
/// Horizontal extent of the world; the vehicle wraps around at the edges.
const WORLD_WIDTH: f64 = 4096.0;
const SPAWN: DVec2 = DVec2::new(768.0, 168.0);

pub struct App {
    vehicle: Carryall,
    sid: Sid,
    mapper: NoiseMapper,
    output: AudioOutput,
    keys: KeyBridge,
    indicators: Indicators,
    ui: Ui,
}

impl App {
    pub fn new(clips: ClipSet) -> Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(MonotonicClock::new());

        let (mut sid, renderer) = Sid::new(&carryall_channels(), DEFAULT_SAMPLE_RATE)
            .wrap_err("failed to create mixing engine")?;
        let mapper =
            NoiseMapper::install(&mut sid, clips).wrap_err("failed to install vehicle sounds")?;

        let (tap_tx, tap_rx) = RingBuffer::new(TAP_CAPACITY);
        let output = AudioOutput::open(renderer.with_tap(tap_tx))
            .wrap_err("failed to open audio output")?;
        let ui = Ui::new(tap_rx, output.sample_rate());

        let vehicle = Carryall::new(VehicleTunables::default(), clock).with_position(SPAWN);

        Ok(Self {
            vehicle,
            sid,
            mapper,
            output,
            keys: KeyBridge::new(),
            indicators: Indicators::default(),
            ui,
        })
    }

    /// Take over the terminal until the user quits.
    pub fn run(mut self) -> Result<()> {
        let mut terminal = ratatui::init();
        let result = self.run_loop(&mut terminal);
        ratatui::restore();
        self.shutdown();
        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let mut last_frame = Instant::now();
        loop {
            if self.poll_keys()? {
                return Ok(());
            }

            let now = Instant::now();
            let dt = now.duration_since(last_frame).as_secs_f64();
            last_frame = now;
            self.frame(dt);

            terminal.draw(|frame| {
                self.ui
                    .render(frame, &self.vehicle, &self.indicators, self.keys.hold())
            })?;
        }
    }

    /// Collect key presses for up to one frame. Returns true on quit.
    fn poll_keys(&mut self) -> Result<bool> {
        let mut timeout = FRAME;
        while event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && self.keys.handle(key.code) == KeyAction::Quit
                {
                    return Ok(true);
                }
            }
            timeout = Duration::ZERO;
        }
        Ok(false)
    }

    fn frame(&mut self, dt: f64) {
        let (events, nudge) = self.keys.drain();
        self.vehicle.midi_input(&events);
        self.vehicle.input(nudge);
        self.vehicle.step(dt);
        self.vehicle.wrap_horizontal(WORLD_WIDTH);

        let status = self.vehicle.midi_output();
        self.indicators.apply(&status);

        self.mapper.make_noise(&self.vehicle, &self.sid);
        self.sid.collect_retired();
    }

    fn shutdown(mut self) {
        self.sid.close();
        self.output.close();
        self.sid.collect_retired();
        info!("shut down");
    }
}
