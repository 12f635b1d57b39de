//! Terminal display: flight telemetry, controller indicators and the mixed
//! audio output.

mod spectrum;
mod telemetry;
mod waveform;

use carryall::controller::{CHAN_LEFT, CHAN_RIGHT, KEY_PLAY, KEY_SYNC};
use carryall::io::MidiEvent;
use carryall::vehicle::Carryall;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use rtrb::Consumer;

use spectrum::{render_spectrum, SpectrumAnalyzer};
use telemetry::render_telemetry;
use waveform::render_waveform;

/// Audio visualization buffer size
const VIS_BUFFER_SIZE: usize = 1024;

/// Controller indicator state as last sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Indicators {
    pub stress: bool,
    pub spin_up: bool,
}

impl Indicators {
    pub fn apply(&mut self, events: &[MidiEvent]) {
        for event in events {
            let (channel, key, on) = match *event {
                MidiEvent::NoteOn { channel, key, .. } => (channel, key, true),
                MidiEvent::NoteOff { channel, key, .. } => (channel, key, false),
                _ => continue,
            };
            match (channel, key) {
                (CHAN_RIGHT, KEY_SYNC) => self.stress = on,
                (CHAN_LEFT, KEY_PLAY) => self.spin_up = on,
                _ => {}
            }
        }
    }
}

pub struct Ui {
    audio_rx: Consumer<f32>,
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
}

impl Ui {
    pub fn new(audio_rx: Consumer<f32>, sample_rate: f32) -> Self {
        Self {
            audio_rx,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
        }
    }

    /// Pull tapped samples, keeping the last `VIS_BUFFER_SIZE`.
    fn poll_audio(&mut self) {
        let mut received = false;
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
            received = true;
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
        if received {
            self.spectrum.update(&self.audio_buffer);
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        vehicle: &Carryall,
        indicators: &Indicators,
        hold: bool,
    ) {
        self.poll_audio();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(10), // Telemetry
                Constraint::Min(6),     // Waveform
                Constraint::Length(10), // Spectrum
                Constraint::Length(1),  // Help bar
            ])
            .split(frame.area());

        render_telemetry(frame, chunks[0], vehicle, indicators, hold);
        render_waveform(frame, chunks[1], &self.audio_buffer);
        render_spectrum(frame, chunks[2], self.spectrum.data());

        let help = Paragraph::new(
            " [Space] Hold  [Y] Sync  [A/D J/L] Jogs  [W/S I/K U/O] Faders  [Arrows] Nudge  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
