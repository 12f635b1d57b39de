//! Audio device output through cpal.
//!
//! The device callback drives the [`SidRenderer`] in blocks of at most
//! [`MAX_BLOCK_SIZE`] mono samples and copies each sample to every device
//! channel.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::sid::SidRenderer;
use crate::MAX_BLOCK_SIZE;

/// Running output stream. Dropping it stops the device.
pub struct AudioOutput {
    stream: cpal::Stream,
    sample_rate: f32,
    channels: usize,
}

impl AudioOutput {
    /// Open the default output device and start pulling from `renderer`.
    pub fn open(mut renderer: SidRenderer) -> Result<Self> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(Error::NoOutputDevice)?;
        let config = device.default_output_config()?;

        if config.sample_format() != cpal::SampleFormat::F32 {
            return Err(Error::UnsupportedSampleFormat(format!(
                "{:?}",
                config.sample_format()
            )));
        }

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        renderer.set_sample_rate(sample_rate);

        info!(
            "audio output: {} at {sample_rate} Hz, {channels} channels",
            device.name().unwrap_or_else(|_| "unknown device".to_string())
        );

        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];
        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let block = &mut render_buf[..frames_to_render];
                    renderer.render(block);

                    // Mono to all channels
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        let frame = out_off + i * channels;
                        data[frame..frame + channels].fill(s);
                    }

                    frames_written += frames_to_render;
                }
            },
            |err| warn!("audio output error: {err}"),
            None,
        )?;

        stream.play()?;
        debug!("audio output stream started");

        Ok(Self {
            stream,
            sample_rate,
            channels,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Stop the device. Call after [`crate::sid::Sid::close`] so the last
    /// blocks are silent.
    pub fn close(self) {
        if let Err(err) = self.stream.pause() {
            warn!("failed to pause audio output: {err}");
        }
        debug!("audio output stream closed");
    }
}
