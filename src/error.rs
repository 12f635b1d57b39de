use thiserror::Error;

/// Errors reported while wiring up the engine, its channels and the output device.
///
/// Per-frame operations never fail; everything here happens at setup time or
/// when a bounded control queue overflows.
#[derive(Debug, Error)]
pub enum Error {
    #[error("audio channel `{0}` is not registered")]
    UnknownChannel(String),

    #[error("audio channel `{0}` is registered twice")]
    DuplicateChannel(String),

    #[error("source queue for channel `{0}` is full")]
    SourceQueueFull(String),

    #[error("invalid clip: {0}")]
    InvalidClip(String),

    #[error("no default output device available")]
    NoOutputDevice,

    #[error("unsupported output sample format {0}")]
    UnsupportedSampleFormat(String),

    #[error(transparent)]
    StreamConfig(#[from] cpal::DefaultStreamConfigError),

    #[error(transparent)]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error(transparent)]
    PlayStream(#[from] cpal::PlayStreamError),
}

pub type Result<T> = std::result::Result<T, Error>;
