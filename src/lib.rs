pub mod average; // Time-windowed velocity smoothing
pub mod clock;
pub mod controller; // DJ controller input decoding and status output
pub mod dsp;
pub mod error;
pub mod io;
pub mod latch;
pub mod output;
pub mod sid; // Lock-free multi-channel mixing engine
pub mod vehicle; // Flight model and its sound design

pub use error::{Error, Result};

pub const MAX_BLOCK_SIZE: usize = 2048;
