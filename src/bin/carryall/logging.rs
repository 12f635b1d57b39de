use std::fs::File;

use color_eyre::eyre::{Result, WrapErr};
use env_logger::{Builder, Env, Target};

const LOG_FILE: &str = "carryall.log";

/// Log to a file so output never lands on top of the terminal interface.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`.
pub fn init() -> Result<()> {
    let file = File::create(LOG_FILE).wrap_err_with(|| format!("failed to create {LOG_FILE}"))?;

    let env = Env::default().default_filter_or("info");
    let mut builder = Builder::from_env(env);
    builder.target(Target::Pipe(Box::new(file)));

    // Only fails when a logger is already installed.
    let _ = builder.try_init();
    Ok(())
}
