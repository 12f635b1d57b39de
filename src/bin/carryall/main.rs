//! carryall - fly a hovering carryall from the terminal
//!
//! Run with: cargo run
//!
//! Clips are read from `assets/` (override with `CARRYALL_ASSETS`), logs go
//! to `carryall.log`.

mod app;
mod assets;
mod keys;
mod logging;
mod ui;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    logging::init()?;

    let clips = assets::load_clips(&assets::asset_dir())?;
    app::App::new(clips)?.run()
}
