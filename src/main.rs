mod app;
mod cli;
mod effect;
mod error;
mod gamepad;
mod graphics;
mod input;
mod math;
mod model;
mod state;
mod terminal;
mod update;
mod vertex;
mod widget;

use anyhow::Context;
use app::App;
use clap::Parser;
use cli::Args;
use error::AppError;
use std::fs::File;
use std::path::Path;
use terminal::{TerminalSession, Viewport};

/// Main function
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref()).context("failed to initialise logging")?;

    let viewport = Viewport::detect().context("failed to measure the terminal")?;
    let gamepad = gamepad::open(args.gamepad_settings(), !args.no_gamepad);

    install_panic_hook();
    let mut session = TerminalSession::enter().context("failed to set up the terminal")?;
    let mut app = App::new(viewport, session.key_hold_mode(), gamepad, args.fps);
    app.run(&mut session)?;

    Ok(())
}

/// Sends log records to `log_file`, or to stderr when none is given.
///
/// `RUST_LOG` overrides the default level.
fn init_logging(log_file: Option<&Path>) -> Result<(), AppError> {
    let default_level = if log_file.is_some() { "info" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    if let Some(path) = log_file {
        let file = File::create(path).map_err(|source| AppError::LogFile {
            path: path.to_path_buf(),
            source,
        })?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.try_init()?;
    Ok(())
}

/// Leaves raw mode before the panic message is printed
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        terminal::restore();
        default_hook(info);
    }));
}
