//! Command-line options

use crate::input::GamepadSettings;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "projection3d", version)]
#[command(about = "Explore perspective projection parameters on a 3D model in the terminal")]
pub struct Args {
    /// Target frames per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Write log output to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Ignore connected gamepads
    #[arg(long)]
    pub no_gamepad: bool,

    /// Thumbstick dead zone
    #[arg(long, default_value_t = 0.24, value_parser = parse_unit)]
    pub stick_deadzone: f32,

    /// Trigger dead zone
    #[arg(long, default_value_t = 0.12, value_parser = parse_unit)]
    pub trigger_deadzone: f32,
}

impl Args {
    pub fn gamepad_settings(&self) -> GamepadSettings {
        GamepadSettings {
            stick_deadzone: self.stick_deadzone,
            trigger_deadzone: self.trigger_deadzone,
        }
    }
}

/// A fraction in `0.0..1.0`
fn parse_unit(value: &str) -> Result<f32, String> {
    let parsed: f32 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if (0.0..1.0).contains(&parsed) {
        Ok(parsed)
    } else {
        Err(format!("{parsed} is outside 0.0..1.0"))
    }
}
