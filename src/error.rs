use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("could not determine the terminal size")]
    ViewportUnavailable,

    #[error("cannot create log file {}: {source}", .path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("logger already initialised: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[cfg(feature = "gamepad")]
    #[error("gamepad initialisation failed: {0}")]
    Gamepad(String),
}
