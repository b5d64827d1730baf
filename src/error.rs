//! Error type shared by the record store, the path history and the launcher.

use std::process::ExitStatus;

use thiserror::Error;

/// Failures surfaced by the persistence and external-command layers.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("`{program}` exited with {status}")]
    Command { program: String, status: ExitStatus },

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
}

pub type Result<T> = std::result::Result<T, Error>;
