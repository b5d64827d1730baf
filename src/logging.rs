//! File logging. The terminal belongs to the UI, so log lines go to a file.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Install the global subscriber writing to `log_file`.
///
/// Returns false, leaving logging disabled, when the file cannot be opened.
pub fn init(log_file: &Path) -> bool {
    let file = match OpenOptions::new().create(true).append(true).open(log_file) {
        Ok(f) => f,
        Err(_) => return false,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .is_ok()
}
