//! Log setup. The terminal belongs to the game, so logs go to a file.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::GameError;

/// Environment variable holding the log filter, e.g. `debug` or
/// `flappy_term=trace`.
pub const LOG_ENV: &str = "FLAPPY_LOG";

pub const LOG_FILE: &str = "flappy_term.log";

/// Install a global fmt subscriber appending to `dir/flappy_term.log`.
pub fn init(dir: &Path) -> Result<(), GameError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| GameError::Logging(e.to_string()))
}
