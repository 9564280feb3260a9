//! File-backed logger.
//!
//! The terminal is in raw mode on the alternate screen while the game runs,
//! so log output goes to `~/.trex-runner/trex-runner.log` instead of stderr.

use crate::constants::LOG_FILE_NAME;
use crate::utils::persistence::save_path;
use env_logger::{Builder, Env, Target};
use std::fs::OpenOptions;
use std::io;

/// Install the global logger. Default level is `info`, `RUST_LOG` overrides it.
pub fn init() -> io::Result<()> {
    let path = save_path(LOG_FILE_NAME)?;
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))
}
