use crate::constants::SAVE_FILE_NAME;
use crate::utils::persistence::{game_dir, read_json, write_json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

/// The only record the game persists between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    pub high_score: i32,
    pub high_score_date: DateTime<Utc>,
}

/// Loads and stores the high-score record as JSON.
pub struct SaveManager {
    save_path: PathBuf,
}

impl SaveManager {
    /// Creates a SaveManager targeting `~/.trex-runner/save.json`.
    pub fn new() -> io::Result<Self> {
        Ok(Self::in_dir(&game_dir()?))
    }

    /// Creates a SaveManager that stores its file in `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            save_path: dir.join(SAVE_FILE_NAME),
        }
    }

    pub fn save_exists(&self) -> bool {
        self.save_path.exists()
    }

    pub fn save(&self, state: &SaveState) -> io::Result<()> {
        write_json(&self.save_path, state)
    }

    pub fn load(&self) -> io::Result<SaveState> {
        read_json(&self.save_path)
    }

    /// Load the record, logging and swallowing any failure.
    ///
    /// A missing file is the normal first-run case and is not reported.
    pub fn load_or_none(&self) -> Option<SaveState> {
        if !self.save_exists() {
            return None;
        }
        match self.load() {
            Ok(state) => Some(state),
            Err(e) => {
                log::warn!(
                    "Could not load high score from {}: {}",
                    self.save_path.display(),
                    e
                );
                None
            }
        }
    }

    /// Save the record, logging any failure instead of returning it.
    pub fn save_or_log(&self, state: &SaveState) {
        if let Err(e) = self.save(state) {
            log::warn!(
                "Could not save high score to {}: {}",
                self.save_path.display(),
                e
            );
        }
    }
}
