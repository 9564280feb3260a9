//! Fire-and-forget sound triggers.

use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    ButtonPress,
    Hit,
    ScoreReached,
}

pub trait AudioSink {
    fn play(&mut self, sound: Sound);
}

/// Rings the terminal bell. The terminal only has one sound, so the milestone
/// chime is skipped to keep it from getting annoying.
pub struct TerminalBell<W: Write> {
    out: W,
    muted: bool,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out, muted: false }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl<W: Write> AudioSink for TerminalBell<W> {
    fn play(&mut self, sound: Sound) {
        if self.muted || sound == Sound::ScoreReached {
            return;
        }
        if let Err(e) = self.out.write_all(b"\x07").and_then(|_| self.out.flush()) {
            log::debug!("Bell failed: {}", e);
        }
    }
}

/// Remembers what was played; useful in tests and headless runs.
#[derive(Debug, Default)]
pub struct NullAudio {
    pub played: Vec<Sound>,
}

impl AudioSink for NullAudio {
    fn play(&mut self, sound: Sound) {
        self.played.push(sound);
    }
}
