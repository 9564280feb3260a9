//! Screen flow around the world: title, reveal, play, game over.
//!
//! The session turns [`WorldEvent`]s into screen changes and sounds. It never
//! touches the disk; saving the high score is left to the caller, which can
//! watch the returned [`TickReport`] for [`WorldEvent::NewHighScore`].

use crate::audio::{AudioSink, Sound};
use crate::input::InputSnapshot;
use crate::simulation::{TickReport, World, WorldEvent};
use log::info;
use rand::Rng;

/// How long the play field takes to slide open after the first jump.
pub const TRANSITION_SECONDS: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Idle trex, waiting for the first jump.
    Initial,
    /// The first jump landed; the window widens and obstacles are still off.
    Transition,
    Playing,
    GameOver,
}

pub struct Session<R: Rng> {
    world: World<R>,
    screen: Screen,
    transition_elapsed: f32,
}

impl<R: Rng> Session<R> {
    pub fn new(world: World<R>) -> Self {
        Self {
            world,
            screen: Screen::Initial,
            transition_elapsed: 0.0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn world(&self) -> &World<R> {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World<R> {
        &mut self.world
    }

    /// 0 at the start of the reveal, 1 once the field is fully open.
    pub fn transition_progress(&self) -> f32 {
        match self.screen {
            Screen::Initial => 0.0,
            Screen::Transition => (self.transition_elapsed / TRANSITION_SECONDS).clamp(0.0, 1.0),
            Screen::Playing | Screen::GameOver => 1.0,
        }
    }

    pub fn update(
        &mut self,
        dt: f32,
        input: InputSnapshot,
        audio: &mut dyn AudioSink,
    ) -> TickReport {
        if self.screen == Screen::GameOver {
            return TickReport::default();
        }

        if self.screen == Screen::Transition {
            self.transition_elapsed += dt;
            if self.transition_elapsed >= TRANSITION_SECONDS {
                info!("Run started");
                self.screen = Screen::Playing;
                self.world.set_obstacles_enabled(true);
            }
        }

        let report = self.world.tick(dt, input);
        for event in &report.events {
            match event {
                WorldEvent::Jumped => audio.play(Sound::ButtonPress),
                WorldEvent::JumpCompleted if self.screen == Screen::Initial => {
                    self.screen = Screen::Transition;
                    self.transition_elapsed = 0.0;
                }
                WorldEvent::Died { .. } => {
                    audio.play(Sound::Hit);
                    self.screen = Screen::GameOver;
                }
                WorldEvent::ScoreMilestone(_) => audio.play(Sound::ScoreReached),
                _ => {}
            }
        }
        report
    }

    /// Start over from the game-over screen. Returns false anywhere else.
    pub fn replay(&mut self, audio: &mut dyn AudioSink) -> bool {
        if self.screen != Screen::GameOver {
            return false;
        }
        audio.play(Sound::ButtonPress);
        self.world.replay();
        self.screen = Screen::Playing;
        true
    }
}
