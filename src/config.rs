//! Gameplay tuning.
//!
//! Every knob the simulation reads lives here so that tests can build a
//! world with exact numbers and players can override the defaults with
//! `~/.trex-runner/config.json`. Missing fields fall back to the defaults.

use crate::constants::CONFIG_FILE_NAME;
use crate::utils::persistence::load_json_or_default;
use serde::{Deserialize, Serialize};

/// Player character physics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrexConfig {
    /// Horizontal speed at the start of a run (px/s).
    pub start_speed: f32,
    /// Horizontal speed cap (px/s).
    pub max_speed: f32,
    /// Horizontal acceleration while running (px/s²).
    pub acceleration: f32,
    /// Downward acceleration while airborne (px/s²).
    pub gravity: f32,
    /// Vertical velocity applied when a jump begins (negative is up).
    pub jump_start_velocity: f32,
    /// Vertical velocity a cancelled jump is reduced to.
    pub cancel_jump_velocity: f32,
    /// Height (px above the ground line) a jump must reach before it can be cancelled.
    pub min_jump_height: f32,
    /// Extra downward velocity while dropping out of a jump.
    pub drop_velocity: f32,
    /// Idle blink timer range (seconds).
    pub blink_min_seconds: f32,
    pub blink_max_seconds: f32,
}

impl Default for TrexConfig {
    fn default() -> Self {
        Self {
            start_speed: 280.0,
            max_speed: 900.0,
            acceleration: 3.0,
            gravity: 1600.0,
            jump_start_velocity: -480.0,
            cancel_jump_velocity: -100.0,
            min_jump_height: 40.0,
            drop_velocity: 600.0,
            blink_min_seconds: 2.0,
            blink_max_seconds: 10.0,
        }
    }
}

/// Obstacle spawning and difficulty scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    /// Score a run must reach before any obstacle spawns.
    pub min_spawn_score: f64,
    /// Range of the score gap between two spawns.
    pub min_distance: f64,
    pub max_distance: f64,
    /// Extra gap (score points) added at max speed, scaled linearly with speed.
    pub speed_tolerance: f64,
    /// Score after which flying hazards join the spawn table.
    pub flying_min_score: f64,
    /// Spawn weights once flying hazards are allowed.
    pub cactus_weight: u32,
    pub flying_weight: u32,
    /// Obstacles left of this x are despawned.
    pub despawn_x: f32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            min_spawn_score: 20.0,
            min_distance: 10.0,
            max_distance: 50.0,
            speed_tolerance: 5.0,
            flying_min_score: 150.0,
            cactus_weight: 3,
            flying_weight: 1,
            despawn_x: -200.0,
        }
    }
}

/// Decorative sky objects and the day/night cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    /// Horizontal gap range between clouds (px).
    pub cloud_min_distance: f32,
    pub cloud_max_distance: f32,
    /// Horizontal gap range between stars (px).
    pub star_min_distance: f32,
    pub star_max_distance: f32,
    /// A night starts every time the display score crosses a multiple of this.
    pub night_period_score: i32,
    /// Night lasts this many score points.
    pub night_duration_score: i32,
    /// Real-time length of one day↔night fade (seconds).
    pub transition_seconds: f32,
    /// Sky objects left of this x are despawned (or recycled, for the moon).
    pub despawn_x: f32,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            cloud_min_distance: 150.0,
            cloud_max_distance: 400.0,
            star_min_distance: 380.0,
            star_max_distance: 950.0,
            night_period_score: 700,
            night_duration_score: 250,
            transition_seconds: 2.0,
            despawn_x: -200.0,
        }
    }
}

/// Score accumulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Score per second = trex speed × multiplier.
    pub multiplier: f64,
    /// The score board flashes every time the display score crosses a multiple of this.
    pub milestone: i32,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            multiplier: 0.05,
            milestone: 100,
        }
    }
}

/// Full game configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub trex: TrexConfig,
    pub obstacles: ObstacleConfig,
    pub sky: SkyConfig,
    pub score: ScoreConfig,
}

impl TrexConfig {
    fn is_valid(&self) -> bool {
        ordered(0.0, self.start_speed)
            && ordered(self.start_speed, self.max_speed)
            && ordered(0.0, self.blink_min_seconds)
            && ordered(self.blink_min_seconds, self.blink_max_seconds)
            && [
                self.acceleration,
                self.gravity,
                self.jump_start_velocity,
                self.cancel_jump_velocity,
                self.min_jump_height,
                self.drop_velocity,
            ]
            .iter()
            .all(|v| v.is_finite())
    }
}

impl ObstacleConfig {
    fn is_valid(&self) -> bool {
        ordered(0.0, self.min_distance)
            && ordered(self.min_distance, self.max_distance)
            && self.speed_tolerance.is_finite()
            && self.despawn_x.is_finite()
    }
}

impl SkyConfig {
    fn is_valid(&self) -> bool {
        ordered(0.0, self.cloud_min_distance)
            && ordered(self.cloud_min_distance, self.cloud_max_distance)
            && ordered(0.0, self.star_min_distance)
            && ordered(self.star_min_distance, self.star_max_distance)
            && ordered(0.0, self.transition_seconds)
            && self.despawn_x.is_finite()
    }
}

impl ScoreConfig {
    fn is_valid(&self) -> bool {
        ordered(0.0, self.multiplier) && self.multiplier.is_finite()
    }
}

/// `min <= max`, false if either side is NaN.
fn ordered<T: PartialOrd>(min: T, max: T) -> bool {
    min <= max
}

impl GameConfig {
    /// Load `~/.trex-runner/config.json`, falling back to defaults if missing or invalid.
    pub fn load() -> Self {
        let config: GameConfig = load_json_or_default(CONFIG_FILE_NAME);
        if config != GameConfig::default() {
            log::info!("Loaded custom gameplay config from {}", CONFIG_FILE_NAME);
        }
        config.sanitized()
    }

    /// Replace every section holding an inverted range or a non-finite value
    /// with its defaults. The rest of the config is kept.
    pub fn sanitized(mut self) -> Self {
        if !self.trex.is_valid() {
            log::warn!("Invalid trex config {:?}, using defaults", self.trex);
            self.trex = TrexConfig::default();
        }
        if !self.obstacles.is_valid() {
            log::warn!("Invalid obstacle config {:?}, using defaults", self.obstacles);
            self.obstacles = ObstacleConfig::default();
        }
        if !self.sky.is_valid() {
            log::warn!("Invalid sky config {:?}, using defaults", self.sky);
            self.sky = SkyConfig::default();
        }
        if !self.score.is_valid() {
            log::warn!("Invalid score config {:?}, using defaults", self.score);
            self.score = ScoreConfig::default();
        }
        self
    }
}
