//! Sky spawning and the day/night cycle.
//!
//! The cycle is a scalar in `[0, 1]` (1 = day, 0 = night) that fades
//! linearly over `transition_seconds`. Nights start whenever the display
//! score enters a new `night_period_score` bucket and last for
//! `night_duration_score` points. Crossing the 0.5 midpoint flips the
//! palette of every invertible entity, exactly once per crossing.

use super::sky::{Cloud, Moon, SkyObject, Star};
use super::{Entity, EntityId, EntityManager, SpawnContext};
use crate::config::SkyConfig;
use crate::constants::WINDOW_WIDTH;
use crate::geometry::Vec2;
use crate::graphics::Palette;
use log::debug;
use rand::Rng;

const CLOUD_MIN_POS_Y: i32 = 20;
const CLOUD_MAX_POS_Y: i32 = 70;
const STAR_MIN_POS_Y: i32 = 10;
const STAR_MAX_POS_Y: i32 = 60;
pub const MOON_POS_Y: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkyEvent {
    NightStarted { night_count: u32 },
    DayStarted,
    /// The fade crossed its midpoint; every invertible entity should switch.
    PaletteChanged(Palette),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    None,
    ToNight,
    ToDay,
}

#[derive(Debug, Clone)]
pub struct SkyManager {
    config: SkyConfig,
    target_cloud_distance: f32,
    target_star_distance: f32,
    moon_id: Option<EntityId>,

    day_night: f32,
    transition: Transition,
    /// Whether the night phase is running (score-wise), independent of the fade.
    is_night_phase: bool,
    night_start_score: i32,
    night_count: u32,
    previous_score: i32,
    palette: Palette,
}

impl SkyManager {
    pub fn new(config: SkyConfig) -> Self {
        Self {
            config,
            target_cloud_distance: 0.0,
            target_star_distance: 0.0,
            moon_id: None,
            day_night: 1.0,
            transition: Transition::None,
            is_night_phase: false,
            night_start_score: 0,
            night_count: 0,
            previous_score: 0,
            palette: Palette::Normal,
        }
    }

    /// Day/night scalar: 1 is full day, 0 is full night.
    pub fn day_night(&self) -> f32 {
        self.day_night
    }

    /// Screen clear colour scalar, same value as [`Self::day_night`].
    pub fn clear_color_scalar(&self) -> f32 {
        self.day_night
    }

    /// Opacity of the night overlay.
    pub fn overlay_alpha(&self) -> f32 {
        1.0 - self.day_night
    }

    pub fn is_night(&self) -> bool {
        self.day_night < 0.5
    }

    pub fn night_count(&self) -> u32 {
        self.night_count
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition != Transition::None
    }

    pub fn moon_id(&self) -> Option<EntityId> {
        self.moon_id
    }

    /// Forget the moon (the world clears every entity on replay). The
    /// day/night state is kept so a reset to a low score fades back to day.
    pub fn reset(&mut self) {
        self.moon_id = None;
        self.target_cloud_distance = 0.0;
        self.target_star_distance = 0.0;
    }

    pub fn update<R: Rng>(
        &mut self,
        entities: &mut EntityManager<Entity>,
        spawn: &SpawnContext,
        rng: &mut R,
    ) -> Vec<SkyEvent> {
        self.update_clouds(entities, spawn, rng);
        self.update_stars(entities, spawn, rng);
        self.update_moon(entities, spawn);
        self.despawn(entities);
        self.update_day_night(spawn)
    }

    fn update_clouds<R: Rng>(
        &mut self,
        entities: &mut EntityManager<Entity>,
        spawn: &SpawnContext,
        rng: &mut R,
    ) {
        let rightmost = rightmost_x(entities.entities_of_type::<Cloud>().map(|(_, c)| c.position()));
        if rightmost.map_or(true, |x| WINDOW_WIDTH - x >= self.target_cloud_distance) {
            self.target_cloud_distance =
                rng.gen_range(self.config.cloud_min_distance..=self.config.cloud_max_distance);
            let y = rng.gen_range(CLOUD_MIN_POS_Y..=CLOUD_MAX_POS_Y) as f32;
            entities.add(SkyObject::from(Cloud::new(
                Vec2::new(WINDOW_WIDTH, y),
                spawn.palette,
            )));
        }
    }

    fn update_stars<R: Rng>(
        &mut self,
        entities: &mut EntityManager<Entity>,
        spawn: &SpawnContext,
        rng: &mut R,
    ) {
        let rightmost = rightmost_x(entities.entities_of_type::<Star>().map(|(_, s)| s.position()));
        if rightmost.map_or(true, |x| WINDOW_WIDTH - x >= self.target_star_distance) {
            self.target_star_distance =
                rng.gen_range(self.config.star_min_distance..=self.config.star_max_distance);
            let y = rng.gen_range(STAR_MIN_POS_Y..=STAR_MAX_POS_Y) as f32;
            entities.add(SkyObject::from(Star::new(
                Vec2::new(WINDOW_WIDTH, y),
                spawn.palette,
            )));
        }
    }

    fn update_moon(&mut self, entities: &mut EntityManager<Entity>, spawn: &SpawnContext) {
        let despawn_x = self.config.despawn_x;
        match self.moon_id {
            None => {
                let moon = Moon::new(Vec2::new(WINDOW_WIDTH, MOON_POS_Y), spawn.palette);
                self.moon_id = Some(entities.add(SkyObject::from(moon)));
            }
            Some(id) => {
                if let Some(moon) = entities.get_mut::<SkyObject>(id) {
                    if moon.position().x < despawn_x {
                        moon.set_position(Vec2::new(WINDOW_WIDTH, MOON_POS_Y));
                    }
                }
            }
        }
    }

    /// Remove clouds and stars that scrolled off. The moon is recycled instead.
    fn despawn(&self, entities: &mut EntityManager<Entity>) {
        let gone: Vec<EntityId> = entities
            .entities_of_type::<SkyObject>()
            .filter(|(id, sky)| {
                !matches!(sky, SkyObject::Moon(_))
                    && sky.position().x < self.config.despawn_x
                    && !entities.is_pending_removal(*id)
            })
            .map(|(id, _)| id)
            .collect();
        for id in gone {
            entities.remove(id);
        }
    }

    fn update_day_night(&mut self, spawn: &SpawnContext) -> Vec<SkyEvent> {
        let mut events = Vec::new();
        let display_score = spawn.score.floor() as i32;
        let period = self.config.night_period_score.max(1);

        let entered_new_period = self.previous_score != 0
            && self.previous_score < display_score
            && self.previous_score / period != display_score / period;

        if entered_new_period && !self.is_night_phase {
            self.is_night_phase = true;
            self.night_start_score = display_score;
            self.night_count += 1;
            self.transition = Transition::ToNight;
            debug!("Night {} started at score {}", self.night_count, display_score);
            events.push(SkyEvent::NightStarted {
                night_count: self.night_count,
            });
        } else if self.is_night_phase
            && display_score - self.night_start_score >= self.config.night_duration_score
        {
            self.start_day(&mut events);
        }

        // a replay dropped the score back below the first night
        if display_score < period && (self.is_night_phase || self.transition == Transition::ToNight)
        {
            self.start_day(&mut events);
        }

        self.previous_score = display_score;
        self.advance_transition(spawn.dt, &mut events);
        events
    }

    fn start_day(&mut self, events: &mut Vec<SkyEvent>) {
        self.is_night_phase = false;
        self.transition = Transition::ToDay;
        debug!("Day started");
        events.push(SkyEvent::DayStarted);
    }

    fn advance_transition(&mut self, dt: f32, events: &mut Vec<SkyEvent>) {
        let step = if self.config.transition_seconds > 0.0 {
            dt / self.config.transition_seconds
        } else {
            1.0
        };

        match self.transition {
            Transition::None => return,
            Transition::ToNight => {
                self.day_night = (self.day_night - step).clamp(0.0, 1.0);
                if self.day_night <= 0.0 {
                    self.transition = Transition::None;
                }
            }
            Transition::ToDay => {
                self.day_night = (self.day_night + step).clamp(0.0, 1.0);
                if self.day_night >= 1.0 {
                    self.transition = Transition::None;
                }
            }
        }

        let wanted = if self.is_night() {
            Palette::Inverted
        } else {
            Palette::Normal
        };
        if wanted != self.palette {
            self.palette = wanted;
            events.push(SkyEvent::PaletteChanged(wanted));
        }
    }
}

fn rightmost_x(positions: impl Iterator<Item = Vec2>) -> Option<f32> {
    positions.map(|p| p.x).reduce(f32::max)
}
