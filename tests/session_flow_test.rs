//! A whole game through the public API: title, reveal, run, crash, save,
//! replay.

use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs;
use trex_runner::audio::{NullAudio, Sound};
use trex_runner::config::GameConfig;
use trex_runner::entities::obstacle::{CactusGroup, GroupSize};
use trex_runner::entities::{Obstacle, TrexState};
use trex_runner::graphics::sprite::RecordingCanvas;
use trex_runner::graphics::{Palette, SpriteKind};
use trex_runner::input::InputSnapshot;
use trex_runner::save_manager::{SaveManager, SaveState};
use trex_runner::session::{Screen, Session};
use trex_runner::simulation::{World, WorldEvent};

const DT: f32 = 1.0 / 60.0;
const IDLE: InputSnapshot = InputSnapshot {
    jump: false,
    duck: false,
};
const JUMP: InputSnapshot = InputSnapshot {
    jump: true,
    duck: false,
};

fn new_session(seed: u64) -> Session<ChaCha8Rng> {
    Session::new(World::new(
        GameConfig::default(),
        ChaCha8Rng::seed_from_u64(seed),
    ))
}

#[test]
fn test_full_game_with_saved_high_score() {
    let dir = std::env::temp_dir().join(format!("trex-runner-flow-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let saves = SaveManager::in_dir(&dir);
    assert!(saves.load_or_none().is_none());

    let mut session = new_session(31);
    let mut audio = NullAudio::default();

    // title screen holds still until the first jump
    for _ in 0..30 {
        session.update(DT, IDLE, &mut audio);
    }
    assert_eq!(session.screen(), Screen::Initial);
    assert_eq!(session.world().trex().state(), TrexState::Idle);

    session.update(DT, JUMP, &mut audio);
    while session.screen() != Screen::Playing {
        session.update(DT, IDLE, &mut audio);
    }
    assert!(session.world().obstacles().is_enabled());

    // run until something hits; drop a cactus in front to be sure
    session
        .world_mut()
        .entities_mut()
        .add(Obstacle::from(CactusGroup::new(
            120.0,
            true,
            GroupSize::Medium,
            Palette::Normal,
        )));
    let mut final_score = None;
    for _ in 0..600 {
        let report = session.update(DT, IDLE, &mut audio);
        for event in &report.events {
            if let WorldEvent::NewHighScore(score) = event {
                saves.save_or_log(&SaveState {
                    high_score: *score,
                    high_score_date: Utc::now(),
                });
            }
            if let WorldEvent::Died { score } = event {
                final_score = Some(*score);
            }
        }
        if session.screen() == Screen::GameOver {
            break;
        }
    }

    let final_score = final_score.expect("trex never crashed");
    assert_eq!(session.screen(), Screen::GameOver);
    assert_eq!(audio.played.last(), Some(&Sound::Hit));

    let mut canvas = RecordingCanvas::new();
    session.world().draw(&mut canvas);
    assert!(canvas.kinds().contains(&SpriteKind::TrexDead));

    // the record survives into a fresh session
    let loaded = saves.load_or_none().expect("high score was saved");
    assert_eq!(loaded.high_score, final_score);
    let mut next = new_session(32);
    next.world_mut()
        .score_board_mut()
        .set_hi_score(loaded.high_score);
    assert_eq!(next.world().score_board().hi_score(), final_score);

    assert!(session.replay(&mut audio));
    assert_eq!(session.screen(), Screen::Playing);
    assert_eq!(session.world().score_board().score(), 0.0);
    assert_eq!(session.world().score_board().hi_score(), final_score);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_same_seed_same_game() {
    let play = |seed| {
        let mut session = new_session(seed);
        let mut audio = NullAudio::default();
        session.update(DT, JUMP, &mut audio);
        let mut events = Vec::new();
        for i in 0..60 * 20 {
            // hop every second
            let input = if i % 60 == 0 { JUMP } else { IDLE };
            events.extend(session.update(DT, input, &mut audio).events);
        }
        (events, session.world().score_board().score())
    };
    assert_eq!(play(4), play(4));
}
