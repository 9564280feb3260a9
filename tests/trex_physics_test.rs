use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use trex_runner::config::TrexConfig;
use trex_runner::constants::{TREX_START_POS_X, TREX_START_POS_Y};
use trex_runner::entities::{Trex, TrexEvent, TrexState};
use trex_runner::geometry::Vec2;

fn running_trex(config: TrexConfig) -> Trex {
    let mut trex = Trex::new(config, Vec2::new(TREX_START_POS_X, TREX_START_POS_Y));
    trex.initialize();
    trex
}

#[test]
fn test_jump_always_lands_for_any_time_step() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    for dt in [1.0 / 144.0, 1.0 / 60.0, 1.0 / 30.0, 0.1, 0.25] {
        let mut trex = running_trex(TrexConfig::default());
        assert!(trex.begin_jump());

        let mut landed = false;
        for _ in 0..1000 {
            if trex.update(dt, &mut rng) == Some(TrexEvent::JumpCompleted) {
                landed = true;
                break;
            }
            assert!(trex.position().y <= trex.ground_line());
        }

        assert!(landed, "jump with dt={} never landed", dt);
        assert_eq!(trex.state(), TrexState::Running);
        assert_eq!(trex.position().y, trex.ground_line());
        assert_eq!(trex.vertical_velocity(), 0.0);
    }
}

#[test]
fn test_cancel_before_min_height_changes_nothing() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let mut trex = running_trex(TrexConfig::default());
    trex.begin_jump();
    trex.update(0.01, &mut rng);
    let velocity = trex.vertical_velocity();

    assert!(!trex.cancel_jump());
    assert_eq!(trex.state(), TrexState::Jumping);
    assert_eq!(trex.vertical_velocity(), velocity);
}

#[test]
fn test_cancel_after_min_height_starts_falling() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut trex = running_trex(TrexConfig::default());
    trex.begin_jump();
    // 0.15 s of jump is well above 40 px and still rising
    for _ in 0..15 {
        trex.update(0.01, &mut rng);
    }
    assert_eq!(trex.state(), TrexState::Jumping);

    assert!(trex.cancel_jump());
    assert_eq!(trex.state(), TrexState::Falling);
    assert_eq!(trex.vertical_velocity(), -100.0);
}

#[test]
fn test_speed_is_monotonic_and_capped() {
    let config = TrexConfig {
        acceleration: 500.0,
        max_speed: 400.0,
        ..TrexConfig::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut trex = running_trex(config);

    let mut previous = trex.speed();
    for i in 0..200 {
        // mix in jumps and ducks; speed keeps growing in every live state
        match i % 50 {
            0 => {
                trex.begin_jump();
            }
            30 => {
                trex.duck();
            }
            40 => {
                trex.get_up();
            }
            _ => {}
        }
        trex.update(1.0 / 60.0, &mut rng);
        assert!(trex.speed() >= previous);
        assert!(trex.speed() <= 400.0);
        previous = trex.speed();
    }
    assert_eq!(trex.speed(), 400.0);

    trex.initialize();
    assert_eq!(trex.speed(), 280.0);
}

#[test]
fn test_idle_trex_does_not_accelerate() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut trex = Trex::new(
        TrexConfig::default(),
        Vec2::new(TREX_START_POS_X, TREX_START_POS_Y),
    );
    for _ in 0..120 {
        trex.update(1.0 / 60.0, &mut rng);
    }
    assert_eq!(trex.state(), TrexState::Idle);
    assert_eq!(trex.speed(), 280.0);
}

#[test]
fn test_duck_for_one_tick_lowers_collision_box() {
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let mut trex = running_trex(TrexConfig::default());
    assert_eq!(trex.speed(), 280.0);
    let standing = trex.collision_box();
    let y = trex.position().y;

    assert!(trex.duck());
    trex.update(0.1, &mut rng);

    assert_eq!(trex.state(), TrexState::Ducking);
    let ducking = trex.collision_box();
    assert_eq!(ducking.height, standing.height - 20);
    assert_eq!(ducking.y, standing.y + 20);
    assert_eq!(trex.position().y, y);
}

#[test]
fn test_cannot_duck_or_jump_while_airborne() {
    let mut trex = running_trex(TrexConfig::default());
    trex.begin_jump();
    assert!(!trex.begin_jump());
    assert!(!trex.duck());
    assert!(trex.drop());
    assert_eq!(trex.state(), TrexState::Falling);
}

#[test]
fn test_dead_trex_ignores_everything() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut trex = running_trex(TrexConfig::default());
    assert_eq!(trex.die(), Some(TrexEvent::Died));
    assert_eq!(trex.die(), None);

    assert!(!trex.begin_jump());
    assert!(!trex.duck());
    assert_eq!(trex.update(0.1, &mut rng), None);
    assert!(!trex.is_alive());
}
