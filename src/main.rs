mod audio;
mod build_info;
mod config;
mod constants;
mod entities;
mod geometry;
mod graphics;
mod input;
mod save_manager;
mod session;
mod simulation;
mod ui;
mod utils;

use audio::TerminalBell;
use chrono::Utc;
use config::GameConfig;
use constants::*;
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use input::KeyTracker;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::CrosstermBackend, Terminal};
use save_manager::{SaveManager, SaveState};
use session::{Screen, Session};
use simulation::{World, WorldEvent};
use std::io;
use std::time::{Duration, Instant};

fn print_help() {
    println!("T-Rex Runner - Terminal Endless Runner\n");
    println!("Usage: trex-runner [options]\n");
    println!("Options:");
    println!("  --seed <n>  Use a fixed random seed");
    println!("  --version   Show version information");
    println!("  --help      Show this help message\n");
    println!("Keys: Space/Up jump, Down duck, M mute, Q quit");
}

fn main() -> io::Result<()> {
    // Handle CLI arguments
    let args: Vec<String> = std::env::args().collect();
    let mut seed: Option<u64> = None;

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" | "-v" => {
                println!("{}", build_info::version_line());
                std::process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--seed" => match args.get(2).and_then(|s| s.parse().ok()) {
                Some(n) => seed = Some(n),
                None => {
                    eprintln!("--seed needs a number");
                    std::process::exit(1);
                }
            },
            other => {
                eprintln!("Unknown command: {}", other);
                eprintln!("Run 'trex-runner --help' for usage.");
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = utils::logging::init() {
        eprintln!("Warning: logging disabled: {}", e);
    }
    log::info!("Starting {}", build_info::version_line());

    let config = GameConfig::load();
    let save_manager = match SaveManager::new() {
        Ok(manager) => Some(manager),
        Err(e) => {
            log::warn!("High scores will not be saved: {}", e);
            None
        }
    };

    let rng = match seed {
        Some(n) => StdRng::seed_from_u64(n),
        None => StdRng::from_entropy(),
    };
    let mut world = World::new(config, rng);
    if let Some(state) = save_manager.as_ref().and_then(|m| m.load_or_none()) {
        log::info!(
            "Loaded high score {} from {}",
            state.high_score,
            state.high_score_date.format("%Y-%m-%d")
        );
        world.score_board_mut().set_hi_score(state.high_score);
    }
    let mut session = Session::new(world);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    // Key release events where the terminal supports them; the hold window
    // covers the rest.
    let keyboard_enhanced = stdout
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut session, save_manager.as_ref());

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = terminal.backend_mut().execute(PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &mut Session<StdRng>,
    save_manager: Option<&SaveManager>,
) -> io::Result<()> {
    let mut keys = KeyTracker::new();
    let mut audio = TerminalBell::new(io::stdout());
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| ui::draw_ui(frame, session))?;

        keys.next_frame();
        let mut replay_requested = false;
        while event::poll(Duration::from_millis(0))? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(())
                    }
                    KeyCode::Char('m') => audio.set_muted(!audio.is_muted()),
                    KeyCode::Enter | KeyCode::Char(' ') if session.screen() == Screen::GameOver => {
                        replay_requested = true
                    }
                    _ => {}
                }
            }
            keys.handle_event(&key);
        }

        // the replay key must not also count as the first jump
        if replay_requested && session.replay(&mut audio) {
            keys.clear();
        }

        let now = Instant::now();
        let dt = now.duration_since(last_tick).as_secs_f32().min(MAX_FRAME_DT);
        last_tick = now;

        let report = session.update(dt, keys.snapshot(), &mut audio);
        for event in &report.events {
            if let WorldEvent::NewHighScore(score) = event {
                if let Some(manager) = save_manager {
                    manager.save_or_log(&SaveState {
                        high_score: *score,
                        high_score_date: Utc::now(),
                    });
                }
            }
        }

        let elapsed = last_tick.elapsed();
        let frame = Duration::from_millis(FRAME_MS);
        if elapsed < frame {
            std::thread::sleep(frame - elapsed);
        }
    }
}
