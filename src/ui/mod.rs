pub mod canvas;
pub mod game_common;
pub mod runner_scene;

use crate::session::Session;
use rand::Rng;
use ratatui::Frame;

/// Main UI drawing function.
pub fn draw_ui<R: Rng>(frame: &mut Frame, session: &Session<R>) {
    let size = frame.size();
    runner_scene::render_runner_scene(frame, size, session);
}
