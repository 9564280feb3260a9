// World dimensions (world pixels, the sprite atlas scale)
pub const WINDOW_WIDTH: f32 = 600.0;
pub const WINDOW_HEIGHT: f32 = 150.0;

// Trex placement
pub const TREX_START_POS_X: f32 = 1.0;
pub const TREX_START_POS_Y: f32 = WINDOW_HEIGHT - 16.0 - 52.0; // sprite top when standing on the ground

// Ground tiles
pub const GROUND_TILE_POS_Y: f32 = 119.0;
pub const GROUND_TILE_WIDTH: f32 = 600.0;
pub const GROUND_TILE_HEIGHT: f32 = 14.0;

// Score board placement
pub const SCORE_BOARD_POS_X: f32 = WINDOW_WIDTH - 130.0;
pub const SCORE_BOARD_POS_Y: f32 = 10.0;

// Draw orders: lower is painted first
pub const GROUND_DRAW_ORDER: i32 = 3;
pub const CLOUD_DRAW_ORDER: i32 = -1;
pub const STAR_DRAW_ORDER: i32 = -2;
pub const MOON_DRAW_ORDER: i32 = -3;
pub const OBSTACLE_DRAW_ORDER: i32 = 12;
pub const TREX_DRAW_ORDER: i32 = 10;
pub const SCORE_BOARD_DRAW_ORDER: i32 = 100;

// Simulation timing
pub const FRAME_MS: u64 = 16; // ~60 FPS
pub const MAX_FRAME_DT: f32 = 0.1; // clamp after pauses/lag

// Save files
pub const SAVE_DIR_NAME: &str = ".trex-runner";
pub const SAVE_FILE_NAME: &str = "save.json";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = "trex-runner.log";
