/// Fixed board geometry and timing for Pong
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Board
    pub const BOARD_WIDTH: f32 = 600.0;
    pub const BOARD_HEIGHT: f32 = 400.0;

    // Paddle
    pub const PADDLE_WIDTH: f32 = 10.0;
    pub const PADDLE_HEIGHT: f32 = 40.0;
    pub const PADDLE_STEP: f32 = 6.0; // units per tick
    pub const LEFT_PADDLE_X: f32 = 50.0;
    pub const LEFT_PADDLE_Y: f32 = 100.0;
    pub const RIGHT_PADDLE_X: f32 = 500.0;
    pub const RIGHT_PADDLE_Y: f32 = 50.0;

    // Ball
    pub const BALL_RADIUS: f32 = 6.0;
    pub const BALL_START_X: f32 = 225.0;
    pub const BALL_START_Y: f32 = 50.0;
    pub const BALL_DELTA_X: f32 = 7.0; // units per tick
    pub const BALL_DELTA_Y: f32 = 5.0;

    // Timers (ms)
    pub const TICK_MS: u64 = 50;
    pub const BOT_DECISION_MS: u64 = 1500;
    pub const ANNOUNCE_MS: u64 = 250;
    pub const MAX_CATCH_UP: u32 = 5; // ticks replayed after a stall
}
