pub const TICK_MS: u64 = 50;
pub const TICK_RATE: u32 = 20;
pub const ROUND_DURATION_MS: i64 = 90_000;
pub const ROUND_RESET_DELAY_MS: u64 = 10_000;
pub const ROUND_START_DELAY_MS: u64 = 5_000;

pub const ARENA_WIDTH: i32 = 80;
pub const ARENA_HEIGHT: i32 = 60;
pub const CELL_SIZE: i32 = 10;
pub const SPAWN_MARGIN: i32 = 10;

pub const INITIAL_PELLET_COUNT: usize = 50;
pub const PELLET_VALUE: i64 = 10;
pub const DEATH_PELLET_CHANCE: f64 = 0.7;

pub const POWER_UP_SPAWN_CHANCE: f64 = 0.005;
pub const POWER_UP_DURATION_MS: i64 = 5_000;
pub const POWER_UP_LIFETIME_MS: i64 = 30_000;

pub const MAX_SPAWN_ATTEMPTS: usize = 100;
pub const LEADERBOARD_SIZE: usize = 10;
pub const TICK_SAMPLE_WINDOW: usize = 100;

pub const COLOR_POOL: [&str; 10] = [
    "#FF6B6B",
    "#4ECDC4",
    "#45B7D1",
    "#96CEB4",
    "#FECA57",
    "#FF9FF3",
    "#54A0FF",
    "#5F27CD",
    "#00D2D3",
    "#FF9F43",
];
