pub mod collision;
pub mod constants;
pub mod engine;
pub mod input;
pub mod leaderboard;
pub mod metrics;
pub mod physics;
pub mod spawner;
pub mod types;
