//! Performance checks for the per-tick hot loops.
//!
//! The cross-snake collision pass is brute-force, O(players² × average
//! segment length) per tick, and that bound is what caps the sustainable
//! player count at 20 Hz. These tests pin the cost against the 50 ms tick
//! budget so a regression shows up as a failure instead of server lag.

use mato_royale_backend::game::collision;
use mato_royale_backend::game::physics;
use mato_royale_backend::game::types::{ArenaConfig, Pellet, Player, Position, Snake};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashMap, VecDeque};
use std::time::Instant;
use uuid::Uuid;

const PLAYERS: usize = 50;
const SEGMENTS: usize = 40;
const TICK_BUDGET_MS: f64 = 50.0;

/// One straight snake per row, so nothing ever collides and every pass
/// pays the full scan.
fn make_arena_load() -> HashMap<Uuid, Player> {
    let mut players = HashMap::new();
    for row in 0..PLAYERS {
        let segments: VecDeque<Position> = (0..SEGMENTS)
            .map(|column| Position {
                x: (SEGMENTS - 1 - column) as i32,
                y: row as i32,
            })
            .collect();
        let mut snake = Snake::new(segments[0], "#ffffff".to_string());
        snake.segments = segments;
        let player = Player {
            id: Uuid::new_v4(),
            snake,
            score: 0,
            alive: true,
            last_input: 0,
            join_seq: row as u64,
        };
        players.insert(player.id, player);
    }
    players
}

#[test]
fn benchmark_collision_pass_under_full_load() {
    let mut players = make_arena_load();
    let arena = ArenaConfig::default();
    let mut pellets: Vec<Pellet> = Vec::new();
    let mut rng = StdRng::seed_from_u64(42);

    let iterations = 200;
    let start = Instant::now();
    for _ in 0..iterations {
        let killed = collision::resolve(&mut players, &mut pellets, &arena, &mut rng);
        assert!(killed.is_empty());
    }
    let duration = start.elapsed();
    let per_pass_ms = duration.as_secs_f64() * 1_000.0 / iterations as f64;

    println!(
        "collision: {} players x {} segments, {} passes in {:?} ({:.3} ms/pass)",
        PLAYERS, SEGMENTS, iterations, duration, per_pass_ms
    );
    assert!(
        per_pass_ms < TICK_BUDGET_MS,
        "collision pass costs {per_pass_ms:.3} ms, over the {TICK_BUDGET_MS} ms tick budget"
    );
}

#[test]
fn benchmark_movement_pass_under_full_load() {
    let mut players = make_arena_load();
    let arena = ArenaConfig::default();
    let mut pellets: Vec<Pellet> = Vec::new();
    let mut rng = StdRng::seed_from_u64(42);

    let iterations = 200;
    let start = Instant::now();
    for _ in 0..iterations {
        physics::step(&mut players, &mut pellets, &arena, &mut rng);
    }
    let duration = start.elapsed();
    let per_pass_ms = duration.as_secs_f64() * 1_000.0 / iterations as f64;

    println!(
        "movement: {} players x {} segments, {} passes in {:?} ({:.3} ms/pass)",
        PLAYERS, SEGMENTS, iterations, duration, per_pass_ms
    );
    assert!(
        per_pass_ms < TICK_BUDGET_MS,
        "movement pass costs {per_pass_ms:.3} ms, over the {TICK_BUDGET_MS} ms tick budget"
    );
}
