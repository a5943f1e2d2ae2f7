use super::constants::{
    COLOR_POOL, INITIAL_PELLET_COUNT, MAX_SPAWN_ATTEMPTS, POWER_UP_DURATION_MS,
    POWER_UP_LIFETIME_MS, POWER_UP_SPAWN_CHANCE, SPAWN_MARGIN,
};
use super::types::{ArenaConfig, Pellet, Player, Position, PowerUp, PowerUpKind};
use rand::Rng;
use std::collections::HashMap;
use uuid::Uuid;

pub fn seed_pellets(
    players: &HashMap<Uuid, Player>,
    pellets: &mut Vec<Pellet>,
    arena: &ArenaConfig,
    rng: &mut impl Rng,
) {
    for _ in 0..INITIAL_PELLET_COUNT {
        spawn_pellet(players, pellets, arena, rng);
    }
}

/// Spawns one pellet at a random empty cell. Exhausting the attempt budget
/// skips the spawn; the population catches up on a later tick.
pub fn spawn_pellet(
    players: &HashMap<Uuid, Player>,
    pellets: &mut Vec<Pellet>,
    arena: &ArenaConfig,
    rng: &mut impl Rng,
) -> bool {
    let Some(position) = random_empty_cell(players, pellets, arena, rng) else {
        tracing::debug!("no empty cell for pellet, skipping spawn");
        return false;
    };
    pellets.push(Pellet::normal(position));
    true
}

pub fn sweep_expired_power_ups(power_ups: &mut Vec<PowerUp>, now: i64) -> usize {
    let before = power_ups.len();
    power_ups.retain(|power_up| power_up.expires_at > now);
    before - power_ups.len()
}

pub fn maybe_spawn_power_up(
    players: &HashMap<Uuid, Player>,
    pellets: &[Pellet],
    power_ups: &mut Vec<PowerUp>,
    arena: &ArenaConfig,
    rng: &mut impl Rng,
    now: i64,
) {
    if rng.gen::<f64>() >= POWER_UP_SPAWN_CHANCE {
        return;
    }
    let Some(position) = random_empty_cell(players, pellets, arena, rng) else {
        tracing::debug!("no empty cell for power-up, skipping spawn");
        return;
    };
    let kind = PowerUpKind::ALL[rng.gen_range(0..PowerUpKind::ALL.len())];
    power_ups.push(PowerUp {
        id: Uuid::new_v4(),
        position,
        kind,
        duration: POWER_UP_DURATION_MS,
        expires_at: now + POWER_UP_LIFETIME_MS,
    });
}

/// Uniform sampling with a fixed attempt budget. A cell counts as empty if
/// no living snake segment and no pellet sits on it; power-ups and dead
/// players' frozen segments are not considered.
pub fn random_empty_cell(
    players: &HashMap<Uuid, Player>,
    pellets: &[Pellet],
    arena: &ArenaConfig,
    rng: &mut impl Rng,
) -> Option<Position> {
    for _ in 0..MAX_SPAWN_ATTEMPTS {
        let candidate = Position {
            x: rng.gen_range(0..arena.width),
            y: rng.gen_range(0..arena.height),
        };
        if is_cell_empty(players, pellets, candidate) {
            return Some(candidate);
        }
    }
    None
}

fn is_cell_empty(players: &HashMap<Uuid, Player>, pellets: &[Pellet], position: Position) -> bool {
    for player in players.values() {
        if !player.alive {
            continue;
        }
        if player
            .snake
            .segments
            .iter()
            .any(|segment| *segment == position)
        {
            return false;
        }
    }
    !pellets.iter().any(|pellet| pellet.position == position)
}

pub fn random_spawn_point(arena: &ArenaConfig, rng: &mut impl Rng) -> Position {
    Position {
        x: rng.gen_range(SPAWN_MARGIN..arena.width - SPAWN_MARGIN),
        y: rng.gen_range(SPAWN_MARGIN..arena.height - SPAWN_MARGIN),
    }
}

pub fn random_color(rng: &mut impl Rng) -> String {
    COLOR_POOL[rng.gen_range(0..COLOR_POOL.len())].to_string()
}
