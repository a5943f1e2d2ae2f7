use super::constants::DEATH_PELLET_CHANCE;
use super::types::{ArenaConfig, Pellet, Player, Position};
use rand::Rng;
use std::collections::HashMap;
use uuid::Uuid;

/// Resolves wall, self, and cross-snake collisions against a frozen copy of
/// the post-movement segment lists, so the outcome does not depend on
/// iteration order. A player killed this pass keeps hazarding everyone else
/// evaluated in the same pass; its segments stay in place until respawn.
///
/// Checks are cell-exact and non-swept: two heads that swap cells in one
/// tick pass through each other undetected.
pub fn resolve(
    players: &mut HashMap<Uuid, Player>,
    pellets: &mut Vec<Pellet>,
    arena: &ArenaConfig,
    rng: &mut impl Rng,
) -> Vec<Uuid> {
    let mut frozen: Vec<(u64, Uuid, Vec<Position>)> = players
        .values()
        .filter(|player| player.alive)
        .map(|player| {
            (
                player.join_seq,
                player.id,
                player.snake.segments.iter().copied().collect(),
            )
        })
        .collect();
    frozen.sort_unstable_by_key(|(join_seq, _, _)| *join_seq);

    let mut killed = Vec::new();
    for (_, id, segments) in &frozen {
        let Some(head) = segments.first().copied() else {
            continue;
        };

        let hit_wall = !arena.contains(head);
        let hit_self = segments.iter().skip(1).any(|segment| *segment == head);
        let hit_other = frozen.iter().any(|(_, other_id, other_segments)| {
            other_id != id && other_segments.iter().any(|segment| *segment == head)
        });

        if hit_wall || hit_self || hit_other {
            killed.push(*id);
        }
    }

    for id in &killed {
        kill_player(players, pellets, *id, rng);
    }
    killed
}

fn kill_player(
    players: &mut HashMap<Uuid, Player>,
    pellets: &mut Vec<Pellet>,
    id: Uuid,
    rng: &mut impl Rng,
) {
    let Some(player) = players.get_mut(&id) else {
        return;
    };
    player.alive = false;
    for segment in &player.snake.segments {
        if rng.gen::<f64>() < DEATH_PELLET_CHANCE {
            pellets.push(Pellet::normal(*segment));
        }
    }
    tracing::debug!(player_id = %id, score = player.score, "player died");
}
