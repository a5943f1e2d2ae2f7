use super::spawner;
use super::types::{ArenaConfig, Pellet, Player};
use rand::Rng;
use std::collections::HashMap;
use uuid::Uuid;

/// Advances every living snake one cell along its committed direction.
/// Eating a pellet skips the tail pop for that tick, so length changes by
/// at most one. Each consumption is paid back with a replacement spawn
/// once the movement pass is done.
pub fn step(
    players: &mut HashMap<Uuid, Player>,
    pellets: &mut Vec<Pellet>,
    arena: &ArenaConfig,
    rng: &mut impl Rng,
) -> usize {
    let mut order: Vec<(u64, Uuid)> = players
        .values()
        .filter(|player| player.alive)
        .map(|player| (player.join_seq, player.id))
        .collect();
    order.sort_unstable();

    let mut consumed = 0;
    for (_, id) in order {
        let Some(player) = players.get_mut(&id) else {
            continue;
        };
        let snake = &mut player.snake;
        snake.direction = snake.next_direction;
        let Some(head) = snake.head() else { continue };
        let new_head = head.stepped(snake.direction);
        snake.segments.push_front(new_head);

        // Only the head cell is checked, so at most one pellet per tick.
        if let Some(index) = pellets
            .iter()
            .position(|pellet| pellet.position == new_head)
        {
            let pellet = pellets.swap_remove(index);
            player.score += pellet.value;
            consumed += 1;
        } else {
            snake.segments.pop_back();
        }
    }

    for _ in 0..consumed {
        spawner::spawn_pellet(players, pellets, arena, rng);
    }
    consumed
}
