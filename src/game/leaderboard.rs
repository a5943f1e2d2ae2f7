use super::constants::LEADERBOARD_SIZE;
use super::types::{LeaderboardEntry, Player};
use std::collections::HashMap;
use uuid::Uuid;

/// Ranks every player, alive or dead, by score. The stable sort over join
/// order is the tiebreaker contract: players with equal scores keep their
/// insertion order.
pub fn compute(players: &HashMap<Uuid, Player>) -> Vec<LeaderboardEntry> {
    let mut ordered: Vec<&Player> = players.values().collect();
    ordered.sort_unstable_by_key(|player| player.join_seq);
    ordered.sort_by(|a, b| b.score.cmp(&a.score));

    ordered
        .into_iter()
        .take(LEADERBOARD_SIZE)
        .enumerate()
        .map(|(index, player)| LeaderboardEntry {
            player_id: player.id,
            score: player.score,
            length: player.snake.segments.len(),
            rank: index + 1,
        })
        .collect()
}
