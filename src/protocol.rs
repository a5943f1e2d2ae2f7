use crate::game::types::{
    ArenaConfig, Direction, LeaderboardEntry, Pellet, Phase, Player, PowerUp, Snake,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    Input { direction: Direction },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: Uuid,
    pub snake: Snake,
    pub score: i64,
    pub is_alive: bool,
}

impl PlayerView {
    pub fn of(player: &Player) -> Self {
        Self {
            id: player.id,
            snake: player.snake.clone(),
            score: player.score,
            is_alive: player.alive,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundStatus {
    pub phase: Phase,
    pub time_remaining: i64,
    pub round: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    Joined {
        player_id: Uuid,
        snake: Snake,
        arena: ArenaConfig,
    },
    #[serde(rename_all = "camelCase")]
    GameUpdate {
        timestamp: i64,
        players: Vec<PlayerView>,
        pellets: Vec<Pellet>,
        power_ups: Vec<PowerUp>,
        leaderboard: Vec<LeaderboardEntry>,
        game_state: RoundStatus,
    },
    RoundStarted {
        round: u32,
        duration: i64,
    },
    RoundEnded {
        round: u32,
        leaderboard: Vec<LeaderboardEntry>,
    },
    ArenaReset {
        round: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::Position;

    #[test]
    fn input_messages_parse_from_client_json() {
        let message: ClientMessage =
            serde_json::from_str(r#"{"type":"input","direction":"left"}"#).expect("message");
        match message {
            ClientMessage::Input { direction } => assert_eq!(direction, Direction::Left),
        }
    }

    #[test]
    fn unknown_client_messages_fail_to_parse() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"teleport"}"#).is_err());
    }

    #[test]
    fn game_updates_use_the_original_event_names() {
        let snake = Snake::new(Position { x: 3, y: 4 }, "#FF6B6B".to_string());
        let player = Player {
            id: Uuid::new_v4(),
            snake: snake.clone(),
            score: 20,
            alive: true,
            last_input: 0,
            join_seq: 0,
        };
        let message = ServerMessage::GameUpdate {
            timestamp: 1_234,
            players: vec![PlayerView::of(&player)],
            pellets: vec![Pellet::normal(Position { x: 1, y: 1 })],
            power_ups: Vec::new(),
            leaderboard: Vec::new(),
            game_state: RoundStatus {
                phase: Phase::Playing,
                time_remaining: 45_000,
                round: 2,
            },
        };

        let value: serde_json::Value =
            serde_json::to_value(&message).expect("serializable update");
        assert_eq!(value["type"], "gameUpdate");
        assert_eq!(value["gameState"]["timeRemaining"], 45_000);
        assert_eq!(value["gameState"]["phase"], "playing");
        assert_eq!(value["players"][0]["isAlive"], true);
        assert_eq!(value["players"][0]["snake"]["nextDirection"], "right");
        assert_eq!(value["pellets"][0]["type"], "normal");
        // Pellet expiry is absent from the wire unless set.
        assert!(value["pellets"][0].get("expiresAt").is_none());
    }

    #[test]
    fn lifecycle_events_carry_round_and_payload() {
        let started: serde_json::Value = serde_json::to_value(ServerMessage::RoundStarted {
            round: 3,
            duration: 90_000,
        })
        .expect("round started");
        assert_eq!(started["type"], "roundStarted");
        assert_eq!(started["duration"], 90_000);

        let reset: serde_json::Value =
            serde_json::to_value(ServerMessage::ArenaReset { round: 4 }).expect("arena reset");
        assert_eq!(reset["type"], "arenaReset");
        assert_eq!(reset["round"], 4);
    }
}
