use super::constants::{ARENA_HEIGHT, ARENA_WIDTH, CELL_SIZE, PELLET_VALUE};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn stepped(self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snake {
    pub segments: VecDeque<Position>,
    pub direction: Direction,
    pub next_direction: Direction,
    pub color: String,
}

impl Snake {
    pub fn new(spawn: Position, color: String) -> Self {
        Self {
            segments: VecDeque::from([spawn]),
            direction: Direction::Right,
            next_direction: Direction::Right,
            color,
        }
    }

    pub fn head(&self) -> Option<Position> {
        self.segments.front().copied()
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: Uuid,
    pub snake: Snake,
    pub score: i64,
    pub alive: bool,
    pub last_input: i64,
    pub join_seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PelletKind {
    Normal,
    Speed,
    Shrink,
    Mine,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pellet {
    pub id: Uuid,
    pub position: Position,
    #[serde(rename = "type")]
    pub kind: PelletKind,
    pub value: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl Pellet {
    pub fn normal(position: Position) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            kind: PelletKind::Normal,
            value: PELLET_VALUE,
            expires_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerUpKind {
    SpeedBoost,
    Invincible,
    GrowthBoost,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::SpeedBoost,
        PowerUpKind::Invincible,
        PowerUpKind::GrowthBoost,
    ];
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerUp {
    pub id: Uuid,
    pub position: Position,
    #[serde(rename = "type")]
    pub kind: PowerUpKind,
    pub duration: i64,
    pub expires_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Waiting,
    Playing,
    Ending,
    Resetting,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub player_id: Uuid,
    pub score: i64,
    pub length: usize,
    pub rank: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArenaConfig {
    pub width: i32,
    pub height: i32,
    pub cell_size: i32,
}

impl ArenaConfig {
    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0 && position.x < self.width && position.y >= 0 && position.y < self.height
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            cell_size: CELL_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_deltas_are_unit_steps() {
        assert_eq!(
            Position { x: 5, y: 5 }.stepped(Direction::Up),
            Position { x: 5, y: 4 }
        );
        assert_eq!(
            Position { x: 5, y: 5 }.stepped(Direction::Down),
            Position { x: 5, y: 6 }
        );
        assert_eq!(
            Position { x: 5, y: 5 }.stepped(Direction::Left),
            Position { x: 4, y: 5 }
        );
        assert_eq!(
            Position { x: 5, y: 5 }.stepped(Direction::Right),
            Position { x: 6, y: 5 }
        );
    }

    #[test]
    fn opposite_is_an_involution() {
        for direction in [
            Direction::Up,
            Direction::Right,
            Direction::Down,
            Direction::Left,
        ] {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
        }
    }

    #[test]
    fn wire_names_match_the_client_protocol() {
        assert_eq!(
            serde_json::to_string(&Direction::Up).expect("direction"),
            "\"up\""
        );
        assert_eq!(
            serde_json::to_string(&Phase::Waiting).expect("phase"),
            "\"waiting\""
        );
        assert_eq!(
            serde_json::to_string(&PelletKind::Normal).expect("pellet kind"),
            "\"normal\""
        );
        assert_eq!(
            serde_json::to_string(&PowerUpKind::SpeedBoost).expect("power-up kind"),
            "\"speed-boost\""
        );
    }

    #[test]
    fn arena_bounds_are_half_open() {
        let arena = ArenaConfig::default();
        assert!(arena.contains(Position { x: 0, y: 0 }));
        assert!(arena.contains(Position { x: 79, y: 59 }));
        assert!(!arena.contains(Position { x: 80, y: 59 }));
        assert!(!arena.contains(Position { x: 79, y: 60 }));
        assert!(!arena.contains(Position { x: -1, y: 0 }));
    }
}
