use super::types::Direction;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct InputEvent {
    pub player_id: Uuid,
    pub direction: Direction,
    pub received_at: i64,
}

/// A snake may turn anywhere except straight back into its own neck.
/// Proposed turns are checked against the committed direction, not the
/// pending one, so several inputs queued in one tick window all validate
/// against the same baseline.
pub fn is_valid_turn(committed: Direction, proposed: Direction) -> bool {
    proposed != committed.opposite()
}
