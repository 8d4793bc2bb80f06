//! Keyboard input mapping

use crate::Direction;

/// Map a key to a paddle direction; unrelated keys map to `None`
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" | "w" | "W" => Some(Direction::Up),
        "ArrowDown" | "s" | "S" => Some(Direction::Down),
        "d" | "D" => Some(Direction::Idle),
        _ => None,
    }
}
