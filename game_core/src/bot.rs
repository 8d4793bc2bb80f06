use crate::{Ball, Direction};

/// Pick a new direction for a bot paddle, or `None` to keep the current one
///
/// Strategy: follow the vertical direction the ball is travelling. The bot
/// is rate-limited by its timer, which is what makes it beatable.
pub fn decide(ball: &Ball, current: Direction) -> Option<Direction> {
    let desired = if ball.vel.y < 0.0 {
        Direction::Up
    } else if ball.vel.y > 0.0 {
        Direction::Down
    } else {
        return None;
    };

    (desired != current).then_some(desired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn ball_moving(dy: f32) -> Ball {
        Ball::new(Vec2::new(300.0, 200.0), Vec2::new(7.0, dy))
    }

    #[test]
    fn test_follows_ball_upwards() {
        assert_eq!(decide(&ball_moving(-5.0), Direction::Idle), Some(Direction::Up));
        assert_eq!(decide(&ball_moving(-5.0), Direction::Down), Some(Direction::Up));
    }

    #[test]
    fn test_follows_ball_downwards() {
        assert_eq!(decide(&ball_moving(5.0), Direction::Up), Some(Direction::Down));
    }

    #[test]
    fn test_no_change_when_already_matching() {
        assert_eq!(decide(&ball_moving(-5.0), Direction::Up), None);
        assert_eq!(decide(&ball_moving(5.0), Direction::Down), None);
    }

    #[test]
    fn test_flat_ball_leaves_paddle_alone() {
        assert_eq!(decide(&ball_moving(0.0), Direction::Idle), None);
        assert_eq!(decide(&ball_moving(0.0), Direction::Up), None);
    }
}
