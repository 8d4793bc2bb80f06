//! Boundary checks, wall reflection and paddle hit tests
//!
//! All tests are inclusive: touching a wall or a paddle edge counts.

use glam::Vec2;

use crate::{Ball, Paddle, Params};

pub fn is_paddle_at_top_bound(y: f32) -> bool {
    y <= 0.0
}

pub fn is_paddle_at_bottom_bound(y: f32) -> bool {
    y + Params::PADDLE_HEIGHT >= Params::BOARD_HEIGHT
}

pub fn is_ball_at_top_bound(y: f32) -> bool {
    y - Params::BALL_RADIUS <= 0.0
}

pub fn is_ball_at_bottom_bound(y: f32) -> bool {
    y + Params::BALL_RADIUS >= Params::BOARD_HEIGHT
}

pub fn is_ball_at_left_bound(x: f32) -> bool {
    x - Params::BALL_RADIUS <= 0.0
}

pub fn is_ball_at_right_bound(x: f32) -> bool {
    x + Params::BALL_RADIUS >= Params::BOARD_WIDTH
}

/// Velocity after bouncing off any wall the ball is touching
///
/// Each axis flips independently, so a corner flips both.
pub fn reflected_ball_velocity(pos: Vec2, vel: Vec2) -> Vec2 {
    let mut out = vel;
    if is_ball_at_left_bound(pos.x) || is_ball_at_right_bound(pos.x) {
        out.x = -vel.x;
    }
    if is_ball_at_top_bound(pos.y) || is_ball_at_bottom_bound(pos.y) {
        out.y = -vel.y;
    }
    out
}

pub fn point_in_range(point: f32, range_start: f32, range_end: f32) -> bool {
    point >= range_start && point <= range_end
}

fn extents_overlap(a_start: f32, a_end: f32, b_start: f32, b_end: f32) -> bool {
    point_in_range(a_start, b_start, b_end)
        || point_in_range(a_end, b_start, b_end)
        || point_in_range(b_start, a_start, a_end)
}

/// AABB hit test: the ball counts as its bounding square
///
/// No sweep: a ball stepping further than a paddle is wide in one tick can
/// pass straight through it.
pub fn ball_collides_with_paddle(ball: &Ball, paddle: &Paddle) -> bool {
    let x_overlap = extents_overlap(
        ball.left_edge(),
        ball.right_edge(),
        paddle.left_edge(),
        paddle.right_edge(),
    );
    let y_overlap = extents_overlap(
        ball.top_edge(),
        ball.bottom_edge(),
        paddle.top_edge(),
        paddle.bottom_edge(),
    );
    x_overlap && y_overlap
}

/// True while the ball is still travelling towards the paddle's centre line
///
/// A ball can overlap a paddle for more than one tick; once reflected it is
/// moving away and must not be turned back again.
pub fn ball_approaches_paddle(ball: &Ball, paddle: &Paddle) -> bool {
    let centre = (paddle.left_edge() + paddle.right_edge()) / 2.0;
    (ball.pos.x <= centre && ball.vel.x > 0.0) || (ball.pos.x >= centre && ball.vel.x < 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ball_at(x: f32, y: f32) -> Ball {
        Ball::new(Vec2::new(x, y), Vec2::new(7.0, 5.0))
    }

    #[test]
    fn test_paddle_bounds() {
        assert!(is_paddle_at_top_bound(0.0));
        assert!(is_paddle_at_top_bound(-3.0));
        assert!(!is_paddle_at_top_bound(1.0));
        assert!(is_paddle_at_bottom_bound(360.0));
        assert!(!is_paddle_at_bottom_bound(359.0));
    }

    #[test]
    fn test_ball_bounds_offset_by_radius() {
        assert!(is_ball_at_top_bound(6.0));
        assert!(!is_ball_at_top_bound(7.0));
        assert!(is_ball_at_bottom_bound(394.0));
        assert!(is_ball_at_left_bound(6.0));
        assert!(is_ball_at_right_bound(594.0));
        assert!(!is_ball_at_right_bound(593.0));
    }

    #[test]
    fn test_reflection_inside_board_is_unchanged() {
        let vel = Vec2::new(7.0, 5.0);
        assert_eq!(reflected_ball_velocity(Vec2::new(300.0, 200.0), vel), vel);
    }

    #[test]
    fn test_reflection_in_corner_flips_both_axes() {
        let vel = Vec2::new(-7.0, -5.0);
        let out = reflected_ball_velocity(Vec2::new(3.0, 2.0), vel);
        assert_eq!(out, Vec2::new(7.0, 5.0));
    }

    #[test]
    fn test_point_in_range_is_inclusive() {
        assert!(point_in_range(50.0, 50.0, 60.0));
        assert!(point_in_range(60.0, 50.0, 60.0));
        assert!(!point_in_range(60.5, 50.0, 60.0));
        assert!(!point_in_range(55.0, 60.0, 50.0), "Inverted range is empty");
    }

    #[test]
    fn test_collision_scenario_ball_beside_paddle() {
        let paddle = Paddle::new(50.0, 100.0);
        assert!(ball_collides_with_paddle(&ball_at(56.0, 120.0), &paddle));
    }

    #[test]
    fn test_collision_when_ball_straddles_paddle() {
        // Ball is wider than the paddle: neither ball edge lies inside it
        let paddle = Paddle::new(50.0, 100.0);
        assert!(ball_collides_with_paddle(&ball_at(55.0, 120.0), &paddle));
    }

    #[test]
    fn test_collision_touching_corner_is_inclusive() {
        let paddle = Paddle::new(50.0, 100.0);
        // Ball's right edge on x=50, bottom edge on y=100: the top-left corner
        assert!(ball_collides_with_paddle(&ball_at(44.0, 94.0), &paddle));
        // Bottom-right corner (60, 140)
        assert!(ball_collides_with_paddle(&ball_at(66.0, 146.0), &paddle));
    }

    #[test]
    fn test_no_collision_one_unit_past_corner() {
        let paddle = Paddle::new(50.0, 100.0);
        assert!(!ball_collides_with_paddle(&ball_at(43.0, 94.0), &paddle));
        assert!(!ball_collides_with_paddle(&ball_at(44.0, 93.0), &paddle));
        assert!(!ball_collides_with_paddle(&ball_at(67.0, 146.0), &paddle));
        assert!(!ball_collides_with_paddle(&ball_at(66.0, 147.0), &paddle));
    }

    #[test]
    fn test_ball_leaving_paddle_is_not_approaching() {
        let paddle = Paddle::new(50.0, 100.0);
        let incoming = Ball::new(Vec2::new(66.0, 120.0), Vec2::new(-7.0, 5.0));
        let outgoing = Ball::new(Vec2::new(66.0, 120.0), Vec2::new(7.0, 5.0));
        assert!(ball_approaches_paddle(&incoming, &paddle));
        assert!(!ball_approaches_paddle(&outgoing, &paddle));

        // Same from the other side of the paddle
        let from_left = Ball::new(Vec2::new(44.0, 120.0), Vec2::new(7.0, 5.0));
        assert!(ball_approaches_paddle(&from_left, &paddle));
        assert!(!ball_approaches_paddle(&Ball::new(from_left.pos, -from_left.vel), &paddle));
    }

    proptest! {
        #[test]
        fn prop_reflecting_twice_restores_velocity(
            x in 0.0f32..600.0,
            y in 0.0f32..400.0,
            dx in -10.0f32..10.0,
            dy in -10.0f32..10.0,
        ) {
            let pos = Vec2::new(x, y);
            let vel = Vec2::new(dx, dy);
            let once = reflected_ball_velocity(pos, vel);
            prop_assert_eq!(reflected_ball_velocity(pos, once), vel);
        }
    }
}
