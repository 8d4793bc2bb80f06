use glam::Vec2;

use crate::geometry::{is_paddle_at_bottom_bound, is_paddle_at_top_bound, reflected_ball_velocity};
use crate::Params;

pub use proto::Direction;

/// Which end of the board a paddle guards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    pub fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Paddle - x is fixed, y moves one step per tick while not idle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    pub x: f32,
    pub y: f32, // top edge
    pub direction: Direction,
}

impl Paddle {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            direction: Direction::Idle,
        }
    }

    /// Paddle at its starting spot for the given side
    pub fn spawn(side: Side) -> Self {
        match side {
            Side::Left => Self::new(Params::LEFT_PADDLE_X, Params::LEFT_PADDLE_Y),
            Side::Right => Self::new(Params::RIGHT_PADDLE_X, Params::RIGHT_PADDLE_Y),
        }
    }

    pub fn move_one_step(&mut self) {
        match self.direction {
            Direction::Up => self.y -= Params::PADDLE_STEP,
            Direction::Down => self.y += Params::PADDLE_STEP,
            Direction::Idle => {}
        }
    }

    /// Turn around at the top or bottom wall. Returns true if direction changed.
    ///
    /// y is never clamped, so a paddle may sit up to one step past the wall
    /// for a single tick.
    pub fn bounce_off_bounds(&mut self) -> bool {
        let previous = self.direction;
        if is_paddle_at_top_bound(self.y) {
            self.direction = Direction::Down;
        } else if is_paddle_at_bottom_bound(self.y) {
            self.direction = Direction::Up;
        }
        previous != self.direction
    }

    pub fn left_edge(&self) -> f32 {
        self.x
    }

    pub fn right_edge(&self) -> f32 {
        self.x + Params::PADDLE_WIDTH
    }

    pub fn top_edge(&self) -> f32 {
        self.y
    }

    pub fn bottom_edge(&self) -> f32 {
        self.y + Params::PADDLE_HEIGHT
    }
}

/// Ball component - the pong ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2, // per tick
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel }
    }

    pub fn radius(&self) -> f32 {
        Params::BALL_RADIUS
    }

    /// Bounce off walls, then move one tick. Returns true if a wall was hit.
    pub fn advance(&mut self) -> bool {
        let reflected = reflected_ball_velocity(self.pos, self.vel);
        let hit_wall = reflected != self.vel;
        self.vel = reflected;
        self.pos += self.vel;
        hit_wall
    }

    pub fn reflect_horizontally(&mut self) {
        self.vel.x = -self.vel.x;
    }

    pub fn left_edge(&self) -> f32 {
        self.pos.x - Params::BALL_RADIUS
    }

    pub fn right_edge(&self) -> f32 {
        self.pos.x + Params::BALL_RADIUS
    }

    pub fn top_edge(&self) -> f32 {
        self.pos.y - Params::BALL_RADIUS
    }

    pub fn bottom_edge(&self) -> f32 {
        self.pos.y + Params::BALL_RADIUS
    }
}

impl Default for Ball {
    fn default() -> Self {
        Self::new(
            Vec2::new(Params::BALL_START_X, Params::BALL_START_Y),
            Vec2::new(Params::BALL_DELTA_X, Params::BALL_DELTA_Y),
        )
    }
}
