use rand::distributions::Alphanumeric;
use rand::{Rng, SeedableRng};

use crate::Side;

/// Random number generator
pub struct GameRng(pub rand::rngs::StdRng);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(rand::rngs::StdRng::from_entropy())
    }

    /// Opaque alphanumeric token
    pub fn token(&mut self, len: usize) -> String {
        (&mut self.0)
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Something the host (UI, audio) may want to react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Another player is waiting for an opponent
    JoinAvailable { host: String },
    /// Loops are running; `side` is the paddle this session controls
    GameStarted { side: Side },
    BallHitPaddle,
    BallHitWall,
}

/// Events raised since the host last drained them
#[derive(Debug, Clone, Default)]
pub struct Events {
    queue: Vec<SessionEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SessionEvent) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.queue)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
