use js_sys::Date;
use proto::{peek_topic, DecodeError};
use worker::*;

// Abstract connection for testing
pub trait Peer {
    fn send_text(&self, frame: &str) -> Result<()>;
}

impl Peer for WebSocket {
    fn send_text(&self, frame: &str) -> Result<()> {
        self.send_with_str(frame)
    }
}

// Abstract environment (Time, Logging)
pub trait Environment {
    fn now(&self) -> u64; // ms
    fn log(&self, msg: String);
}

pub struct WasmEnv;

impl Environment for WasmEnv {
    fn now(&self) -> u64 {
        Date::now() as u64
    }

    fn log(&self, msg: String) {
        console_log!("{}", msg);
    }
}

/// Counters kept for the lifetime of the object
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RelayStats {
    pub forwarded: u64,
    pub dropped: u64,
    pub send_failures: u64,
    pub last_frame_ms: Option<u64>,
}

/// Stateless fan-out: every frame with a known topic goes to every peer,
/// the sender included. Payloads are never inspected.
pub struct Relay {
    env: Box<dyn Environment>,
    stats: RelayStats,
}

impl Relay {
    pub fn new(env: Box<dyn Environment>) -> Self {
        Self {
            env,
            stats: RelayStats::default(),
        }
    }

    pub fn stats(&self) -> RelayStats {
        self.stats
    }

    /// Forward one text frame. Returns how many peers it reached.
    pub fn fan_out<P: Peer>(&mut self, frame: &str, peers: &[P]) -> usize {
        let topic = match peek_topic(frame) {
            Ok(topic) => topic,
            Err(DecodeError::UnknownTopic(topic)) => {
                self.stats.dropped += 1;
                self.env.log(format!("Relay: dropping unknown topic {topic}"));
                return 0;
            }
            Err(err) => {
                self.stats.dropped += 1;
                self.env.log(format!("Relay: dropping unreadable frame: {err}"));
                return 0;
            }
        };

        let mut reached = 0;
        for peer in peers {
            match peer.send_text(frame) {
                Ok(()) => reached += 1,
                Err(err) => {
                    // Usually a socket mid-close; the others still get the frame
                    self.stats.send_failures += 1;
                    self.env.log(format!("Relay: send of {topic} failed: {err:?}"));
                }
            }
        }

        self.stats.forwarded += 1;
        self.stats.last_frame_ms = Some(self.env.now());
        reached
    }

    pub fn log(&self, msg: String) {
        self.env.log(msg);
    }
}
