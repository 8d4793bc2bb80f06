use serde::Deserialize;

use crate::Params;

/// Runtime configuration for a session
///
/// Geometry is fixed in [`Params`]; only timing and identity knobs live here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tick_ms: u64,
    pub bot_decision_ms: u64,
    pub announce_ms: u64,
    /// Player id stamped on messages published for the bot paddle
    pub bot_player_id: String,
    /// Attach a random token to outgoing messages so same-name peers stay apart
    pub mint_session_token: bool,
    pub max_catch_up: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_ms: Params::TICK_MS,
            bot_decision_ms: Params::BOT_DECISION_MS,
            announce_ms: Params::ANNOUNCE_MS,
            bot_player_id: "BOT".to_string(),
            mint_session_token: true,
            max_catch_up: Params::MAX_CATCH_UP,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse overrides; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
