//! Wire protocol for relay-synced Pong
//!
//! Every message travels as one JSON text frame:
//! `{"topic": "ASK_JOIN", "payload": {"playerId": "..."}}`.
//! The relay only ever looks at `topic`; clients decode the whole frame once
//! into [`Message`] and dispatch on the variant.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Topics
// ============================================================================

/// Bus topics, one per [`Message`] variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Topic {
    AskJoin,
    AcceptJoin,
    ChangePaddleDirection,
    ChangeBallDirection,
}

impl Topic {
    pub const ALL: [Topic; 4] = [
        Topic::AskJoin,
        Topic::AcceptJoin,
        Topic::ChangePaddleDirection,
        Topic::ChangeBallDirection,
    ];

    /// Name used on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::AskJoin => "ASK_JOIN",
            Topic::AcceptJoin => "ACCEPT_JOIN",
            Topic::ChangePaddleDirection => "CHANGE_PADDLE_DIRECTION",
            Topic::ChangeBallDirection => "CHANGE_BALL_DIRECTION",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|topic| topic.as_str() == name)
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// Paddle movement intent, shared by keyboard input and the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    #[default]
    Idle,
}

/// Who published a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sender {
    /// Free-text player name typed by the user
    pub player_id: String,
    /// Opaque per-session token; older clients never send one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

impl Sender {
    pub fn new(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            session_token: None,
        }
    }

    pub fn with_token(player_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            session_token: Some(token.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinPayload {
    #[serde(flatten)]
    pub sender: Sender,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaddleDirectionPayload {
    #[serde(flatten)]
    pub sender: Sender,
    pub direction: Direction,
}

/// Ball state reported by the side that saw a paddle collision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallDirectionPayload {
    #[serde(flatten)]
    pub sender: Sender,
    pub delta_x: f32,
    pub delta_y: f32,
    pub ball_x: f32,
    pub ball_y: f32,
    /// Y of the colliding paddle at the moment of the hit
    pub paddle_y: f32,
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "topic", content = "payload")]
pub enum Message {
    /// Creator announcing an open game
    #[serde(rename = "ASK_JOIN")]
    AskJoin(JoinPayload),

    /// Guest taking the open slot
    #[serde(rename = "ACCEPT_JOIN")]
    AcceptJoin(JoinPayload),

    #[serde(rename = "CHANGE_PADDLE_DIRECTION")]
    ChangePaddleDirection(PaddleDirectionPayload),

    #[serde(rename = "CHANGE_BALL_DIRECTION")]
    ChangeBallDirection(BallDirectionPayload),
}

impl Message {
    pub fn topic(&self) -> Topic {
        match self {
            Message::AskJoin(_) => Topic::AskJoin,
            Message::AcceptJoin(_) => Topic::AcceptJoin,
            Message::ChangePaddleDirection(_) => Topic::ChangePaddleDirection,
            Message::ChangeBallDirection(_) => Topic::ChangeBallDirection,
        }
    }

    pub fn sender(&self) -> &Sender {
        match self {
            Message::AskJoin(p) | Message::AcceptJoin(p) => &p.sender,
            Message::ChangePaddleDirection(p) => &p.sender,
            Message::ChangeBallDirection(p) => &p.sender,
        }
    }

    pub fn player_id(&self) -> &str {
        &self.sender().player_id
    }
}

// ============================================================================
// Serialization Helpers
// ============================================================================

/// Why an inbound frame could not become a [`Message`]
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Not JSON, no topic, or a payload missing required fields
    #[error("malformed message: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Well-formed frame for a topic this build does not know
    #[error("unknown topic {0:?}")]
    UnknownTopic(String),
}

#[derive(Deserialize)]
struct Envelope {
    topic: String,
    #[serde(default)]
    payload: serde_json::Value,
}

#[derive(Deserialize)]
struct TopicOnly {
    topic: String,
}

impl Message {
    /// Serialize message to a JSON text frame
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize a JSON text frame
    pub fn from_json(frame: &str) -> Result<Self, DecodeError> {
        let envelope: Envelope = serde_json::from_str(frame).map_err(DecodeError::Malformed)?;
        let topic =
            Topic::from_wire(&envelope.topic).ok_or(DecodeError::UnknownTopic(envelope.topic))?;
        let payload = envelope.payload;

        let message = match topic {
            Topic::AskJoin => Message::AskJoin(from_payload(payload)?),
            Topic::AcceptJoin => Message::AcceptJoin(from_payload(payload)?),
            Topic::ChangePaddleDirection => Message::ChangePaddleDirection(from_payload(payload)?),
            Topic::ChangeBallDirection => Message::ChangeBallDirection(from_payload(payload)?),
        };
        Ok(message)
    }
}

fn from_payload<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(DecodeError::Malformed)
}

/// Read only the topic of a frame, leaving the payload untouched
pub fn peek_topic(frame: &str) -> Result<Topic, DecodeError> {
    let head: TopicOnly = serde_json::from_str(frame).map_err(DecodeError::Malformed)?;
    Topic::from_wire(&head.topic).ok_or(DecodeError::UnknownTopic(head.topic))
}
