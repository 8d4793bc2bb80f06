use thiserror::Error;

use crate::fsm::{SessionAction, SessionState};

/// Failure reported by the underlying connection
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection is closed")]
    Closed,
    #[error("send failed: {0}")]
    Send(String),
}

#[derive(Debug, Error)]
pub enum BusError {
    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no network bus attached")]
    NotConnected,
    #[error("bus cannot change once a game is created or joined")]
    BusLocked,
    #[error("cannot {action:?} while {from:?}")]
    InvalidTransition {
        from: SessionState,
        action: SessionAction,
    },
    #[error(transparent)]
    Bus(#[from] BusError),
}
