//! Session State Machine
//!
//! Creator path: Idle -> WaitingForOpponent -> Playing.
//! Guest and single-player path: Idle -> Playing.

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    WaitingForOpponent,
    Playing,
}

/// Actions that trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    CreateMultiplayer,
    CreateSingle,
    JoinGame,
    OpponentJoined,
    JoinConfirmed,
}

/// Result of a state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionResult {
    pub success: bool,
    pub from_state: SessionState,
    pub to_state: SessionState,
    pub action: SessionAction,
}

#[derive(Debug, Clone)]
pub struct SessionFsm {
    state: SessionState,
}

impl SessionFsm {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn can_transition(&self, action: SessionAction) -> bool {
        self.get_next_state(action).is_some()
    }

    /// Attempt a transition; on failure the state is left alone
    pub fn transition(&mut self, action: SessionAction) -> TransitionResult {
        let from_state = self.state;

        if let Some(next_state) = self.get_next_state(action) {
            self.state = next_state;
            TransitionResult {
                success: true,
                from_state,
                to_state: next_state,
                action,
            }
        } else {
            TransitionResult {
                success: false,
                from_state,
                to_state: from_state,
                action,
            }
        }
    }

    fn get_next_state(&self, action: SessionAction) -> Option<SessionState> {
        match (self.state, action) {
            // From Idle
            (SessionState::Idle, SessionAction::CreateMultiplayer) => {
                Some(SessionState::WaitingForOpponent)
            }
            (SessionState::Idle, SessionAction::CreateSingle) => Some(SessionState::Playing),
            // A guest stays Idle until its own AcceptJoin comes back
            (SessionState::Idle, SessionAction::JoinGame) => Some(SessionState::Idle),
            (SessionState::Idle, SessionAction::JoinConfirmed) => Some(SessionState::Playing),

            // From WaitingForOpponent
            (SessionState::WaitingForOpponent, SessionAction::OpponentJoined) => {
                Some(SessionState::Playing)
            }

            // Invalid transition
            _ => None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state == SessionState::Playing
    }
}

impl Default for SessionFsm {
    fn default() -> Self {
        Self::new()
    }
}
