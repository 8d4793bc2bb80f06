use proto::Sender;

use crate::GameRng;

const TOKEN_LEN: usize = 16;

/// Local player identity used to tell our own echoes from peer messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub player_id: String,
    pub token: Option<String>,
}

impl Identity {
    pub fn new(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            token: None,
        }
    }

    pub fn minted(player_id: impl Into<String>, rng: &mut GameRng) -> Self {
        Self {
            player_id: player_id.into(),
            token: Some(rng.token(TOKEN_LEN)),
        }
    }

    pub fn sender(&self) -> Sender {
        match &self.token {
            Some(token) => Sender::with_token(self.player_id.clone(), token.clone()),
            None => Sender::new(self.player_id.clone()),
        }
    }

    /// Tokens decide when both sides have one; otherwise names are compared,
    /// so two token-less players with the same name look like one.
    pub fn is_self(&self, sender: &Sender) -> bool {
        match (&self.token, &sender.session_token) {
            (Some(mine), Some(theirs)) => mine == theirs,
            _ => self.player_id == sender.player_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_different_token_is_peer() {
        let mut rng = GameRng::new(1);
        let me = Identity::minted("alice", &mut rng);
        let other = Identity::minted("alice", &mut rng);
        assert!(me.is_self(&me.sender()));
        assert!(!me.is_self(&other.sender()));
    }

    #[test]
    fn test_same_name_without_tokens_is_self() {
        let me = Identity::new("alice");
        assert!(me.is_self(&Sender::new("alice")));
        assert!(!me.is_self(&Sender::new("bob")));
    }

    #[test]
    fn test_token_less_sender_falls_back_to_name() {
        let me = Identity::minted("alice", &mut GameRng::new(7));
        assert!(me.is_self(&Sender::new("alice")));
        assert!(!me.is_self(&Sender::new("BOT")));
    }
}
