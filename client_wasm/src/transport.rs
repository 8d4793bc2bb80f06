//! Relay connection backed by a browser WebSocket opened by the page

use game_core::{Transport, TransportError};
use web_sys::WebSocket;

pub struct WebSocketTransport {
    ws: WebSocket,
}

impl WebSocketTransport {
    pub fn new(ws: WebSocket) -> Self {
        Self { ws }
    }
}

impl Transport for WebSocketTransport {
    fn send_text(&self, frame: &str) -> Result<(), TransportError> {
        if self.ws.ready_state() != WebSocket::OPEN {
            return Err(TransportError::Closed);
        }
        self.ws
            .send_with_str(frame)
            .map_err(|err| TransportError::Send(format!("{err:?}")))
    }
}
