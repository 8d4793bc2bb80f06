//! Relay Durable Object: one instance is one room, and every text frame
//! received on any of its sockets is echoed to all of them.

use std::cell::RefCell;
use worker::*;

pub mod relay;

pub use relay::{Environment, Peer, Relay, RelayStats, WasmEnv};

#[durable_object]
pub struct RelayDO {
    state: State,
    #[allow(dead_code)]
    env: Env,
    relay: RefCell<Relay>,
}

impl DurableObject for RelayDO {
    fn new(state: State, env: Env) -> Self {
        Self {
            state,
            env,
            relay: RefCell::new(Relay::new(Box::new(WasmEnv))),
        }
    }

    async fn fetch(&self, req: Request) -> Result<Response> {
        let upgrade_header = req.headers().get("Upgrade");

        match upgrade_header {
            Ok(Some(header)) if header.to_lowercase() == "websocket" => {
                let pair = match WebSocketPair::new() {
                    Ok(pair) => pair,
                    Err(err) => {
                        console_error!("DO: Failed to create WebSocket pair: {:?}", err);
                        return Response::error("Failed to create WebSocket pair", 500);
                    }
                };

                #[allow(clippy::needless_borrows_for_generic_args)]
                self.state.accept_web_socket(&pair.server);

                console_log!(
                    "DO: WebSocket accepted ({} connected)",
                    self.state.get_websockets().len()
                );
                Response::from_websocket(pair.client)
            }
            Ok(header_opt) => {
                console_error!("DO: Unexpected Upgrade header state: {:?}", header_opt);
                Response::error("Expected WebSocket upgrade request", 426)
            }
            Err(err) => {
                console_error!("DO: Failed to read Upgrade header: {:?}", err);
                Response::error("Failed to read request headers", 500)
            }
        }
    }

    async fn websocket_message(
        &self,
        _ws: WebSocket,
        message: durable::WebSocketIncomingMessage,
    ) -> Result<()> {
        match message {
            durable::WebSocketIncomingMessage::String(text) => {
                let peers = self.state.get_websockets();
                self.relay.borrow_mut().fan_out(&text, &peers);
            }
            durable::WebSocketIncomingMessage::Binary(bytes) => {
                self.relay
                    .borrow()
                    .log(format!("DO: Ignoring {} byte binary frame", bytes.len()));
            }
        }
        Ok(())
    }

    async fn websocket_close(
        &self,
        _ws: WebSocket,
        code: usize,
        reason: String,
        _was_clean: bool,
    ) -> Result<()> {
        let stats = self.relay.borrow().stats();
        console_log!(
            "DO: WebSocket closed (code: {}, reason: {}), {} frames forwarded so far",
            code,
            reason,
            stats.forwarded
        );
        Ok(())
    }

    async fn websocket_error(&self, _ws: WebSocket, error: Error) -> Result<()> {
        console_error!("DO: WebSocket error: {:?}", error);
        Ok(())
    }
}
