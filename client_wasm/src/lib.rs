//! Browser client for relay-synced Pong
//!
//! The page owns the WebSocket and the animation loop; this crate owns the
//! game. JavaScript forwards socket frames, key presses and
//! `requestAnimationFrame` timestamps into a [`PongClient`].
//!
//! Note: only built for wasm32

#![cfg(target_arch = "wasm32")]

mod input;
mod renderer;
mod transport;

use game_core::{Config, NetworkBus, Session, SessionEvent, SessionState, Side};
use renderer::SvgRenderer;
use transport::WebSocketTransport;
use wasm_bindgen::prelude::*;
use web_sys::{KeyboardEvent, WebSocket};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("logger already set: {err}")));
    }
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

#[wasm_bindgen]
pub struct PongClient {
    session: Session,
    invite: Option<String>,
}

#[wasm_bindgen]
impl PongClient {
    /// `config_json` may override any [`Config`] field, e.g. `{"tick_ms": 40}`
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<PongClient, JsValue> {
        let config = match config_json {
            Some(json) => Config::from_json(&json).map_err(js_error)?,
            None => Config::new(),
        };
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| js_error("no document"))?;

        let session = Session::new(config, Box::new(SvgRenderer::new(document)));
        Ok(Self {
            session,
            invite: None,
        })
    }

    /// Use an open socket to the relay for everything published from now on
    ///
    /// Fails once a game has started; a solo game keeps its local bus.
    pub fn attach_socket(&mut self, ws: WebSocket) -> Result<(), JsValue> {
        let bus = NetworkBus::new(WebSocketTransport::new(ws));
        self.session.attach(Box::new(bus)).map_err(js_error)
    }

    pub fn create_game(&mut self, player_id: &str, multiplayer: bool) -> Result<(), JsValue> {
        let result = self.session.create_game(player_id, multiplayer);
        self.collect_events();
        result.map_err(js_error)
    }

    pub fn join_game(&mut self, player_id: &str) -> Result<(), JsValue> {
        let result = self.session.join_game(player_id);
        self.collect_events();
        result.map_err(js_error)
    }

    pub fn receive_frame(&mut self, frame: &str) {
        self.session.receive_frame(frame);
        self.collect_events();
    }

    pub fn key_down(&mut self, event: KeyboardEvent) -> bool {
        input::handle_key_down(&mut self.session, &event)
    }

    pub fn set_bot_assist(&mut self, enabled: bool) {
        self.session.set_bot_assist(enabled);
    }

    /// Drive every loop up to `now_ms` (a `requestAnimationFrame` timestamp)
    pub fn advance(&mut self, now_ms: f64) {
        self.session.advance(now_ms.max(0.0) as u64);
        self.collect_events();
    }

    pub fn stop(&mut self) {
        self.session.stop();
    }

    /// Host name of the most recent open game, once
    pub fn take_join_invite(&mut self) -> Option<String> {
        self.invite.take()
    }

    pub fn state_string(&self) -> String {
        match self.session.state() {
            SessionState::Idle => "IDLE",
            SessionState::WaitingForOpponent => "WAITING_FOR_OPPONENT",
            SessionState::Playing => "PLAYING",
        }
        .to_string()
    }

    /// "left" or "right"
    pub fn my_side(&self) -> String {
        match self.session.my_side() {
            Side::Left => "left",
            Side::Right => "right",
        }
        .to_string()
    }
}

impl PongClient {
    fn collect_events(&mut self) {
        for event in self.session.take_events() {
            match event {
                SessionEvent::JoinAvailable { host } => self.invite = Some(host),
                SessionEvent::GameStarted { side } => {
                    log::info!("playing the {side:?} paddle");
                    self.invite = None;
                }
                SessionEvent::BallHitPaddle | SessionEvent::BallHitWall => {}
            }
        }
    }
}
