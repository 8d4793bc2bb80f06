//! Game session: join handshake, simulation loop, bot and peer reconciliation
//!
//! Each browser runs its own full simulation. Peers only exchange edge
//! events (paddle direction changes, paddle hits, join handshake) and snap
//! to whatever the other side last reported; there is no periodic sync.

use glam::Vec2;
use log::{debug, info, warn};
use proto::{
    BallDirectionPayload, DecodeError, Direction, JoinPayload, Message, PaddleDirectionPayload,
    Sender, Topic,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::bus::{BusKind, LocalBus, MessageBus};
use crate::error::{BusError, SessionError};
use crate::fsm::{SessionAction, SessionFsm, SessionState};
use crate::geometry::{ball_approaches_paddle, ball_collides_with_paddle};
use crate::input::direction_for_key;
use crate::render::{Attr, Element, Renderer};
use crate::timers::{TimerKind, Timers};
use crate::{bot, Ball, Config, Events, GameRng, Identity, Paddle, SessionEvent, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Creator,
    Guest,
    /// Paddle driven by the bot controller rather than a person
    Bot,
}

type Inbox = Rc<RefCell<VecDeque<Message>>>;

pub struct Session {
    config: Config,
    fsm: SessionFsm,
    role: Option<Role>,
    identity: Option<Identity>,
    bot_identity: Identity,
    multiplayer: bool,
    paddles: [Paddle; 2], // indexed by Side
    my_side: Side,
    ball: Ball,
    bot_assist: bool,
    input_enabled: bool,
    bus: Option<Box<dyn MessageBus>>,
    // Bus handlers only enqueue; the session drains after every publish/delivery
    inbox: Inbox,
    timers: Timers,
    renderer: Box<dyn Renderer>,
    events: Events,
    rng: GameRng,
    invite_from: Option<String>,
    now_ms: u64,
    tick: u64,
}

impl Session {
    pub fn new(config: Config, renderer: Box<dyn Renderer>) -> Self {
        Self::with_rng(config, renderer, GameRng::from_entropy())
    }

    pub fn with_rng(config: Config, renderer: Box<dyn Renderer>, rng: GameRng) -> Self {
        let bot_identity = Identity::new(config.bot_player_id.clone());
        let timers = Timers::new(config.max_catch_up);

        let mut session = Self {
            config,
            fsm: SessionFsm::new(),
            role: None,
            identity: None,
            bot_identity,
            multiplayer: false,
            paddles: [Paddle::spawn(Side::Left), Paddle::spawn(Side::Right)],
            my_side: Side::Left,
            ball: Ball::default(),
            bot_assist: false,
            input_enabled: false,
            bus: None,
            inbox: Inbox::default(),
            timers,
            renderer,
            events: Events::new(),
            rng,
            invite_from: None,
            now_ms: 0,
            tick: 0,
        };
        session.render_board();
        session
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn state(&self) -> SessionState {
        self.fsm.state()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Who drives the other paddle
    pub fn opponent_role(&self) -> Option<Role> {
        match self.role? {
            Role::Creator if !self.multiplayer => Some(Role::Bot),
            Role::Creator => Some(Role::Guest),
            Role::Guest => Some(Role::Creator),
            Role::Bot => None,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_multiplayer(&self) -> bool {
        self.multiplayer
    }

    pub fn my_side(&self) -> Side {
        self.my_side
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        &self.paddles[side.index()]
    }

    pub fn my_paddle(&self) -> &Paddle {
        self.paddle(self.my_side)
    }

    pub fn opp_paddle(&self) -> &Paddle {
        self.paddle(self.my_side.other())
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn bot_assist(&self) -> bool {
        self.bot_assist
    }

    pub fn bus_kind(&self) -> Option<BusKind> {
        self.bus.as_ref().map(|bus| bus.kind())
    }

    pub fn is_timer_running(&self, kind: TimerKind) -> bool {
        self.timers.is_running(kind)
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Attach a connected bus so the session can hear and join games
    ///
    /// Only before a game is created or joined; the bus is fixed after that.
    pub fn attach(&mut self, bus: Box<dyn MessageBus>) -> Result<(), SessionError> {
        if let Some(role) = self.role {
            warn!("not attaching {:?} bus, already playing as {role:?}", bus.kind());
            return Err(SessionError::BusLocked);
        }
        self.bind(bus);
        Ok(())
    }

    fn bind(&mut self, mut bus: Box<dyn MessageBus>) {
        for topic in Topic::ALL {
            let inbox = self.inbox.clone();
            bus.subscribe(
                topic,
                Box::new(move |msg: &Message| inbox.borrow_mut().push_back(msg.clone())),
            );
        }
        info!("attached {:?} bus", bus.kind());
        self.bus = Some(bus);
    }

    /// Start a game as creator
    ///
    /// Multiplayer needs a network bus attached and then announces the game
    /// until someone accepts. Single-player swaps in the local bus and starts
    /// immediately against the bot.
    pub fn create_game(&mut self, player_id: &str, multiplayer: bool) -> Result<(), SessionError> {
        let action = if multiplayer {
            SessionAction::CreateMultiplayer
        } else {
            SessionAction::CreateSingle
        };
        self.check_transition(action)?;
        if multiplayer && self.bus_kind() != Some(BusKind::Network) {
            return Err(SessionError::NotConnected);
        }

        self.identity = Some(self.mint_identity(player_id));
        self.role = Some(Role::Creator);
        self.multiplayer = multiplayer;

        if multiplayer {
            self.transition(action)?;
            self.timers.start(
                TimerKind::Announce,
                self.config.announce_ms,
                self.now_ms,
                false,
            );
            info!("{player_id} waiting for an opponent");
        } else {
            self.bind(Box::new(LocalBus::new()));
            self.transition(action)?;
            self.enter_playing();
        }
        Ok(())
    }

    /// Take the open slot announced by another player
    ///
    /// The game starts once our own AcceptJoin comes back through the relay.
    pub fn join_game(&mut self, player_id: &str) -> Result<(), SessionError> {
        self.check_transition(SessionAction::JoinGame)?;
        if self.bus_kind() != Some(BusKind::Network) {
            return Err(SessionError::NotConnected);
        }

        let identity = self.mint_identity(player_id);
        let accept = Message::AcceptJoin(JoinPayload {
            sender: identity.sender(),
        });
        self.publish(&accept)?;

        self.identity = Some(identity);
        self.role = Some(Role::Guest);
        self.multiplayer = true;
        self.transition(SessionAction::JoinGame)?;
        info!("{player_id} accepted a game, waiting for confirmation");

        self.pump();
        Ok(())
    }

    /// Stop every loop; the session is inert afterwards
    pub fn stop(&mut self) {
        self.timers.clear();
        self.input_enabled = false;
        info!("session stopped after {} ticks", self.tick);
    }

    pub fn set_bot_assist(&mut self, enabled: bool) {
        self.bot_assist = enabled;
        self.sync_bot_timer();
    }

    // ------------------------------------------------------------------
    // Host entry points
    // ------------------------------------------------------------------

    /// Run every timer due at `now_ms`
    pub fn advance(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
        while let Some(kind) = self.timers.pop_due(self.now_ms) {
            match kind {
                TimerKind::Simulation => self.step(),
                TimerKind::Bot => self.bot_step(),
                TimerKind::Announce => self.announce(),
            }
            self.pump();
        }
    }

    /// Feed one text frame received from the relay
    pub fn receive_frame(&mut self, frame: &str) {
        match Message::from_json(frame) {
            Ok(msg) => self.deliver(&msg),
            Err(DecodeError::UnknownTopic(topic)) => debug!("ignoring unknown topic {topic}"),
            Err(err) => warn!("dropping frame: {err}"),
        }
    }

    pub fn deliver(&mut self, msg: &Message) {
        match self.bus.as_mut() {
            // A solo game hears nobody, even if the page still has a socket open
            Some(bus) if bus.kind() == BusKind::Local => {
                debug!("local game, dropping {} from {}", msg.topic(), msg.player_id());
            }
            Some(bus) => bus.deliver(msg),
            None => debug!("no bus attached, dropping {}", msg.topic()),
        }
        self.pump();
    }

    /// Keyboard input for our own paddle. Returns true if the key was used.
    pub fn handle_key(&mut self, key: &str) -> bool {
        let Some(direction) = direction_for_key(key) else {
            return false;
        };
        if !self.input_enabled || self.bot_assist {
            return false;
        }
        self.steer_my_paddle(direction);
        true
    }

    // ------------------------------------------------------------------
    // Loops
    // ------------------------------------------------------------------

    fn step(&mut self) {
        self.tick += 1;

        for paddle in &mut self.paddles {
            paddle.bounce_off_bounds();
        }
        for paddle in &mut self.paddles {
            paddle.move_one_step();
        }

        let my_side = self.my_side;
        let opp_side = my_side.other();
        if self.returns_ball(my_side) {
            self.ball.reflect_horizontally();
            if let Some(sender) = self.identity.as_ref().map(Identity::sender) {
                self.report_paddle_hit(sender, my_side);
            }
        } else if !self.multiplayer && self.returns_ball(opp_side) {
            self.ball.reflect_horizontally();
            let sender = self.bot_identity.sender();
            self.report_paddle_hit(sender, opp_side);
        }

        if self.ball.advance() {
            self.events.push(SessionEvent::BallHitWall);
        }

        self.render();
    }

    fn returns_ball(&self, side: Side) -> bool {
        let paddle = self.paddle(side);
        ball_collides_with_paddle(&self.ball, paddle) && ball_approaches_paddle(&self.ball, paddle)
    }

    fn report_paddle_hit(&mut self, sender: Sender, side: Side) {
        self.events.push(SessionEvent::BallHitPaddle);
        let msg = Message::ChangeBallDirection(BallDirectionPayload {
            sender,
            delta_x: self.ball.vel.x,
            delta_y: self.ball.vel.y,
            ball_x: self.ball.pos.x,
            ball_y: self.ball.pos.y,
            paddle_y: self.paddle(side).y,
        });
        self.broadcast(&msg);
    }

    fn bot_step(&mut self) {
        if !self.multiplayer {
            let side = self.my_side.other();
            if let Some(direction) = bot::decide(&self.ball, self.paddle(side).direction) {
                self.paddles[side.index()].direction = direction;
                let msg = Message::ChangePaddleDirection(PaddleDirectionPayload {
                    sender: self.bot_identity.sender(),
                    direction,
                });
                self.broadcast(&msg);
            }
        }

        if self.bot_assist {
            if let Some(direction) = bot::decide(&self.ball, self.my_paddle().direction) {
                self.steer_my_paddle(direction);
            }
        }
    }

    fn announce(&mut self) {
        if let Some(identity) = &self.identity {
            let msg = Message::AskJoin(JoinPayload {
                sender: identity.sender(),
            });
            self.broadcast(&msg);
        }
    }

    fn steer_my_paddle(&mut self, direction: Direction) {
        if self.my_paddle().direction == direction {
            return;
        }
        self.paddles[self.my_side.index()].direction = direction;

        if let Some(sender) = self.identity.as_ref().map(Identity::sender) {
            let msg = Message::ChangePaddleDirection(PaddleDirectionPayload { sender, direction });
            self.broadcast(&msg);
        }
    }

    // ------------------------------------------------------------------
    // Inbound messages
    // ------------------------------------------------------------------

    fn pump(&mut self) {
        loop {
            let next = self.inbox.borrow_mut().pop_front();
            match next {
                Some(msg) => self.handle(msg),
                None => break,
            }
        }
    }

    fn handle(&mut self, msg: Message) {
        let from_self = self
            .identity
            .as_ref()
            .is_some_and(|me| me.is_self(msg.sender()));

        // Game traffic from other rooms' players means nothing until we play
        let applies = !from_self && self.fsm.is_playing();

        match msg {
            Message::AskJoin(payload) => self.on_ask_join(payload, from_self),
            Message::AcceptJoin(payload) => self.on_accept_join(payload, from_self),
            Message::ChangePaddleDirection(payload) => {
                if applies {
                    let side = self.my_side.other();
                    self.paddles[side.index()].direction = payload.direction;
                }
            }
            Message::ChangeBallDirection(payload) => {
                if applies {
                    // Hard snap to the reporter's view; the later report wins
                    self.ball = Ball::new(
                        Vec2::new(payload.ball_x, payload.ball_y),
                        Vec2::new(payload.delta_x, payload.delta_y),
                    );
                    let side = self.my_side.other();
                    self.paddles[side.index()].y = payload.paddle_y;
                }
            }
        }
    }

    fn on_ask_join(&mut self, payload: JoinPayload, from_self: bool) {
        if from_self {
            return;
        }
        if self.state() != SessionState::Idle || self.role.is_some() {
            debug!("ignoring AskJoin from {}", payload.sender.player_id);
            return;
        }

        let host = payload.sender.player_id;
        if self.invite_from.as_deref() != Some(host.as_str()) {
            info!("{host} is waiting for an opponent");
            self.invite_from = Some(host.clone());
            self.events.push(SessionEvent::JoinAvailable { host });
        }
    }

    fn on_accept_join(&mut self, payload: JoinPayload, from_self: bool) {
        self.timers.cancel(TimerKind::Announce);

        let state = self.state();
        let action = match (state, self.role) {
            (SessionState::WaitingForOpponent, Some(Role::Creator)) => SessionAction::OpponentJoined,
            // A guest only starts on its own echo
            (SessionState::Idle, Some(Role::Guest)) if from_self => SessionAction::JoinConfirmed,
            (SessionState::Playing, _) => {
                debug!("duplicate AcceptJoin from {}", payload.sender.player_id);
                return;
            }
            _ => {
                debug!("AcceptJoin from {} is not for us", payload.sender.player_id);
                return;
            }
        };

        if from_self {
            // The joiner plays the right paddle; the creator keeps the left
            self.my_side = Side::Right;
        }
        if let Err(err) = self.transition(action) {
            warn!("{err}");
            return;
        }
        info!("{} joined", payload.sender.player_id);
        self.enter_playing();
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn enter_playing(&mut self) {
        self.timers.start(
            TimerKind::Simulation,
            self.config.tick_ms,
            self.now_ms,
            false,
        );
        self.input_enabled = true;
        self.sync_bot_timer();
        self.events.push(SessionEvent::GameStarted {
            side: self.my_side,
        });
        info!("game started, controlling the {:?} paddle", self.my_side);
    }

    fn sync_bot_timer(&mut self) {
        if !self.fsm.is_playing() {
            return;
        }
        let needed = !self.multiplayer || self.bot_assist;
        let running = self.timers.is_running(TimerKind::Bot);
        if needed && !running {
            self.timers.start(
                TimerKind::Bot,
                self.config.bot_decision_ms,
                self.now_ms,
                true,
            );
        } else if !needed && running {
            self.timers.cancel(TimerKind::Bot);
        }
    }

    fn mint_identity(&mut self, player_id: &str) -> Identity {
        if self.config.mint_session_token {
            Identity::minted(player_id, &mut self.rng)
        } else {
            Identity::new(player_id)
        }
    }

    /// A session takes exactly one role for its lifetime
    fn check_transition(&self, action: SessionAction) -> Result<(), SessionError> {
        if self.role.is_none() && self.fsm.can_transition(action) {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                from: self.state(),
                action,
            })
        }
    }

    fn transition(&mut self, action: SessionAction) -> Result<(), SessionError> {
        let result = self.fsm.transition(action);
        if !result.success {
            return Err(SessionError::InvalidTransition {
                from: result.from_state,
                action,
            });
        }
        debug!("{:?} -> {:?} on {action:?}", result.from_state, result.to_state);
        Ok(())
    }

    fn publish(&mut self, msg: &Message) -> Result<(), BusError> {
        match self.bus.as_mut() {
            Some(bus) => bus.publish(msg),
            None => {
                debug!("no bus attached, not publishing {}", msg.topic());
                Ok(())
            }
        }
    }

    /// Publish from inside a loop: failures are logged, never retried
    fn broadcast(&mut self, msg: &Message) {
        if let Err(err) = self.publish(msg) {
            warn!("failed to publish {}: {err}", msg.topic());
        }
        self.pump();
    }

    fn render(&mut self) {
        for side in [Side::Left, Side::Right] {
            let y = self.paddle(side).y;
            self.renderer.set_position(Element::paddle(side), Attr::Y, y);
        }
        self.renderer
            .set_position(Element::Ball, Attr::Cx, self.ball.pos.x);
        self.renderer
            .set_position(Element::Ball, Attr::Cy, self.ball.pos.y);
    }

    fn render_board(&mut self) {
        for side in [Side::Left, Side::Right] {
            let x = self.paddle(side).x;
            self.renderer.set_position(Element::paddle(side), Attr::X, x);
        }
        self.render();
    }
}
