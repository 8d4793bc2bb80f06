//! Typed publish/subscribe over the relay, plus a loopback for single-player
//!
//! Handlers run synchronously inside `publish`/`deliver` and must not block.

use log::{debug, trace};
use proto::{Message, Topic};
use std::collections::HashMap;

use crate::error::{BusError, TransportError};

pub type Handler = Box<dyn FnMut(&Message)>;

/// Topic → handlers table shared by both bus variants
#[derive(Default)]
pub struct Subscribers {
    handlers: HashMap<Topic, Vec<Handler>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, topic: Topic, handler: Handler) {
        self.handlers.entry(topic).or_default().push(handler);
    }

    /// Run every handler for the message's topic. Returns how many ran.
    pub fn dispatch(&mut self, msg: &Message) -> usize {
        match self.handlers.get_mut(&msg.topic()) {
            Some(handlers) => {
                for handler in handlers.iter_mut() {
                    handler(msg);
                }
                handlers.len()
            }
            None => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusKind {
    Network,
    Local,
}

pub trait MessageBus {
    fn kind(&self) -> BusKind;

    fn subscribe(&mut self, topic: Topic, handler: Handler);

    fn publish(&mut self, msg: &Message) -> Result<(), BusError>;

    /// Hand an inbound message to the subscribers of its topic
    fn deliver(&mut self, msg: &Message);
}

/// Abstract connection so the bus can be driven without a browser
pub trait Transport {
    fn send_text(&self, frame: &str) -> Result<(), TransportError>;
}

/// Bus backed by a relay connection
///
/// Frames we publish come back through the relay like everyone else's; the
/// host feeds them in via `deliver`. Nothing is retried.
pub struct NetworkBus<T: Transport> {
    transport: T,
    subscribers: Subscribers,
}

impl<T: Transport> NetworkBus<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            subscribers: Subscribers::new(),
        }
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> MessageBus for NetworkBus<T> {
    fn kind(&self) -> BusKind {
        BusKind::Network
    }

    fn subscribe(&mut self, topic: Topic, handler: Handler) {
        self.subscribers.add(topic, handler);
    }

    fn publish(&mut self, msg: &Message) -> Result<(), BusError> {
        let frame = msg.to_json()?;
        self.transport.send_text(&frame)?;
        trace!("sent {frame}");
        Ok(())
    }

    fn deliver(&mut self, msg: &Message) {
        if self.subscribers.dispatch(msg) == 0 {
            trace!("no subscriber for {}", msg.topic());
        }
    }
}

/// In-process bus for playing against the bot
///
/// Publishing loops straight back to local subscribers, except for the join
/// handshake: there is nobody to join.
#[derive(Default)]
pub struct LocalBus {
    subscribers: Subscribers,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageBus for LocalBus {
    fn kind(&self) -> BusKind {
        BusKind::Local
    }

    fn subscribe(&mut self, topic: Topic, handler: Handler) {
        self.subscribers.add(topic, handler);
    }

    fn publish(&mut self, msg: &Message) -> Result<(), BusError> {
        match msg.topic() {
            Topic::AskJoin | Topic::AcceptJoin => {
                debug!("local bus dropping {} from {}", msg.topic(), msg.player_id());
            }
            Topic::ChangePaddleDirection | Topic::ChangeBallDirection => {
                self.subscribers.dispatch(msg);
            }
        }
        Ok(())
    }

    fn deliver(&mut self, msg: &Message) {
        self.subscribers.dispatch(msg);
    }
}
