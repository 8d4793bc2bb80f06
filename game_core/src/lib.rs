//! Shared game logic for relay-synced Pong
//!
//! Everything here is platform-free: the browser client feeds in frames, key
//! presses and clock readings, and receives positions through [`Renderer`].

pub mod bot;
pub mod bus;
pub mod components;
pub mod config;
pub mod error;
pub mod fsm;
pub mod geometry;
pub mod identity;
pub mod input;
pub mod params;
pub mod render;
pub mod resources;
pub mod session;
pub mod timers;

pub use bus::*;
pub use components::*;
pub use config::*;
pub use error::*;
pub use fsm::*;
pub use identity::*;
pub use params::*;
pub use render::*;
pub use resources::*;
pub use session::*;
pub use timers::*;
