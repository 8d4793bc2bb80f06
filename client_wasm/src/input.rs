//! Keyboard input handling

use game_core::Session;
use web_sys::KeyboardEvent;

/// Steer our paddle from a keydown event
///
/// Keys the game uses have their default action suppressed so the arrows do
/// not scroll the page.
pub fn handle_key_down(session: &mut Session, event: &KeyboardEvent) -> bool {
    let used = session.handle_key(&event.key());
    if used {
        event.prevent_default();
    }
    used
}
