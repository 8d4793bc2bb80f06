//! Periodic timers driven by the host clock
//!
//! The host calls [`Timers::pop_due`] with its current time and runs whatever
//! comes back until nothing is due. Nothing here sleeps or spawns.

use log::debug;
use std::collections::BTreeMap;

/// The three periodic activities of a session, in tie-break order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKind {
    Simulation,
    Bot,
    Announce,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    period_ms: u64,
    next_due_ms: u64,
}

#[derive(Debug, Default)]
pub struct Timers {
    timers: BTreeMap<TimerKind, Timer>,
    max_catch_up: u32,
}

impl Timers {
    pub fn new(max_catch_up: u32) -> Self {
        Self {
            timers: BTreeMap::new(),
            max_catch_up: max_catch_up.max(1),
        }
    }

    /// Start (or restart) a timer. With `fire_now` the first run is due at `now_ms`.
    pub fn start(&mut self, kind: TimerKind, period_ms: u64, now_ms: u64, fire_now: bool) {
        let period_ms = period_ms.max(1);
        let next_due_ms = if fire_now {
            now_ms
        } else {
            now_ms.saturating_add(period_ms)
        };
        self.timers.insert(
            kind,
            Timer {
                period_ms,
                next_due_ms,
            },
        );
    }

    /// Stop a timer. Returns false if it was not running; that is not an error.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        let was_running = self.timers.remove(&kind).is_some();
        if !was_running {
            debug!("timer {kind:?} already stopped");
        }
        was_running
    }

    pub fn is_running(&self, kind: TimerKind) -> bool {
        self.timers.contains_key(&kind)
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Next timer due at or before `now_ms`, rescheduled as it is returned
    ///
    /// A timer more than `max_catch_up` periods behind fires once and then
    /// re-anchors on `now_ms` instead of replaying the whole backlog.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<TimerKind> {
        let (kind, timer) = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.next_due_ms <= now_ms)
            .min_by_key(|(kind, timer)| (timer.next_due_ms, **kind))
            .map(|(kind, timer)| (*kind, *timer))?;

        let backlog = now_ms - timer.next_due_ms;
        let max_backlog = timer.period_ms.saturating_mul(u64::from(self.max_catch_up));
        let next_due_ms = if backlog >= max_backlog {
            debug!("timer {kind:?} {backlog}ms behind, skipping backlog");
            now_ms.saturating_add(timer.period_ms)
        } else {
            timer.next_due_ms.saturating_add(timer.period_ms)
        };

        if let Some(entry) = self.timers.get_mut(&kind) {
            entry.next_due_ms = next_due_ms;
        }
        Some(kind)
    }
}
