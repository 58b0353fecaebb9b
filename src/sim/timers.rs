//! Round timers
//!
//! The simulation advances in fixed 50 ms ticks. The 50 ms streams (target
//! motion, projectile motion, collisions) run on every tick; slower streams and
//! one-shot delays are tracked here in whole ticks so that a round can be
//! cancelled in one place.

use serde::{Deserialize, Serialize};

use crate::consts::{COUNTDOWN_MS, POWER_UP_SPAWN_MS};
use crate::ms_to_ticks;

/// Work deferred to a later tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deferred {
    /// Replace a cleared batch with a fresh one
    AdvanceBatch,
    /// Drop the score multiplier back to 1
    ResetMultiplier,
}

/// A fixed-period repeating stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interval {
    period_ticks: u32,
    elapsed: u32,
}

impl Interval {
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_ticks: ms_to_ticks(period_ms),
            elapsed: 0,
        }
    }

    /// Advance one tick, returning true when the stream fires
    pub fn advance(&mut self) -> bool {
        self.elapsed += 1;
        if self.elapsed >= self.period_ticks {
            self.elapsed = 0;
            true
        } else {
            false
        }
    }

    /// Restart the period from zero
    pub fn reset(&mut self) {
        self.elapsed = 0;
    }
}

/// A one-shot delay
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Pending {
    due_tick: u64,
    action: Deferred,
}

/// All timers that belong to an active round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduler {
    armed: bool,
    countdown: Interval,
    power_up_spawn: Interval,
    /// Kept in registration order; equal due ticks fire in that order
    pending: Vec<Pending>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            armed: false,
            countdown: Interval::new(COUNTDOWN_MS),
            power_up_spawn: Interval::new(POWER_UP_SPAWN_MS),
            pending: Vec::new(),
        }
    }
}

impl Scheduler {
    /// Start the round's streams from a clean slate
    pub fn arm(&mut self) {
        self.cancel_all();
        self.armed = true;
    }

    /// Stop every stream and drop every pending delay
    pub fn cancel_all(&mut self) {
        self.armed = false;
        self.countdown.reset();
        self.power_up_spawn.reset();
        self.pending.clear();
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Advance the countdown stream; true when a second has elapsed
    pub fn countdown_due(&mut self) -> bool {
        self.armed && self.countdown.advance()
    }

    /// Advance the power-up stream; true when a spawn attempt is due
    pub fn power_up_due(&mut self) -> bool {
        self.armed && self.power_up_spawn.advance()
    }

    /// Schedule `action` to fire `delay_ms` after `now_tick`
    ///
    /// Ignored when the round is not armed.
    pub fn schedule(&mut self, now_tick: u64, delay_ms: u32, action: Deferred) {
        if !self.armed {
            return;
        }
        self.pending.push(Pending {
            due_tick: now_tick + u64::from(ms_to_ticks(delay_ms)),
            action,
        });
    }

    /// Whether an `action` delay is still waiting
    pub fn is_pending(&self, action: Deferred) -> bool {
        self.pending.iter().any(|p| p.action == action)
    }

    /// Number of waiting delays
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Remove and return every delay due at `now_tick`, earliest first
    pub fn take_due(&mut self, now_tick: u64) -> Vec<Deferred> {
        let mut due: Vec<&Pending> = self.pending.iter().filter(|p| p.due_tick <= now_tick).collect();
        due.sort_by_key(|p| p.due_tick);
        let fired: Vec<Deferred> = due.into_iter().map(|p| p.action).collect();
        self.pending.retain(|p| p.due_tick > now_tick);
        fired
    }
}
