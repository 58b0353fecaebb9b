//! Pizza Shooter - A timed target-shooting arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, collisions, rounds, timers)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (every stream runs on a multiple of it)
    pub const SIM_DT_MS: u32 = 50;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play field bounds for bouncing entities (percent of the field)
    pub const FIELD_MIN_X: f32 = 5.0;
    pub const FIELD_MAX_X: f32 = 95.0;
    pub const FIELD_MIN_Y: f32 = 5.0;
    pub const FIELD_MAX_Y: f32 = 90.0;

    /// Projectiles are launched from the bottom of the field
    pub const LAUNCH_Y: f32 = 90.0;
    /// Projectile speed range (percent per tick)
    pub const PROJECTILE_MIN_SPEED: f32 = 2.0;
    pub const PROJECTILE_MAX_SPEED: f32 = 4.0;

    /// Hard ceiling for the score multiplier
    pub const MAX_MULTIPLIER: u32 = 5;

    /// Turret starts centered
    pub const PLAYER_START_X: f32 = 50.0;

    /// Countdown period
    pub const COUNTDOWN_MS: u32 = 1000;
    /// Power-up spawn attempt period
    pub const POWER_UP_SPAWN_MS: u32 = 3000;
    /// Delay between clearing a batch and the next batch appearing
    pub const BATCH_ADVANCE_DELAY_MS: u32 = 1000;
}

/// Convert a millisecond duration to whole simulation ticks (at least one)
#[inline]
pub fn ms_to_ticks(ms: u32) -> u32 {
    (ms / consts::SIM_DT_MS).max(1)
}

/// Map an offset inside an extent to a field percentage (0-100)
///
/// Returns `None` for a degenerate extent, e.g. a play field that is not laid out yet.
#[inline]
pub fn to_field_percent(offset: f32, extent: f32) -> Option<f32> {
    if extent > 0.0 && extent.is_finite() {
        Some(offset / extent * 100.0)
    } else {
        None
    }
}

/// Clamp a horizontal position into the field's bounce range
#[inline]
pub fn clamp_field_x(x: f32) -> f32 {
    x.clamp(consts::FIELD_MIN_X, consts::FIELD_MAX_X)
}
