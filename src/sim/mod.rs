//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod input;
pub mod round;
pub mod state;
pub mod tick;
pub mod timers;

pub use collision::{PassResult, apply_power_up, resolve_collisions};
pub use input::{FieldRect, UiAction, autopilot, clicked, pointer_moved};
pub use round::{end_round, generate_batch, level_for_score, return_to_menu, start_round};
pub use state::{
    GameEvent, GamePhase, GameState, PowerUp, PowerUpKind, Projectile, Snapshot, Target,
    TargetKind,
};
pub use tick::{TickInput, apply_action, tick};
pub use timers::{Deferred, Scheduler};
