//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. One call is one
//! 50 ms step; slower streams fire from the round's scheduler.

use glam::Vec2;

use super::collision::resolve_collisions;
use super::input::{FieldRect, UiAction, autopilot, clicked, pointer_moved};
use super::round::{end_round, generate_batch, return_to_menu, start_round};
use super::state::{GameEvent, GamePhase, GameState};
use super::timers::Deferred;
use crate::consts::BATCH_ADVANCE_DELAY_MS;

/// Input collected since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Play field bounding box; `None` while the surface is not attached
    pub field: Option<FieldRect>,
    /// Latest pointer x (client coordinates)
    pub pointer_x: Option<f32>,
    /// Clicks in client coordinates, oldest first
    pub clicks: Vec<Vec2>,
    /// Start / restart / menu
    pub action: Option<UiAction>,
    /// Idle/demo mode - autopilot plays the round
    pub idle_mode: bool,
}

/// Apply a UI action to the round state machine
pub fn apply_action(state: &mut GameState, action: UiAction) {
    match (action, state.phase) {
        (UiAction::Start, GamePhase::Menu) | (UiAction::Restart, GamePhase::GameOver) => {
            start_round(state);
        }
        (UiAction::Menu, GamePhase::Playing | GamePhase::GameOver) => {
            return_to_menu(state);
        }
        (action, phase) => {
            log::debug!("Ignoring {:?} in {:?}", action, phase);
        }
    }
}

/// Advance the game state by one fixed timestep
///
/// Events pile up in `state` until the caller takes them with
/// [`GameState::drain_events`]; once [`MAX_QUEUED_EVENTS`] are waiting the
/// oldest are discarded.
///
/// [`MAX_QUEUED_EVENTS`]: super::state::MAX_QUEUED_EVENTS
pub fn tick(state: &mut GameState, input: &TickInput) {
    if let Some(action) = input.action {
        apply_action(state, action);
    }

    // Nothing runs outside an active round
    if state.phase != GamePhase::Playing {
        return;
    }

    let field = input.field.as_ref();
    if let Some(x) = input.pointer_x {
        pointer_moved(state, field, x);
    }
    for &click in &input.clicks {
        clicked(state, field, click);
    }

    state.time_ticks += 1;

    if input.idle_mode {
        autopilot(state);
    }

    // 50 ms streams: target motion, projectile motion, collisions
    for target in &mut state.targets {
        target.advance();
    }
    for projectile in &mut state.projectiles {
        projectile.advance();
    }
    state.projectiles.retain(|p| !p.is_gone());
    let pass = resolve_collisions(state);
    if pass.targets_hit > 0 || pass.power_ups_collected > 0 {
        log::debug!(
            "Tick {}: {} hits, {} pickups, +{} points",
            state.time_ticks,
            pass.targets_hit,
            pass.power_ups_collected,
            pass.points
        );
    }

    // Countdown
    if state.time_left > 0 && state.timers.countdown_due() {
        state.time_left -= 1;
    }

    // Power-up spawn attempt
    if state.timers.power_up_due() {
        state.try_spawn_power_up();
    }

    for deferred in state.timers.take_due(state.time_ticks) {
        match deferred {
            Deferred::AdvanceBatch => generate_batch(state),
            Deferred::ResetMultiplier => state.multiplier = 1,
        }
    }

    if state.batch_cleared() && !state.timers.is_pending(Deferred::AdvanceBatch) {
        state.push_event(GameEvent::BatchCleared);
        state
            .timers
            .schedule(state.time_ticks, BATCH_ADVANCE_DELAY_MS, Deferred::AdvanceBatch);
    }

    if state.time_left == 0 {
        end_round(state);
    }
}
