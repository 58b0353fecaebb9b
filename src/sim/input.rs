//! Pointer input mapping
//!
//! Pointer events arrive in client (page) coordinates and are mapped into
//! field percent against the play field's bounding box.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GamePhase, GameState, Target};
use crate::consts::{LAUNCH_Y, PROJECTILE_MAX_SPEED, PROJECTILE_MIN_SPEED};
use crate::{clamp_field_x, to_field_percent};

/// The play field's bounding box in client coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl FieldRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Horizontal field percent for a client x (unclamped)
    pub fn percent_x(&self, client_x: f32) -> Option<f32> {
        to_field_percent(client_x - self.left, self.width)
    }

    /// Whether a client point lies inside the box
    pub fn contains(&self, client: Vec2) -> bool {
        client.x >= self.left
            && client.x <= self.left + self.width
            && client.y >= self.top
            && client.y <= self.top + self.height
    }
}

/// Discrete UI actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiAction {
    /// Start button on the menu
    Start,
    /// Play again from the game-over screen
    Restart,
    /// Back to the menu from a round or the game-over screen
    Menu,
}

/// Move the turret to follow the pointer
///
/// Dropped when the round is not active or the field is not laid out.
pub fn pointer_moved(state: &mut GameState, field: Option<&FieldRect>, client_x: f32) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let Some(x) = field.and_then(|f| f.percent_x(client_x)) else {
        log::debug!("Pointer move dropped: play field unavailable");
        return;
    };
    state.player_x = clamp_field_x(x);
}

/// Fire a projectile from a click inside the play field
///
/// Returns the new projectile's id, or `None` when the click was dropped.
pub fn clicked(state: &mut GameState, field: Option<&FieldRect>, client: Vec2) -> Option<u32> {
    if state.phase != GamePhase::Playing {
        return None;
    }
    let Some(field) = field else {
        log::debug!("Click dropped: play field unavailable");
        return None;
    };
    if !field.contains(client) {
        return None;
    }
    let x = field.percent_x(client.x)?;
    Some(state.spawn_projectile(x))
}

/// Ticks between autopilot shots (500 ms)
pub const AUTOPILOT_FIRE_TICKS: u64 = 10;

/// Where a target will be, horizontally, when an average shot reaches its height
pub fn lead_x(target: &Target) -> f32 {
    let avg_speed = (PROJECTILE_MIN_SPEED + PROJECTILE_MAX_SPEED) / 2.0;
    let flight_ticks = (LAUNCH_Y - target.pos.y).max(0.0) / avg_speed;
    clamp_field_x(target.pos.x + target.vel.x * flight_ticks)
}

/// Demo mode: track the live target closest to the turret and fire on a cadence
///
/// Works directly in field percent, so it needs no play field rect.
pub fn autopilot(state: &mut GameState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let player_x = state.player_x;
    let aim = state
        .targets
        .iter()
        .filter(|t| !t.hit)
        .min_by(|a, b| {
            (a.pos.x - player_x)
                .abs()
                .partial_cmp(&(b.pos.x - player_x).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(lead_x);

    if let Some(x) = aim {
        state.player_x = x;
        if state.time_ticks % AUTOPILOT_FIRE_TICKS == 0 {
            state.spawn_projectile(x);
        }
    }
}
