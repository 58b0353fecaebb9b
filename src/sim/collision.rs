//! Collision detection and scoring
//!
//! Projectiles pierce: a hit never consumes the projectile, so one shot can
//! score on several targets and power-ups until it leaves the field.

use glam::Vec2;

use super::state::{GameEvent, GameState, PowerUpKind, TargetKind};
use super::timers::Deferred;

/// Radius test used for targets
#[inline]
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance(b) < radius
}

/// Axis-aligned box test used for power-ups
#[inline]
pub fn within_box(a: Vec2, b: Vec2, half_size: f32) -> bool {
    let d = (a - b).abs();
    d.x < half_size && d.y < half_size
}

/// Points for hitting a target of `kind` at `multiplier`
pub fn target_points(state: &GameState, kind: TargetKind) -> u64 {
    let base = match kind {
        TargetKind::Normal => state.tuning.normal_points,
        TargetKind::Bonus => state.tuning.bonus_points,
    };
    base * u64::from(state.multiplier)
}

/// Apply a collected power-up's effect
pub fn apply_power_up(state: &mut GameState, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Points => {
            state.score += state.tuning.points_power_up;
        }
        PowerUpKind::Multi => {
            state.multiplier = (state.multiplier + 1).min(state.tuning.multiplier_cap);
            // Every pickup owns its own reset, even if an earlier one is still pending
            let delay = state.tuning.multiplier_reset_ms;
            state
                .timers
                .schedule(state.time_ticks, delay, Deferred::ResetMultiplier);
        }
        PowerUpKind::Speed => {
            state.time_left += state.tuning.speed_bonus_secs;
        }
    }
}

/// Totals from one collision pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassResult {
    pub targets_hit: u32,
    pub power_ups_collected: u32,
    pub points: u64,
}

/// Test every flying projectile against every live target and uncollected power-up
pub fn resolve_collisions(state: &mut GameState) -> PassResult {
    let mut result = PassResult::default();
    let hit_radius = state.tuning.hit_radius;
    let half_size = state.tuning.pickup_half_size;

    let shots: Vec<Vec2> = state
        .projectiles
        .iter()
        .filter(|p| p.flying)
        .map(|p| p.pos)
        .collect();

    for shot in shots {
        for i in 0..state.targets.len() {
            let target = &state.targets[i];
            if target.hit || !within_radius(shot, target.pos, hit_radius) {
                continue;
            }
            let (id, kind) = (target.id, target.kind);
            let points = target_points(state, kind);
            state.targets[i].hit = true;
            state.score += points;
            result.targets_hit += 1;
            result.points += points;
            state.push_event(GameEvent::TargetHit { id, kind, points });
        }

        for i in 0..state.power_ups.len() {
            let power_up = &state.power_ups[i];
            if power_up.collected || !within_box(shot, power_up.pos, half_size) {
                continue;
            }
            let (id, kind) = (power_up.id, power_up.kind);
            state.power_ups[i].collected = true;
            let before = state.score;
            apply_power_up(state, kind);
            result.power_ups_collected += 1;
            result.points += state.score - before;
            log::debug!("Power-up {} collected: {:?}", id, kind);
            state.push_event(GameEvent::PowerUpCollected { id, kind });
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;

    fn playing_state() -> GameState {
        let mut state = GameState::new(42);
        state.phase = GamePhase::Playing;
        state.timers.arm();
        state
    }

    fn fire_at(state: &mut GameState, pos: Vec2) {
        state.spawn_projectile(pos.x);
        if let Some(p) = state.projectiles.last_mut() {
            p.pos = pos;
        }
    }

    #[test]
    fn test_normal_target_hit_scores_ten() {
        let mut state = playing_state();
        fire_at(&mut state, Vec2::new(50.0, 50.0));
        state.push_target(Vec2::new(50.0, 52.0), Vec2::ZERO, TargetKind::Normal);

        let result = resolve_collisions(&mut state);
        assert_eq!(result.targets_hit, 1);
        assert!(state.targets[0].hit);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_bonus_target_uses_multiplier() {
        let mut state = playing_state();
        state.multiplier = 3;
        fire_at(&mut state, Vec2::new(20.0, 20.0));
        state.push_target(Vec2::new(24.0, 20.0), Vec2::ZERO, TargetKind::Bonus);

        resolve_collisions(&mut state);
        assert_eq!(state.score, 150);
    }

    #[test]
    fn test_target_scores_once() {
        let mut state = playing_state();
        fire_at(&mut state, Vec2::new(50.0, 50.0));
        fire_at(&mut state, Vec2::new(51.0, 50.0));
        state.push_target(Vec2::new(50.0, 50.0), Vec2::ZERO, TargetKind::Normal);

        resolve_collisions(&mut state);
        resolve_collisions(&mut state);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_miss_outside_radius() {
        let mut state = playing_state();
        fire_at(&mut state, Vec2::new(50.0, 50.0));
        state.push_target(Vec2::new(50.0, 56.0), Vec2::ZERO, TargetKind::Normal);

        assert_eq!(resolve_collisions(&mut state), PassResult::default());
        assert!(!state.targets[0].hit);
    }

    #[test]
    fn test_projectile_pierces_multiple_targets() {
        let mut state = playing_state();
        fire_at(&mut state, Vec2::new(50.0, 50.0));
        state.push_target(Vec2::new(47.0, 50.0), Vec2::ZERO, TargetKind::Normal);
        state.push_target(Vec2::new(53.0, 50.0), Vec2::ZERO, TargetKind::Normal);

        let result = resolve_collisions(&mut state);
        assert_eq!(result.targets_hit, 2);
        assert_eq!(state.projectiles.len(), 1);
        assert!(state.projectiles[0].flying);
    }

    #[test]
    fn test_power_up_box_check() {
        let mut state = playing_state();
        // Diagonal offset of (5, 5) is outside a radius of 6 but inside the box
        fire_at(&mut state, Vec2::new(50.0, 50.0));
        state.push_power_up(Vec2::new(55.0, 55.0), PowerUpKind::Points);

        let result = resolve_collisions(&mut state);
        assert_eq!(result.power_ups_collected, 1);
        assert!(state.power_ups[0].collected);
        assert_eq!(state.score, 100);
    }

    #[test]
    fn test_speed_power_up_adds_time() {
        let mut state = playing_state();
        state.time_left = 12;
        apply_power_up(&mut state, PowerUpKind::Speed);
        assert_eq!(state.time_left, 22);
    }

    #[test]
    fn test_multi_power_up_caps_and_schedules_reset() {
        let mut state = playing_state();
        for _ in 0..7 {
            apply_power_up(&mut state, PowerUpKind::Multi);
        }
        assert_eq!(state.multiplier, 5);
        assert_eq!(state.timers.pending_len(), 7);
    }

    #[test]
    fn test_collected_power_up_is_inert() {
        let mut state = playing_state();
        fire_at(&mut state, Vec2::new(50.0, 50.0));
        state.push_power_up(Vec2::new(50.0, 50.0), PowerUpKind::Points);

        resolve_collisions(&mut state);
        resolve_collisions(&mut state);
        assert_eq!(state.score, 100);
    }
}
