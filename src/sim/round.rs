//! Round and level control
//!
//! Menu -> Playing -> GameOver, level thresholds and batch reseeding.

use glam::Vec2;
use rand::Rng;

use super::state::{GameEvent, GamePhase, GameState, TargetKind};

/// Score needed for levels 2 through 5
const LEVEL_THRESHOLDS: [u64; 4] = [100, 300, 700, 1500];
/// Points per level beyond the last threshold
const POINTS_PER_EXTRA_LEVEL: u64 = 1000;

/// Level earned by a round's final score
pub fn level_for_score(score: u64) -> u32 {
    let top = LEVEL_THRESHOLDS[LEVEL_THRESHOLDS.len() - 1];
    if score >= top {
        let extra = (score - top) / POINTS_PER_EXTRA_LEVEL;
        return 5u32.saturating_add(u32::try_from(extra).unwrap_or(u32::MAX));
    }
    1 + LEVEL_THRESHOLDS.iter().filter(|&&t| score >= t).count() as u32
}

/// Replace the current targets with a fresh batch sized for the current level
pub fn generate_batch(state: &mut GameState) {
    let count = state.tuning.batch_size(state.level);
    let bonus_chance = state.tuning.bonus_target_chance;

    state.targets.clear();
    for _ in 0..count {
        let pos = Vec2::new(
            state.rng.random_range(10.0..90.0),
            state.rng.random_range(10.0..50.0),
        );
        let vel = Vec2::new(
            (state.rng.random::<f32>() - 0.5) * 0.8,
            (state.rng.random::<f32>() - 0.5) * 0.8,
        );
        let kind = if state.rng.random_bool(bonus_chance) {
            TargetKind::Bonus
        } else {
            TargetKind::Normal
        };
        state.push_target(pos, vel, kind);
    }

    // Every batch carries at least one bonus target
    if count > 0 {
        let forced = state.rng.random_range(0..count);
        state.targets[forced].kind = TargetKind::Bonus;
    }

    log::info!("Level {}: spawned batch of {} targets", state.level, count);
    state.push_event(GameEvent::BatchSpawned { size: count });
}

/// Enter a fresh round (start from the menu or restart after game over)
pub fn start_round(state: &mut GameState) {
    state.reset_round();
    state.phase = GamePhase::Playing;
    state.timers.arm();
    generate_batch(state);
    log::info!("Round started ({}s)", state.time_left);
}

/// Close the round: settle the level and stop every timer
pub fn end_round(state: &mut GameState) {
    let level = level_for_score(state.score);
    state.level = level;
    state.max_level = state.max_level.max(level);
    state.timers.cancel_all();
    state.phase = GamePhase::GameOver;
    log::info!(
        "Round over: score {}, level {} (best {})",
        state.score,
        level,
        state.max_level
    );
    state.push_event(GameEvent::RoundOver {
        score: state.score,
        level,
    });
}

/// Abandon the round and show the menu
pub fn return_to_menu(state: &mut GameState) {
    state.reset_round();
    state.phase = GamePhase::Menu;
    log::info!("Returned to menu");
}
