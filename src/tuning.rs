//! Game balance values
//!
//! Defaults reproduce the standard ruleset. A page can override them with an
//! inline JSON block; anything that fails validation falls back to defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAX_MULTIPLIER, SIM_DT_MS};

/// Errors raised while loading tuning overrides
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(&'static str),
}

/// Data-driven balance for a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Round length in seconds
    pub round_secs: u32,
    /// Projectile vs target hit distance (field percent)
    pub hit_radius: f32,
    /// Projectile vs power-up half box size (field percent, per axis)
    pub pickup_half_size: f32,
    /// Chance that a spawn attempt produces a power-up
    pub power_up_chance: f64,
    /// Base points for a normal target
    pub normal_points: u64,
    /// Base points for a bonus target
    pub bonus_points: u64,
    /// Flat points from a "points" power-up
    pub points_power_up: u64,
    /// Seconds added by a "speed" power-up
    pub speed_bonus_secs: u32,
    /// Highest multiplier a "multi" power-up can reach
    pub multiplier_cap: u32,
    /// Delay before a "multi" pickup resets the multiplier
    pub multiplier_reset_ms: u32,
    /// Batch size is `min(batch_base + level, batch_max)`
    pub batch_base: u32,
    pub batch_max: u32,
    /// Chance that a freshly spawned target is a bonus target
    pub bonus_target_chance: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            round_secs: 30,
            hit_radius: 6.0,
            pickup_half_size: 6.0,
            power_up_chance: 0.05,
            normal_points: 10,
            bonus_points: 50,
            points_power_up: 100,
            speed_bonus_secs: 10,
            multiplier_cap: 5,
            multiplier_reset_ms: 10_000,
            batch_base: 5,
            batch_max: 12,
            bonus_target_chance: 0.2,
        }
    }
}

impl Tuning {
    /// Parse overrides from JSON (missing fields keep their defaults) and validate
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that every value keeps the simulation well-formed
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.round_secs == 0 {
            return Err(TuningError::Invalid("round_secs must be positive"));
        }
        if !(self.hit_radius > 0.0) || !(self.pickup_half_size > 0.0) {
            return Err(TuningError::Invalid("collision sizes must be positive"));
        }
        if !(0.0..=1.0).contains(&self.power_up_chance)
            || !(0.0..=1.0).contains(&self.bonus_target_chance)
        {
            return Err(TuningError::Invalid("probabilities must be within [0, 1]"));
        }
        if !(1..=MAX_MULTIPLIER).contains(&self.multiplier_cap) {
            return Err(TuningError::Invalid("multiplier_cap must be within [1, 5]"));
        }
        if self.multiplier_reset_ms < SIM_DT_MS || self.multiplier_reset_ms % SIM_DT_MS != 0 {
            return Err(TuningError::Invalid(
                "multiplier_reset_ms must be a whole number of ticks",
            ));
        }
        if self.batch_max == 0 || self.batch_base > self.batch_max {
            return Err(TuningError::Invalid("batch sizes must satisfy 0 < base <= max"));
        }
        Ok(())
    }

    /// Number of targets in a batch for the given level
    pub fn batch_size(&self, level: u32) -> usize {
        self.batch_base.saturating_add(level).min(self.batch_max) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override() {
        let tuning = Tuning::from_json(r#"{ "round_secs": 45, "power_up_chance": 0.5 }"#).unwrap();
        assert_eq!(tuning.round_secs, 45);
        assert_eq!(tuning.power_up_chance, 0.5);
        assert_eq!(tuning.bonus_points, 50);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Tuning::from_json(r#"{ "round_secs": 0 }"#),
            Err(TuningError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "multiplier_reset_ms": 1234 }"#),
            Err(TuningError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "multiplier_cap": 6 }"#),
            Err(TuningError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "multiplier_cap": 0 }"#),
            Err(TuningError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "bonus_target_chance": 1.5 }"#),
            Err(TuningError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_batch_size() {
        let tuning = Tuning::default();
        assert_eq!(tuning.batch_size(1), 6);
        assert_eq!(tuning.batch_size(7), 12);
        assert_eq!(tuning.batch_size(40), 12);
    }
}
