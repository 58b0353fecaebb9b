//! Game state and core simulation types
//!
//! One owned `GameState` holds everything a round touches; every stream
//! mutates it in turn from the fixed tick, so no update can be lost.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::timers::Scheduler;
use crate::consts::*;
use crate::tuning::{Tuning, TuningError};

/// Events kept when nobody drains the queue; the oldest are dropped first
pub const MAX_QUEUED_EVENTS: usize = 256;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    Menu,
    /// Active round
    Playing,
    /// Round ended, final score shown
    GameOver,
}

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Upward speed (field percent per tick)
    pub speed: f32,
    pub flying: bool,
}

impl Projectile {
    /// Move one tick toward the top of the field
    pub fn advance(&mut self) {
        self.pos.y -= self.speed;
    }

    /// Whether the projectile has left the top of the field
    pub fn is_gone(&self) -> bool {
        self.pos.y <= 0.0
    }
}

/// Target kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetKind {
    #[default]
    Normal,
    Bonus,
}

/// A bouncing target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub hit: bool,
    pub kind: TargetKind,
}

impl Target {
    /// Move one tick, bouncing off the field walls
    pub fn advance(&mut self) {
        if self.hit {
            return;
        }
        let mut next = self.pos + self.vel;
        if next.x < FIELD_MIN_X || next.x > FIELD_MAX_X {
            self.vel.x = -self.vel.x;
            next.x = next.x.clamp(FIELD_MIN_X, FIELD_MAX_X);
        }
        if next.y < FIELD_MIN_Y || next.y > FIELD_MAX_Y {
            self.vel.y = -self.vel.y;
            next.y = next.y.clamp(FIELD_MIN_Y, FIELD_MAX_Y);
        }
        self.pos = next;
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Extra round time
    Speed,
    /// Temporary score multiplier boost
    Multi,
    /// Flat score bonus
    Points,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Speed, PowerUpKind::Multi, PowerUpKind::Points];
}

/// A stationary pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub collected: bool,
}

/// Feedback for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    TargetHit { id: u32, kind: TargetKind, points: u64 },
    PowerUpSpawned { id: u32, kind: PowerUpKind },
    PowerUpCollected { id: u32, kind: PowerUpKind },
    BatchCleared,
    BatchSpawned { size: usize },
    RoundOver { score: u64, level: u32 },
}

/// Per-collection id counters, session scoped
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdCounters {
    projectile: u32,
    target: u32,
    power_up: u32,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u64,
    /// Current level (recomputed from score when a round ends)
    pub level: u32,
    /// Highest level reached this session (0 until a round finishes)
    pub max_level: u32,
    /// Whole seconds left in the round
    pub time_left: u32,
    pub multiplier: u32,
    /// Turret horizontal position (field percent)
    pub player_x: f32,
    /// Sorted by id
    pub projectiles: Vec<Projectile>,
    /// Sorted by id
    pub targets: Vec<Target>,
    /// Sorted by id
    pub power_ups: Vec<PowerUp>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub timers: Scheduler,
    /// Events produced since the last drain (bounded)
    #[serde(skip)]
    events: VecDeque<GameEvent>,
    ids: IdCounters,
}

impl GameState {
    /// Create a session in the menu with the given seed
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// Create a session with custom balance, refusing tuning that fails validation
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        let time_left = tuning.round_secs;
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Menu,
            score: 0,
            level: 1,
            max_level: 0,
            time_left,
            multiplier: 1,
            player_x: PLAYER_START_X,
            projectiles: Vec::new(),
            targets: Vec::new(),
            power_ups: Vec::new(),
            time_ticks: 0,
            timers: Scheduler::default(),
            events: VecDeque::new(),
            ids: IdCounters::default(),
        }
    }

    /// Reset everything a round owns (score, clock, multiplier, entities, turret)
    ///
    /// Id counters and the session's max level survive.
    pub fn reset_round(&mut self) {
        self.score = 0;
        self.level = 1;
        self.time_left = self.tuning.round_secs;
        self.multiplier = 1;
        self.player_x = PLAYER_START_X;
        self.projectiles.clear();
        self.targets.clear();
        self.power_ups.clear();
        self.timers.cancel_all();
    }

    /// Launch a projectile from the bottom of the field at `x`
    pub fn spawn_projectile(&mut self, x: f32) -> u32 {
        let id = self.ids.projectile;
        self.ids.projectile += 1;
        let speed = self.rng.random_range(PROJECTILE_MIN_SPEED..PROJECTILE_MAX_SPEED);
        self.projectiles.push(Projectile {
            id,
            pos: Vec2::new(x, LAUNCH_Y),
            speed,
            flying: true,
        });
        id
    }

    /// Add a target with a fresh id
    pub fn push_target(&mut self, pos: Vec2, vel: Vec2, kind: TargetKind) -> u32 {
        let id = self.ids.target;
        self.ids.target += 1;
        self.targets.push(Target {
            id,
            pos,
            vel,
            hit: false,
            kind,
        });
        id
    }

    /// Add a power-up with a fresh id
    pub fn push_power_up(&mut self, pos: Vec2, kind: PowerUpKind) -> u32 {
        let id = self.ids.power_up;
        self.ids.power_up += 1;
        self.power_ups.push(PowerUp {
            id,
            pos,
            kind,
            collected: false,
        });
        id
    }

    /// Roll a power-up spawn attempt
    pub fn try_spawn_power_up(&mut self) -> Option<u32> {
        if !self.rng.random_bool(self.tuning.power_up_chance) {
            return None;
        }
        let kind = PowerUpKind::ALL[self.rng.random_range(0..PowerUpKind::ALL.len())];
        let pos = Vec2::new(
            self.rng.random_range(10.0..90.0),
            self.rng.random_range(20.0..80.0),
        );
        let id = self.push_power_up(pos, kind);
        self.push_event(GameEvent::PowerUpSpawned { id, kind });
        Some(id)
    }

    /// True when the batch has targets and all of them are hit
    pub fn batch_cleared(&self) -> bool {
        !self.targets.is_empty() && self.targets.iter().all(|t| t.hit)
    }

    /// Queue an event for the presentation layer
    pub fn push_event(&mut self, event: GameEvent) {
        if self.events.len() == MAX_QUEUED_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    /// Borrowed view for the presentation layer
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            score: self.score,
            level: self.level,
            max_level: self.max_level,
            time_left: self.time_left,
            multiplier: self.multiplier,
            multiplier_active: self.multiplier > 1,
            player_x: self.player_x,
            projectiles: &self.projectiles,
            targets: &self.targets,
            power_ups: &self.power_ups,
        }
    }
}

/// What the presentation layer renders after each tick
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub score: u64,
    pub level: u32,
    pub max_level: u32,
    pub time_left: u32,
    pub multiplier: u32,
    pub multiplier_active: bool,
    pub player_x: f32,
    pub projectiles: &'a [Projectile],
    pub targets: &'a [Target],
    pub power_ups: &'a [PowerUp],
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn target_at(pos: Vec2, vel: Vec2) -> Target {
        Target {
            id: 0,
            pos,
            vel,
            hit: false,
            kind: TargetKind::Normal,
        }
    }

    #[test]
    fn test_target_bounces_off_right_wall() {
        let mut target = target_at(Vec2::new(94.8, 50.0), Vec2::new(0.4, 0.0));
        target.advance();
        assert_eq!(target.pos.x, FIELD_MAX_X);
        assert!(target.vel.x < 0.0);
        target.advance();
        assert!(target.pos.x < FIELD_MAX_X);
    }

    #[test]
    fn test_hit_target_is_inert() {
        let mut target = target_at(Vec2::new(50.0, 50.0), Vec2::new(0.3, 0.3));
        target.hit = true;
        target.advance();
        assert_eq!(target.pos, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_ids_are_unique_per_collection() {
        let mut state = GameState::new(7);
        let a = state.spawn_projectile(10.0);
        let b = state.spawn_projectile(20.0);
        let t = state.push_target(Vec2::splat(50.0), Vec2::ZERO, TargetKind::Normal);
        assert_eq!((a, b, t), (0, 1, 0));

        state.reset_round();
        assert_eq!(state.spawn_projectile(30.0), 2);
    }

    #[test]
    fn test_projectile_launch() {
        let mut state = GameState::new(1);
        state.spawn_projectile(33.0);
        let p = &state.projectiles[0];
        assert_eq!(p.pos, Vec2::new(33.0, LAUNCH_Y));
        assert!((PROJECTILE_MIN_SPEED..PROJECTILE_MAX_SPEED).contains(&p.speed));
        assert!(p.flying);
    }

    #[test]
    fn test_power_up_spawn_attempt() {
        let mut state = GameState::new(8);
        state.tuning.power_up_chance = 0.0;
        assert_eq!(state.try_spawn_power_up(), None);

        state.tuning.power_up_chance = 1.0;
        let id = state.try_spawn_power_up().unwrap();
        let p = state.power_ups[0].clone();
        assert_eq!(p.id, id);
        assert!((10.0..90.0).contains(&p.pos.x));
        assert!((20.0..80.0).contains(&p.pos.y));
        assert!(!p.collected);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::PowerUpSpawned { id, kind: p.kind }]
        );
    }

    #[test]
    fn test_with_tuning_refuses_invalid_balance() {
        let broken = [
            Tuning {
                multiplier_cap: 0,
                ..Tuning::default()
            },
            Tuning {
                multiplier_cap: 9,
                ..Tuning::default()
            },
            Tuning {
                power_up_chance: 1.5,
                ..Tuning::default()
            },
            Tuning {
                bonus_target_chance: -0.1,
                ..Tuning::default()
            },
        ];
        for tuning in broken {
            assert!(matches!(
                GameState::with_tuning(1, tuning),
                Err(TuningError::Invalid(_))
            ));
        }

        let state = GameState::with_tuning(
            1,
            Tuning {
                round_secs: 45,
                ..Tuning::default()
            },
        )
        .unwrap();
        assert_eq!(state.time_left, 45);
    }

    #[test]
    fn test_event_queue_is_bounded() {
        let mut state = GameState::new(2);
        for size in 0..MAX_QUEUED_EVENTS + 10 {
            state.push_event(GameEvent::BatchSpawned { size });
        }
        let events = state.drain_events();
        assert_eq!(events.len(), MAX_QUEUED_EVENTS);
        assert_eq!(events[0], GameEvent::BatchSpawned { size: 10 });
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut state = GameState::new(3);
        state.multiplier = 2;
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(json.contains("\"multiplier_active\":true"));
        assert!(json.contains("\"phase\":\"Menu\""));
    }

    proptest! {
        #[test]
        fn prop_targets_stay_in_bounds(
            x in 5.0f32..=95.0,
            y in 5.0f32..=90.0,
            vx in -0.4f32..0.4,
            vy in -0.4f32..0.4,
            ticks in 1usize..2000,
        ) {
            let mut target = target_at(Vec2::new(x, y), Vec2::new(vx, vy));
            for _ in 0..ticks {
                target.advance();
                prop_assert!((FIELD_MIN_X..=FIELD_MAX_X).contains(&target.pos.x));
                prop_assert!((FIELD_MIN_Y..=FIELD_MAX_Y).contains(&target.pos.y));
            }
        }
    }
}
