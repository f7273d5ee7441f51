//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads comes from a [`Tuning`].
//! Defaults mirror [`crate::consts`]; a JSON document may override any subset.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Flying objects ===
    /// Minimum time between two spawns (ms)
    pub spawn_interval_ms: u64,
    /// Maximum flying objects alive at once
    pub max_targets: usize,
    /// Horizontal launch positions, picked uniformly at random
    pub start_positions: Vec<f32>,
    /// Vertical launch position
    pub target_start_y: f32,
    /// Fall duration from launch to the ground (ms)
    pub animation_ms: u64,
    /// Vertical distance covered over `animation_ms`
    pub game_height: f32,
    /// Hit box half extents
    pub target_half_size: Vec2,

    // === Cannon ===
    /// Cannon pivot; pointer positions are interpreted relative to the playfield
    pub cannon_origin: Vec2,
    /// Angle shown before the first pointer sample (degrees)
    pub initial_cannon_angle: f32,

    // === Cannon balls ===
    pub projectile_half_size: f32,
    /// Distance travelled per tick
    pub projectile_step: f32,
    /// Balls at or above this y are out of play
    pub projectile_min_y: f32,
    /// Balls with |x| at or beyond this are out of play
    pub projectile_max_abs_x: f32,
    /// Balls in flight at once
    pub max_projectiles: usize,

    // === Session ===
    pub starting_lives: u8,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            max_targets: MAX_TARGETS,
            start_positions: TARGET_START_POSITIONS.to_vec(),
            target_start_y: TARGET_START_Y,
            animation_ms: TARGET_ANIMATION_MS,
            game_height: GAME_HEIGHT,
            target_half_size: Vec2::new(TARGET_HALF_WIDTH, TARGET_HALF_HEIGHT),

            cannon_origin: Vec2::ZERO,
            initial_cannon_angle: INITIAL_CANNON_ANGLE,

            projectile_half_size: PROJECTILE_HALF_SIZE,
            projectile_step: PROJECTILE_STEP,
            projectile_min_y: PROJECTILE_MIN_Y,
            projectile_max_abs_x: PROJECTILE_MAX_ABS_X,
            max_projectiles: MAX_PROJECTILES,

            starting_lives: STARTING_LIVES,
        }
    }
}

impl Tuning {
    /// Parse a JSON document (missing keys keep their defaults) and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!(
            "Loaded tuning: spawn every {}ms, max {} targets, {} lives",
            tuning.spawn_interval_ms,
            tuning.max_targets,
            tuning.starting_lives
        );
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for editing and sharing balance files)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.spawn_interval_ms == 0 {
            return Err(TuningError::invalid("spawn_interval_ms", "must be positive"));
        }
        if self.animation_ms == 0 {
            return Err(TuningError::invalid("animation_ms", "must be positive"));
        }
        if self.max_targets == 0 {
            return Err(TuningError::invalid("max_targets", "must be at least 1"));
        }
        if self.start_positions.is_empty() {
            return Err(TuningError::invalid("start_positions", "must not be empty"));
        }
        if self.start_positions.iter().any(|x| !x.is_finite()) {
            return Err(TuningError::invalid("start_positions", "must be finite"));
        }
        if self.max_projectiles == 0 {
            return Err(TuningError::invalid("max_projectiles", "must be at least 1"));
        }
        if self.starting_lives == 0 {
            return Err(TuningError::invalid("starting_lives", "must be at least 1"));
        }
        if !(self.projectile_step.is_finite() && self.projectile_step > 0.0) {
            return Err(TuningError::invalid("projectile_step", "must be positive"));
        }
        if !(self.projectile_max_abs_x.is_finite() && self.projectile_max_abs_x > 0.0) {
            return Err(TuningError::invalid("projectile_max_abs_x", "must be positive"));
        }

        let finite = [
            ("target_start_y", self.target_start_y),
            ("game_height", self.game_height),
            ("initial_cannon_angle", self.initial_cannon_angle),
            ("projectile_half_size", self.projectile_half_size),
            ("projectile_min_y", self.projectile_min_y),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(TuningError::invalid(field, "must be finite"));
            }
        }
        if !self.target_half_size.is_finite() {
            return Err(TuningError::invalid("target_half_size", "must be finite"));
        }
        if !self.cannon_origin.is_finite() {
            return Err(TuningError::invalid("cannon_origin", "must be finite"));
        }

        Ok(())
    }
}
