//! Aliens Go Home - cannon vs. flying objects arcade game
//!
//! Core modules:
//! - `sim`: Simulation engine (spawning, kinematics, collisions, lives/score)
//! - `tuning`: Data-driven game balance
//! - `platform`: Browser/native platform abstraction
//! - `error`: Configuration errors

pub mod error;
pub mod platform;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::TuningError;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Milliseconds between two flying object spawns
    pub const SPAWN_INTERVAL_MS: u64 = 1000;
    /// Maximum flying objects alive at once
    pub const MAX_TARGETS: usize = 4;
    /// Horizontal launch positions for new flying objects
    pub const TARGET_START_POSITIONS: [f32; 4] = [-300.0, -150.0, 150.0, 300.0];
    /// Vertical launch position (above the visible sky)
    pub const TARGET_START_Y: f32 = -1000.0;
    /// Time a flying object takes to fall to the ground
    pub const TARGET_ANIMATION_MS: u64 = 4000;
    /// Vertical distance covered during the fall animation
    pub const GAME_HEIGHT: f32 = 1200.0;

    /// Flying object hit box (half extents)
    pub const TARGET_HALF_WIDTH: f32 = 40.0;
    pub const TARGET_HALF_HEIGHT: f32 = 10.0;

    /// Cannon ball hit box (half extent, square)
    pub const PROJECTILE_HALF_SIZE: f32 = 8.0;
    /// Distance a cannon ball travels per tick
    pub const PROJECTILE_STEP: f32 = 10.0;
    /// Cannon balls are dropped once they leave this area
    pub const PROJECTILE_MIN_Y: f32 = -800.0;
    pub const PROJECTILE_MAX_ABS_X: f32 = 500.0;
    /// Cannon balls in flight at once ("reloading" beyond this)
    pub const MAX_PROJECTILES: usize = 2;

    pub const STARTING_LIVES: u8 = 3;
    /// Cannon angle before the first pointer sample (degrees)
    pub const INITIAL_CANNON_ANGLE: f32 = 30.0;
}

/// Angle of the vector `origin -> point` in degrees.
///
/// Screen convention (y grows downward): 0° points straight up, angles grow
/// clockwise, so right is 90° and left is -90°. Range is (-180, 180].
/// A zero-length vector yields 0° (straight up).
#[inline]
pub fn angle_between(origin_x: f32, origin_y: f32, point_x: f32, point_y: f32) -> f32 {
    let dx = point_x - origin_x;
    let dy = point_y - origin_y;
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    normalize_degrees(dx.atan2(-dy).to_degrees())
}

/// Normalized angle to (-180, 180]
#[inline]
pub fn normalize_degrees(mut angle: f32) -> f32 {
    while angle > 180.0 {
        angle -= 360.0;
    }
    while angle <= -180.0 {
        angle += 360.0;
    }
    angle
}

/// Unit direction for an angle produced by [`angle_between`]
#[inline]
pub fn heading(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.sin(), -rad.cos())
}
