//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - Time is supplied by the caller, never read from a clock
//! - Seeded RNG only (spawn positions are the single random element)
//! - Stable iteration order (by entity ID)

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Rect, boxes_intersect};
pub use state::{GameEvent, GamePhase, GameState, Projectile, RngState, Target};
pub use tick::{TickInput, fire, start_game, tick};
