//! Game state and core simulation types
//!
//! The state exclusively owns every flying object and cannon ball. Entity IDs
//! come from a single counter and are never reused within a session.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::heading;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Not started yet
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// All lives lost
    Ended,
}

/// Something the presentation layer may want to react to (sound, animation)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted,
    TargetSpawned { id: u32, x: f32 },
    ProjectileFired { id: u32, angle: f32 },
    /// A cannon ball hit a flying object
    TargetDestroyed { id: u32 },
    /// A flying object reached the ground
    TargetCrashed { id: u32 },
    GameOver { kills: u32 },
}

/// A flying object falling toward the ground
///
/// Only the vertical position changes over time, and it is derived from the
/// elapsed time since `created_at_ms` rather than stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    /// Horizontal position (fixed after spawn)
    pub x: f32,
    /// Vertical launch position
    pub base_y: f32,
    /// Spawn time (ms)
    pub created_at_ms: u64,
}

impl Target {
    pub fn new(id: u32, x: f32, base_y: f32, created_at_ms: u64) -> Self {
        Self {
            id,
            x,
            base_y,
            created_at_ms,
        }
    }

    /// Milliseconds since spawn
    #[inline]
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.created_at_ms)
    }

    /// Vertical position, linearly interpolated toward the ground
    pub fn current_y(&self, now_ms: u64, tuning: &Tuning) -> f32 {
        let progress = self.age_ms(now_ms) as f32 / tuning.animation_ms as f32;
        self.base_y + progress * tuning.game_height
    }

    pub fn position(&self, now_ms: u64, tuning: &Tuning) -> Vec2 {
        Vec2::new(self.x, self.current_y(now_ms, tuning))
    }

    /// True once the fall animation has run out without a hit
    #[inline]
    pub fn is_crashed(&self, now_ms: u64, tuning: &Tuning) -> bool {
        self.age_ms(now_ms) > tuning.animation_ms
    }

    pub fn hit_box(&self, now_ms: u64, tuning: &Tuning) -> Rect {
        Rect::around(self.position(now_ms, tuning), tuning.target_half_size)
    }
}

/// A cannon ball travelling in a straight line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Unit direction, fixed at firing time
    dir: Vec2,
}

impl Projectile {
    /// Fire from `origin` along `angle` (degrees, see [`crate::angle_between`])
    pub fn new(id: u32, origin: Vec2, angle: f32) -> Self {
        Self {
            id,
            pos: origin,
            dir: heading(angle),
        }
    }

    #[inline]
    pub fn dir(&self) -> Vec2 {
        self.dir
    }

    /// Advance one fixed step along the firing direction
    pub fn advance(&mut self, step: f32) {
        self.pos += self.dir * step;
    }

    /// Still inside the playfield area where balls are tracked
    pub fn in_bounds(&self, tuning: &Tuning) -> bool {
        self.pos.y > tuning.projectile_min_y && self.pos.x.abs() < tuning.projectile_max_abs_x
    }

    pub fn hit_box(&self, tuning: &Tuning) -> Rect {
        Rect::around(self.pos, Vec2::splat(tuning.projectile_half_size))
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete game state (authoritative snapshot)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session seed for reproducible spawn positions
    pub rng_state: RngState,
    /// Spawn position picker
    pub(crate) rng: Pcg32,
    /// Balance data
    pub(crate) tuning: Tuning,
    pub(crate) phase: GamePhase,
    /// Cannon angle (degrees, 0 = straight up)
    pub(crate) cannon_angle: f32,
    pub(crate) kills: u32,
    pub(crate) lives: u8,
    /// Latest time seen by the engine (ms, never decreases)
    pub(crate) now_ms: u64,
    pub(crate) last_spawn_at_ms: u64,
    /// Live flying objects (sorted by id)
    pub(crate) targets: Vec<Target>,
    /// Live cannon balls (sorted by id)
    pub(crate) projectiles: Vec<Projectile>,
    /// Pending events for the presentation layer
    #[serde(skip)]
    pub(crate) events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create an idle game with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create an idle game with custom balance data
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let rng_state = RngState::new(seed);
        Self {
            rng: rng_state.to_rng(),
            rng_state,
            phase: GamePhase::Idle,
            cannon_angle: tuning.initial_cannon_angle,
            kills: 0,
            lives: tuning.starting_lives,
            now_ms: 0,
            last_spawn_at_ms: 0,
            targets: Vec::new(),
            projectiles: Vec::new(),
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub(crate) fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Record the driver's clock, clamping backwards jumps
    pub(crate) fn observe_time(&mut self, now_ms: u64) -> u64 {
        self.now_ms = self.now_ms.max(now_ms);
        self.now_ms
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn cannon_angle(&self) -> f32 {
        self.cannon_angle
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    /// Latest time the engine has seen (ms)
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn last_spawn_at_ms(&self) -> u64 {
        self.last_spawn_at_ms
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn target(&self, id: u32) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn projectile(&self, id: u32) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id == id)
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// JSON snapshot for the presentation layer
    pub fn snapshot_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Insert a flying object directly (scripted scenarios and tests)
    pub fn insert_target(&mut self, x: f32, created_at_ms: u64) -> u32 {
        let id = self.next_entity_id();
        let base_y = self.tuning.target_start_y;
        self.targets.push(Target::new(id, x, base_y, created_at_ms));
        id
    }
}
