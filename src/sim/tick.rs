//! Per-tick simulation step
//!
//! One call to [`tick`] runs, in order: aim, spawn, move cannon balls,
//! resolve collisions, remove crashed flying objects. Everything except aiming
//! is skipped while the game is not running.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::Rng;

use super::collision::boxes_intersect;
use super::state::{GameEvent, GamePhase, GameState, Projectile, Target};
use crate::angle_between;

/// Input for a single tick, sampled once per animation frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Pointer position in playfield coordinates (None when the pointer is
    /// outside the canvas)
    pub pointer: Option<Vec2>,
    /// Driver clock (ms, monotonic)
    pub now_ms: u64,
}

impl TickInput {
    pub fn new(pointer: Option<Vec2>, now_ms: u64) -> Self {
        Self { pointer, now_ms }
    }

    /// Tick without a pointer sample
    pub fn at(now_ms: u64) -> Self {
        Self {
            pointer: None,
            now_ms,
        }
    }
}

/// Drop pointer samples that would poison the angle computation
#[inline]
fn valid_pointer(pointer: Option<Vec2>) -> Option<Vec2> {
    pointer.filter(|p| p.is_finite())
}

/// Reset every mutable field and begin a new session
///
/// Allowed from any phase. The spawn timer starts at `now_ms`, so the first
/// flying object appears one spawn interval later.
pub fn start_game(state: &mut GameState, now_ms: u64) {
    let now = state.observe_time(now_ms);

    state.kills = 0;
    state.lives = state.tuning.starting_lives;
    state.targets.clear();
    state.projectiles.clear();
    state.events.clear();
    state.last_spawn_at_ms = now;
    state.phase = GamePhase::Running;
    state.events.push(GameEvent::GameStarted);

    log::info!("Game started at {}ms ({} lives)", now, state.lives);
}

/// Advance the game state by one tick
///
/// A missing (or non-finite) pointer leaves the cannon where it is; the rest
/// of the tick still runs so flying objects keep falling.
pub fn tick(state: &mut GameState, input: &TickInput) {
    let now = state.observe_time(input.now_ms);

    if let Some(pointer) = valid_pointer(input.pointer) {
        aim(state, pointer);
    }

    if state.phase != GamePhase::Running {
        return;
    }

    spawn_targets(state, now);
    move_projectiles(state);
    resolve_collisions(state, now);
    check_game_end(state, now);
}

/// Try to fire a cannon ball toward `pointer`
///
/// Silently ignored while the game is not running, while the maximum number
/// of balls is in flight ("reloading"), or for a non-finite pointer.
/// Returns the new ball's id when one was fired.
pub fn fire(state: &mut GameState, pointer: Vec2) -> Option<u32> {
    if state.phase != GamePhase::Running {
        return None;
    }
    let Some(pointer) = valid_pointer(Some(pointer)) else {
        log::trace!("Ignoring fire with invalid pointer {:?}", pointer);
        return None;
    };
    if state.projectiles.len() >= state.tuning.max_projectiles {
        log::trace!("Can't fire, reload in progress");
        return None;
    }

    let origin = state.tuning.cannon_origin;
    let angle = angle_between(origin.x, origin.y, pointer.x, pointer.y);
    let id = state.next_entity_id();
    state.projectiles.push(Projectile::new(id, origin, angle));
    state.events.push(GameEvent::ProjectileFired { id, angle });

    log::debug!("Fired ball {} at {:.1}°", id, angle);
    Some(id)
}

/// Point the cannon at the pointer
fn aim(state: &mut GameState, pointer: Vec2) {
    let origin = state.tuning.cannon_origin;
    state.cannon_angle = angle_between(origin.x, origin.y, pointer.x, pointer.y);
}

/// Spawn one flying object when the interval has passed and there is room
fn spawn_targets(state: &mut GameState, now: u64) {
    let tuning = &state.tuning;
    let due = now.saturating_sub(state.last_spawn_at_ms) > tuning.spawn_interval_ms;
    if !due || state.targets.len() >= tuning.max_targets {
        return;
    }
    let slots = tuning.start_positions.len();
    if slots == 0 {
        return;
    }

    let slot = state.rng.random_range(0..slots);
    let x = state.tuning.start_positions[slot];
    let base_y = state.tuning.target_start_y;
    let id = state.next_entity_id();

    state.targets.push(Target::new(id, x, base_y, now));
    state.last_spawn_at_ms = now;
    state.events.push(GameEvent::TargetSpawned { id, x });

    log::debug!("Spawned flying object {} at x={} ({}ms)", id, x, now);
}

/// Drop cannon balls that left the playfield, then move the rest one step
fn move_projectiles(state: &mut GameState) {
    let tuning = &state.tuning;
    state.projectiles.retain(|ball| ball.in_bounds(tuning));
    for ball in &mut state.projectiles {
        ball.advance(tuning.projectile_step);
    }
}

/// Remove every flying object and cannon ball whose hit boxes overlap
///
/// All overlapping pairs are found before anything is removed, so one ball can
/// take out several flying objects (and vice versa) in the same tick. Each
/// destroyed flying object scores exactly one kill.
fn resolve_collisions(state: &mut GameState, now: u64) {
    if state.targets.is_empty() || state.projectiles.is_empty() {
        return;
    }

    let tuning = &state.tuning;
    let mut destroyed_targets = BTreeSet::new();
    let mut destroyed_balls = BTreeSet::new();

    for target in &state.targets {
        let target_box = target.hit_box(now, tuning);
        for ball in &state.projectiles {
            if boxes_intersect(&target_box, &ball.hit_box(tuning)) {
                destroyed_targets.insert(target.id);
                destroyed_balls.insert(ball.id);
            }
        }
    }

    if destroyed_targets.is_empty() {
        return;
    }

    state.kills += destroyed_targets.len() as u32;
    state.targets.retain(|t| !destroyed_targets.contains(&t.id));
    state.projectiles.retain(|b| !destroyed_balls.contains(&b.id));

    for &id in &destroyed_targets {
        state.events.push(GameEvent::TargetDestroyed { id });
    }
    log::debug!(
        "Destroyed flying objects {:?} with balls {:?} (kills: {})",
        destroyed_targets,
        destroyed_balls,
        state.kills
    );
}

/// Remove flying objects that reached the ground; each one costs a life
fn check_game_end(state: &mut GameState, now: u64) {
    let tuning = &state.tuning;
    let (crashed, alive): (Vec<Target>, Vec<Target>) = std::mem::take(&mut state.targets)
        .into_iter()
        .partition(|t| t.is_crashed(now, tuning));
    state.targets = alive;

    if crashed.is_empty() {
        return;
    }

    for target in &crashed {
        state.events.push(GameEvent::TargetCrashed { id: target.id });
    }
    state.lives = state.lives.saturating_sub(crashed.len().min(u8::MAX as usize) as u8);
    log::debug!("{} flying object(s) crashed, {} lives left", crashed.len(), state.lives);

    if state.lives == 0 {
        state.phase = GamePhase::Ended;
        state.events.push(GameEvent::GameOver { kills: state.kills });
        log::info!("Game over with {} kills", state.kills);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    /// Tuning with a single spawn column and a slow fall, so spawns never crash
    fn calm_tuning() -> Tuning {
        Tuning {
            start_positions: vec![0.0],
            animation_ms: 60_000,
            ..Default::default()
        }
    }

    fn running(tuning: Tuning) -> GameState {
        let mut state = GameState::with_tuning(12345, tuning);
        start_game(&mut state, 0);
        state
    }

    #[test]
    fn test_aim_applies_even_when_idle() {
        let mut state = GameState::new(1);
        tick(&mut state, &TickInput::new(Some(Vec2::new(100.0, 0.0)), 16));
        assert!((state.cannon_angle() - 90.0).abs() < 1e-3);
        assert_eq!(state.phase(), GamePhase::Idle);
        assert!(state.targets().is_empty());
    }

    #[test]
    fn test_missing_or_invalid_pointer_keeps_angle() {
        let mut state = running(Tuning::default());
        tick(&mut state, &TickInput::new(Some(Vec2::new(-50.0, -50.0)), 10));
        let angle = state.cannon_angle();
        assert!((angle + 45.0).abs() < 1e-3);

        tick(&mut state, &TickInput::at(20));
        assert_eq!(state.cannon_angle(), angle);

        tick(&mut state, &TickInput::new(Some(Vec2::new(f32::NAN, 3.0)), 30));
        assert_eq!(state.cannon_angle(), angle);
        assert_eq!(fire(&mut state, Vec2::new(f32::INFINITY, 0.0)), None);
    }

    #[test]
    fn test_start_game_resets_everything() {
        let mut state = running(calm_tuning());
        state.kills = 9;
        state.lives = 1;
        state.insert_target(10.0, 0);
        fire(&mut state, Vec2::new(0.0, -1.0));
        state.phase = GamePhase::Ended;

        start_game(&mut state, 5_000);
        assert_eq!(state.phase(), GamePhase::Running);
        assert!(state.is_running());
        assert_eq!(state.kills(), 0);
        assert_eq!(state.lives(), 3);
        assert!(state.targets().is_empty());
        assert!(state.projectiles().is_empty());
        assert_eq!(state.last_spawn_at_ms(), 5_000);
        assert_eq!(state.drain_events(), vec![GameEvent::GameStarted]);
    }

    #[test]
    fn test_spawn_throttling() {
        let mut state = running(calm_tuning());

        // Not due yet
        tick(&mut state, &TickInput::at(1_000));
        assert!(state.targets().is_empty());

        tick(&mut state, &TickInput::at(1_001));
        assert_eq!(state.targets().len(), 1);
        assert_eq!(state.targets()[0].created_at_ms, 1_001);

        // Second call inside the interval spawns nothing
        tick(&mut state, &TickInput::at(1_500));
        assert_eq!(state.targets().len(), 1);

        tick(&mut state, &TickInput::at(2_002));
        tick(&mut state, &TickInput::at(3_003));
        tick(&mut state, &TickInput::at(4_004));
        assert_eq!(state.targets().len(), 4);

        // Max live targets reached
        tick(&mut state, &TickInput::at(10_000));
        tick(&mut state, &TickInput::at(20_000));
        assert_eq!(state.targets().len(), 4);
        assert_eq!(state.last_spawn_at_ms(), 4_004);
    }

    #[test]
    fn test_spawn_uses_predefined_positions() {
        let mut state = running(Tuning {
            animation_ms: 60_000,
            ..Default::default()
        });
        for i in 1..=4 {
            tick(&mut state, &TickInput::at(i * 1_001));
        }
        let positions = &state.tuning().start_positions;
        assert_eq!(state.targets().len(), 4);
        for target in state.targets() {
            assert!(positions.contains(&target.x));
            assert_eq!(target.base_y, -1000.0);
        }
    }

    #[test]
    fn test_fire_cap() {
        let mut state = running(Tuning::default());
        let pointer = Vec2::new(0.0, -100.0);
        assert!(fire(&mut state, pointer).is_some());
        assert!(fire(&mut state, pointer).is_some());
        assert_eq!(fire(&mut state, pointer), None);
        assert_eq!(state.projectiles().len(), 2);
    }

    #[test]
    fn test_fire_ignored_when_not_running() {
        let mut state = GameState::new(1);
        assert_eq!(fire(&mut state, Vec2::new(0.0, -100.0)), None);
        assert!(state.projectiles().is_empty());
    }

    #[test]
    fn test_projectiles_leave_playfield() {
        let mut state = running(calm_tuning());
        let id = fire(&mut state, Vec2::new(100.0, 0.0)).expect("fired");

        let mut now = 0;
        for _ in 0..49 {
            now += 1;
            tick(&mut state, &TickInput::at(now));
        }
        let ball = state.projectile(id).expect("still in flight");
        assert!((ball.pos.x - 490.0).abs() < 1e-2);

        // Dropped once it crosses x=500
        let mut extra = 0;
        while state.projectile(id).is_some() {
            extra += 1;
            tick(&mut state, &TickInput::at(now + extra));
            assert!(extra <= 3, "ball never left the playfield");
        }

        // Room to fire again
        assert!(fire(&mut state, Vec2::new(0.0, -1.0)).is_some());
    }

    #[test]
    fn test_collision_removes_both_once() {
        let mut state = running(calm_tuning());
        let now = 1_000;
        // Spawned 1s ago with the default 4s fall: y = -1000 + 1200/4 = -700
        let mut tuning = state.tuning().clone();
        tuning.animation_ms = 4_000;
        state.tuning = tuning;
        let target_id = state.insert_target(0.0, 0);
        state.last_spawn_at_ms = now;

        let ball_id = fire(&mut state, Vec2::new(0.0, -1.0)).expect("fired");
        state.projectiles[0].pos = Vec2::new(0.0, -690.0);

        tick(&mut state, &TickInput::at(now));
        assert!(state.target(target_id).is_none());
        assert!(state.projectile(ball_id).is_none());
        assert_eq!(state.kills(), 1);
        assert_eq!(state.lives(), 3);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::TargetDestroyed { id: target_id }));

        // Nothing left to hit: kill count is stable
        tick(&mut state, &TickInput::at(now + 16));
        assert_eq!(state.kills(), 1);
    }

    #[test]
    fn test_one_ball_many_targets_counts_each_target() {
        let mut state = running(calm_tuning());
        let a = state.insert_target(0.0, 0);
        let b = state.insert_target(10.0, 0);
        fire(&mut state, Vec2::new(0.0, -1.0));
        state.projectiles[0].pos = Vec2::new(5.0, -790.0);
        // -1000 + (t / 60000) * 1200 = -800  =>  t = 10000
        state.last_spawn_at_ms = 10_000;

        tick(&mut state, &TickInput::at(10_000));
        assert!(state.target(a).is_none());
        assert!(state.target(b).is_none());
        assert!(state.projectiles().is_empty());
        assert_eq!(state.kills(), 2);
    }

    #[test]
    fn test_two_balls_one_target_single_kill() {
        let mut state = running(calm_tuning());
        let target = state.insert_target(0.0, 0);
        fire(&mut state, Vec2::new(0.0, -1.0));
        fire(&mut state, Vec2::new(0.0, -1.0));
        state.projectiles[0].pos = Vec2::new(-4.0, -790.0);
        state.projectiles[1].pos = Vec2::new(4.0, -790.0);
        state.last_spawn_at_ms = 10_000;

        tick(&mut state, &TickInput::at(10_000));
        assert!(state.target(target).is_none());
        assert!(state.projectiles().is_empty());
        assert_eq!(state.kills(), 1);
    }

    #[test]
    fn test_crash_costs_one_life() {
        let mut state = running(Tuning::default());
        let target = state.insert_target(150.0, 0);
        // Keep the spawner quiet
        state.last_spawn_at_ms = 4_001;

        tick(&mut state, &TickInput::at(4_000));
        assert!(state.target(target).is_some());
        assert_eq!(state.lives(), 3);

        tick(&mut state, &TickInput::at(4_001));
        assert!(state.target(target).is_none());
        assert_eq!(state.lives(), 2);
        assert!(state.is_running());
        assert!(state
            .drain_events()
            .contains(&GameEvent::TargetCrashed { id: target }));
    }

    #[test]
    fn test_game_ends_when_lives_run_out() {
        let mut state = running(Tuning::default());
        for x in [-300.0, -150.0, 150.0] {
            state.insert_target(x, 0);
        }
        state.last_spawn_at_ms = 5_000;

        tick(&mut state, &TickInput::at(5_000));
        assert_eq!(state.lives(), 0);
        assert_eq!(state.phase(), GamePhase::Ended);
        assert!(!state.is_running());
        assert!(state
            .drain_events()
            .contains(&GameEvent::GameOver { kills: 0 }));

        // Subsequent ticks only aim
        tick(&mut state, &TickInput::new(Some(Vec2::new(0.0, -10.0)), 20_000));
        assert!(state.targets().is_empty());
        assert_eq!(state.last_spawn_at_ms(), 5_000);
        assert!(state.cannon_angle().abs() < 1e-3);
        assert_eq!(fire(&mut state, Vec2::new(0.0, -10.0)), None);

        start_game(&mut state, 20_000);
        assert!(state.is_running());
        assert_eq!(state.lives(), 3);
        assert_eq!(state.kills(), 0);
    }

    #[test]
    fn test_clock_going_backwards_is_clamped() {
        let mut state = running(calm_tuning());
        tick(&mut state, &TickInput::at(1_001));
        assert_eq!(state.targets().len(), 1);
        tick(&mut state, &TickInput::at(10));
        assert_eq!(state.now_ms(), 1_001);
        assert_eq!(state.targets().len(), 1);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = running(Tuning::default());
        let mut state2 = running(Tuning::default());

        for i in 1..=4u64 {
            let input = TickInput::new(Some(Vec2::new(i as f32 * 10.0, -100.0)), i * 1_001);
            tick(&mut state1, &input);
            tick(&mut state2, &input);
        }

        assert_eq!(state1.targets(), state2.targets());
        assert!((state1.cannon_angle() - state2.cannon_angle()).abs() < 0.0001);
    }

    #[test]
    fn test_end_to_end_shoot_down() {
        let mut state = GameState::with_tuning(
            42,
            Tuning {
                start_positions: vec![0.0],
                ..Default::default()
            },
        );
        start_game(&mut state, 0);

        let stray = fire(&mut state, Vec2::new(100.0, 100.0)).expect("fired");

        // No pointer: the cannon stays put but the world keeps moving
        let mut now = 0;
        while state.targets().is_empty() {
            now += 16;
            tick(&mut state, &TickInput::at(now));
            assert!(now < 2_000, "no flying object spawned");
        }
        assert!(now > 1_000);
        let target_id = state.targets()[0].id;

        // Shoot straight up at the falling object
        let ball_id = fire(&mut state, Vec2::new(0.0, -100.0)).expect("fired");
        assert_ne!(ball_id, stray);

        while state.kills() == 0 {
            now += 16;
            tick(&mut state, &TickInput::at(now));
            assert!(now < 5_000, "shot missed");
        }

        assert_eq!(state.kills(), 1);
        assert_eq!(state.lives(), 3);
        assert!(state.target(target_id).is_none());
        assert!(state.projectile(ball_id).is_none());
        assert!(state.is_running());
    }
}
