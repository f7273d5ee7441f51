//! Aliens Go Home headless driver
//!
//! Plays a session with a simple autopilot on a simulated 60 Hz clock and
//! logs the outcome. Useful for balancing: pass a tuning JSON file as the
//! first argument.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use aliens_go_home::Tuning;
    use aliens_go_home::sim::{GameEvent, GameState, TickInput, fire, start_game, tick};

    env_logger::init();
    log::info!("Aliens Go Home (headless) starting...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("Can't load tuning from {}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    let seed = aliens_go_home::platform::session_seed();
    let mut state = GameState::with_tuning(seed, tuning);

    const FRAME_MS: u64 = 16;
    const MAX_FRAMES: u64 = 60 * 60 * 5;

    let mut now = 0;
    start_game(&mut state, now);

    for _ in 0..MAX_FRAMES {
        now += FRAME_MS;

        let pointer = autopilot::pick_target(&state, now);
        tick(&mut state, &TickInput::new(pointer, now));
        if let Some(pointer) = pointer {
            fire(&mut state, pointer);
        }

        for event in state.drain_events() {
            match event {
                GameEvent::TargetDestroyed { id } => log::info!("Shot down #{}", id),
                GameEvent::TargetCrashed { id } => log::warn!("#{} reached the ground", id),
                _ => {}
            }
        }

        if !state.is_running() {
            break;
        }
    }

    println!(
        "Session over after {:.1}s: {} kills, {} lives left (seed {})",
        now as f64 / 1000.0,
        state.kills(),
        state.lives(),
        seed
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_init, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use aliens_go_home::sim::GameState;
    use glam::Vec2;

    /// Aim slightly ahead of the lowest flying object
    pub fn pick_target(state: &GameState, now_ms: u64) -> Option<Vec2> {
        let tuning = state.tuning();
        let lead_ms = 300;
        state
            .targets()
            .iter()
            .map(|t| t.position(now_ms + lead_ms, tuning))
            .filter(|p| p.y > tuning.projectile_min_y)
            .max_by(|a, b| a.y.total_cmp(&b.y))
    }
}
