//! Browser bindings
//!
//! Thin wrapper so a JS presentation layer can drive the simulation from its
//! `requestAnimationFrame` callback. Pointer coordinates are expected already
//! translated to playfield space.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::platform;
use crate::sim::{GameState, TickInput, fire, start_game, tick};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Game instance owned by the page
#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
}

#[wasm_bindgen]
impl WasmGame {
    /// New idle game; `tuning_json` may override balance values
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: Option<String>) -> Result<WasmGame, JsValue> {
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => Tuning::default(),
        };
        Ok(Self {
            state: GameState::with_tuning(platform::session_seed(), tuning),
        })
    }

    #[wasm_bindgen(js_name = startGame)]
    pub fn start_game(&mut self) {
        start_game(&mut self.state, platform::now_ms());
    }

    /// One animation frame; pass `has_pointer = false` when the pointer is
    /// outside the canvas
    #[wasm_bindgen(js_name = advanceTick)]
    pub fn advance_tick(&mut self, has_pointer: bool, x: f32, y: f32) {
        let pointer = has_pointer.then(|| Vec2::new(x, y));
        tick(&mut self.state, &TickInput::new(pointer, platform::now_ms()));
    }

    /// Returns false when the shot was rejected (reloading or not running)
    pub fn fire(&mut self, x: f32, y: f32) -> bool {
        fire(&mut self.state, Vec2::new(x, y)).is_some()
    }

    #[wasm_bindgen(js_name = cannonAngle)]
    pub fn cannon_angle(&self) -> f32 {
        self.state.cannon_angle()
    }

    pub fn running(&self) -> bool {
        self.state.is_running()
    }

    pub fn kills(&self) -> u32 {
        self.state.kills()
    }

    pub fn lives(&self) -> u8 {
        self.state.lives()
    }

    /// Full state as JSON (targets, projectiles, counters)
    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.state
            .snapshot_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Events since the last call, as JSON
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.drain_events())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
