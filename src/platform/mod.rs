//! Platform abstraction layer
//!
//! Handles browser/native differences for the clock drivers feed into the
//! simulation. The simulation itself never calls into this module.

/// Wall clock in milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Wall clock in milliseconds
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Seed for a fresh session (varies per run)
pub fn session_seed() -> u64 {
    now_ms()
}
