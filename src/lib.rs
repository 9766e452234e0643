//! Hunt Runner - A side-scrolling runner with a relentless pursuer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, pursuit AI, combos, camera)
//! - `platform`: Host input signal abstraction
//! - `persistence`: Versioned save envelopes for host-owned storage
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::SimError;
pub use highscores::HighScores;
pub use tuning::{DifficultyPreset, Tuning};

/// Game configuration constants
pub mod consts {
    /// Nominal frame length used when the host hands us a bogus delta
    pub const DEFAULT_DT: f32 = 0.016;
    /// Largest delta a single tick may integrate (~30 fps)
    pub const MAX_DT: f32 = 0.033;
    /// Deltas above this are treated as a stall (tab hidden, debugger) and replaced
    pub const STALL_DT: f32 = 1.0;

    /// Ground line (y grows downward, canvas style)
    pub const GROUND_Y: f32 = 550.0;
    /// Player spawn x
    pub const PLAYER_START_X: f32 = 100.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 70.0;
    pub const PLAYER_RUN_SPEED: f32 = 200.0;
    pub const PLAYER_JUMP_IMPULSE: f32 = -480.0;
    pub const PLAYER_GRAVITY: f32 = 850.0;
    pub const PLAYER_MAX_FALL_SPEED: f32 = 600.0;
    pub const PLAYER_MAX_SLIDE: f32 = 0.5;
    /// Actions closer together than this (or further apart than the idle window) count as perfect
    pub const PERFECT_TIMING_WINDOW: f32 = 0.15;
    pub const PERFECT_IDLE_WINDOW: f32 = 2.0;

    /// Spawn cursor defaults
    pub const SPAWN_LOOK_AHEAD: f32 = 1500.0;
    pub const SPAWN_SPACING: f32 = 300.0;
    pub const CULL_DISTANCE: f32 = 500.0;
    /// Between a sliding player's height and a standing one's
    pub const LOW_BAR_CLEARANCE: f32 = 45.0;

    /// Pursuer defaults
    pub const PURSUER_WIDTH: f32 = 120.0;
    pub const PURSUER_HEIGHT: f32 = 140.0;
    pub const PURSUER_START_BEHIND: f32 = 400.0;
    pub const PURSUER_BASE_SPEED: f32 = 150.0;
    pub const PURSUER_MAX_SPEED: f32 = 500.0;
    pub const PURSUER_TARGET_DISTANCE: f32 = 300.0;
    pub const PURSUER_MIN_DISTANCE: f32 = 250.0;
    /// Rage gained per missed collectible
    pub const RAGE_PER_MISS: f32 = 0.15;

    /// Camera defaults
    pub const CAMERA_FOLLOW_OFFSET: f32 = 300.0;
    pub const CAMERA_DAMPING: f32 = 0.15;
    pub const CAMERA_REFERENCE_FPS: f32 = 60.0;

    /// Viewport (world units)
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;
}

/// Clamp a host-provided frame delta into a range the integrators can handle.
///
/// Non-finite, non-positive and stall-sized deltas fall back to [`consts::DEFAULT_DT`];
/// everything else is capped at [`consts::MAX_DT`].
#[inline]
pub fn sanitize_dt(dt: f32) -> f32 {
    use consts::*;
    if !dt.is_finite() || dt <= 0.0 || dt > STALL_DT {
        return DEFAULT_DT;
    }
    dt.min(MAX_DT)
}

/// True when both components of a vector are finite
#[inline]
pub fn is_finite_vec(v: glam::Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}
