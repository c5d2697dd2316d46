//! Tilt Maze - roll a ball through a grid maze by tilting the device
//!
//! Core modules:
//! - `sim`: Deterministic per-frame physics (ball, grid, collisions, run driver)
//! - `input`: Device/keyboard/touch input normalized to a single control vector
//! - `levels`: Built-in level table hydrated into grids
//! - `platform`: Browser/native sensor abstraction
//! - `settings`: Data-driven tuning

pub mod input;
pub mod levels;
pub mod platform;
pub mod settings;
pub mod sim;

pub use input::{InputMode, InputNormalizer, InputNotice};
pub use levels::{Level, LevelError};
pub use settings::{InputTuning, PhysicsTuning, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal animation frame rate; physics runs once per frame
    pub const FRAMES_PER_SECOND: f32 = 60.0;

    /// Ball defaults (cell units, per frame)
    pub const BALL_RADIUS: f32 = 0.35;
    pub const BALL_MAX_SPEED: f32 = 0.25;
    /// Multiplicative velocity decay per frame
    pub const BALL_FRICTION: f32 = 0.96;
    /// Velocity added per frame per unit of control input
    pub const BALL_ACCELERATION: f32 = 0.012;
    /// Velocity components below this are forced to rest
    pub const VELOCITY_DEADZONE: f32 = 0.001;

    /// Normal-component reflection factor for wall hits (2.0 would be elastic)
    pub const WALL_RESTITUTION: f32 = 1.8;
    pub const HOLE_RADIUS: f32 = 0.35;
    /// Ball center must be this close to the goal cell center to finish
    pub const GOAL_CAPTURE_RADIUS: f32 = 0.45;

    /// Tilt sensor ranges mapped to full deflection
    pub const ORIENTATION_RANGE_DEG: f32 = 45.0;
    pub const MOTION_RANGE: f32 = 9.8;
    /// Normalized readings under this snap to zero
    pub const TILT_JITTER_DEADZONE: f32 = 0.01;

    /// Smoothing factors (weight of the new target per update)
    pub const SENSOR_SMOOTHING: f32 = 0.4;
    pub const KEYBOARD_SMOOTHING: f32 = 0.75;

    /// Touch drag distance (device pixels) for full tilt
    pub const TOUCH_FULL_TILT_PX: f32 = 100.0;
    /// Post-touch fade stops once both components fall below this
    pub const TOUCH_FADE_CUTOFF: f32 = 0.01;

    /// Duration of the "calibrating" indication
    pub const CALIBRATION_MS: f64 = 600.0;
}

/// Clamp each component of a vector to [-1, 1]
#[inline]
pub fn clamp_unit(v: Vec2) -> Vec2 {
    v.clamp(Vec2::NEG_ONE, Vec2::ONE)
}

/// Replace NaN/infinite sensor values with zero
#[inline]
pub fn sanitize(value: Option<f64>) -> f32 {
    match value {
        Some(v) if v.is_finite() => v as f32,
        _ => 0.0,
    }
}
