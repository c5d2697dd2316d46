//! Deterministic simulation module
//!
//! All gameplay physics lives here. This module must be pure and deterministic:
//! - One step per frame, fixed constants
//! - Bounded work per step (3×3 cell neighborhood only)
//! - No rendering or platform dependencies

pub mod collision;
pub mod grid;
pub mod physics;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, ball_cell_collision};
pub use grid::{Cell, Grid};
pub use physics::{StepOutcome, apply_control, step};
pub use state::Ball;
pub use tick::{Run, RunPhase, tick};
