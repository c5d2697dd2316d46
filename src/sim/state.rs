//! Ball kinematic state

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::PhysicsTuning;

/// The rolling ball
///
/// Position is in cell units (1.0 = one cell), velocity in cell units per
/// frame. Tuning values are fixed for the lifetime of the ball.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub max_speed: f32,
    pub friction: f32,
    pub acceleration: f32,
}

impl Default for Ball {
    fn default() -> Self {
        Self::new()
    }
}

impl Ball {
    /// A ball at the origin with default tuning
    pub fn new() -> Self {
        Self::with_tuning(&PhysicsTuning::default())
    }

    pub fn with_tuning(tuning: &PhysicsTuning) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: tuning.ball_radius,
            max_speed: tuning.max_speed,
            friction: tuning.friction,
            acceleration: tuning.acceleration,
        }
    }

    /// Place the ball at rest (start of every level attempt)
    pub fn reset(&mut self, x: f32, y: f32) {
        self.pos = Vec2::new(x, y);
        self.vel = Vec2::ZERO;
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}
