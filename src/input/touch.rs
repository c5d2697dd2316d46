//! Touch drag gesture
//!
//! The drag offset from the touch-start point maps linearly to tilt. After
//! release the vector fades out over a bounded number of frames.

use glam::Vec2;

use crate::clamp_unit;

#[derive(Debug, Clone, Default)]
pub struct TouchDrag {
    start: Option<Vec2>,
    current: Vec2,
    fading: bool,
}

impl TouchDrag {
    pub fn begin(&mut self, pos: Vec2) {
        self.start = Some(pos);
        self.current = pos;
        self.fading = false;
    }

    pub fn update(&mut self, pos: Vec2) {
        if self.start.is_some() {
            self.current = pos;
        }
    }

    /// Release the touch; `fade` starts the post-release decay
    pub fn end(&mut self, fade: bool) {
        self.start = None;
        self.fading = fade;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    #[inline]
    pub fn is_fading(&self) -> bool {
        self.fading
    }

    pub fn cancel_fade(&mut self) {
        self.fading = false;
    }

    /// Drag offset scaled so `full_tilt_px` pixels is a full deflection
    pub fn target(&self, full_tilt_px: f32) -> Vec2 {
        match self.start {
            Some(start) => clamp_unit((self.current - start) / full_tilt_px),
            None => Vec2::ZERO,
        }
    }

    /// One frame of post-release decay; stops (and returns exactly zero) once
    /// both components are under `cutoff`
    pub fn fade(&mut self, tilt: Vec2, alpha: f32, cutoff: f32) -> Vec2 {
        let next = tilt * (1.0 - alpha);
        if next.x.abs() < cutoff && next.y.abs() < cutoff {
            self.fading = false;
            return Vec2::ZERO;
        }
        next
    }
}
