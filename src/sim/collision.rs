//! Collision detection and response against grid cells
//!
//! Walls are unit squares; the ball is a circle. Holes and the goal are
//! proximity tests against cell centers.

use glam::Vec2;

use super::state::Ball;
use crate::consts::*;

/// Result of a circle-vs-cell check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Unit separation direction (from cell toward ball center)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Center of cell (col, row)
#[inline]
pub fn cell_center(col: usize, row: usize) -> Vec2 {
    Vec2::new(col as f32 + 0.5, row as f32 + 0.5)
}

/// Closest point on the unit square of cell (col, row) to `pos`
#[inline]
pub fn closest_point_on_cell(pos: Vec2, col: usize, row: usize) -> Vec2 {
    let min = Vec2::new(col as f32, row as f32);
    pos.clamp(min, min + Vec2::ONE)
}

/// Check a ball against a wall cell
///
/// A center lying exactly on (or inside) the square has no usable separation
/// direction and is reported as a miss.
pub fn ball_cell_collision(pos: Vec2, radius: f32, col: usize, row: usize) -> CollisionResult {
    let closest = closest_point_on_cell(pos, col, row);
    let delta = pos - closest;
    let dist = delta.length();

    if dist < radius && dist > 0.0 {
        return CollisionResult {
            hit: true,
            normal: delta / dist,
            penetration: radius - dist,
        };
    }

    CollisionResult::miss()
}

/// Push the ball out of a wall and bounce the normal velocity component
pub fn resolve_wall(ball: &mut Ball, hit: &CollisionResult) {
    ball.pos += hit.normal * hit.penetration;

    let dot = ball.vel.dot(hit.normal);
    if dot < 0.0 {
        ball.vel -= WALL_RESTITUTION * dot * hit.normal;
    }
}

/// Check if the ball fell into the hole at (col, row)
pub fn ball_hole_collision(pos: Vec2, radius: f32, col: usize, row: usize) -> bool {
    pos.distance(cell_center(col, row)) < HOLE_RADIUS + radius
}

/// Check if the ball is well inside the goal cell at (col, row)
pub fn ball_in_goal(pos: Vec2, col: usize, row: usize) -> bool {
    pos.distance(cell_center(col, row)) < GOAL_CAPTURE_RADIUS
}
