//! Per-frame ball physics
//!
//! `apply_control` feeds the control vector in, `step` advances one frame.
//! The order inside `step` is load-bearing: integrate, resolve walls, clamp to
//! the grid, then test holes before the goal.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{ball_cell_collision, ball_hole_collision, ball_in_goal, resolve_wall};
use super::grid::{Cell, Grid};
use super::state::Ball;
use crate::clamp_unit;
use crate::consts::VELOCITY_DEADZONE;

/// Terminal conditions detected by a step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub hit_hole: bool,
    pub reached_goal: bool,
}

impl StepOutcome {
    /// Neither hole nor goal: the run continues
    pub fn is_running(&self) -> bool {
        !self.hit_hole && !self.reached_goal
    }
}

/// Accelerate the ball by a control vector, capping its speed
pub fn apply_control(ball: &mut Ball, cx: f32, cy: f32) {
    let control = clamp_unit(Vec2::new(cx, cy));
    ball.vel += control * ball.acceleration;

    let speed = ball.vel.length();
    if speed > ball.max_speed {
        ball.vel *= ball.max_speed / speed;
    }
}

/// Advance the ball by one frame against a static grid
pub fn step(ball: &mut Ball, grid: &Grid) -> StepOutcome {
    integrate(ball);
    resolve_walls(ball, grid);
    clamp_to_grid(ball, grid);

    if hits_hole(ball, grid) {
        return StepOutcome {
            hit_hole: true,
            reached_goal: false,
        };
    }

    StepOutcome {
        hit_hole: false,
        reached_goal: in_goal(ball, grid),
    }
}

fn integrate(ball: &mut Ball) {
    ball.vel *= ball.friction;
    if ball.vel.x.abs() < VELOCITY_DEADZONE {
        ball.vel.x = 0.0;
    }
    if ball.vel.y.abs() < VELOCITY_DEADZONE {
        ball.vel.y = 0.0;
    }
    ball.pos += ball.vel;
}

/// Walls are resolved one at a time in scan order; a later push can undo part
/// of an earlier one.
fn resolve_walls(ball: &mut Ball, grid: &Grid) {
    let origin = ball.pos;
    for (col, row, cell) in grid.neighborhood(origin) {
        if cell != Cell::Wall {
            continue;
        }
        let hit = ball_cell_collision(ball.pos, ball.radius, col, row);
        if hit.hit {
            resolve_wall(ball, &hit);
        }
    }
}

fn clamp_to_grid(ball: &mut Ball, grid: &Grid) {
    let r = Vec2::splat(ball.radius);
    ball.pos = ball.pos.clamp(r, (grid.size() - r).max(r));
}

fn hits_hole(ball: &Ball, grid: &Grid) -> bool {
    grid.neighborhood(ball.pos).any(|(col, row, cell)| {
        cell == Cell::Hole && ball_hole_collision(ball.pos, ball.radius, col, row)
    })
}

fn in_goal(ball: &Ball, grid: &Grid) -> bool {
    let (col, row) = grid.cell_of(ball.pos);
    grid.get(col, row) == Cell::Goal && ball_in_goal(ball.pos, col, row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// 5×3 grid with a wall at (0, 1), a hole at (2, 2) and the goal at (4, 0)
    fn test_grid() -> Grid {
        #[rustfmt::skip]
        let codes = [
            0, 0, 0, 0, 3,
            1, 0, 0, 0, 0,
            0, 0, 2, 0, 0,
        ];
        Grid::from_codes(5, 3, &codes).unwrap()
    }

    fn ball_at(x: f32, y: f32) -> Ball {
        let mut ball = Ball::new();
        ball.reset(x, y);
        ball
    }

    #[test]
    fn test_apply_control_accelerates() {
        let mut ball = ball_at(1.5, 1.5);
        apply_control(&mut ball, 1.0, -0.5);
        assert!((ball.vel.x - 0.012).abs() < 1e-7);
        assert!((ball.vel.y + 0.006).abs() < 1e-7);
    }

    #[test]
    fn test_apply_control_clamps_input() {
        let mut ball = ball_at(1.5, 1.5);
        apply_control(&mut ball, 5.0, -9.0);
        assert!((ball.vel.x - 0.012).abs() < 1e-7);
        assert!((ball.vel.y + 0.012).abs() < 1e-7);
    }

    #[test]
    fn test_apply_control_caps_speed_preserving_direction() {
        let mut ball = ball_at(1.5, 1.5);
        ball.vel = Vec2::new(0.2, 0.15);
        apply_control(&mut ball, 1.0, 1.0);
        assert!((ball.speed() - ball.max_speed).abs() < 1e-6);
        let before = Vec2::new(0.212, 0.162).normalize();
        assert!((ball.vel.normalize() - before).length() < 1e-5);
    }

    #[test]
    fn test_friction_and_deadzone() {
        let grid = Grid::new(5, 5);
        let mut ball = ball_at(2.5, 2.5);
        ball.vel = Vec2::new(0.1, 0.001);
        step(&mut ball, &grid);
        assert!((ball.vel.x - 0.096).abs() < 1e-7);
        // 0.001 * 0.96 is under the deadzone
        assert_eq!(ball.vel.y, 0.0);
        assert!((ball.pos.x - 2.596).abs() < 1e-6);
        assert_eq!(ball.pos.y, 2.5);
    }

    #[test]
    fn test_ball_comes_to_rest() {
        let grid = Grid::new(5, 5);
        let mut ball = ball_at(2.5, 2.5);
        ball.vel = Vec2::new(0.01, -0.01);
        for _ in 0..200 {
            step(&mut ball, &grid);
        }
        assert_eq!(ball.vel, Vec2::ZERO);
    }

    #[test]
    fn test_head_on_wall_bounce() {
        let grid = test_grid();
        let mut ball = ball_at(1.3, 1.5);
        ball.vel = Vec2::new(-0.1, 0.0);

        let outcome = step(&mut ball, &grid);

        assert!(outcome.is_running());
        assert!(ball.vel.x > 0.0, "vx should be reflected, got {}", ball.vel.x);
        assert_eq!(ball.vel.y, 0.0);
        // Ball boundary is tangent to the wall's right face
        let gap = ball.pos.x - 1.0;
        assert!(gap >= ball.radius - 1e-5, "still overlapping: gap {}", gap);
    }

    #[test]
    fn test_sequential_wall_resolution_in_corner() {
        // Walls left and above; ball pushed into the inside corner
        #[rustfmt::skip]
        let codes = [
            1, 1, 1,
            1, 0, 0,
            1, 0, 0,
        ];
        let grid = Grid::from_codes(3, 3, &codes).unwrap();
        let mut ball = ball_at(1.4, 1.4);
        ball.vel = Vec2::new(-0.1, -0.1);

        step(&mut ball, &grid);

        assert!(ball.pos.x >= 1.0 + ball.radius - 1e-5);
        assert!(ball.pos.y >= 1.0 + ball.radius - 1e-5);
        assert!(ball.vel.x > 0.0);
        assert!(ball.vel.y > 0.0);
    }

    #[test]
    fn test_bounds_clamp_without_boundary_walls() {
        let grid = Grid::new(4, 4);
        let mut ball = ball_at(3.6, 0.4);
        ball.vel = Vec2::new(0.25, -0.25);
        step(&mut ball, &grid);
        assert_eq!(ball.pos.x, 4.0 - ball.radius);
        assert_eq!(ball.pos.y, ball.radius);
    }

    #[test]
    fn test_ball_at_rest_on_hole_center_falls_in() {
        let grid = test_grid();
        let mut ball = ball_at(2.5, 2.5);
        let outcome = step(&mut ball, &grid);
        assert!(outcome.hit_hole);
        assert!(!outcome.reached_goal);
    }

    #[test]
    fn test_hole_beats_goal() {
        #[rustfmt::skip]
        let codes = [
            3, 2,
        ];
        let grid = Grid::from_codes(2, 1, &codes).unwrap();
        // Inside goal capture radius and within hole reach (0.7 from hole center)
        let mut ball = ball_at(0.9, 0.5);
        let outcome = step(&mut ball, &grid);
        assert!(outcome.hit_hole);
        assert!(!outcome.reached_goal);
    }

    #[test]
    fn test_ball_in_goal_reached() {
        let grid = test_grid();
        let mut ball = ball_at(4.5, 0.6);
        let outcome = step(&mut ball, &grid);
        assert!(outcome.reached_goal);
        assert!(!outcome.hit_hole);
    }

    #[test]
    fn test_goal_edge_does_not_count() {
        let grid = test_grid();
        // Inside the goal cell but outside the 0.45 capture radius
        let mut ball = ball_at(4.5, 0.96);
        let outcome = step(&mut ball, &grid);
        assert!(outcome.is_running());
    }

    #[test]
    fn test_grid_without_goal_never_finishes() {
        let grid = Grid::new(3, 3);
        let mut ball = ball_at(1.5, 1.5);
        assert!(step(&mut ball, &grid).is_running());
    }

    fn arb_grid() -> impl Strategy<Value = Grid> {
        (2usize..8, 2usize..8).prop_flat_map(|(w, h)| {
            prop::collection::vec(prop_oneof![4 => Just(0u8), 2 => Just(1u8), 1 => Just(2u8)], w * h)
                .prop_map(move |codes| Grid::from_codes(w, h, &codes).unwrap())
        })
    }

    proptest! {
        #[test]
        fn prop_speed_capped_after_control(
            vx in -0.25f32..0.25,
            vy in -0.25f32..0.25,
            cx in -3.0f32..3.0,
            cy in -3.0f32..3.0,
        ) {
            let mut ball = Ball::new();
            ball.vel = Vec2::new(vx, vy);
            apply_control(&mut ball, cx, cy);
            prop_assert!(ball.speed() <= ball.max_speed + 1e-6);
        }

        #[test]
        fn prop_position_within_bounds_after_step(
            grid in arb_grid(),
            fx in 0.0f32..1.0,
            fy in 0.0f32..1.0,
            vx in -0.25f32..0.25,
            vy in -0.25f32..0.25,
        ) {
            let mut ball = Ball::new();
            let size = grid.size();
            ball.reset(fx * size.x, fy * size.y);
            ball.vel = Vec2::new(vx, vy);

            step(&mut ball, &grid);

            prop_assert!(ball.pos.x >= ball.radius && ball.pos.x <= size.x - ball.radius);
            prop_assert!(ball.pos.y >= ball.radius && ball.pos.y <= size.y - ball.radius);
        }
    }
}
