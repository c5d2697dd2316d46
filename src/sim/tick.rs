//! Per-frame run driver
//!
//! One `tick` per animation frame: apply the control vector, step physics,
//! and move the run into `Won`/`Lost` when the step reports it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::physics::{StepOutcome, apply_control, step};
use super::state::Ball;
use crate::consts::FRAMES_PER_SECOND;
use crate::levels::Level;
use crate::settings::PhysicsTuning;

/// Current phase of a level attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Ball rolling, ticks advance
    Playing,
    /// Frozen; `resume` continues with the same ball
    Paused,
    /// Ball reached the goal
    Won,
    /// Ball fell into a hole
    Lost,
}

/// One attempt at one level
#[derive(Debug, Clone)]
pub struct Run {
    pub level_number: u32,
    pub grid: Grid,
    pub start: Vec2,
    pub ball: Ball,
    pub phase: RunPhase,
    /// Frames simulated in this attempt
    pub ticks: u64,
}

impl Run {
    pub fn new(level: Level, tuning: &PhysicsTuning) -> Self {
        let mut ball = Ball::with_tuning(tuning);
        ball.reset(level.start.x, level.start.y);
        Self {
            level_number: level.number,
            grid: level.grid,
            start: level.start,
            ball,
            phase: RunPhase::Playing,
            ticks: 0,
        }
    }

    /// Pause a playing run (no-op otherwise)
    pub fn pause(&mut self) {
        if self.phase == RunPhase::Playing {
            self.phase = RunPhase::Paused;
        }
    }

    /// Resume a paused run without touching ball or grid (no-op otherwise)
    pub fn resume(&mut self) {
        if self.phase == RunPhase::Paused {
            self.phase = RunPhase::Playing;
        }
    }

    /// Restart the attempt from the level start
    pub fn retry(&mut self) {
        self.ball.reset(self.start.x, self.start.y);
        self.ticks = 0;
        self.phase = RunPhase::Playing;
    }

    /// Elapsed attempt time in seconds
    pub fn elapsed_secs(&self) -> f32 {
        self.ticks as f32 / FRAMES_PER_SECOND
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, RunPhase::Won | RunPhase::Lost)
    }
}

/// Advance the run by one frame with the given control vector
///
/// Returns the step outcome, or `None` when the run is not playing.
pub fn tick(run: &mut Run, control: Vec2) -> Option<StepOutcome> {
    if run.phase != RunPhase::Playing {
        return None;
    }

    run.ticks += 1;
    apply_control(&mut run.ball, control.x, control.y);
    let outcome = step(&mut run.ball, &run.grid);

    if outcome.hit_hole {
        run.phase = RunPhase::Lost;
        log::info!(
            "Level {}: fell in a hole after {:.2}s",
            run.level_number,
            run.elapsed_secs()
        );
    } else if outcome.reached_goal {
        run.phase = RunPhase::Won;
        log::info!(
            "Level {}: goal reached in {:.2}s",
            run.level_number,
            run.elapsed_secs()
        );
    }

    Some(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Cell;

    fn corridor_run() -> Run {
        // 6×3, goal at (4, 1), hole at (1, 0)
        #[rustfmt::skip]
        let codes = [
            0, 2, 0, 0, 0, 0,
            0, 0, 0, 0, 3, 0,
            0, 0, 0, 0, 0, 0,
        ];
        let level = Level {
            number: 1,
            grid: Grid::from_codes(6, 3, &codes).unwrap(),
            start: Vec2::new(2.5, 1.5),
        };
        Run::new(level, &PhysicsTuning::default())
    }

    #[test]
    fn test_roll_into_goal() {
        let mut run = corridor_run();
        let mut frames = 0;
        while run.phase == RunPhase::Playing && frames < 600 {
            tick(&mut run, Vec2::new(1.0, 0.0));
            frames += 1;
        }
        assert_eq!(run.phase, RunPhase::Won);
        assert_eq!(run.grid.get(4, 1), Cell::Goal);
        assert!(run.ticks > 0);
    }

    #[test]
    fn test_roll_into_hole() {
        let mut run = corridor_run();
        let mut frames = 0;
        while run.phase == RunPhase::Playing && frames < 600 {
            tick(&mut run, Vec2::new(-1.0, -1.0));
            frames += 1;
        }
        assert_eq!(run.phase, RunPhase::Lost);
    }

    #[test]
    fn test_pause_freezes_and_resume_continues() {
        let mut run = corridor_run();
        tick(&mut run, Vec2::new(1.0, 0.0));
        let ball = run.ball.clone();

        run.pause();
        assert_eq!(tick(&mut run, Vec2::new(1.0, 0.0)), None);
        assert_eq!(run.ball, ball);
        assert_eq!(run.ticks, 1);

        run.resume();
        run.resume();
        assert_eq!(run.phase, RunPhase::Playing);
        assert!(tick(&mut run, Vec2::new(1.0, 0.0)).is_some());
        assert_eq!(run.ticks, 2);
    }

    #[test]
    fn test_finished_run_ignores_ticks_until_retry() {
        let mut run = corridor_run();
        run.phase = RunPhase::Lost;
        run.pause();
        assert_eq!(run.phase, RunPhase::Lost);
        assert_eq!(tick(&mut run, Vec2::ZERO), None);

        run.ball.vel = Vec2::new(0.1, 0.1);
        run.retry();
        assert_eq!(run.phase, RunPhase::Playing);
        assert_eq!(run.ball.pos, run.start);
        assert_eq!(run.ball.vel, Vec2::ZERO);
        assert_eq!(run.ticks, 0);
    }

    #[test]
    fn test_elapsed_secs() {
        let mut run = corridor_run();
        run.ticks = 90;
        assert!((run.elapsed_secs() - 1.5).abs() < 1e-6);
    }
}
