//! Built-in level table
//!
//! Levels are authored as ASCII rows (`#` wall, `O` hole, `.` floor) with a
//! separate start point and goal cell. Hydration turns them into a [`Grid`]
//! with the goal stamped in.

use glam::Vec2;
use thiserror::Error;

use crate::sim::grid::{Cell, Grid};

/// Level lookup/hydration failures
#[derive(Debug, Error, PartialEq)]
pub enum LevelError {
    #[error("Level {0} does not exist (levels are 1..={count})", count = level_count())]
    UnknownLevel(u32),

    #[error("Malformed level data: {0}")]
    Malformed(String),

    #[error("Unknown cell code: {0}")]
    BadCellCode(u8),
}

/// Authoring data for one level
struct LevelDef {
    rows: &'static [&'static str],
    start: (f32, f32),
    goal: (usize, usize),
}

const LEVELS: &[LevelDef] = &[
    LevelDef {
        rows: &[
            "#######",
            "#.....#",
            "#.###.#",
            "#.....#",
            "#######",
        ],
        start: (1.5, 1.5),
        goal: (5, 3),
    },
    LevelDef {
        rows: &[
            "#########",
            "#...#...#",
            "#.#.#.#.#",
            "#.#...#.#",
            "#.#####O#",
            "#...O...#",
            "#########",
        ],
        start: (1.5, 1.5),
        goal: (7, 1),
    },
    LevelDef {
        rows: &[
            "##########",
            "#....O...#",
            "#.##...#.#",
            "#..O.#.#.#",
            "##.#.#...#",
            "#..#.##O.#",
            "#O...#...#",
            "##########",
        ],
        start: (1.5, 1.5),
        goal: (8, 6),
    },
    LevelDef {
        rows: &[
            "############",
            "#......O...#",
            "#.####.##..#",
            "#.#..O...#.#",
            "#.#.####.#.#",
            "#...#..O.#.#",
            "###.#.##.#.#",
            "#O....#....#",
            "############",
        ],
        start: (1.5, 1.5),
        goal: (10, 7),
    },
];

/// A playable level: grid plus ball start position
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    /// 1-based level number
    pub number: u32,
    pub grid: Grid,
    /// Ball start (cell units)
    pub start: Vec2,
}

/// Number of built-in levels
pub fn level_count() -> u32 {
    LEVELS.len() as u32
}

/// Load and hydrate a level by its 1-based number
pub fn level(number: u32) -> Result<Level, LevelError> {
    let def = number
        .checked_sub(1)
        .and_then(|i| LEVELS.get(i as usize))
        .ok_or(LevelError::UnknownLevel(number))?;

    let level = hydrate(number, def)?;
    log::info!(
        "Loaded level {} ({}x{})",
        number,
        level.grid.width(),
        level.grid.height()
    );
    Ok(level)
}

fn hydrate(number: u32, def: &LevelDef) -> Result<Level, LevelError> {
    let height = def.rows.len();
    let width = def.rows.first().map(|r| r.len()).unwrap_or(0);

    let mut codes = Vec::with_capacity(width * height);
    for (row, line) in def.rows.iter().enumerate() {
        if line.len() != width {
            return Err(LevelError::Malformed(format!(
                "level {} row {} has {} cells, expected {}",
                number,
                row,
                line.len(),
                width
            )));
        }
        for ch in line.chars() {
            let cell = match ch {
                '.' => Cell::Empty,
                '#' => Cell::Wall,
                'O' => Cell::Hole,
                other => {
                    return Err(LevelError::Malformed(format!(
                        "level {} has unknown tile '{}'",
                        number, other
                    )));
                }
            };
            codes.push(cell.code());
        }
    }

    let mut grid = Grid::from_codes(width, height, &codes)?;

    let (gx, gy) = def.goal;
    if gx >= width || gy >= height || grid.get(gx, gy) != Cell::Empty {
        return Err(LevelError::Malformed(format!(
            "level {} goal ({}, {}) is not on open floor",
            number, gx, gy
        )));
    }
    grid.set(gx, gy, Cell::Goal);

    let start = Vec2::new(def.start.0, def.start.1);
    let in_bounds = start.x >= 0.0
        && start.y >= 0.0
        && start.x < width as f32
        && start.y < height as f32;
    let (sx, sy) = grid.cell_of(start);
    if !in_bounds || grid.get(sx, sy) != Cell::Empty {
        return Err(LevelError::Malformed(format!(
            "level {} start ({}, {}) is not on open floor",
            number, start.x, start.y
        )));
    }

    Ok(Level {
        number,
        grid,
        start,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[test]
    fn test_unknown_levels_rejected() {
        assert_eq!(level(0), Err(LevelError::UnknownLevel(0)));
        assert_eq!(
            level(level_count() + 1),
            Err(LevelError::UnknownLevel(level_count() + 1))
        );
        let msg = level(99).unwrap_err().to_string();
        assert!(msg.contains("99"), "{}", msg);
    }

    #[test]
    fn test_every_level_has_one_goal_and_open_start() {
        for n in 1..=level_count() {
            let level = level(n).unwrap();
            let goals = level
                .grid
                .codes()
                .iter()
                .filter(|&&c| c == Cell::Goal.code())
                .count();
            assert_eq!(goals, 1, "level {}", n);

            let (sx, sy) = level.grid.cell_of(level.start);
            assert_eq!(level.grid.get(sx, sy), Cell::Empty, "level {}", n);
        }
    }

    /// Every level's goal is reachable over floor cells
    #[test]
    fn test_every_level_solvable() {
        for n in 1..=level_count() {
            let level = level(n).unwrap();
            let grid = &level.grid;
            let start = grid.cell_of(level.start);
            let goal = grid.find(Cell::Goal).unwrap();

            let mut seen = vec![false; grid.width() * grid.height()];
            let mut queue = VecDeque::from([start]);
            seen[start.1 * grid.width() + start.0] = true;
            let mut found = false;

            while let Some((c, r)) = queue.pop_front() {
                if (c, r) == goal {
                    found = true;
                    break;
                }
                let neighbors = [
                    (c.wrapping_sub(1), r),
                    (c + 1, r),
                    (c, r.wrapping_sub(1)),
                    (c, r + 1),
                ];
                for (nc, nr) in neighbors {
                    if nc >= grid.width() || nr >= grid.height() {
                        continue;
                    }
                    let idx = nr * grid.width() + nc;
                    if seen[idx] {
                        continue;
                    }
                    if matches!(grid.get(nc, nr), Cell::Empty | Cell::Goal) {
                        seen[idx] = true;
                        queue.push_back((nc, nr));
                    }
                }
            }
            assert!(found, "level {} goal unreachable", n);
        }
    }

    #[test]
    fn test_hydrate_rejects_ragged_rows() {
        let def = LevelDef {
            rows: &["###", "#.", "###"],
            start: (1.5, 1.5),
            goal: (1, 1),
        };
        assert!(matches!(hydrate(9, &def), Err(LevelError::Malformed(_))));
    }

    #[test]
    fn test_hydrate_rejects_goal_on_wall() {
        let def = LevelDef {
            rows: &["###", "#.#", "###"],
            start: (1.5, 1.5),
            goal: (0, 0),
        };
        assert!(matches!(hydrate(9, &def), Err(LevelError::Malformed(_))));
    }
}
