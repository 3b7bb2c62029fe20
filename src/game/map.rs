//! Arena Obstacle Field
//!
//! Fixed 20x20 grid layout: an indestructible stone border plus a
//! hand-placed set of interior brick cells. Built once per game and never
//! mutated afterwards.

use serde::{Serialize, Deserialize};

use crate::core::fixed::{GRID_SIZE, MAP_COLS, MAP_ROWS};
use crate::core::rect::Rect;
use crate::core::rng::DeterministicRng;

/// Interior brick cells as `(row, col)`.
const BRICK_CELLS: [(i32, i32); 10] = [
    (5, 4),
    (5, 3),
    (5, 7),
    (8, 10),
    (8, 11),
    (8, 12),
    (3, 15),
    (4, 15),
    (5, 15),
    (13, 9),
];

/// A single grid-cell obstacle.
///
/// `breakable` only selects the brick look; no shot ever removes an
/// obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Cell hit-box
    pub rect: Rect,
    /// Brick rather than stone
    pub breakable: bool,
}

/// Cell content in the layout grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cell {
    Empty,
    Stone,
    Brick,
}

/// Immutable set of obstacles for one game.
#[derive(Clone, Debug)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    /// Build the standard arena layout.
    ///
    /// Obstacles are emitted in row-major order so iteration order is
    /// stable across runs.
    pub fn new() -> Self {
        let mut grid = [[Cell::Empty; MAP_COLS as usize]; MAP_ROWS as usize];

        for col in 0..MAP_COLS as usize {
            grid[0][col] = Cell::Stone;
            grid[MAP_ROWS as usize - 1][col] = Cell::Stone;
        }
        for row in grid.iter_mut() {
            row[0] = Cell::Stone;
            row[MAP_COLS as usize - 1] = Cell::Stone;
        }
        for (row, col) in BRICK_CELLS {
            grid[row as usize][col as usize] = Cell::Brick;
        }

        let mut obstacles = Vec::new();
        for (row, cells) in grid.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if *cell == Cell::Empty {
                    continue;
                }
                obstacles.push(Obstacle {
                    rect: cell_rect(row as i32, col as i32),
                    breakable: *cell == Cell::Brick,
                });
            }
        }

        Self { obstacles }
    }

    /// Field from an explicit obstacle list (tests and custom arenas).
    pub fn from_obstacles(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    /// All obstacles in layout order.
    pub fn all(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Number of obstacles.
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// Whether the field has no obstacles at all.
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// True if `rect` intersects any obstacle.
    pub fn blocks(&self, rect: &Rect) -> bool {
        self.obstacles.iter().any(|o| o.rect.intersects(rect))
    }

    /// Uniformly random interior cell, border excluded.
    ///
    /// Draws the column first, then the row.
    pub fn random_interior_cell(rng: &mut DeterministicRng) -> Rect {
        let x = rng.next_int((MAP_COLS - 2) as u32) as i32 * GRID_SIZE + GRID_SIZE;
        let y = rng.next_int((MAP_ROWS - 2) as u32) as i32 * GRID_SIZE + GRID_SIZE;
        Rect::new(x, y, GRID_SIZE, GRID_SIZE)
    }
}

impl Default for ObstacleField {
    fn default() -> Self {
        Self::new()
    }
}

/// Rectangle covering grid cell `(row, col)`.
#[inline]
pub fn cell_rect(row: i32, col: i32) -> Rect {
    Rect::new(col * GRID_SIZE, row * GRID_SIZE, GRID_SIZE, GRID_SIZE)
}
