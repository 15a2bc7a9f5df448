//! Solving animation and maze rasterization module.
//!
//! This module contains the animation system replaying a depth-first exploration trace, and the
//! coordinate utilities turning a maze into the pixel raster drawn on the in-game canvas. A maze of
//! `rows x cols` cells becomes a raster of `(2 * rows + 1) x (2 * cols + 1)` pixels: cells sit on
//! odd coordinates and the pixels between them are either walls or open passages.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;

use crate::{grid::Cell, maze::Maze, solver::TraceStep};

/// Animation frame delay in milliseconds.
///
/// This constant controls the timing between animation frames in the solving visualization. A lower
/// value results in faster animation, while a higher value slows down the animation to make it
/// easier to follow the exploration.
pub(crate) const ANIMATION_FRAME_DELAY_MS: u64 = 60;

/// Pixel coordinates on the maze raster, as `(column, row)`.
pub(crate) type Pixel = (usize, usize);

/// Animation state manager for the solving visualization.
///
/// This structure manages the animation state including timing, current step tracking, and the
/// cells being displayed while the exploration trace is replayed.
#[derive(Debug)]
pub(crate) struct AnimationManager {
    /// Exploration trace being replayed.
    ///
    /// This field stores the enter and leave steps recorded by the depth-first exploration. An
    /// empty trace means the animation is off.
    pub(crate) steps: Vec<TraceStep>,
    /// Current step in the animation sequence.
    ///
    /// This field tracks the current position in the [`steps`](AnimationManager::steps) vector to
    /// determine which steps have been rendered and which are still pending.
    pub(crate) current_index: usize,
    /// Timestamp of the last animation frame update.
    ///
    /// This field stores the time when the animation was last updated, used to control the timing
    /// between animation frames.
    pub(crate) last_update_time: Instant,
    /// Cells currently displayed by the animation.
    ///
    /// This field holds the explorer's current trail, so backtracking removes cells from it.
    pub(crate) current_path: Vec<Cell>,
}

impl Default for AnimationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationManager {
    /// Creates a new, inactive animation manager.
    pub(crate) fn new() -> Self {
        Self {
            steps: Vec::new(),
            current_index: 0,
            last_update_time: Instant::now(),
            current_path: Vec::new(),
        }
    }

    /// Returns `true` while a trace is loaded.
    pub(crate) fn is_active(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Loads a new trace and rewinds the animation.
    pub(crate) fn load(&mut self, steps: Vec<TraceStep>) {
        self.steps = steps;
        self.reset();
    }

    /// Resets the animation state to the beginning.
    pub(crate) fn reset(&mut self) {
        self.current_index = 0;
        self.current_path.clear();
        self.last_update_time = Instant::now();
    }

    /// Clears all animation data and resets state.
    pub(crate) fn clear(&mut self) {
        self.steps.clear();
        self.reset();
    }

    /// Updates the animation state based on timing and current progress.
    ///
    /// This method applies the next step of the trace when enough time has passed: entering a cell
    /// adds it to the displayed trail and leaving it removes it. Once the trace is exhausted the
    /// found path stays on screen.
    pub(crate) fn update(&mut self) {
        if self.last_update_time.elapsed() < Duration::from_millis(ANIMATION_FRAME_DELAY_MS) {
            return;
        }
        self.last_update_time = Instant::now();

        let Some(step) = self.steps.get(self.current_index) else {
            return;
        };
        match step {
            TraceStep::Enter(cell) => self.current_path.push(*cell),
            TraceStep::Leave(cell) => {
                if let Some(position) = self.current_path.iter().position(|shown| shown == cell) {
                    let _ = self.current_path.remove(position);
                }
            }
        }
        self.current_index += 1;
    }

    /// Returns `true` once every step has been played.
    pub(crate) fn is_finished(&self) -> bool {
        self.current_index >= self.steps.len()
    }
}

/// Returns the raster size of a maze as `(rows, columns)`.
pub(crate) const fn raster_size(maze: &Maze) -> (usize, usize) {
    (2 * maze.rows() + 1, 2 * maze.cols() + 1)
}

/// Returns the pixel at the center of a cell.
pub(crate) const fn cell_pixel(cell: Cell) -> Pixel {
    (2 * cell.col() + 1, 2 * cell.row() + 1)
}

/// Returns every wall pixel of the maze raster.
///
/// Corner posts and the outer border are always walls; the pixel between two adjacent cells is a
/// wall exactly when their passage is closed.
pub(crate) fn wall_pixels(maze: &Maze) -> Vec<Pixel> {
    let (rows, cols) = raster_size(maze);
    let mut walls = Vec::new();

    for y in 0..rows {
        for x in 0..cols {
            let wall = match (x % 2, y % 2) {
                (0, 0) => true,
                (1, 1) => false,
                (0, _) => {
                    x == 0
                        || x == cols - 1
                        || !maze.is_open(
                            Cell::new(y / 2, x / 2 - 1),
                            Cell::new(y / 2, x / 2),
                        )
                }
                _ => {
                    y == 0
                        || y == rows - 1
                        || !maze.is_open(
                            Cell::new(y / 2 - 1, x / 2),
                            Cell::new(y / 2, x / 2),
                        )
                }
            };
            if wall {
                walls.push((x, y));
            }
        }
    }

    walls
}

/// Returns the pixels covering a sequence of cells, including the passages between them.
pub(crate) fn path_pixels(cells: &[Cell]) -> Vec<Pixel> {
    let mut pixels = Vec::with_capacity(cells.len() * 2);
    for (index, cell) in cells.iter().enumerate() {
        let (x, y) = cell_pixel(*cell);
        pixels.push((x, y));
        if let Some(next) = cells.get(index + 1).filter(|next| cell.is_adjacent(**next)) {
            let (next_x, next_y) = cell_pixel(*next);
            pixels.push(((x + next_x) / 2, (y + next_y) / 2));
        }
    }

    pixels
}

/// Transforms raster pixels to screen coordinates for canvas rendering.
///
/// This function converts raster coordinates (col, row) to screen coordinates (x, y) using the
/// standard transformation formulas: coordinate[i] = (n - 1) / 2 - i for rows (ascending order) and
/// coordinate[i] = i - (n - 1) / 2 for columns (descending order).
///
/// # Errors
///
/// This function returns an error if a coordinate or the raster size does not fit in a `u16`.
pub(crate) fn transform_maze_to_screen_coords(
    pixels: &[Pixel],
    (rows, cols): (usize, usize),
) -> Result<Vec<(f64, f64)>> {
    let rows_n = f64::from(u16::try_from(rows)?);
    let cols_n = f64::from(u16::try_from(cols)?);

    pixels
        .iter()
        .map(|&(col, row)| {
            let screen_y = (rows_n - 1.) / 2. - f64::from(u16::try_from(row)?);
            let screen_x = f64::from(u16::try_from(col)?) - (cols_n - 1.) / 2.;

            Ok((screen_x, screen_y))
        })
        .collect()
}
