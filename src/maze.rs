//! Maze data module.
//!
//! This module contains the immutable [`Maze`] value: a grid, the open/closed relation between every
//! pair of adjacent cells, and the designated start and goal cells.

use std::{collections::VecDeque, fmt};

use crate::{
    error::EngineError,
    grid::{Cell, Direction, Grid},
};

/// A fully constructed maze.
///
/// Walls are stored once per pair of adjacent cells, as two flags per cell (open towards the right
/// neighbour, open towards the neighbour below), so `is_open(a, b) == is_open(b, a)` always holds.
/// Values are never mutated once handed out; a new maze is a new value.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct Maze {
    /// Cell space of the maze.
    grid: Grid,
    /// Whether each cell has an open passage to its right neighbour, in row-major order.
    open_right: Vec<bool>,
    /// Whether each cell has an open passage to the neighbour below, in row-major order.
    open_down: Vec<bool>,
    /// Cell the player starts from.
    start: Cell,
    /// Cell the player must reach.
    goal: Cell,
}

impl Maze {
    /// Builds a maze with every wall closed and endpoints in opposite corners.
    pub(crate) fn closed(grid: Grid) -> Self {
        let cells = grid.cell_count();
        Self {
            grid,
            open_right: vec![false; cells],
            open_down: vec![false; cells],
            start: Cell::new(0, 0),
            goal: Cell::new(grid.rows() - 1, grid.cols() - 1),
        }
    }

    /// Builds a maze from its exchange form: dimensions and the list of open edges.
    ///
    /// Endpoints are placed in the top-left and bottom-right corners. Duplicate edges are accepted.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidDimension`] if either dimension is zero
    /// - [`EngineError::InvalidCell`] if an edge mentions an out-of-bounds cell
    /// - [`EngineError::NotAdjacent`] if an edge joins two non-adjacent cells
    /// - [`EngineError::Disconnected`] if the edges leave some cell unreachable
    pub fn from_open_edges<I>(rows: usize, cols: usize, edges: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = (Cell, Cell)>,
    {
        let mut maze = Self::closed(Grid::new(rows, cols)?);
        for (first, second) in edges {
            maze.open_wall(first, second)?;
        }

        let reachable = maze.reachable_count();
        let total = maze.grid.cell_count();
        if reachable != total {
            return Err(EngineError::Disconnected { reachable, total });
        }

        Ok(maze)
    }

    /// Returns a copy of this maze with different endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidCell`] if either endpoint lies outside the maze.
    pub fn with_endpoints(&self, start: Cell, goal: Cell) -> Result<Self, EngineError> {
        let mut maze = self.clone();
        maze.set_endpoints(start, goal)?;
        Ok(maze)
    }

    /// Opens the wall between two adjacent cells.
    pub(crate) fn open_wall(&mut self, first: Cell, second: Cell) -> Result<(), EngineError> {
        let _ = self.grid.check(first)?;
        let _ = self.grid.check(second)?;
        let (index, horizontal) = self
            .wall_slot(first, second)
            .ok_or(EngineError::NotAdjacent { first, second })?;

        let flags = if horizontal {
            &mut self.open_right
        } else {
            &mut self.open_down
        };
        let slot = flags
            .get_mut(index)
            .ok_or(EngineError::NotAdjacent { first, second })?;
        *slot = true;

        Ok(())
    }

    /// Moves the endpoints after validating them.
    pub(crate) fn set_endpoints(&mut self, start: Cell, goal: Cell) -> Result<(), EngineError> {
        self.start = self.grid.check(start)?;
        self.goal = self.grid.check(goal)?;
        Ok(())
    }

    /// Locates the flag storing the wall between two cells.
    ///
    /// Returns the row-major index of the upper-left cell of the pair and whether the wall lies
    /// between horizontal neighbours.
    fn wall_slot(&self, first: Cell, second: Cell) -> Option<(usize, bool)> {
        if !self.grid.is_adjacent(first, second) {
            return None;
        }
        let low = first.min(second);
        let high = first.max(second);

        Some((self.grid.index_of(low)?, low.row() == high.row()))
    }

    /// Returns the cell space of the maze.
    #[must_use]
    pub const fn grid(&self) -> Grid {
        self.grid
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.grid.rows()
    }

    /// Returns the number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// Returns the designated start cell.
    #[must_use]
    pub const fn start(&self) -> Cell {
        self.start
    }

    /// Returns the designated goal cell.
    #[must_use]
    pub const fn goal(&self) -> Cell {
        self.goal
    }

    /// Returns `true` when the passage between two adjacent cells is open.
    ///
    /// Out-of-bounds or non-adjacent cells are never open.
    #[must_use]
    pub fn is_open(&self, first: Cell, second: Cell) -> bool {
        self.wall_slot(first, second)
            .and_then(|(index, horizontal)| {
                if horizontal {
                    self.open_right.get(index).copied()
                } else {
                    self.open_down.get(index).copied()
                }
            })
            .unwrap_or(false)
    }

    /// Returns the cell reached by walking from `cell` in `direction`, if the wall is open.
    #[must_use]
    pub fn passage(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        self.grid
            .step(cell, direction)
            .filter(|next| self.is_open(cell, *next))
    }

    /// Iterates over the neighbours reachable from `cell` through an open wall.
    ///
    /// Neighbours come in [`Direction::ALL`] order.
    pub fn passages(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        self.grid
            .neighbors(cell)
            .filter(move |next| self.is_open(cell, *next))
    }

    /// Iterates over every open edge once, in the order of [`Grid::adjacent_pairs`].
    pub fn open_edges(&self) -> impl Iterator<Item = (Cell, Cell)> + '_ {
        self.grid
            .adjacent_pairs()
            .filter(|(first, second)| self.is_open(*first, *second))
    }

    /// Returns the number of open edges.
    #[must_use]
    pub fn open_edge_count(&self) -> usize {
        self.open_right
            .iter()
            .chain(&self.open_down)
            .filter(|open| **open)
            .count()
    }

    /// Returns the number of cells reachable from the top-left corner.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        let mut seen = vec![false; self.grid.cell_count()];
        let mut queue = VecDeque::from([Cell::new(0, 0)]);
        let mut count = 0;

        while let Some(cell) = queue.pop_front() {
            let Some(flag) = self.grid.index_of(cell).and_then(|index| seen.get_mut(index)) else {
                continue;
            };
            if *flag {
                continue;
            }
            *flag = true;
            count += 1;
            queue.extend(self.passages(cell));
        }

        count
    }

    /// Returns `true` when every cell is reachable from every other.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.reachable_count() == self.grid.cell_count()
    }

    /// Returns `true` when the maze is a spanning tree: connected and without loops.
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.open_edge_count() + 1 == self.grid.cell_count() && self.is_connected()
    }

    /// Returns a text rendering of the maze with caller-chosen cell markers.
    ///
    /// Walls are drawn as `+---+` boxes; `mark` returns the character to print in the middle of a
    /// cell, if any.
    pub fn render<F>(&self, mark: F) -> Render<'_, F>
    where
        F: Fn(Cell) -> Option<char>,
    {
        Render { maze: self, mark }
    }

    /// Returns the marker used for endpoints in the default rendering.
    fn endpoint_mark(&self, cell: Cell) -> Option<char> {
        if cell == self.start {
            Some('S')
        } else if cell == self.goal {
            Some('G')
        } else {
            None
        }
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.render(|cell| self.endpoint_mark(cell)), formatter)
    }
}

/// Text rendering of a [`Maze`], returned by [`Maze::render`].
pub struct Render<'maze, F> {
    /// Maze being drawn.
    maze: &'maze Maze,
    /// Cell marker callback.
    mark: F,
}

impl<F> fmt::Display for Render<'_, F>
where
    F: Fn(Cell) -> Option<char>,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grid = self.maze.grid;
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                let cell = Cell::new(row, col);
                let top = self.maze.passage(cell, Direction::Up).is_some();
                formatter.write_str(if top { "+   " } else { "+---" })?;
            }
            formatter.write_str("+\n")?;

            for col in 0..grid.cols() {
                let cell = Cell::new(row, col);
                let left = self.maze.passage(cell, Direction::Left).is_some();
                let mark = (self.mark)(cell).unwrap_or(' ');
                write!(formatter, "{} {mark} ", if left { ' ' } else { '|' })?;
            }
            formatter.write_str("|\n")?;
        }
        for _ in 0..grid.cols() {
            formatter.write_str("+---")?;
        }
        formatter.write_str("+\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds the 3x3 serpentine maze used across tests.
    ///
    /// ```text
    /// S - - .
    ///       |
    /// . - - .
    /// |
    /// . - - G
    /// ```
    fn serpentine() -> Maze {
        Maze::from_open_edges(
            3,
            3,
            [
                (Cell::new(0, 0), Cell::new(0, 1)),
                (Cell::new(0, 1), Cell::new(0, 2)),
                (Cell::new(0, 2), Cell::new(1, 2)),
                (Cell::new(1, 2), Cell::new(1, 1)),
                (Cell::new(1, 1), Cell::new(1, 0)),
                (Cell::new(1, 0), Cell::new(2, 0)),
                (Cell::new(2, 0), Cell::new(2, 1)),
                (Cell::new(2, 1), Cell::new(2, 2)),
            ],
        )
        .expect("serpentine maze should be valid")
    }

    #[test]
    fn test_closed_maze_has_no_open_edges() {
        let maze = Maze::closed(Grid::new(2, 3).expect("valid grid"));

        assert_eq!(maze.open_edge_count(), 0);
        assert_eq!(maze.reachable_count(), 1);
        assert!(!maze.is_connected());
        assert_eq!(maze.start(), Cell::new(0, 0));
        assert_eq!(maze.goal(), Cell::new(1, 2));
    }

    #[test]
    fn test_open_relation_is_symmetric() {
        let maze = serpentine();

        for (first, second) in maze.grid().adjacent_pairs() {
            assert_eq!(maze.is_open(first, second), maze.is_open(second, first));
        }
        assert!(maze.is_open(Cell::new(0, 1), Cell::new(0, 0)));
        assert!(!maze.is_open(Cell::new(0, 1), Cell::new(1, 1)));
    }

    #[test]
    fn test_from_open_edges_spanning_tree() {
        let maze = serpentine();

        assert_eq!(maze.open_edge_count(), 8);
        assert!(maze.is_perfect());
        assert_eq!(maze.open_edges().count(), 8);
    }

    #[test]
    fn test_from_open_edges_rejects_bad_input() {
        assert_eq!(
            Maze::from_open_edges(0, 5, []),
            Err(EngineError::InvalidDimension { rows: 0, cols: 5 })
        );
        assert_eq!(
            Maze::from_open_edges(2, 2, [(Cell::new(0, 0), Cell::new(1, 1))]),
            Err(EngineError::NotAdjacent {
                first: Cell::new(0, 0),
                second: Cell::new(1, 1)
            })
        );
        assert!(matches!(
            Maze::from_open_edges(2, 2, [(Cell::new(0, 1), Cell::new(0, 2))]),
            Err(EngineError::InvalidCell { .. })
        ));
        assert_eq!(
            Maze::from_open_edges(2, 2, [(Cell::new(0, 0), Cell::new(0, 1))]),
            Err(EngineError::Disconnected {
                reachable: 2,
                total: 4
            })
        );
    }

    #[test]
    fn test_single_cell_maze_is_perfect() {
        let maze = Maze::from_open_edges(1, 1, []).expect("single cell maze");

        assert!(maze.is_perfect());
        assert_eq!(maze.start(), maze.goal());
    }

    #[test]
    fn test_passage_respects_walls_and_bounds() {
        let maze = serpentine();

        assert_eq!(
            maze.passage(Cell::new(0, 0), Direction::Right),
            Some(Cell::new(0, 1))
        );
        assert_eq!(maze.passage(Cell::new(0, 0), Direction::Down), None);
        assert_eq!(maze.passage(Cell::new(0, 0), Direction::Up), None);
        assert_eq!(
            maze.passages(Cell::new(1, 1)).collect::<Vec<_>>(),
            vec![Cell::new(1, 0), Cell::new(1, 2)]
        );
    }

    #[test]
    fn test_with_endpoints() {
        let maze = serpentine();
        let moved = maze
            .with_endpoints(Cell::new(1, 1), Cell::new(0, 0))
            .expect("valid endpoints");

        assert_eq!(moved.start(), Cell::new(1, 1));
        assert_eq!(moved.goal(), Cell::new(0, 0));
        assert_eq!(maze.start(), Cell::new(0, 0), "original untouched");
        assert!(maze.with_endpoints(Cell::new(3, 0), Cell::new(0, 0)).is_err());
    }

    #[test]
    fn test_display_draws_walls_and_endpoints() {
        let rendered = serpentine().to_string();
        let expected = "\
+---+---+---+
| S         |
+---+---+   +
|           |
+   +---+---+
|         G |
+---+---+---+
";

        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_with_custom_marks() {
        let maze = serpentine();
        let rendered = maze
            .render(|cell| (cell == Cell::new(1, 1)).then_some('@'))
            .to_string();

        assert!(rendered.contains(" @ "));
        assert!(!rendered.contains('S'));
    }
}
