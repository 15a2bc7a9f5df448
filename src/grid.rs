//! Grid model module.
//!
//! This module contains the addressable cell space underlying every maze: cells, the four movement
//! directions, and the bounded rectangular grid that answers adjacency questions.

use std::{fmt, iter::FusedIterator, str::FromStr};

use crate::error::EngineError;

/// A single addressable unit of the grid.
///
/// Cells are plain coordinates and carry no knowledge of the grid they belong to; bounds are
/// checked by [`Grid`]. Ordering is row-major.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cell {
    /// Zero-based row, growing downwards.
    row: usize,
    /// Zero-based column, growing to the right.
    col: usize,
}

impl Cell {
    /// Creates a cell at the given row and column.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the row of the cell.
    #[must_use]
    pub const fn row(self) -> usize {
        self.row
    }

    /// Returns the column of the cell.
    #[must_use]
    pub const fn col(self) -> usize {
        self.col
    }

    /// Returns `true` iff both cells differ by exactly one unit along exactly one axis.
    #[must_use]
    pub const fn is_adjacent(self, other: Self) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }

    /// Returns the direction leading from this cell to an adjacent one.
    ///
    /// Returns [`None`] when the cells are not adjacent.
    #[must_use]
    pub fn direction_to(self, other: Self) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| self.offset(*direction) == Some(other))
    }

    /// Returns the cell one step away in the given direction, ignoring grid bounds.
    ///
    /// Only underflow below the zero row or column yields [`None`].
    #[must_use]
    pub fn offset(self, direction: Direction) -> Option<Self> {
        let (d_row, d_col) = direction.delta();
        Some(Self {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "({}, {})", self.row, self.col)
    }
}

/// The four orthogonal movement directions.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Direction {
    /// Towards row zero.
    Up,
    /// Towards the last row.
    Down,
    /// Towards column zero.
    Left,
    /// Towards the last column.
    Right,
}

impl Direction {
    /// Every direction, in the fixed order used for neighbour expansion and tie-breaking.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Returns the `(row, column)` delta of one step in this direction.
    #[must_use]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    /// Returns the direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns the direction after a quarter turn counter-clockwise.
    #[must_use]
    pub const fn turn_left(self) -> Self {
        match self {
            Self::Up => Self::Left,
            Self::Left => Self::Down,
            Self::Down => Self::Right,
            Self::Right => Self::Up,
        }
    }

    /// Returns the direction after a quarter turn clockwise.
    #[must_use]
    pub const fn turn_right(self) -> Self {
        self.turn_left().opposite()
    }

    /// Returns the lowercase name of the direction.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Error returned when a string does not name a direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownDirection(pub String);

impl fmt::Display for UnknownDirection {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "unknown direction {:?}", self.0)
    }
}

impl std::error::Error for UnknownDirection {}

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.name().eq_ignore_ascii_case(input.trim()))
            .ok_or_else(|| UnknownDirection(input.to_owned()))
    }
}

/// Bounded rectangular cell space.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Grid {
    /// Number of rows, at least one.
    rows: usize,
    /// Number of columns, at least one.
    cols: usize,
}

impl Grid {
    /// Creates a grid of `rows * cols` cells.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDimension`] if either dimension is zero or if the cell count
    /// does not fit in a `usize`.
    pub const fn new(rows: usize, cols: usize) -> Result<Self, EngineError> {
        if rows == 0 || cols == 0 || rows.checked_mul(cols).is_none() {
            return Err(EngineError::InvalidDimension { rows, cols });
        }

        Ok(Self { rows, cols })
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn rows(self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub const fn cols(self) -> usize {
        self.cols
    }

    /// Returns the total number of cells.
    #[must_use]
    pub const fn cell_count(self) -> usize {
        self.rows * self.cols
    }

    /// Returns `true` if the cell lies within bounds.
    #[must_use]
    pub const fn contains(self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Validates that the cell lies within bounds.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidCell`] for out-of-bounds cells.
    pub const fn check(self, cell: Cell) -> Result<Cell, EngineError> {
        if self.contains(cell) {
            Ok(cell)
        } else {
            Err(EngineError::InvalidCell {
                cell,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Returns `true` if both cells are in bounds and orthogonally adjacent.
    #[must_use]
    pub const fn is_adjacent(self, first: Cell, second: Cell) -> bool {
        self.contains(first) && self.contains(second) && first.is_adjacent(second)
    }

    /// Returns the in-bounds cell one step away from `cell` in `direction`.
    #[must_use]
    pub fn step(self, cell: Cell, direction: Direction) -> Option<Cell> {
        cell.offset(direction).filter(|next| self.contains(*next))
    }

    /// Returns the row-major index of an in-bounds cell.
    #[must_use]
    pub const fn index_of(self, cell: Cell) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.row * self.cols + cell.col)
        } else {
            None
        }
    }

    /// Returns the cell stored at a row-major index.
    #[must_use]
    pub const fn cell_at(self, index: usize) -> Option<Cell> {
        if index < self.cell_count() {
            Some(Cell::new(index / self.cols, index % self.cols))
        } else {
            None
        }
    }

    /// Returns the in-bounds orthogonal neighbours of a cell.
    ///
    /// The returned iterator is lazy and can be cloned to restart it. Out-of-bounds cells have no
    /// neighbours.
    #[must_use]
    pub const fn neighbors(self, cell: Cell) -> Neighbors {
        Neighbors {
            grid: self,
            origin: cell,
            next: 0,
        }
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Cell> + Clone {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Cell::new(row, col)))
    }

    /// Iterates over every pair of adjacent cells exactly once.
    ///
    /// Pairs come in row-major order of their first cell, the right neighbour before the one below.
    pub fn adjacent_pairs(self) -> impl Iterator<Item = (Cell, Cell)> + Clone {
        self.cells().flat_map(move |cell| {
            [Direction::Right, Direction::Down]
                .into_iter()
                .filter_map(move |direction| self.step(cell, direction).map(|next| (cell, next)))
        })
    }

    /// Returns the number of adjacent pairs, i.e. the number of walls inside the grid.
    #[must_use]
    pub const fn adjacent_pair_count(self) -> usize {
        self.rows * (self.cols - 1) + self.cols * (self.rows - 1)
    }
}

/// Lazy iterator over the neighbours of a cell, in [`Direction::ALL`] order.
#[derive(Clone, Debug)]
pub struct Neighbors {
    /// Grid the neighbours must lie in.
    grid: Grid,
    /// Cell whose neighbours are listed.
    origin: Cell,
    /// Index into [`Direction::ALL`] of the next direction to try.
    next: usize,
}

impl Iterator for Neighbors {
    type Item = Cell;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.grid.contains(self.origin) {
            self.next = Direction::ALL.len();
            return None;
        }

        while let Some(direction) = Direction::ALL.get(self.next).copied() {
            self.next += 1;
            if let Some(cell) = self.grid.step(self.origin, direction) {
                return Some(cell);
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(Direction::ALL.len().saturating_sub(self.next)))
    }
}

impl FusedIterator for Neighbors {}
