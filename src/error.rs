//! Error taxonomy shared by every engine operation.

#![expect(
    clippy::module_name_repetitions,
    reason = "The error type is re-exported at the crate root where the prefix is meaningful."
)]

use thiserror::Error;

use crate::grid::Cell;

/// Recoverable failures reported by the maze engine.
///
/// Every variant is returned synchronously to the caller of the failing operation; the engine stays
/// usable afterwards. Bumping into a wall is not represented here, see
/// [`MoveOutcome::Blocked`](crate::MoveOutcome::Blocked).
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EngineError {
    /// A grid was requested with a zero (or overflowing) dimension.
    #[error("invalid maze dimensions {rows}x{cols}: both must be positive")]
    InvalidDimension {
        /// Requested number of rows.
        rows: usize,
        /// Requested number of columns.
        cols: usize,
    },
    /// A coordinate lies outside the grid bounds.
    #[error("cell {cell} is outside of the {rows}x{cols} grid")]
    InvalidCell {
        /// Offending cell.
        cell: Cell,
        /// Number of rows of the grid it was checked against.
        rows: usize,
        /// Number of columns of the grid it was checked against.
        cols: usize,
    },
    /// No sequence of open edges joins the two cells.
    #[error("no path from {from} to {to}")]
    NoPathFound {
        /// Source cell of the query.
        from: Cell,
        /// Destination cell of the query.
        to: Cell,
    },
    /// An edge was given between two cells that are not orthogonal neighbours.
    #[error("cells {first} and {second} are not adjacent")]
    NotAdjacent {
        /// First cell of the edge.
        first: Cell,
        /// Second cell of the edge.
        second: Cell,
    },
    /// An edge list does not connect every cell of the grid.
    #[error("open edges only reach {reachable} of {total} cells")]
    Disconnected {
        /// Cells reachable from the top-left corner.
        reachable: usize,
        /// Total number of cells in the grid.
        total: usize,
    },
    /// A braiding probability that cannot be clamped into `[0, 1]`.
    #[error("braiding probability {0} is not a number")]
    InvalidProbability(f32),
}
