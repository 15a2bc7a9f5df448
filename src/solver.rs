//! Path solving module.
//!
//! This module contains the pure queries run against an immutable [`Maze`]: breadth-first shortest
//! paths, distances, the depth-first exploration trace replayed by the solving animation, and a
//! left-hand wall follower.

use std::collections::VecDeque;

use tracing::debug;

use crate::{
    error::EngineError,
    grid::{Cell, Direction, Grid},
    maze::Maze,
};

/// Ordered sequence of cells joined by open passages.
///
/// A path is never empty: the first cell is the source of the query and the last one its
/// destination. A path from a cell to itself holds that single cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    /// Visited cells, source first.
    cells: Vec<Cell>,
}

impl Path {
    /// Wraps a non-empty cell sequence.
    const fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Returns the cells of the path, source first.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns the number of moves needed to walk the path.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    /// Returns the first cell of the path.
    #[must_use]
    pub fn source(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    /// Returns the last cell of the path.
    #[must_use]
    pub fn destination(&self) -> Option<Cell> {
        self.cells.last().copied()
    }

    /// Returns the directions that walk the path from its source.
    #[must_use]
    pub fn directions(&self) -> Vec<Direction> {
        self.cells
            .windows(2)
            .filter_map(|pair| match pair {
                [from, to] => from.direction_to(*to),
                _ => None,
            })
            .collect()
    }
}

/// One step of a depth-first exploration, as replayed by the solving animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceStep {
    /// The explorer walked into a cell.
    Enter(Cell),
    /// The explorer backtracked out of a dead end.
    Leave(Cell),
}

impl TraceStep {
    /// Returns the cell the step refers to.
    #[must_use]
    pub const fn cell(self) -> Cell {
        match self {
            Self::Enter(cell) | Self::Leave(cell) => cell,
        }
    }
}

/// Returns the shortest path between two cells.
///
/// Breadth-first search over open passages, expanding neighbours in [`Direction::ALL`] order so
/// that ties are always broken the same way. On a perfect maze the result is the unique simple
/// path; on braided mazes it is one of the shortest ones.
///
/// # Errors
///
/// - [`EngineError::InvalidCell`] if either cell lies outside the maze
/// - [`EngineError::NoPathFound`] if `to` cannot be reached from `from`
pub fn solve(maze: &Maze, from: Cell, to: Cell) -> Result<Path, EngineError> {
    let grid = maze.grid();
    let from = grid.check(from)?;
    let to = grid.check(to)?;

    let mut parents: Vec<Option<Cell>> = vec![None; grid.cell_count()];
    let mut visited = vec![false; grid.cell_count()];
    let _ = mark(grid, &mut visited, from);
    let mut queue = VecDeque::from([from]);

    while let Some(cell) = queue.pop_front() {
        if cell == to {
            let path = rebuild(grid, &parents, to);
            debug!(%from, %to, steps = path.steps(), "solved maze");
            return Ok(path);
        }

        for next in maze.passages(cell) {
            if !mark(grid, &mut visited, next) {
                continue;
            }
            if let Some(parent) = grid.index_of(next).and_then(|index| parents.get_mut(index)) {
                *parent = Some(cell);
            }
            queue.push_back(next);
        }
    }

    Err(EngineError::NoPathFound { from, to })
}

/// Returns the number of moves on the shortest path between two cells.
///
/// # Errors
///
/// Fails exactly like [`solve`].
pub fn distance(maze: &Maze, from: Cell, to: Cell) -> Result<usize, EngineError> {
    solve(maze, from, to).map(|path| path.steps())
}

/// Records a depth-first exploration from `from` until `to` is entered.
///
/// Neighbours are tried in [`Direction::ALL`] order and every cell is entered at most once. Dead
/// ends produce a [`TraceStep::Leave`] when the explorer backtracks out of them, so replaying the
/// trace over an empty set leaves exactly the cells of the found path.
///
/// # Errors
///
/// - [`EngineError::InvalidCell`] if either cell lies outside the maze
/// - [`EngineError::NoPathFound`] if the exploration runs out of cells before reaching `to`
pub fn explore(maze: &Maze, from: Cell, to: Cell) -> Result<Vec<TraceStep>, EngineError> {
    let grid = maze.grid();
    let from = grid.check(from)?;
    let to = grid.check(to)?;

    let mut trace = vec![TraceStep::Enter(from)];
    if from == to {
        return Ok(trace);
    }

    let mut visited = vec![false; grid.cell_count()];
    let _ = mark(grid, &mut visited, from);
    // Each frame holds a cell and the index of the next direction to try from it.
    let mut stack = vec![(from, 0_usize)];

    while let Some((cell, next)) = stack.last_mut() {
        let Some(direction) = Direction::ALL.get(*next).copied() else {
            trace.push(TraceStep::Leave(*cell));
            let _ = stack.pop();
            continue;
        };
        *next += 1;

        let Some(neighbor) = maze.passage(*cell, direction) else {
            continue;
        };
        if !mark(grid, &mut visited, neighbor) {
            continue;
        }

        trace.push(TraceStep::Enter(neighbor));
        if neighbor == to {
            debug!(%from, %to, steps = trace.len(), "recorded exploration trace");
            return Ok(trace);
        }
        stack.push((neighbor, 0));
    }

    Err(EngineError::NoPathFound { from, to })
}

/// Walks from `from` to `to` keeping the left hand on the wall.
///
/// At every cell the walker tries to turn left, then to go straight, then right, and finally turns
/// back. Revisiting a cell cuts the loop out of the trail, so the returned path is simple. On mazes
/// with loops the walker can circle forever around a free-standing wall; it gives up after
/// `4 * cells` moves.
///
/// # Errors
///
/// - [`EngineError::InvalidCell`] if either cell lies outside the maze
/// - [`EngineError::NoPathFound`] if the walk does not reach `to` within the move budget
pub fn wall_follower(maze: &Maze, from: Cell, to: Cell) -> Result<Path, EngineError> {
    let grid = maze.grid();
    let from = grid.check(from)?;
    let to = grid.check(to)?;

    let budget = grid.cell_count().saturating_mul(4);
    let mut trail = vec![from];
    let mut current = from;
    let mut heading = Direction::Down;

    for _ in 0..budget {
        if current == to {
            break;
        }

        let turns = [
            heading.turn_left(),
            heading,
            heading.turn_right(),
            heading.opposite(),
        ];
        let Some((direction, next)) = turns
            .into_iter()
            .find_map(|direction| maze.passage(current, direction).map(|next| (direction, next)))
        else {
            break;
        };

        if let Some(position) = trail.iter().position(|cell| *cell == next) {
            trail.truncate(position + 1);
        } else {
            trail.push(next);
        }
        heading = direction;
        current = next;
    }

    if current == to {
        debug!(%from, %to, steps = trail.len() - 1, "followed wall to goal");
        Ok(Path::new(trail))
    } else {
        Err(EngineError::NoPathFound { from, to })
    }
}

/// Marks a cell as visited.
///
/// Returns `true` if the cell was not visited before.
fn mark(grid: Grid, visited: &mut [bool], cell: Cell) -> bool {
    let Some(flag) = grid.index_of(cell).and_then(|index| visited.get_mut(index)) else {
        return false;
    };
    let fresh = !*flag;
    *flag = true;

    fresh
}

/// Follows parent pointers back from `to` and returns the path in walking order.
fn rebuild(grid: Grid, parents: &[Option<Cell>], to: Cell) -> Path {
    let mut cells = vec![to];
    let mut current = to;
    while let Some(parent) = grid
        .index_of(current)
        .and_then(|index| parents.get(index).copied().flatten())
    {
        cells.push(parent);
        current = parent;
    }
    cells.reverse();

    Path::new(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{self, Algorithm};

    /// Builds the 3x3 serpentine maze: a single corridor from (0, 0) to (2, 2).
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

    /// Returns `true` if consecutive cells are joined by open passages and none repeats.
    fn is_simple_walk(maze: &Maze, path: &Path) -> bool {
        let cells = path.cells();
        let mut sorted = cells.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        sorted.len() == cells.len()
            && cells
                .windows(2)
                .all(|pair| matches!(pair, [first, second] if maze.is_open(*first, *second)))
    }

    #[test]
    fn test_solve_serpentine() {
        let maze = serpentine();
        let path = solve(&maze, Cell::new(0, 0), Cell::new(2, 2)).expect("maze is connected");

        assert_eq!(path.steps(), 8);
        assert_eq!(path.source(), Some(Cell::new(0, 0)));
        assert_eq!(path.destination(), Some(Cell::new(2, 2)));
        assert_eq!(
            path.directions(),
            vec![
                Direction::Right,
                Direction::Right,
                Direction::Down,
                Direction::Left,
                Direction::Left,
                Direction::Down,
                Direction::Right,
                Direction::Right,
            ]
        );
        assert!(is_simple_walk(&maze, &path));
    }

    #[test]
    fn test_solve_same_cell() {
        let maze = serpentine();
        let path = solve(&maze, Cell::new(1, 1), Cell::new(1, 1)).expect("trivial path");

        assert_eq!(path.cells(), &[Cell::new(1, 1)]);
        assert_eq!(path.steps(), 0);
        assert!(path.directions().is_empty());
    }

    #[test]
    fn test_solve_rejects_out_of_bounds() {
        let maze = serpentine();

        assert_eq!(
            solve(&maze, Cell::new(0, 0), Cell::new(3, 0)),
            Err(EngineError::InvalidCell {
                cell: Cell::new(3, 0),
                rows: 3,
                cols: 3
            })
        );
        assert!(matches!(
            distance(&maze, Cell::new(9, 9), Cell::new(0, 0)),
            Err(EngineError::InvalidCell { .. })
        ));
    }

    #[test]
    fn test_solve_reports_unreachable_goal() {
        let maze = Maze::closed(Grid::new(2, 2).expect("valid grid"));

        assert_eq!(
            solve(&maze, Cell::new(0, 0), Cell::new(1, 1)),
            Err(EngineError::NoPathFound {
                from: Cell::new(0, 0),
                to: Cell::new(1, 1)
            })
        );
        assert!(explore(&maze, Cell::new(0, 0), Cell::new(1, 1)).is_err());
        assert!(wall_follower(&maze, Cell::new(0, 0), Cell::new(1, 1)).is_err());
    }

    #[test]
    fn test_perfect_maze_paths_are_unique() {
        for algorithm in Algorithm::ALL {
            let maze = generator::generate_with(algorithm, 4, 5, 11)
                .expect("valid dimensions")
                .into_parts()
                .0;

            for from in maze.grid().cells() {
                for to in maze.grid().cells() {
                    let shortest = solve(&maze, from, to).expect("perfect maze is connected");
                    let walked = wall_follower(&maze, from, to).expect("tree walk terminates");

                    assert!(is_simple_walk(&maze, &shortest), "{algorithm}: {from} -> {to}");
                    assert_eq!(
                        shortest, walked,
                        "{algorithm}: only one simple path from {from} to {to}"
                    );
                    assert_eq!(
                        distance(&maze, to, from),
                        Ok(shortest.steps()),
                        "tree distance is symmetric"
                    );
                }
            }
        }
    }

    #[test]
    fn test_solve_is_shortest_on_braided_maze() {
        let generated = generator::generate_with(Algorithm::Kruskal, 6, 6, 3).expect("valid");
        let braided = generator::braid(&generated, 0.5, 3).expect("valid probability");
        let tree = generated.maze();
        let maze = braided.maze();
        let origin = Cell::new(0, 0);

        assert!(maze.open_edge_count() > tree.open_edge_count());
        for cell in maze.grid().cells() {
            let through_loops = distance(maze, origin, cell).expect("braided maze is connected");
            let through_tree = distance(tree, origin, cell).expect("tree is connected");
            assert!(through_loops <= through_tree, "loops never lengthen paths");
        }
        for (first, second) in maze.open_edges() {
            let near = distance(maze, origin, first).expect("connected");
            let far = distance(maze, origin, second).expect("connected");
            assert!(near.abs_diff(far) <= 1, "BFS layers differ by one across an edge");
        }
    }

    #[test]
    fn test_explore_records_backtracking() {
        // (0, 0) opens down to a dead end and right to the corridor reaching (1, 1).
        let maze = Maze::from_open_edges(
            2,
            2,
            [
                (Cell::new(0, 0), Cell::new(1, 0)),
                (Cell::new(0, 0), Cell::new(0, 1)),
                (Cell::new(0, 1), Cell::new(1, 1)),
            ],
        )
        .expect("valid maze");

        let trace = explore(&maze, Cell::new(0, 0), Cell::new(1, 1)).expect("reachable");

        assert_eq!(
            trace,
            vec![
                TraceStep::Enter(Cell::new(0, 0)),
                TraceStep::Enter(Cell::new(1, 0)),
                TraceStep::Leave(Cell::new(1, 0)),
                TraceStep::Enter(Cell::new(0, 1)),
                TraceStep::Enter(Cell::new(1, 1)),
            ]
        );
    }

    #[test]
    fn test_explore_trace_leaves_the_path() {
        let maze = generator::generate(5, 5, 8).expect("valid dimensions");
        let from = Cell::new(0, 0);
        let to = Cell::new(4, 4);
        let trace = explore(&maze, from, to).expect("perfect maze is connected");

        let mut shown = Vec::new();
        for step in &trace {
            match step {
                TraceStep::Enter(cell) => shown.push(*cell),
                TraceStep::Leave(cell) => shown.retain(|kept| kept != cell),
            }
        }

        let path = solve(&maze, from, to).expect("perfect maze is connected");
        assert_eq!(shown, path.cells());
        assert_eq!(trace.last().map(|step| step.cell()), Some(to));
    }

    #[test]
    fn test_explore_same_cell() {
        let maze = serpentine();

        assert_eq!(
            explore(&maze, Cell::new(2, 2), Cell::new(2, 2)),
            Ok(vec![TraceStep::Enter(Cell::new(2, 2))])
        );
    }

    #[test]
    fn test_wall_follower_serpentine() {
        let maze = serpentine();
        let path = wall_follower(&maze, Cell::new(0, 0), Cell::new(2, 2)).expect("reachable");

        assert_eq!(path.steps(), 8);
        assert!(is_simple_walk(&maze, &path));
    }
}
