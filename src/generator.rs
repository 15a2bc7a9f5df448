//! Maze generation module.
//!
//! Every algorithm here carves a spanning tree out of a fully walled grid, so the result is
//! connected and loop-free by construction. Randomness comes from a [`StdRng`] seeded by the caller,
//! which makes every maze reproducible from `(algorithm, rows, cols, seed)`.
//!
//! Alongside the maze, each algorithm records a [`GenerationLog`]: the ordered list of walls it
//! opened, which can be replayed to rebuild the maze or to visualize its construction.

use std::{
    cmp::Reverse,
    collections::{BTreeSet, BinaryHeap},
    fmt,
};

use rand::{rngs::StdRng, seq::SliceRandom as _, Rng as _, SeedableRng as _};
use tracing::debug;

use crate::{
    error::EngineError,
    grid::{Cell, Grid},
    maze::Maze,
    union_find::DisjointSets,
};

/// Spanning-tree algorithms available to carve a maze.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, clap::ValueEnum)]
pub enum Algorithm {
    /// Randomized Kruskal: shuffled walls joined through a disjoint-set forest.
    #[default]
    Kruskal,
    /// Randomized depth-first backtracker, producing long winding corridors.
    DepthFirst,
    /// Randomized Prim: a minimum spanning tree over random wall weights.
    Prim,
}

impl Algorithm {
    /// Every algorithm, in menu order.
    pub const ALL: [Self; 3] = [Self::Kruskal, Self::DepthFirst, Self::Prim];

    /// Returns the display name of the algorithm.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Kruskal => "Kruskal",
            Self::DepthFirst => "Depth-first",
            Self::Prim => "Prim",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// A single step taken while building a maze.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum GenerationEvent {
    /// The wall between two adjacent cells was opened.
    Connect(Cell, Cell),
    /// The start and goal cells were placed.
    SetEndpoints {
        /// Cell the player starts from.
        start: Cell,
        /// Cell the player must reach.
        goal: Cell,
    },
}

impl fmt::Display for GenerationEvent {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect(first, second) => write!(formatter, "Connect {first} - {second}"),
            Self::SetEndpoints { start, goal } => {
                write!(formatter, "SetEndpoints start={start} goal={goal}")
            }
        }
    }
}

/// Ordered record of every step taken by a generation algorithm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationLog {
    /// Cell space the events apply to.
    grid: Grid,
    /// Events in the order they happened.
    events: Vec<GenerationEvent>,
}

impl GenerationLog {
    /// Creates an empty log for the given grid.
    const fn new(grid: Grid) -> Self {
        Self {
            grid,
            events: Vec::new(),
        }
    }

    /// Returns the grid the log applies to.
    #[must_use]
    pub const fn grid(&self) -> Grid {
        self.grid
    }

    /// Returns the recorded events.
    #[must_use]
    pub fn events(&self) -> &[GenerationEvent] {
        &self.events
    }

    /// Returns the number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Opens a wall in `maze` and records it.
    fn connect(&mut self, maze: &mut Maze, first: Cell, second: Cell) -> Result<(), EngineError> {
        maze.open_wall(first, second)?;
        self.events.push(GenerationEvent::Connect(first, second));
        Ok(())
    }

    /// Moves the endpoints of `maze` and records it.
    fn set_endpoints(
        &mut self,
        maze: &mut Maze,
        start: Cell,
        goal: Cell,
    ) -> Result<(), EngineError> {
        maze.set_endpoints(start, goal)?;
        self.events.push(GenerationEvent::SetEndpoints { start, goal });
        Ok(())
    }

    /// Rebuilds the maze by applying every event to a fully walled grid.
    ///
    /// # Errors
    ///
    /// Propagates [`EngineError`] from invalid events; logs produced by this module never contain
    /// any.
    pub fn replay(&self) -> Result<Maze, EngineError> {
        let mut maze = Maze::closed(self.grid);
        for event in &self.events {
            match *event {
                GenerationEvent::Connect(first, second) => {
                    maze.open_wall(first, second)?;
                }
                GenerationEvent::SetEndpoints { start, goal } => maze.set_endpoints(start, goal)?,
            }
        }

        Ok(maze)
    }

    /// Lists the edges open after applying the first `steps` events.
    ///
    /// Edges are returned with their smaller cell first, sorted. This lets a front-end animate the
    /// construction without ever building a partial [`Maze`].
    #[must_use]
    pub fn open_edges_until(&self, steps: usize) -> Vec<(Cell, Cell)> {
        let mut open = BTreeSet::new();
        for event in self.events.iter().take(steps) {
            match *event {
                GenerationEvent::Connect(first, second) => {
                    let _ = open.insert((first.min(second), first.max(second)));
                }
                GenerationEvent::SetEndpoints { .. } => {}
            }
        }

        open.into_iter().collect()
    }
}

impl fmt::Display for GenerationLog {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            formatter,
            "GenerationLog [{}x{}] {} events:",
            self.grid.rows(),
            self.grid.cols(),
            self.events.len()
        )?;
        for (index, event) in self.events.iter().enumerate() {
            writeln!(formatter, "  {index:<4}: {event}")?;
        }

        Ok(())
    }
}

/// A generated maze together with the log of its construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Generated {
    /// The finished maze.
    maze: Maze,
    /// Every step taken to build it.
    log: GenerationLog,
}

impl Generated {
    /// Returns the finished maze.
    #[must_use]
    pub const fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Returns the construction log.
    #[must_use]
    pub const fn log(&self) -> &GenerationLog {
        &self.log
    }

    /// Splits the result into the maze and its log.
    #[must_use]
    pub fn into_parts(self) -> (Maze, GenerationLog) {
        (self.maze, self.log)
    }
}

/// Generates a perfect maze with the canonical randomized Kruskal algorithm.
///
/// Identical arguments always produce identical mazes. The start is the top-left cell and the goal
/// the bottom-right one.
///
/// # Errors
///
/// Returns [`EngineError::InvalidDimension`] if either dimension is zero.
pub fn generate(rows: usize, cols: usize, seed: u64) -> Result<Maze, EngineError> {
    generate_with(Algorithm::Kruskal, rows, cols, seed).map(|generated| generated.maze)
}

/// Generates a perfect maze with the chosen algorithm and returns it with its construction log.
///
/// # Errors
///
/// Returns [`EngineError::InvalidDimension`] if either dimension is zero.
pub fn generate_with(
    algorithm: Algorithm,
    rows: usize,
    cols: usize,
    seed: u64,
) -> Result<Generated, EngineError> {
    let grid = Grid::new(rows, cols)?;
    debug!(%algorithm, rows, cols, seed, "generating maze");

    let mut rng = StdRng::seed_from_u64(seed);
    let mut maze = Maze::closed(grid);
    let mut log = GenerationLog::new(grid);

    match algorithm {
        Algorithm::Kruskal => kruskal(&mut maze, &mut log, &mut rng)?,
        Algorithm::DepthFirst => depth_first(&mut maze, &mut log, &mut rng)?,
        Algorithm::Prim => prim(&mut maze, &mut log, &mut rng)?,
    }

    let goal = Cell::new(rows - 1, cols - 1);
    log.set_endpoints(&mut maze, Cell::new(0, 0), goal)?;

    Ok(Generated { maze, log })
}

/// Opens random closed walls of a maze, adding loops.
///
/// Every closed wall is considered once per pass, in row-major order, and opened with the given
/// probability; passes repeat until at least one wall was opened. The probability is clamped to
/// `[1 / (4 * cells), 1]`. Walls are never closed, so the maze stays connected, and endpoints are
/// kept. A maze with no closed wall left is returned unchanged.
///
/// # Errors
///
/// Returns [`EngineError::InvalidProbability`] if `probability` is NaN.
pub fn braid(generated: &Generated, probability: f32, seed: u64) -> Result<Generated, EngineError> {
    if probability.is_nan() {
        return Err(EngineError::InvalidProbability(probability));
    }

    let mut maze = generated.maze.clone();
    let mut log = generated.log.clone();
    let grid = maze.grid();
    let closed: Vec<(Cell, Cell)> = grid
        .adjacent_pairs()
        .filter(|(first, second)| !maze.is_open(*first, *second))
        .collect();
    if closed.is_empty() {
        return Ok(generated.clone());
    }

    let floor = (1.0 / (4.0 * grid.cell_count() as f32)).min(1.0);
    let probability = probability.clamp(floor, 1.0);
    debug!(probability, seed, closed = closed.len(), "braiding maze");

    let mut rng = StdRng::seed_from_u64(seed);
    let mut opened = 0_usize;
    while opened == 0 {
        for &(first, second) in &closed {
            if !maze.is_open(first, second) && rng.random::<f32>() < probability {
                log.connect(&mut maze, first, second)?;
                opened += 1;
            }
        }
    }

    Ok(Generated { maze, log })
}

/// Carves a spanning tree by opening shuffled walls between distinct components.
fn kruskal(maze: &mut Maze, log: &mut GenerationLog, rng: &mut StdRng) -> Result<(), EngineError> {
    let grid = maze.grid();
    let mut pairs: Vec<(Cell, Cell)> = grid.adjacent_pairs().collect();
    pairs.shuffle(rng);

    let mut sets = DisjointSets::new(grid.cell_count());
    for (first, second) in pairs {
        if sets.components() == 1 {
            break;
        }
        let (Some(first_index), Some(second_index)) = (grid.index_of(first), grid.index_of(second))
        else {
            continue;
        };
        if sets.union(first_index, second_index) {
            log.connect(maze, first, second)?;
        }
    }

    Ok(())
}

/// Carves a spanning tree with an iterative randomized depth-first search from the top-left cell.
fn depth_first(
    maze: &mut Maze,
    log: &mut GenerationLog,
    rng: &mut StdRng,
) -> Result<(), EngineError> {
    let grid = maze.grid();
    let origin = Cell::new(0, 0);
    let mut visited = vec![false; grid.cell_count()];
    let _ = mark_visited(&mut visited, grid, origin);

    let mut stack = vec![(origin, shuffled_neighbors(grid, origin, rng))];
    while let Some((cell, pending)) = stack.last_mut() {
        let cell = *cell;
        match pending.pop() {
            Some(next) => {
                if mark_visited(&mut visited, grid, next) {
                    log.connect(maze, cell, next)?;
                    stack.push((next, shuffled_neighbors(grid, next, rng)));
                }
            }
            None => {
                let _ = stack.pop();
            }
        }
    }

    Ok(())
}

/// Carves a minimum spanning tree over random wall weights, growing from the top-left cell.
///
/// Each wall is pushed at most once (when its first cell joins the tree), so drawing its weight at
/// push time is equivalent to weighting every wall up front.
fn prim(maze: &mut Maze, log: &mut GenerationLog, rng: &mut StdRng) -> Result<(), EngineError> {
    let grid = maze.grid();
    let origin = Cell::new(0, 0);
    let mut visited = vec![false; grid.cell_count()];
    let mut frontier = BinaryHeap::new();

    let _ = mark_visited(&mut visited, grid, origin);
    for next in grid.neighbors(origin) {
        frontier.push(Reverse((rng.random::<u32>(), origin, next)));
    }

    while let Some(Reverse((_, from, to))) = frontier.pop() {
        if !mark_visited(&mut visited, grid, to) {
            continue;
        }
        log.connect(maze, from, to)?;
        for next in grid.neighbors(to) {
            if !is_visited(&visited, grid, next) {
                frontier.push(Reverse((rng.random::<u32>(), to, next)));
            }
        }
    }

    Ok(())
}

/// Returns the neighbours of a cell in random order.
fn shuffled_neighbors(grid: Grid, cell: Cell, rng: &mut StdRng) -> Vec<Cell> {
    let mut neighbors: Vec<Cell> = grid.neighbors(cell).collect();
    neighbors.shuffle(rng);
    neighbors
}

/// Marks a cell as visited, returning `true` if it was not visited before.
fn mark_visited(visited: &mut [bool], grid: Grid, cell: Cell) -> bool {
    match grid.index_of(cell).and_then(|index| visited.get_mut(index)) {
        Some(flag) if !*flag => {
            *flag = true;
            true
        }
        _ => false,
    }
}

/// Returns `true` if a cell was already visited.
fn is_visited(visited: &[bool], grid: Grid, cell: Cell) -> bool {
    grid.index_of(cell)
        .and_then(|index| visited.get(index))
        .copied()
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sizes exercised by the structural property tests.
    const SIZES: [(usize, usize); 7] = [(1, 1), (1, 7), (6, 1), (2, 2), (3, 3), (5, 8), (13, 9)];

    #[test]
    fn test_generate_rejects_invalid_dimensions() {
        assert_eq!(
            generate(0, 5, 1),
            Err(EngineError::InvalidDimension { rows: 0, cols: 5 })
        );
        assert!(generate_with(Algorithm::Prim, 4, 0, 1).is_err());
    }

    #[test]
    fn test_every_algorithm_produces_spanning_trees() {
        for algorithm in Algorithm::ALL {
            for (rows, cols) in SIZES {
                for seed in 0..5 {
                    let generated =
                        generate_with(algorithm, rows, cols, seed).expect("valid dimensions");
                    let maze = generated.maze();

                    assert_eq!(
                        maze.open_edge_count(),
                        rows * cols - 1,
                        "{algorithm} {rows}x{cols} seed {seed} edge count"
                    );
                    assert!(
                        maze.is_connected(),
                        "{algorithm} {rows}x{cols} seed {seed} connectivity"
                    );
                }
            }
        }
    }

    #[test]
    fn test_generate_is_deterministic() {
        for algorithm in Algorithm::ALL {
            let first = generate_with(algorithm, 9, 11, 42).expect("valid dimensions");
            let second = generate_with(algorithm, 9, 11, 42).expect("valid dimensions");

            assert_eq!(first, second, "{algorithm} should be reproducible");
        }
        assert_eq!(
            generate(7, 7, 3).expect("valid dimensions"),
            generate(7, 7, 3).expect("valid dimensions")
        );
    }

    #[test]
    fn test_different_seeds_differ() {
        let first = generate(10, 10, 1).expect("valid dimensions");
        let second = generate(10, 10, 2).expect("valid dimensions");

        assert_ne!(
            first.open_edges().collect::<Vec<_>>(),
            second.open_edges().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_generate_places_endpoints_in_corners() {
        let maze = generate(4, 6, 9).expect("valid dimensions");

        assert_eq!(maze.start(), Cell::new(0, 0));
        assert_eq!(maze.goal(), Cell::new(3, 5));
    }

    #[test]
    fn test_log_replay_rebuilds_maze() {
        for algorithm in Algorithm::ALL {
            let generated = generate_with(algorithm, 6, 5, 77).expect("valid dimensions");
            let replayed = generated.log().replay().expect("log should replay");

            assert_eq!(&replayed, generated.maze());
            assert_eq!(generated.log().len(), 6 * 5);
            assert!(matches!(
                generated.log().events().last(),
                Some(GenerationEvent::SetEndpoints { .. })
            ));
        }
    }

    #[test]
    fn test_open_edges_until_tracks_progress() {
        let generated = generate_with(Algorithm::DepthFirst, 4, 4, 5).expect("valid dimensions");
        let log = generated.log();

        assert!(log.open_edges_until(0).is_empty());
        assert_eq!(log.open_edges_until(3).len(), 3);
        assert_eq!(
            log.open_edges_until(log.len()),
            generated.maze().open_edges().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_log_display_lists_events() {
        let generated = generate_with(Algorithm::Kruskal, 2, 2, 0).expect("valid dimensions");
        let text = generated.log().to_string();

        assert!(text.starts_with("GenerationLog [2x2] 4 events:"));
        assert_eq!(text.matches("Connect").count(), 3);
        assert!(text.contains("SetEndpoints start=(0, 0) goal=(1, 1)"));
    }

    #[test]
    fn test_braid_adds_loops_and_keeps_connectivity() {
        let generated = generate_with(Algorithm::Kruskal, 8, 8, 11).expect("valid dimensions");
        let braided = braid(&generated, 0.3, 12).expect("valid probability");

        assert!(braided.maze().open_edge_count() > generated.maze().open_edge_count());
        assert!(braided.maze().is_connected());
        assert!(!braided.maze().is_perfect());
        assert_eq!(braided.maze().goal(), generated.maze().goal());
        assert_eq!(&braided.log().replay().expect("log replays"), braided.maze());
    }

    #[test]
    fn test_braid_tiny_probability_still_opens_a_wall() {
        let generated = generate(5, 5, 4).expect("valid dimensions");
        let generated = Generated {
            log: GenerationLog::new(generated.grid()),
            maze: generated,
        };
        let braided = braid(&generated, 0.0, 1).expect("valid probability");

        assert!(braided.maze().open_edge_count() > 24);
    }

    #[test]
    fn test_braid_full_probability_opens_every_wall() {
        let generated = generate_with(Algorithm::Prim, 3, 4, 8).expect("valid dimensions");
        let braided = braid(&generated, 5.0, 8).expect("valid probability");

        assert_eq!(
            braided.maze().open_edge_count(),
            braided.maze().grid().adjacent_pair_count()
        );
    }

    #[test]
    fn test_braid_rejects_nan_and_skips_full_mazes() {
        let generated = generate_with(Algorithm::Kruskal, 1, 1, 0).expect("valid dimensions");

        assert!(matches!(
            braid(&generated, f32::NAN, 0),
            Err(EngineError::InvalidProbability(_))
        ));
        assert_eq!(
            braid(&generated, 0.5, 0).expect("nothing to braid"),
            generated
        );
    }
}
