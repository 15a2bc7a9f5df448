//! Engine facade module.
//!
//! This module contains the capability surface shared by the terminal and console front-ends:
//! building mazes from [`Settings`], running the session, and answering solver queries against the
//! maze being played. Nothing here knows how input is read or how output is drawn.

use std::sync::Arc;

use rand::Rng as _;
use tracing::{debug, info};

use crate::{
    error::EngineError,
    generator::{self, Algorithm, GenerationLog},
    grid::Direction,
    input::{Command, ControllerState, KeyLayout, Mapper},
    maze::Maze,
    session::{MoveOutcome, Session, Shared, Snapshot, State},
    solver::{self, Path, TraceStep},
};

/// Default number of maze rows.
pub const DEFAULT_ROWS: usize = 10;

/// Default number of maze columns.
pub const DEFAULT_COLS: usize = 20;

/// Parameters used to build every maze of a game.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    /// Number of rows of generated mazes.
    pub rows: usize,
    /// Number of columns of generated mazes.
    pub cols: usize,
    /// Seed of the first maze; following mazes use the next integers. [`None`] draws a random seed
    /// for every maze.
    pub seed: Option<u64>,
    /// Generation algorithm.
    pub algorithm: Algorithm,
    /// Probability of opening each remaining wall after generation; [`None`] keeps perfect mazes.
    pub braid: Option<f32>,
    /// Letter keys used for movement.
    pub layout: KeyLayout,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            seed: None,
            algorithm: Algorithm::default(),
            braid: None,
            layout: KeyLayout::default(),
        }
    }
}

/// Maze currently loaded in the engine, with what produced it.
#[derive(Clone, Debug)]
struct Loaded {
    /// Maze being played.
    maze: Arc<Maze>,
    /// Events that built the maze.
    log: GenerationLog,
    /// Seed the maze was generated from.
    seed: u64,
}

/// Maze engine driving one navigation session at a time.
#[derive(Debug)]
pub struct Engine {
    /// Generation parameters.
    settings: Settings,
    /// Number of mazes generated so far, used to derive seeds.
    generated: u64,
    /// Maze being played, if any.
    loaded: Option<Loaded>,
    /// Session shared with renderers.
    session: Shared,
    /// Key decoder for the configured layout.
    mapper: Mapper,
}

impl Engine {
    /// Creates an idle engine.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            generated: 0,
            loaded: None,
            session: Shared::default(),
            mapper: Mapper::new(settings.layout),
        }
    }

    /// Returns the generation parameters.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Changes the algorithm used for the next mazes.
    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        debug!(%algorithm, "algorithm changed");
        self.settings.algorithm = algorithm;
    }

    /// Generates a new maze and starts a session on its endpoints.
    ///
    /// The previous maze, if any, is replaced as a whole. On failure the engine keeps playing the
    /// previous maze.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidDimension`] if the configured dimensions are zero
    /// - [`EngineError::InvalidProbability`] if the configured braiding probability is NaN
    pub fn new_maze(&mut self) -> Result<Arc<Maze>, EngineError> {
        let seed = self.next_seed();
        let Settings {
            rows,
            cols,
            algorithm,
            braid,
            ..
        } = self.settings;

        let mut generated = generator::generate_with(algorithm, rows, cols, seed)?;
        if let Some(probability) = braid {
            generated = generator::braid(&generated, probability, seed)?;
        }
        let (maze, log) = generated.into_parts();
        let maze = Arc::new(maze);

        let _ = self
            .session
            .update(|session| session.start_at_endpoints(Arc::clone(&maze)))?;
        self.generated = self.generated.wrapping_add(1);
        self.loaded = Some(Loaded {
            maze: Arc::clone(&maze),
            log,
            seed,
        });
        info!(seed, rows, cols, %algorithm, "new maze ready");

        Ok(maze)
    }

    /// Returns the seed of the next maze.
    fn next_seed(&self) -> u64 {
        self.settings.seed.map_or_else(
            || rand::rng().random(),
            |base| base.wrapping_add(self.generated),
        )
    }

    /// Returns the shortest path from the start of the maze to its goal.
    ///
    /// Returns [`None`] when no maze is loaded.
    ///
    /// # Errors
    ///
    /// Propagates [`solver::solve`] failures.
    pub fn solve(&self) -> Result<Option<Path>, EngineError> {
        self.loaded
            .as_ref()
            .map(|loaded| solver::solve(&loaded.maze, loaded.maze.start(), loaded.maze.goal()))
            .transpose()
    }

    /// Returns the depth-first exploration trace from the start of the maze to its goal.
    ///
    /// # Errors
    ///
    /// Propagates [`solver::explore`] failures.
    pub fn explore(&self) -> Result<Option<Vec<TraceStep>>, EngineError> {
        self.loaded
            .as_ref()
            .map(|loaded| solver::explore(&loaded.maze, loaded.maze.start(), loaded.maze.goal()))
            .transpose()
    }

    /// Returns the shortest path from the player to the goal.
    ///
    /// # Errors
    ///
    /// Propagates [`solver::solve`] failures.
    pub fn path_to_goal(&self) -> Result<Option<Path>, EngineError> {
        self.session.inspect(Session::path_to_goal)
    }

    /// Returns the first move towards the goal.
    ///
    /// # Errors
    ///
    /// Propagates [`solver::solve`] failures.
    pub fn hint(&self) -> Result<Option<Direction>, EngineError> {
        self.session.inspect(Session::hint)
    }

    /// Returns how many moves separate the player from the goal.
    ///
    /// # Errors
    ///
    /// Propagates [`solver::solve`] failures.
    pub fn distance_to_goal(&self) -> Result<Option<usize>, EngineError> {
        self.session.inspect(Session::distance_to_goal)
    }

    /// Applies an abstract command to the session.
    pub fn apply(&self, command: Command) -> MoveOutcome {
        Mapper::apply_shared(&self.session, command)
    }

    /// Decodes a letter key with the configured layout and applies it.
    pub fn press(&self, key: char) -> MoveOutcome {
        self.apply(self.mapper.decode_key(key))
    }

    /// Decodes a controller state and applies it.
    pub fn steer(&self, controller: &ControllerState) -> MoveOutcome {
        self.apply(controller.decode())
    }

    /// Puts the player back on the start of the current maze.
    pub fn restart(&self) -> State {
        self.session.update(Session::restart)
    }

    /// Drops the current maze and returns the session to idle.
    pub fn reset(&mut self) {
        self.session.update(Session::reset);
        self.loaded = None;
    }

    /// Returns the last published session snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }

    /// Returns the shared session.
    #[must_use]
    pub const fn session(&self) -> &Shared {
        &self.session
    }

    /// Returns the key decoder.
    #[must_use]
    pub const fn mapper(&self) -> Mapper {
        self.mapper
    }

    /// Returns the maze being played.
    #[must_use]
    pub fn maze(&self) -> Option<&Arc<Maze>> {
        self.loaded.as_ref().map(|loaded| &loaded.maze)
    }

    /// Returns the seed of the maze being played.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.loaded.as_ref().map(|loaded| loaded.seed)
    }

    /// Returns the generation log of the maze being played.
    #[must_use]
    pub fn log(&self) -> Option<&GenerationLog> {
        self.loaded.as_ref().map(|loaded| &loaded.log)
    }
}
