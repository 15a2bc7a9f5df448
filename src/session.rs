//! Navigation session module.
//!
//! This module contains the interactive play-through of a single maze: where the player stands, how
//! many moves were made, and whether the goal was reached. It also holds the shared wrapper that
//! serializes writers while letting renderers read a published snapshot.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{info, trace};

use crate::{
    error::EngineError,
    grid::{Cell, Direction},
    maze::Maze,
    solver::{self, Path},
};

/// Lifecycle of a navigation session.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum State {
    /// No maze is loaded.
    #[default]
    Idle,
    /// A maze is loaded and the player is navigating it.
    Playing,
    /// The player stands on the goal cell; moves are refused until a restart or reset.
    Won,
}

/// Result of asking the session to move the player.
///
/// Bumping into a wall is a normal outcome, not an error.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The player moved to the neighbouring cell.
    Moved,
    /// The player moved onto the goal and the session is now won.
    Reached,
    /// A wall or the grid border is in the way; nothing changed.
    Blocked,
    /// The session is not playing; nothing changed.
    Inactive,
    /// The command did not name a move; nothing changed.
    Ignored,
}

impl MoveOutcome {
    /// Returns `true` if the player changed cells.
    #[must_use]
    pub const fn has_moved(self) -> bool {
        matches!(self, Self::Moved | Self::Reached)
    }
}

/// Copyable view of the observable session state, published for renderers.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct Snapshot {
    /// Cell the player stands on, [`None`] while idle.
    pub current: Option<Cell>,
    /// Number of successful moves since the session started.
    pub move_count: usize,
    /// Lifecycle state.
    pub state: State,
}

/// Player state tied to one loaded maze.
#[derive(Clone, Debug)]
struct Attempt {
    /// Maze being navigated, shared with the solver and renderers.
    maze: Arc<Maze>,
    /// Cell the player started from.
    origin: Cell,
    /// Cell the player must reach.
    goal: Cell,
    /// Cell the player stands on.
    current: Cell,
    /// Every successful move, in order.
    history: Vec<Direction>,
}

/// One interactive play-through of a maze.
///
/// The session is won exactly when a maze is loaded and the player stands on the goal cell, so the
/// state can never disagree with the player position.
#[derive(Clone, Debug, Default)]
pub struct Session {
    /// Loaded maze and player state, [`None`] while idle.
    attempt: Option<Attempt>,
}

impl Session {
    /// Creates an idle session.
    #[must_use]
    pub const fn new() -> Self {
        Self { attempt: None }
    }

    /// Loads a maze and places the player on `start`.
    ///
    /// Accepted from any state; a previously loaded maze is dropped. If `start` equals `goal` the
    /// session is won right away.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidCell`] if either cell lies outside the maze, leaving the
    /// session untouched.
    pub fn start(
        &mut self,
        maze: Arc<Maze>,
        start: Cell,
        goal: Cell,
    ) -> Result<State, EngineError> {
        let grid = maze.grid();
        let origin = grid.check(start)?;
        let goal = grid.check(goal)?;

        info!(
            rows = maze.rows(),
            cols = maze.cols(),
            %origin,
            %goal,
            "session started"
        );
        self.attempt = Some(Attempt {
            maze,
            origin,
            goal,
            current: origin,
            history: Vec::new(),
        });

        let state = self.state();
        if state == State::Won {
            info!(moves = 0, "goal reached");
        }

        Ok(state)
    }

    /// Loads a maze using its own start and goal cells.
    ///
    /// # Errors
    ///
    /// Fails like [`Session::start`].
    pub fn start_at_endpoints(&mut self, maze: Arc<Maze>) -> Result<State, EngineError> {
        let start = maze.start();
        let goal = maze.goal();
        self.start(maze, start, goal)
    }

    /// Tries to move the player one cell in `direction`.
    ///
    /// Only a playing session accepts moves. A move through an open wall updates the current cell,
    /// bumps the move counter and records the direction; anything else leaves the session as it
    /// was.
    pub fn move_player(&mut self, direction: Direction) -> MoveOutcome {
        let Some(attempt) = self.attempt.as_mut() else {
            return MoveOutcome::Inactive;
        };
        if attempt.current == attempt.goal {
            return MoveOutcome::Inactive;
        }

        let Some(next) = attempt.maze.passage(attempt.current, direction) else {
            trace!(from = %attempt.current, %direction, "move blocked");
            return MoveOutcome::Blocked;
        };

        trace!(from = %attempt.current, to = %next, %direction, "player moved");
        attempt.current = next;
        attempt.history.push(direction);

        if next == attempt.goal {
            info!(moves = attempt.history.len(), "goal reached");
            MoveOutcome::Reached
        } else {
            MoveOutcome::Moved
        }
    }

    /// Drops the maze and every piece of player state.
    pub fn reset(&mut self) {
        if self.attempt.take().is_some() {
            info!("session reset");
        }
    }

    /// Puts the player back on the start cell of the same maze, clearing the move history.
    ///
    /// Does nothing while idle.
    pub fn restart(&mut self) -> State {
        if let Some(attempt) = self.attempt.as_mut() {
            attempt.current = attempt.origin;
            attempt.history.clear();
            info!(origin = %attempt.origin, "session restarted");
        }

        self.state()
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> State {
        match &self.attempt {
            None => State::Idle,
            Some(attempt) if attempt.current == attempt.goal => State::Won,
            Some(_) => State::Playing,
        }
    }

    /// Returns the cell the player stands on.
    #[must_use]
    pub fn current(&self) -> Option<Cell> {
        self.attempt.as_ref().map(|attempt| attempt.current)
    }

    /// Returns the cell the player started from.
    #[must_use]
    pub fn origin(&self) -> Option<Cell> {
        self.attempt.as_ref().map(|attempt| attempt.origin)
    }

    /// Returns the goal cell.
    #[must_use]
    pub fn goal(&self) -> Option<Cell> {
        self.attempt.as_ref().map(|attempt| attempt.goal)
    }

    /// Returns the loaded maze.
    #[must_use]
    pub fn maze(&self) -> Option<&Arc<Maze>> {
        self.attempt.as_ref().map(|attempt| &attempt.maze)
    }

    /// Returns the number of successful moves.
    #[must_use]
    pub fn move_count(&self) -> usize {
        self.history().len()
    }

    /// Returns the successful moves in order.
    #[must_use]
    pub fn history(&self) -> &[Direction] {
        self.attempt
            .as_ref()
            .map(|attempt| attempt.history.as_slice())
            .unwrap_or_default()
    }

    /// Returns the cells visited so far, replaying the history from the start cell.
    ///
    /// The list starts with the start cell and ends with the current one; it is empty while idle.
    #[must_use]
    pub fn trail(&self) -> Vec<Cell> {
        let Some(attempt) = &self.attempt else {
            return Vec::new();
        };

        let mut cells = vec![attempt.origin];
        let mut current = attempt.origin;
        for direction in &attempt.history {
            let Some(next) = attempt.maze.passage(current, *direction) else {
                break;
            };
            cells.push(next);
            current = next;
        }

        cells
    }

    /// Returns the shortest path from the current cell to the goal.
    ///
    /// Returns [`None`] while idle.
    ///
    /// # Errors
    ///
    /// Propagates [`solver::solve`] failures.
    pub fn path_to_goal(&self) -> Result<Option<Path>, EngineError> {
        self.attempt
            .as_ref()
            .map(|attempt| solver::solve(&attempt.maze, attempt.current, attempt.goal))
            .transpose()
    }

    /// Returns the first direction of the shortest path to the goal.
    ///
    /// Returns [`None`] while idle or once the goal is reached.
    ///
    /// # Errors
    ///
    /// Propagates [`solver::solve`] failures.
    pub fn hint(&self) -> Result<Option<Direction>, EngineError> {
        Ok(self
            .path_to_goal()?
            .and_then(|path| path.directions().first().copied()))
    }

    /// Returns how many moves separate the player from the goal.
    ///
    /// # Errors
    ///
    /// Propagates [`solver::solve`] failures.
    pub fn distance_to_goal(&self) -> Result<Option<usize>, EngineError> {
        Ok(self.path_to_goal()?.map(|path| path.steps()))
    }

    /// Returns a copy of the observable state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current: self.current(),
            move_count: self.move_count(),
            state: self.state(),
        }
    }
}

/// Session shared between input sources and renderers.
///
/// Writers are serialized by a mutex around the session. After every mutation the new [`Snapshot`]
/// is published behind a read-write lock, so renderers never wait for the writer lock. Poisoned
/// locks are recovered, as every mutation leaves the session consistent.
#[derive(Clone, Debug, Default)]
pub struct Shared {
    /// Single-writer session.
    session: Arc<Mutex<Session>>,
    /// Snapshot published after the last mutation.
    published: Arc<RwLock<Snapshot>>,
}

impl Shared {
    /// Wraps a session and publishes its current snapshot.
    #[must_use]
    pub fn new(session: Session) -> Self {
        let snapshot = session.snapshot();
        Self {
            session: Arc::new(Mutex::new(session)),
            published: Arc::new(RwLock::new(snapshot)),
        }
    }

    /// Runs a mutation with exclusive access to the session, then republishes the snapshot.
    pub fn update<T, F>(&self, mutation: F) -> T
    where
        F: FnOnce(&mut Session) -> T,
    {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        let result = mutation(&mut session);
        *self
            .published
            .write()
            .unwrap_or_else(PoisonError::into_inner) = session.snapshot();

        result
    }

    /// Runs a query against the session while holding the writer lock.
    pub fn inspect<T, F>(&self, query: F) -> T
    where
        F: FnOnce(&Session) -> T,
    {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        query(&session)
    }

    /// Returns the last published snapshot without touching the writer lock.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        *self.published.read().unwrap_or_else(PoisonError::into_inner)
    }
}
