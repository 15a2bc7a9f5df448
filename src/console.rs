//! Line-based console client.
//!
//! Reads one command per line and prints the maze after each accepted command, with `@` marking the
//! player and `G` the goal. Works over any reader and writer so it can run on stdio or in memory.

use std::io::{BufRead, Write};

use color_eyre::eyre::Result;
use tracing::debug;

use crate::{
    engine::Engine,
    input::{Command, KeyLayout},
    session::{MoveOutcome, State},
};

/// Action requested by one input line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    /// Move the player.
    Play(Command),
    /// Generate a new maze.
    NewMaze,
    /// Show the first move towards the goal.
    Hint,
    /// Put the player back on the start cell.
    Restart,
    /// Leave the client.
    Quit,
    /// Anything else.
    Ignore,
}

impl Action {
    /// Interprets a line of input.
    ///
    /// Single letters bound by the layout always move, so `q` is a move for [`KeyLayout::Zqsd`]
    /// players, who quit with `quit` instead.
    pub(crate) fn parse(line: &str, layout: KeyLayout) -> Self {
        let word = line.trim();
        let mut chars = word.chars();
        if let (Some(key), None) = (chars.next(), chars.next()) {
            if layout.claims(key) {
                return Self::Play(layout.decode_key(key));
            }
        }

        if let Ok(command @ Command::Move(_)) = word.parse::<Command>() {
            return Self::Play(command);
        }

        match word.to_ascii_lowercase().as_str() {
            "n" | "new" => Self::NewMaze,
            "?" | "hint" => Self::Hint,
            "r" | "restart" => Self::Restart,
            "q" | "quit" | "exit" => Self::Quit,
            _ => Self::Ignore,
        }
    }
}

/// Console front-end state.
pub(crate) struct Console<R, W> {
    /// Engine being played.
    engine: Engine,
    /// Source of command lines.
    input: R,
    /// Destination of the rendered maze.
    output: W,
    /// Distance to the goal before the last move, for warmer/colder feedback.
    last_distance: Option<usize>,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Creates a console client over the given streams.
    pub(crate) const fn new(engine: Engine, input: R, output: W) -> Self {
        Self {
            engine,
            input,
            output,
            last_distance: None,
        }
    }

    /// Plays until the input ends or the player quits.
    ///
    /// # Errors
    ///
    /// - [`crate::EngineError`] if a maze cannot be generated
    /// - [`std::io::Error`] if reading or writing fails
    pub(crate) fn run(&mut self) -> Result<()> {
        self.new_maze()?;
        writeln!(
            self.output,
            "Move with up/down/left/right or {}. (n) new maze / (?) hint / (r) restart / (q) quit",
            self.layout_keys()
        )?;

        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }

            let action = Action::parse(&line, self.engine.mapper().layout());
            debug!(?action, "console input");
            match action {
                Action::Play(command) => self.play(command)?,
                Action::NewMaze => self.new_maze()?,
                Action::Hint => self.hint()?,
                Action::Restart => {
                    let _ = self.engine.restart();
                    self.last_distance = None;
                    self.render()?;
                }
                Action::Quit => break,
                Action::Ignore => {}
            }
        }

        writeln!(self.output, "Bye!")?;
        Ok(())
    }

    /// Returns the layout keys as one string, in up, down, left, right order.
    fn layout_keys(&self) -> String {
        self.engine.mapper().layout().keys().iter().collect()
    }

    /// Generates a maze and draws it.
    fn new_maze(&mut self) -> Result<()> {
        let _ = self.engine.new_maze()?;
        self.last_distance = self.engine.distance_to_goal()?;
        if let Some(seed) = self.engine.seed() {
            writeln!(self.output, "New maze (seed {seed})")?;
        }
        self.render()
    }

    /// Applies a move and reports the outcome.
    fn play(&mut self, command: Command) -> Result<()> {
        let outcome = self.engine.apply(command);
        let distance = self.engine.distance_to_goal()?;

        self.render()?;
        match outcome {
            MoveOutcome::Reached => writeln!(
                self.output,
                "You escaped in {} moves! (n) new maze / (q) quit",
                self.engine.snapshot().move_count
            )?,
            MoveOutcome::Moved => {
                let feeling = match (self.last_distance, distance) {
                    (Some(before), Some(after)) if after < before => "warmer",
                    _ => "colder",
                };
                writeln!(self.output, "{feeling}")?;
            }
            MoveOutcome::Blocked => writeln!(self.output, "A wall blocks the way.")?,
            MoveOutcome::Inactive => writeln!(self.output, "The game is over. (n) new maze")?,
            MoveOutcome::Ignored => {}
        }
        self.last_distance = distance;

        Ok(())
    }

    /// Prints the first move towards the goal.
    fn hint(&mut self) -> Result<()> {
        match self.engine.hint()? {
            Some(direction) => writeln!(self.output, "Hint: go {direction}")?,
            None => writeln!(self.output, "No hint available.")?,
        }
        Ok(())
    }

    /// Draws the maze with the player and the goal.
    fn render(&mut self) -> Result<()> {
        let snapshot = self.engine.snapshot();
        let Some(maze) = self.engine.maze() else {
            writeln!(self.output, "No maze loaded.")?;
            return Ok(());
        };

        let goal = maze.goal();
        write!(
            self.output,
            "{}",
            maze.render(|cell| {
                if snapshot.current == Some(cell) {
                    Some('@')
                } else if cell == goal {
                    Some('G')
                } else {
                    None
                }
            })
        )?;
        let status = if snapshot.state == State::Won {
            "won"
        } else {
            "playing"
        };
        writeln!(self.output, "Moves: {} ({status})", snapshot.move_count)?;

        Ok(())
    }
}
