//! Maze generation and navigation engine.
//!
//! The engine builds perfect mazes on rectangular grids (randomized Kruskal by default, with
//! depth-first and Prim variants), solves them with a breadth-first search and drives a navigation
//! session where a player walks from the start cell to the goal. Two front-ends sit on top of it: a
//! terminal interface rendered with Ratatui and a line-based console client.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

pub mod cli;
pub mod engine;
pub mod error;
pub mod generator;
pub mod grid;
pub mod input;
pub mod maze;
pub mod session;
pub mod solver;

mod app;
mod console;
mod events;
mod logging;
mod pathfinding;
mod types;
mod ui;
mod union_find;

use std::io;

use color_eyre::eyre::Result;
use tracing::info;

pub use crate::{
    cli::Args,
    engine::{Engine, Settings},
    error::EngineError,
    generator::{Algorithm, GenerationEvent, GenerationLog, Generated},
    grid::{Cell, Direction, Grid},
    input::{Command, ControllerState, KeyLayout, Mapper as InputMapper},
    maze::Maze,
    session::{MoveOutcome, Session, Shared as SharedSession, Snapshot, State},
    solver::{Path, TraceStep},
};
use crate::{app::App, console::Console, logging::Destination};

/// Runs the front-end selected by the command line arguments.
///
/// Logging is set up first, then either the console client plays on the standard streams or the
/// terminal interface takes over the screen until the user quits.
///
/// # Errors
///
/// - [`EngineError`] if a maze cannot be generated with the given settings
/// - [`std::io::Error`] if the terminal or the log file cannot be used
pub fn run(args: &Args) -> Result<()> {
    logging::init(&Destination::select(
        args.log_file.as_deref(),
        args.console,
    ))?;
    let engine = Engine::new(args.settings());
    info!(console = args.console, "starting front-end");

    if args.console {
        return Console::new(engine, io::stdin().lock(), io::stdout().lock()).run();
    }

    let mut terminal = ratatui::init();
    let result = App::new(engine).run(&mut terminal);
    ratatui::restore();

    result
}
