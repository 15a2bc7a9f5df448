//! Command-line configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::{
    engine::{Settings, DEFAULT_COLS, DEFAULT_ROWS},
    generator::Algorithm,
    input::KeyLayout,
};

/// Generate mazes and find your way out of them.
#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Number of maze rows.
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    pub rows: usize,

    /// Number of maze columns.
    #[arg(long, default_value_t = DEFAULT_COLS)]
    pub cols: usize,

    /// Seed of the first maze; a random seed is drawn for every maze when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maze generation algorithm.
    #[arg(long, value_enum, default_value_t = Algorithm::Kruskal)]
    pub algorithm: Algorithm,

    /// Probability of knocking down each remaining wall, adding loops to the maze.
    #[arg(long, value_name = "PROBABILITY")]
    pub braid: Option<f32>,

    /// Letter keys used to move.
    #[arg(long, value_enum, default_value_t = KeyLayout::Vim)]
    pub layout: KeyLayout,

    /// Play in the line-based console client instead of the terminal interface.
    #[arg(long)]
    pub console: bool,

    /// Write logs to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Returns the engine settings described by the arguments.
    #[must_use]
    pub const fn settings(&self) -> Settings {
        Settings {
            rows: self.rows,
            cols: self.cols,
            seed: self.seed,
            algorithm: self.algorithm,
            braid: self.braid,
            layout: self.layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["connexe"]).expect("no arguments are required");

        assert!(!args.console);
        assert!(args.log_file.is_none());
        assert_eq!(args.settings(), Settings::default());
    }

    #[test]
    fn test_every_option() {
        let args = Args::try_parse_from([
            "connexe",
            "--rows",
            "3",
            "--cols",
            "4",
            "--seed",
            "42",
            "--algorithm",
            "depth-first",
            "--braid",
            "0.25",
            "--layout",
            "zqsd",
            "--console",
            "--log-file",
            "connexe.log",
        ])
        .expect("all options are valid");

        assert!(args.console);
        assert_eq!(args.log_file, Some(PathBuf::from("connexe.log")));
        assert_eq!(
            args.settings(),
            Settings {
                rows: 3,
                cols: 4,
                seed: Some(42),
                algorithm: Algorithm::DepthFirst,
                braid: Some(0.25),
                layout: KeyLayout::Zqsd,
            }
        );
    }

    #[test]
    fn test_rejects_unknown_algorithm() {
        assert!(Args::try_parse_from(["connexe", "--algorithm", "eller"]).is_err());
    }
}
