//! Core terminal interface state and logic for the maze game.

use color_eyre::eyre::Result;
use ratatui::DefaultTerminal;
use tracing::debug;

use crate::{
    engine::Engine,
    events,
    input::Command,
    pathfinding::AnimationManager,
    session::{MoveOutcome, State},
    types::{MainMenuItem, Screen},
    ui,
};

/// Terminal interface state container.
///
/// This structure holds the state of the interface, which is to say the structure from which
/// Ratatui will render the game and Crossterm events will help writing to.
pub(crate) struct App {
    /// Application exit flag.
    ///
    /// This field indicates whether the application should exit. It is set to `true` when the user
    /// wants to quit the game but it starts off `false`.
    pub(crate) exit: bool,
    /// Current screen being displayed to the user.
    ///
    /// This field holds the current screen of the game. It is used to determine which screen to
    /// render and what actions to take based on user input.
    pub(crate) screen: Screen,
    /// Maze engine being played.
    ///
    /// This field owns the current maze and navigation session. Menus only change its settings; the
    /// in-game screen draws and drives it.
    pub(crate) engine: Engine,
    /// Whether the shortest path to the goal is drawn.
    ///
    /// This field is toggled by the hint key and switched off again as soon as the player moves.
    pub(crate) show_hint: bool,
    /// Animation manager for the solving visualization.
    ///
    /// This field manages the animation state including timing, current step tracking, and the
    /// cells being displayed while the exploration is replayed.
    pub(crate) animation_manager: AnimationManager,
}

impl App {
    /// Creates the interface state around an engine, showing the main menu.
    pub(crate) fn new(engine: Engine) -> Self {
        Self {
            exit: false,
            screen: Screen::MainMenu(MainMenuItem::StartGame),
            engine,
            show_hint: false,
            animation_manager: AnimationManager::new(),
        }
    }

    /// Runs the main loop of the interface.
    ///
    /// This function handles user input and updates the interface state. The loop continues until
    /// the exit condition is `true`, after which the function returns to the call site.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    /// - [`crate::EngineError`] if a maze cannot be generated
    pub(crate) fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.exit {
            let _ = terminal.try_draw(|frame| ui::draw(self, frame).map_err(std::io::Error::other))?;
            events::handle_events(self)?;
        }

        Ok(())
    }

    /// Enters the game, generating a maze unless one is still being played.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EngineError`] if the maze cannot be generated.
    pub(crate) fn start_game(&mut self) -> Result<()> {
        if self.engine.maze().is_none() || self.engine.snapshot().state == State::Won {
            self.new_maze()?;
        }
        self.screen = Screen::InGame;

        Ok(())
    }

    /// Replaces the maze and turns every overlay off.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EngineError`] if the maze cannot be generated.
    pub(crate) fn new_maze(&mut self) -> Result<()> {
        let _ = self.engine.new_maze()?;
        self.show_hint = false;
        self.animation_manager.clear();

        Ok(())
    }

    /// Forwards a movement command to the engine.
    pub(crate) fn apply(&mut self, command: Command) -> MoveOutcome {
        let outcome = self.engine.apply(command);
        if outcome.has_moved() {
            self.show_hint = false;
        }
        debug!(?outcome, "key handled");

        outcome
    }

    /// Switches the solving animation on or off.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EngineError`] if the exploration fails.
    pub(crate) fn toggle_animation(&mut self) -> Result<()> {
        if self.animation_manager.is_active() {
            self.animation_manager.clear();
        } else if let Some(trace) = self.engine.explore()? {
            self.animation_manager.load(trace);
        }

        Ok(())
    }

    /// Leaves the game screen, keeping the maze for later.
    pub(crate) fn back_to_menu(&mut self) {
        self.animation_manager.clear();
        self.show_hint = false;
        self.screen = Screen::MainMenu(MainMenuItem::StartGame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Settings;

    /// Creates an app over a small seeded engine.
    fn create_test_app() -> App {
        App::new(Engine::new(Settings {
            rows: 4,
            cols: 5,
            seed: Some(12),
            ..Settings::default()
        }))
    }

    #[test]
    fn test_new_app_shows_main_menu() {
        let app = create_test_app();

        assert!(!app.exit);
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::StartGame));
        assert!(app.engine.maze().is_none());
    }

    #[test]
    fn test_start_game_keeps_unfinished_maze() {
        let mut app = create_test_app();
        app.start_game().expect("valid settings");
        let maze = app.engine.maze().cloned();
        app.back_to_menu();

        app.start_game().expect("valid settings");

        assert_eq!(app.screen, Screen::InGame);
        assert_eq!(app.engine.maze().cloned(), maze);
        assert_eq!(app.engine.seed(), Some(12));
    }

    #[test]
    fn test_start_game_after_win_builds_new_maze() {
        let mut app = create_test_app();
        app.start_game().expect("valid settings");
        let path = app
            .engine
            .solve()
            .expect("connected")
            .expect("maze is loaded");
        for direction in path.directions() {
            let _ = app.apply(Command::Move(direction));
        }
        app.back_to_menu();

        app.start_game().expect("valid settings");

        assert_eq!(app.engine.seed(), Some(13));
        assert_eq!(app.engine.snapshot().state, State::Playing);
    }

    #[test]
    fn test_moving_hides_hint() {
        let mut app = create_test_app();
        app.start_game().expect("valid settings");
        app.show_hint = true;
        let hint = app
            .engine
            .hint()
            .expect("connected")
            .expect("not won yet");

        assert_eq!(app.apply(Command::Move(hint)), MoveOutcome::Moved);
        assert!(!app.show_hint);

        app.show_hint = true;
        assert_eq!(app.apply(Command::Unrecognized), MoveOutcome::Ignored);
        assert!(app.show_hint, "ignored keys keep the hint");
    }

    #[test]
    fn test_toggle_animation() {
        let mut app = create_test_app();
        app.start_game().expect("valid settings");

        app.toggle_animation().expect("maze is connected");
        assert!(app.animation_manager.is_active());

        app.toggle_animation().expect("maze is connected");
        assert!(!app.animation_manager.is_active());
    }
}
