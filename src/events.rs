//! Event handling functions for user input and interface state updates.

use std::time::Duration;

use color_eyre::eyre::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};

use crate::{
    app::App,
    generator::Algorithm,
    grid::Direction,
    input::Command,
    types::{self, MainMenuItem, OptionsMenuItem, Screen},
};

/// Handles input events and updates the interface state accordingly.
///
/// This function polls for keyboard events and dispatches them to the appropriate handler
/// functions based on the key pressed. It uses a timeout to avoid blocking the UI.
pub(crate) fn handle_events(app: &mut App) -> Result<()> {
    if event::poll(Duration::from_millis(100))? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key(app, key.code)?;
            }
        }
    }

    if matches!(app.screen, Screen::InGame) {
        app.animation_manager.update();
    }

    Ok(())
}

/// Dispatches a key press to the handler of the current screen.
pub(crate) fn handle_key(app: &mut App, code: KeyCode) -> Result<()> {
    if app.screen == Screen::InGame {
        return handle_in_game_events(app, code);
    }

    match code {
        KeyCode::Char('q') => app.exit = true,
        KeyCode::Char('j') | KeyCode::Down => handle_j_events(app),
        KeyCode::Char('k') | KeyCode::Up => handle_k_events(app),
        KeyCode::Char('l') | KeyCode::Enter => handle_l_events(app)?,
        KeyCode::Char('h') | KeyCode::Esc => handle_h_events(app),
        _ => {}
    }

    Ok(())
}

/// Handles 'j' key press events for downward navigation.
///
/// This function moves the highlight one item down in whichever menu is displayed.
pub(crate) fn handle_j_events(app: &mut App) {
    app.screen = match app.screen {
        Screen::MainMenu(item) => Screen::MainMenu(types::next_item(&MainMenuItem::ALL, item)),
        Screen::OptionsMenu(item) => {
            Screen::OptionsMenu(types::next_item(&OptionsMenuItem::ALL, item))
        }
        Screen::AlgorithmMenu(item) => {
            Screen::AlgorithmMenu(types::next_item(&Algorithm::ALL, item))
        }
        Screen::InGame => Screen::InGame,
    };
}

/// Handles 'k' key press events for upward navigation.
///
/// This function moves the highlight one item up in whichever menu is displayed.
pub(crate) fn handle_k_events(app: &mut App) {
    app.screen = match app.screen {
        Screen::MainMenu(item) => {
            Screen::MainMenu(types::previous_item(&MainMenuItem::ALL, item))
        }
        Screen::OptionsMenu(item) => {
            Screen::OptionsMenu(types::previous_item(&OptionsMenuItem::ALL, item))
        }
        Screen::AlgorithmMenu(item) => {
            Screen::AlgorithmMenu(types::previous_item(&Algorithm::ALL, item))
        }
        Screen::InGame => Screen::InGame,
    };
}

/// Handles 'l' key press events for selection and forward navigation.
///
/// This function processes the 'l' key press which is used for selecting menu items and moving
/// forward in the interface flow. Picking an algorithm drops the current maze so that the next game
/// is generated with it.
pub(crate) fn handle_l_events(app: &mut App) -> Result<()> {
    match app.screen {
        Screen::MainMenu(MainMenuItem::StartGame) => app.start_game()?,
        Screen::MainMenu(MainMenuItem::Options) => {
            app.screen = Screen::OptionsMenu(OptionsMenuItem::Algorithm);
        }
        Screen::MainMenu(MainMenuItem::Quit) => {
            app.exit = true;
        }
        Screen::OptionsMenu(OptionsMenuItem::Algorithm) => {
            app.screen = Screen::AlgorithmMenu(app.engine.settings().algorithm);
        }
        Screen::OptionsMenu(OptionsMenuItem::Back) => {
            app.screen = Screen::MainMenu(MainMenuItem::StartGame);
        }
        Screen::AlgorithmMenu(algorithm) => {
            if algorithm != app.engine.settings().algorithm {
                app.engine.set_algorithm(algorithm);
                app.engine.reset();
            }
            app.screen = Screen::OptionsMenu(OptionsMenuItem::Algorithm);
        }
        Screen::InGame => {}
    }

    Ok(())
}

/// Handles 'h' key press events for backward navigation.
///
/// This function processes the 'h' key press which is used for moving back to the previous
/// screen.
pub(crate) fn handle_h_events(app: &mut App) {
    match app.screen {
        Screen::OptionsMenu(_) => {
            app.screen = Screen::MainMenu(MainMenuItem::Options);
        }
        Screen::AlgorithmMenu(_) => {
            app.screen = Screen::OptionsMenu(OptionsMenuItem::Algorithm);
        }
        Screen::MainMenu(_) | Screen::InGame => {}
    }
}

/// Handles key presses on the in-game screen.
///
/// Arrow keys always move. Letters claimed by the configured layout move as well and take
/// precedence over the action keys: `n` new maze, `?` hint, `p` solving animation, `r` restart and
/// `q` quit. `Esc` returns to the main menu.
pub(crate) fn handle_in_game_events(app: &mut App, code: KeyCode) -> Result<()> {
    let layout = app.engine.mapper().layout();
    match code {
        KeyCode::Up => drop_outcome(app, Command::Move(Direction::Up)),
        KeyCode::Down => drop_outcome(app, Command::Move(Direction::Down)),
        KeyCode::Left => drop_outcome(app, Command::Move(Direction::Left)),
        KeyCode::Right => drop_outcome(app, Command::Move(Direction::Right)),
        KeyCode::Esc => app.back_to_menu(),
        KeyCode::Char(key) if layout.claims(key) => drop_outcome(app, layout.decode_key(key)),
        KeyCode::Char('n') => app.new_maze()?,
        KeyCode::Char('?') => app.show_hint = !app.show_hint,
        KeyCode::Char('p') => app.toggle_animation()?,
        KeyCode::Char('r') => {
            let _ = app.engine.restart();
            app.show_hint = false;
        }
        KeyCode::Char('q') => app.exit = true,
        _ => {}
    }

    Ok(())
}

/// Applies a movement command; the outcome only shows through the redrawn screen.
fn drop_outcome(app: &mut App, command: Command) {
    let _ = app.apply(command);
}
