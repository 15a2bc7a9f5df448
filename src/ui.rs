//! User interface rendering functions for all application screens.

use std::rc::Rc;

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    symbols::{Marker, DOT},
    text::Line,
    widgets::{
        canvas::{Canvas, Points},
        Block, BorderType, Borders, Clear,
    },
    Frame,
};

use crate::{
    app::App,
    generator::Algorithm,
    pathfinding,
    session::State,
    types::{MainMenuItem, MenuType, OptionsMenuItem, Screen},
};

/// Updates the application UI based on the persistent state.
///
/// This function renders different screens based on the current state stored in the [`App`]
/// structure, dispatching to the appropriate rendering function for each screen type.
///
/// # Errors
///
/// This function may return errors from drawing operations or data conversion failures.
pub(crate) fn draw(app: &App, frame: &mut Frame) -> Result<()> {
    match app.screen {
        Screen::MainMenu(item) => main_menu(frame, item)?,
        Screen::OptionsMenu(item) => options_menu(frame, item)?,
        Screen::AlgorithmMenu(item) => {
            algorithm_menu(frame, item, app.engine.settings().algorithm)?;
        }
        Screen::InGame => in_game(app, frame)?,
    }

    Ok(())
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
///
/// This function renders a clear widget over the entire area of the frame to prepare for
/// rendering new content without artifacts from previous buffers rendered on the same frame.
pub(crate) fn clear(frame: &mut Frame) {
    let clear = Clear;
    frame.render_widget(clear, frame.area());
}

/// Renders the generic layout structure shared by every menu.
///
/// This function creates the common layout and block structure used by all menus. The generic part
/// includes the centered positioning and border styling, while the specific menu content is handled
/// by the caller using the [`MenuType`] parameter. One row is returned per menu item.
///
/// # Errors
///
/// This function returns an error if the menu has more items than a terminal can hold.
#[expect(
    clippy::indexing_slicing,
    reason = "The collection is created in-place with few, known elements; there is no risk of bad indexing."
)]
pub(crate) fn init_menu(frame: &mut Frame, menu: MenuType) -> Result<Rc<[Rect]>> {
    let space = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Percentage(20),
        Constraint::Percentage(40),
    ])
    .split(frame.area())[1];
    let space = Layout::horizontal([
        Constraint::Percentage(40),
        Constraint::Percentage(20),
        Constraint::Percentage(40),
    ])
    .split(space)[1];

    let items = u16::try_from(menu.item_count())?;
    let layout = Layout::vertical([Constraint::Max(items.saturating_add(2))])
        .flex(Flex::Center)
        .split(space)[0];

    let block = Block::bordered()
        .title(menu.title())
        .title_bottom("(j) down / (k) up / (l) select")
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);

    let inner_space = block.inner(layout);

    frame.render_widget(block, layout);

    Ok(Layout::vertical(vec![Constraint::Max(1); menu.item_count()]).split(inner_space))
}

/// Renders a menu's entries, highlighting the one at `active`.
///
/// # Errors
///
/// This function returns an error if the menu layout cannot be built.
fn menu_entries(frame: &mut Frame, menu: MenuType, labels: &[String], active: usize) -> Result<()> {
    clear(frame);

    let inner_layout = init_menu(frame, menu)?;

    let content_style = Style::default().fg(Color::Green);
    let active_content_style = Style::default().fg(Color::White).bg(Color::Green);

    for (index, (label, area)) in labels.iter().zip(inner_layout.iter()).enumerate() {
        let style = if index == active {
            active_content_style
        } else {
            content_style
        };
        frame.render_widget(Line::raw(label.as_str()).centered().style(style), *area);
    }

    Ok(())
}

/// Renders the main menu screen with navigation options.
///
/// This function displays the main menu with options for "Start Game", "Options", and "Quit". It
/// highlights the currently selected option and provides visual feedback for user navigation.
///
/// # Errors
///
/// This function returns an error if the menu layout cannot be built.
pub(crate) fn main_menu(frame: &mut Frame, item: MainMenuItem) -> Result<()> {
    let labels: Vec<String> = MainMenuItem::ALL
        .iter()
        .map(|entry| entry.label().to_owned())
        .collect();
    let active = MainMenuItem::ALL
        .iter()
        .position(|entry| *entry == item)
        .unwrap_or_default();

    menu_entries(frame, MenuType::MainMenu, &labels, active)
}

/// Renders the options menu screen with configuration choices.
///
/// This function displays the options menu with choices for "Algorithm" selection and "Return" to
/// the main menu. It provides the same navigation highlighting as the main menu.
///
/// # Errors
///
/// This function returns an error if the menu layout cannot be built.
pub(crate) fn options_menu(frame: &mut Frame, item: OptionsMenuItem) -> Result<()> {
    let labels: Vec<String> = OptionsMenuItem::ALL
        .iter()
        .map(|entry| entry.label().to_owned())
        .collect();
    let active = OptionsMenuItem::ALL
        .iter()
        .position(|entry| *entry == item)
        .unwrap_or_default();

    menu_entries(frame, MenuType::OptionsMenu, &labels, active)
}

/// Renders the generation algorithm list.
///
/// The highlighted entry follows the cursor while a dot marks the algorithm currently in use.
///
/// # Errors
///
/// This function returns an error if the menu layout cannot be built.
pub(crate) fn algorithm_menu(
    frame: &mut Frame,
    item: Algorithm,
    current: Algorithm,
) -> Result<()> {
    let labels: Vec<String> = Algorithm::ALL
        .iter()
        .map(|algorithm| {
            let marker = if *algorithm == current { DOT } else { " " };
            format!("{marker} {algorithm}")
        })
        .collect();
    let active = Algorithm::ALL
        .iter()
        .position(|algorithm| *algorithm == item)
        .unwrap_or_default();

    menu_entries(frame, MenuType::AlgorithmMenu, &labels, active)
}

/// Renders the in-game screen with the maze and its overlays.
///
/// This function draws the walls of the current maze on a [`Canvas`], then the hint path when it is
/// switched on, the solving animation, the goal and finally the player on top. A tooltip below the
/// maze lists the keys and the move counter.
///
/// # Errors
///
/// This function returns an error if no maze is loaded or if the maze is too large to address on a
/// terminal.
#[expect(
    clippy::too_many_lines,
    reason = "UI rendering function requires many lines for layout and drawing operations."
)]
pub(crate) fn in_game(app: &App, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let maze = app
        .engine
        .maze()
        .ok_or_eyre("no maze has been generated yet")?;
    let snapshot = app.engine.snapshot();
    let raster = pathfinding::raster_size(maze);
    let (maze_rows, maze_columns) = raster;

    // Maze area on top, tooltip at the bottom
    let overall_layout = Layout::vertical([Constraint::Min(1), Constraint::Length(3)])
        .split(frame.area());

    let maze_content_area = *overall_layout
        .first()
        .ok_or_eyre("failed to get maze content area from layout")?;
    let tooltip_area = *overall_layout
        .last()
        .ok_or_eyre("failed to get tooltip area from layout")?;

    let main_layout = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(u16::try_from(maze_rows)?),
        Constraint::Min(1),
    ])
    .split(maze_content_area);

    let maze_area = main_layout
        .get(1)
        .ok_or_eyre("failed to get maze area from layout")?;

    let space = Layout::horizontal([
        Constraint::Min(1),
        Constraint::Length(u16::try_from(maze_columns)?),
        Constraint::Min(1),
    ])
    .split(*maze_area)
    .get(1)
    .copied()
    .ok_or_eyre("failed to get maze space from horizontal layout")?;

    // Pre-compute screen coordinates to handle errors before the paint closure
    let walls =
        pathfinding::transform_maze_to_screen_coords(&pathfinding::wall_pixels(maze), raster)?;
    let hint_path = if app.show_hint {
        app.engine.path_to_goal()?
    } else {
        None
    };
    let hint = match hint_path {
        Some(path) => pathfinding::transform_maze_to_screen_coords(
            &pathfinding::path_pixels(path.cells()),
            raster,
        )?,
        None => Vec::new(),
    };
    let animation = pathfinding::transform_maze_to_screen_coords(
        &pathfinding::path_pixels(&app.animation_manager.current_path),
        raster,
    )?;
    let goal = pathfinding::transform_maze_to_screen_coords(
        &[pathfinding::cell_pixel(maze.goal())],
        raster,
    )?;
    let player_pixels: Vec<pathfinding::Pixel> =
        snapshot.current.map(pathfinding::cell_pixel).into_iter().collect();
    let player = pathfinding::transform_maze_to_screen_coords(&player_pixels, raster)?;

    let canvas = Canvas::default()
        .x_bounds([
            (-rounded_div::i32(space.width.into(), 2)).into(),
            (rounded_div::i32(space.width.into(), 2)).into(),
        ])
        .y_bounds([
            (-rounded_div::i32(space.height.into(), 2)).into(),
            (rounded_div::i32(space.height.into(), 2)).into(),
        ])
        .marker(Marker::Dot)
        .paint(|ctx| {
            ctx.draw(&Points {
                coords: &walls,
                color: Color::Green,
            });
            ctx.draw(&Points {
                coords: &hint,
                color: Color::Yellow,
            });
            ctx.draw(&Points {
                coords: &animation,
                color: Color::Red,
            });
            ctx.draw(&Points {
                coords: &goal,
                color: Color::Magenta,
            });
            ctx.draw(&Points {
                coords: &player,
                color: Color::White,
            });
        });

    frame.render_widget(canvas, space);

    let keys: String = app.engine.mapper().layout().keys().iter().collect();
    let tooltip_block = Block::bordered()
        .title(format!(
            "(arrows/{keys}) move / (n) new maze / (?) hint / (p) solve / (r) restart / (esc) menu"
        ))
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .border_type(BorderType::Plain)
        .borders(Borders::TOP);
    let status_area = tooltip_block.inner(tooltip_area);

    let status = match snapshot.state {
        State::Won => format!(
            "You escaped in {} moves! (n) new maze",
            snapshot.move_count
        ),
        State::Playing | State::Idle => format!(
            "{} maze / Moves: {}",
            app.engine.settings().algorithm,
            snapshot.move_count
        ),
    };

    frame.render_widget(tooltip_block, tooltip_area);
    frame.render_widget(
        Line::styled(status, Style::default().fg(Color::Green)).centered(),
        status_area,
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::{Engine, Settings},
        input::Command,
    };
    use ratatui::{backend::TestBackend, Terminal};

    /// Creates a minimal test app for UI testing.
    fn create_test_app() -> App {
        App::new(Engine::new(Settings {
            rows: 4,
            cols: 6,
            seed: Some(21),
            ..Settings::default()
        }))
    }

    /// Creates a test terminal with known dimensions for UI testing.
    fn create_test_terminal() -> Terminal<TestBackend> {
        let backend = TestBackend::new(100, 24);
        Terminal::new(backend).expect("failed to create test terminal")
    }

    /// Returns everything drawn on the test terminal as one string.
    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_draw_every_menu() {
        let mut app = create_test_app();
        let mut terminal = create_test_terminal();

        for screen in [
            Screen::MainMenu(MainMenuItem::Options),
            Screen::OptionsMenu(OptionsMenuItem::Back),
            Screen::AlgorithmMenu(Algorithm::Prim),
        ] {
            app.screen = screen;
            let result = terminal.draw(|frame| {
                draw(&app, frame).expect("drawing should succeed in test");
            });
            assert!(result.is_ok(), "drawing {screen:?} should succeed");
        }
    }

    #[test]
    fn test_main_menu_lists_items() {
        let mut terminal = create_test_terminal();

        let _ = terminal
            .draw(|frame| {
                main_menu(frame, MainMenuItem::Quit).expect("menu should render");
            })
            .expect("terminal drawing should succeed");

        let text = screen_text(&terminal);
        assert!(text.contains("Main Menu"), "menu title is drawn");
        assert!(text.contains("Start Game"), "first item is drawn");
        assert!(text.contains("Quit"), "last item is drawn");
    }

    #[test]
    fn test_algorithm_menu_lists_algorithms() {
        let mut terminal = create_test_terminal();

        let _ = terminal
            .draw(|frame| {
                algorithm_menu(frame, Algorithm::DepthFirst, Algorithm::Kruskal)
                    .expect("menu should render");
            })
            .expect("terminal drawing should succeed");

        let text = screen_text(&terminal);
        assert!(text.contains("Kruskal"), "default algorithm is listed");
        assert!(text.contains("Depth-first"), "depth-first is listed");
        assert!(text.contains("Prim"), "prim is listed");
    }

    #[test]
    fn test_init_menu_rows() {
        let mut terminal = create_test_terminal();

        let result = terminal.draw(|frame| {
            let layout = init_menu(frame, MenuType::AlgorithmMenu).expect("menu fits");
            assert_eq!(layout.len(), 3, "algorithm menu should have 3 items");
        });

        assert!(result.is_ok(), "initializing algorithm menu should succeed");
    }

    #[test]
    fn test_in_game_without_maze_fails() {
        let app = create_test_app();
        let mut terminal = create_test_terminal();

        let result = terminal.draw(|frame| {
            assert!(
                in_game(&app, frame).is_err(),
                "in-game should fail without a maze"
            );
        });

        assert!(
            result.is_ok(),
            "terminal drawing should succeed even if in_game fails"
        );
    }

    #[test]
    fn test_in_game_with_overlays() {
        let mut app = create_test_app();
        let mut terminal = create_test_terminal();
        app.start_game().expect("valid settings");
        app.show_hint = true;
        app.toggle_animation().expect("maze is connected");

        let _ = terminal
            .draw(|frame| {
                draw(&app, frame).expect("in-game should render successfully");
            })
            .expect("terminal drawing should succeed");

        let text = screen_text(&terminal);
        assert!(text.contains("Kruskal maze / Moves: 0"), "status line is drawn");
        assert!(text.contains("(arrows/kjhl) move"), "tooltip lists the layout keys");
    }

    #[test]
    fn test_in_game_reports_win() {
        let mut app = create_test_app();
        let mut terminal = create_test_terminal();
        app.start_game().expect("valid settings");
        let path = app
            .engine
            .solve()
            .expect("connected")
            .expect("maze is loaded");
        for direction in path.directions() {
            let _ = app.apply(Command::Move(direction));
        }

        let _ = terminal
            .draw(|frame| {
                draw(&app, frame).expect("in-game should render successfully");
            })
            .expect("terminal drawing should succeed");

        let text = screen_text(&terminal);
        assert!(
            text.contains(&format!("You escaped in {} moves!", path.steps())),
            "win message is drawn"
        );
    }
}
