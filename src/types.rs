//! Type definitions and enums for the terminal interface state and navigation.

use crate::generator::Algorithm;

/// Enumeration of available interface screens.
///
/// This enumeration holds information about the current screen of the game. This is used to
/// determine which screen to render and what actions to take based on user input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Screen {
    /// Main menu screen of the game.
    ///
    /// This variant represents the main menu screen, with the highlighted item.
    MainMenu(MainMenuItem),
    /// Options configuration screen.
    ///
    /// This variant represents the options menu screen, with the highlighted item.
    OptionsMenu(OptionsMenuItem),
    /// Generation algorithm selection screen.
    ///
    /// This variant represents the list of maze generation algorithms, with the highlighted one.
    AlgorithmMenu(Algorithm),
    /// In-game maze screen.
    ///
    /// This variant represents the screen where the maze is displayed and navigated.
    InGame,
}

/// Main menu navigation options.
///
/// This enumeration holds the different items in the main menu. It is used to determine which items
/// can the user select in the main menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MainMenuItem {
    /// "Start Game" menu option.
    StartGame,
    /// "Options" menu option.
    Options,
    /// "Quit" menu option.
    Quit,
}

impl MainMenuItem {
    /// Every item, top to bottom.
    pub(crate) const ALL: [Self; 3] = [Self::StartGame, Self::Options, Self::Quit];

    /// Returns the label shown in the menu.
    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::StartGame => "Start Game",
            Self::Options => "Options",
            Self::Quit => "Quit",
        }
    }
}

/// Options menu navigation choices.
///
/// This enumeration holds the different items in the options menu. It is used to determine which
/// items can the user select in the options menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OptionsMenuItem {
    /// "Algorithm" selection option.
    Algorithm,
    /// "Return" navigation option.
    Back,
}

impl OptionsMenuItem {
    /// Every item, top to bottom.
    pub(crate) const ALL: [Self; 2] = [Self::Algorithm, Self::Back];

    /// Returns the label shown in the menu.
    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::Algorithm => "Algorithm",
            Self::Back => "Return",
        }
    }
}

/// Returns the item after `current` in `items`, staying on the last one.
pub(crate) fn next_item<T: Copy + PartialEq>(items: &[T], current: T) -> T {
    items
        .iter()
        .position(|item| *item == current)
        .and_then(|index| items.get(index + 1))
        .copied()
        .unwrap_or(current)
}

/// Returns the item before `current` in `items`, staying on the first one.
pub(crate) fn previous_item<T: Copy + PartialEq>(items: &[T], current: T) -> T {
    items
        .iter()
        .position(|item| *item == current)
        .and_then(|index| index.checked_sub(1))
        .and_then(|index| items.get(index))
        .copied()
        .unwrap_or(current)
}

/// Generic menu type configuration.
///
/// This enumeration holds the specifics of each menu sharing the generic bordered list layout: its
/// title and how many rows it needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MenuType {
    /// Main menu configuration.
    MainMenu,
    /// Options menu configuration.
    OptionsMenu,
    /// Algorithm list configuration.
    AlgorithmMenu,
}

impl MenuType {
    /// Returns the title drawn in the menu's border.
    pub(crate) const fn title(self) -> &'static str {
        match self {
            Self::MainMenu => "Main Menu",
            Self::OptionsMenu => "Options Menu",
            Self::AlgorithmMenu => "Algorithm",
        }
    }

    /// Returns the number of items listed by the menu.
    pub(crate) const fn item_count(self) -> usize {
        match self {
            Self::MainMenu => MainMenuItem::ALL.len(),
            Self::OptionsMenu => OptionsMenuItem::ALL.len(),
            Self::AlgorithmMenu => Algorithm::ALL.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_variants() {
        let main_menu = Screen::MainMenu(MainMenuItem::StartGame);
        let algorithm_menu = Screen::AlgorithmMenu(Algorithm::Prim);

        assert_ne!(main_menu, Screen::InGame);
        assert_ne!(algorithm_menu, Screen::AlgorithmMenu(Algorithm::Kruskal));
        assert_eq!(format!("{:?}", Screen::InGame), "InGame");
    }

    #[test]
    fn test_next_item_stops_at_the_end() {
        assert_eq!(
            next_item(&MainMenuItem::ALL, MainMenuItem::StartGame),
            MainMenuItem::Options
        );
        assert_eq!(
            next_item(&MainMenuItem::ALL, MainMenuItem::Quit),
            MainMenuItem::Quit
        );
        assert_eq!(
            next_item(&Algorithm::ALL, Algorithm::Kruskal),
            Algorithm::DepthFirst
        );
    }

    #[test]
    fn test_previous_item_stops_at_the_start() {
        assert_eq!(
            previous_item(&OptionsMenuItem::ALL, OptionsMenuItem::Back),
            OptionsMenuItem::Algorithm
        );
        assert_eq!(
            previous_item(&OptionsMenuItem::ALL, OptionsMenuItem::Algorithm),
            OptionsMenuItem::Algorithm
        );
    }

    #[test]
    fn test_labels() {
        let labels: Vec<&str> = MainMenuItem::ALL.into_iter().map(MainMenuItem::label).collect();

        assert_eq!(labels, vec!["Start Game", "Options", "Quit"]);
        assert_eq!(OptionsMenuItem::Back.label(), "Return");
    }

    #[test]
    fn test_menu_type_sizes() {
        assert_eq!(MenuType::MainMenu.item_count(), 3);
        assert_eq!(MenuType::OptionsMenu.item_count(), 2);
        assert_eq!(MenuType::AlgorithmMenu.item_count(), 3);
        assert_eq!(MenuType::OptionsMenu.title(), "Options Menu");
    }
}
