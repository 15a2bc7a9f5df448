//! Input command mapping module.
//!
//! This module contains the thin adapter between decoded input and the navigation session. Device
//! handling stays outside: keyboards are seen as characters through a [`KeyLayout`] and controllers
//! as a polled [`ControllerState`], and both end up as the same abstract [`Command`].

use std::{convert::Infallible, fmt, str::FromStr};

use tracing::trace;

use crate::{
    grid::Direction,
    session::{MoveOutcome, Session, Shared},
};

/// Axis deflection a controller stick must exceed to count as a press.
pub const STICK_THRESHOLD: f32 = 0.75;

/// Abstract command fed to the session.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Command {
    /// Move the player one cell.
    Move(Direction),
    /// Anything else; applying it is a no-op.
    Unrecognized,
}

impl From<Direction> for Command {
    fn from(direction: Direction) -> Self {
        Self::Move(direction)
    }
}

impl FromStr for Command {
    type Err = Infallible;

    /// Parses a direction name, case-insensitively.
    ///
    /// Never fails: unknown words become [`Command::Unrecognized`].
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Ok(input
            .parse::<Direction>()
            .map_or(Self::Unrecognized, Self::Move))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move(direction) => write!(formatter, "move {direction}"),
            Self::Unrecognized => formatter.write_str("unrecognized"),
        }
    }
}

/// Keyboard layouts mapping letter keys to directions.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, clap::ValueEnum)]
pub enum KeyLayout {
    /// `h`, `j`, `k` and `l`, as in vi.
    #[default]
    Vim,
    /// `w`, `a`, `s` and `d`, for QWERTY keyboards.
    Wasd,
    /// `z`, `q`, `s` and `d`, for AZERTY keyboards.
    Zqsd,
}

impl KeyLayout {
    /// Every layout, in declaration order.
    pub const ALL: [Self; 3] = [Self::Vim, Self::Wasd, Self::Zqsd];

    /// Returns the keys for up, down, left and right, in [`Direction::ALL`] order.
    #[must_use]
    pub const fn keys(self) -> [char; 4] {
        match self {
            Self::Vim => ['k', 'j', 'h', 'l'],
            Self::Wasd => ['w', 's', 'a', 'd'],
            Self::Zqsd => ['z', 's', 'q', 'd'],
        }
    }

    /// Translates a key press, ignoring case.
    #[must_use]
    pub fn decode_key(self, key: char) -> Command {
        let key = key.to_ascii_lowercase();
        self.keys()
            .into_iter()
            .zip(Direction::ALL)
            .find_map(|(bound, direction)| (bound == key).then_some(Command::Move(direction)))
            .unwrap_or(Command::Unrecognized)
    }

    /// Returns `true` if the key moves the player in this layout.
    #[must_use]
    pub fn claims(self, key: char) -> bool {
        self.decode_key(key) != Command::Unrecognized
    }

    /// Returns the name of the layout.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vim => "vim",
            Self::Wasd => "wasd",
            Self::Zqsd => "zqsd",
        }
    }
}

impl fmt::Display for KeyLayout {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Polled state of a game controller.
///
/// Stick axes range over `[-1, 1]`; a negative `left_y` points up.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "Each boolean mirrors one physical d-pad button."
)]
pub struct ControllerState {
    /// D-pad up button.
    pub dpad_up: bool,
    /// D-pad down button.
    pub dpad_down: bool,
    /// D-pad left button.
    pub dpad_left: bool,
    /// D-pad right button.
    pub dpad_right: bool,
    /// Horizontal deflection of the left stick.
    pub left_x: f32,
    /// Vertical deflection of the left stick.
    pub left_y: f32,
}

impl ControllerState {
    /// Translates the controller state into at most one move.
    ///
    /// A direction counts as pressed when its d-pad button is down or the left stick is pushed
    /// past [`STICK_THRESHOLD`]. When several are pressed, right wins over left, left over up and
    /// up over down.
    #[must_use]
    pub const fn decode(&self) -> Command {
        if self.dpad_right || self.left_x > STICK_THRESHOLD {
            Command::Move(Direction::Right)
        } else if self.dpad_left || self.left_x < -STICK_THRESHOLD {
            Command::Move(Direction::Left)
        } else if self.dpad_up || self.left_y < -STICK_THRESHOLD {
            Command::Move(Direction::Up)
        } else if self.dpad_down || self.left_y > STICK_THRESHOLD {
            Command::Move(Direction::Down)
        } else {
            Command::Unrecognized
        }
    }
}

/// Feeds decoded commands into a navigation session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mapper {
    /// Layout used to decode letter keys.
    layout: KeyLayout,
}

impl Mapper {
    /// Creates a mapper decoding letters with the given layout.
    #[must_use]
    pub const fn new(layout: KeyLayout) -> Self {
        Self { layout }
    }

    /// Returns the layout in use.
    #[must_use]
    pub const fn layout(self) -> KeyLayout {
        self.layout
    }

    /// Applies a command to the session.
    ///
    /// [`Command::Unrecognized`] is absorbed as [`MoveOutcome::Ignored`] and never reaches the
    /// session.
    pub fn apply(session: &mut Session, command: Command) -> MoveOutcome {
        let outcome = match command {
            Command::Move(direction) => session.move_player(direction),
            Command::Unrecognized => MoveOutcome::Ignored,
        };
        trace!(%command, ?outcome, "applied command");

        outcome
    }

    /// Applies a command through the single-writer lock of a shared session.
    pub fn apply_shared(shared: &Shared, command: Command) -> MoveOutcome {
        shared.update(|session| Self::apply(session, command))
    }

    /// Decodes a key press with the configured layout.
    #[must_use]
    pub fn decode_key(self, key: char) -> Command {
        self.layout.decode_key(key)
    }

    /// Decodes a key press and applies the resulting command.
    pub fn press(self, session: &mut Session, key: char) -> MoveOutcome {
        Self::apply(session, self.decode_key(key))
    }
}
