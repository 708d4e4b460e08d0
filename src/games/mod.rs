//! Reference [`Game`](crate::game::Game) implementations for two-player
//! games. They are small enough to be searched exhaustively in tests and
//! double as examples of implementing the game interface.

use std::fmt;
use std::ops::Not;

use anyhow::bail;

pub mod nim;
pub mod tictactoe;

/// The two sides of a two-player game. Red moves first.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    Red,
    Blue,
}

impl Not for Player {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(name: &str) -> anyhow::Result<Self> {
        match name {
            "red" => Ok(Self::Red),
            "blue" => Ok(Self::Blue),
            _ => bail!("player should be 'red' or 'blue', got '{name}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match &self {
                Self::Red => "red",
                Self::Blue => "blue",
            }
        )
    }
}
