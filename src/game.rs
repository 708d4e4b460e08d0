//! Interface to the rules of a game: the search is agnostic to the concrete
//! game and only talks to it through [`Game`].

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Rules of a deterministic, perfect-information, turn-based game.
///
/// The search treats states, actions and players as opaque values and assumes
/// the implementation is correct: `next_state` is deterministic and
/// `legal_actions` is empty if and only if the state is terminal.
pub trait Game {
    /// Position of the game, including whose turn it is.
    type State: Clone;
    /// A move that transforms one state into another.
    type Action: Clone + Eq + Debug;
    /// Identity of a participant.
    type Player: Copy + Eq + Hash + Debug;

    /// Returns the player to move at `state`.
    fn current_player(&self, state: &Self::State) -> Self::Player;

    /// Returns all actions available at `state`.
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Applies `action` to `state` and returns the resulting state.
    fn next_state(&self, state: &Self::State, action: &Self::Action) -> Self::State;

    /// Returns `true` if the game is over at `state`.
    fn is_ended(&self, state: &Self::State) -> bool;

    /// Returns the payoff of each player at a terminal `state`: `0` for a
    /// loss, `1` for a win and any other non-negative value (e.g. `0.5`) for a
    /// draw. Only meaningful once [`Game::is_ended`] holds.
    fn win_values(&self, state: &Self::State) -> HashMap<Self::Player, f64>;
}

/// Result of a finished game from the perspective of a single player.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// Interprets a payoff reported by [`Game::win_values`]. Returns `None`
    /// for values no game can produce (negative, NaN or infinite).
    #[must_use]
    pub fn from_win_value(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        #[allow(clippy::float_cmp)]
        let outcome = if value == 0.0 {
            Self::Loss
        } else if value == 1.0 {
            Self::Win
        } else {
            Self::Draw
        };
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payoffs() {
        assert_eq!(Outcome::from_win_value(0.0), Some(Outcome::Loss));
        assert_eq!(Outcome::from_win_value(1.0), Some(Outcome::Win));
        assert_eq!(Outcome::from_win_value(0.5), Some(Outcome::Draw));
        assert_eq!(Outcome::from_win_value(2.0), Some(Outcome::Draw));
    }

    #[test]
    fn invalid_payoffs() {
        assert_eq!(Outcome::from_win_value(-1.0), None);
        assert_eq!(Outcome::from_win_value(f64::NAN), None);
        assert_eq!(Outcome::from_win_value(f64::INFINITY), None);
    }
}
