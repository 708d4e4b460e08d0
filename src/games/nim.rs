//! Single-heap subtraction game: players alternately take one to three
//! objects and whoever takes the last object wins.

use std::collections::HashMap;
use std::fmt;

use super::Player;
use crate::game::Game;

/// Position of a Nim game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NimState {
    /// Objects left on the heap.
    pub heap: u32,
    /// Player who takes next.
    pub to_move: Player,
}

impl NimState {
    /// Position with `heap` objects left and `to_move` taking next.
    #[must_use]
    pub const fn new(heap: u32, to_move: Player) -> Self {
        Self { heap, to_move }
    }
}

impl fmt::Display for NimState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "heap {}, {} to move", self.heap, self.to_move)
    }
}

/// Rules of Nim with a configurable limit on how many objects can be taken in
/// one move.
#[derive(Clone, Copy, Debug)]
pub struct Nim {
    max_take: u32,
}

impl Nim {
    /// # Panics
    ///
    /// Panics if `max_take` is zero: no move would ever be legal.
    #[must_use]
    pub fn new(max_take: u32) -> Self {
        assert!(max_take > 0, "at least one object should be takeable");
        Self { max_take }
    }

    /// Starting position with Red to move.
    #[must_use]
    pub const fn start(heap: u32) -> NimState {
        NimState::new(heap, Player::Red)
    }
}

impl Default for Nim {
    fn default() -> Self {
        Self { max_take: 3 }
    }
}

impl Game for Nim {
    type State = NimState;
    /// Number of objects to take.
    type Action = u32;
    type Player = Player;

    fn current_player(&self, state: &NimState) -> Player {
        state.to_move
    }

    fn legal_actions(&self, state: &NimState) -> Vec<u32> {
        (1..=self.max_take.min(state.heap)).collect()
    }

    fn next_state(&self, state: &NimState, action: &u32) -> NimState {
        debug_assert!(*action <= state.heap);
        NimState::new(state.heap - action, !state.to_move)
    }

    fn is_ended(&self, state: &NimState) -> bool {
        state.heap == 0
    }

    fn win_values(&self, state: &NimState) -> HashMap<Player, f64> {
        debug_assert!(self.is_ended(state));
        // The player to move at an empty heap did not take the last object.
        HashMap::from([(state.to_move, 0.0), (!state.to_move, 1.0)])
    }
}
