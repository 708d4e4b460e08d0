//! Random playouts used to estimate the value of a position.

use rand::seq::SliceRandom;
use rand::Rng;

use super::SearchError;
use crate::game::{Game, Outcome};

/// Plays uniformly random legal actions from `state` until the game ends and
/// reports the result for the player to move at `state`.
///
/// Only the game is consulted: the search tree is neither read nor modified.
///
/// # Errors
///
/// Returns [`SearchError::AdapterContractViolation`] if the game reports no
/// legal actions for a state that is not terminal, or a payoff for the player
/// that is missing, negative or not finite.
pub fn simulate<G, R>(game: &G, state: &G::State, rng: &mut R) -> Result<Outcome, SearchError>
where
    G: Game,
    R: Rng + ?Sized,
{
    let player = game.current_player(state);
    let mut state = state.clone();
    while !game.is_ended(&state) {
        let actions = game.legal_actions(&state);
        let Some(action) = actions.choose(rng) else {
            return Err(SearchError::AdapterContractViolation(
                "no legal actions in a state that is not terminal".to_string(),
            ));
        };
        state = game.next_state(&state, action);
    }
    let values = game.win_values(&state);
    let Some(&value) = values.get(&player) else {
        return Err(SearchError::AdapterContractViolation(format!(
            "no payoff reported for {player:?}"
        )));
    };
    Outcome::from_win_value(value).ok_or_else(|| {
        SearchError::AdapterContractViolation(format!("invalid payoff {value} for {player:?}"))
    })
}
