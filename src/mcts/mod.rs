//! Implements [Monte Carlo Tree Search] (MCTS) to choose a move.
//!
//! Every decision builds a fresh tree rooted at the current state and runs a
//! fixed number of iterations:
//!
//! 1. Selection: starting at the root, descend into the best-scoring child
//!    until reaching a node with untried actions or a terminal state.
//! 2. Expansion: add a child for one random untried action.
//! 3. Simulation: play random moves from the new node until the game ends.
//! 4. Backpropagation: update visit and win counters on the path back to the
//!    root.
//!
//! The move leading to the best-scoring child of the root is played.
//!
//! [Monte Carlo Tree Search]: https://en.wikipedia.org/wiki/Monte_Carlo_tree_search

use itertools::Itertools;
use log::{debug, log_enabled, trace, Level};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::Game;

mod config;
mod error;
pub mod policy;
pub mod rollout;
pub mod tree;

pub use config::Config;
pub use error::SearchError;
use policy::Perspective;
pub use tree::{Node, NodeIndex, Tree, ROOT};

/// Grows a search tree for `state` and returns it without making a decision.
///
/// # Errors
///
/// Fails if the configuration is invalid, `state` has no legal actions or the
/// game breaks its contract during a simulation.
pub fn search<G, R>(
    game: &G,
    state: &G::State,
    config: &Config,
    rng: &mut R,
) -> Result<Tree<G::Action>, SearchError>
where
    G: Game,
    R: Rng + ?Sized,
{
    config.validate()?;
    let identity = game.current_player(state);
    let actions = game.legal_actions(state);
    if actions.is_empty() {
        return Err(SearchError::EmptyRootActions);
    }
    let mut tree = Tree::new(actions);

    for iteration in 0..config.iterations {
        let (selected, selected_state) = tree.select(game, state, identity, config.exploration);
        // A fully expanded or terminal node is simulated from directly.
        let (leaf, leaf_state) = if tree.node(selected).has_untried_actions() {
            tree.expand(selected, game, &selected_state, rng)
        } else {
            (selected, selected_state)
        };
        let outcome = rollout::simulate(game, &leaf_state, rng)?;
        tree.backpropagate(leaf, outcome);
        trace!(
            "iteration {iteration}: selected depth {}, leaf {leaf}, outcome {outcome:?}",
            tree.depth(selected)
        );
    }
    Ok(tree)
}

/// Runs the search and returns the action to play at `state`.
///
/// # Errors
///
/// See [`search`].
pub fn think<G, R>(
    game: &G,
    state: &G::State,
    config: &Config,
    rng: &mut R,
) -> Result<G::Action, SearchError>
where
    G: Game,
    R: Rng + ?Sized,
{
    let tree = search(game, state, config, rng)?;
    // The searching player is the one to move at the root.
    let perspective = Perspective::for_mover(true);
    if log_enabled!(Level::Debug) {
        let root = tree.root();
        debug!(
            "searched {} nodes: {}",
            tree.len(),
            root.children()
                .iter()
                .map(|&child| {
                    let node = tree.node(child);
                    format!(
                        "{:?} {}/{} ({:.3})",
                        node.parent_action(),
                        node.wins(),
                        node.visits(),
                        policy::score(node, root, perspective, config.exploration)
                    )
                })
                .join(", ")
        );
    }
    policy::best_child(&tree, ROOT, perspective, config.exploration)
        .and_then(|best| tree.node(best).parent_action().cloned())
        .ok_or(SearchError::EmptyRootActions)
}

/// Same as [`think`] with a random source seeded from `seed`, which makes the
/// decision reproducible.
///
/// # Errors
///
/// See [`search`].
pub fn think_seeded<G: Game>(
    game: &G,
    state: &G::State,
    config: &Config,
    seed: u64,
) -> Result<G::Action, SearchError> {
    think(game, state, config, &mut StdRng::seed_from_u64(seed))
}
