//! Search tree stored as an arena: nodes refer to each other by index instead
//! of owning pointers, which keeps both upward and downward traversal O(1)
//! without reference-counted cycles.

use log::warn;
use rand::Rng;

use super::policy::{self, Perspective};
use crate::game::{Game, Outcome};

/// Position of a node in the [`Tree`] arena.
pub type NodeIndex = usize;

/// The root is always the first node allocated in the arena.
pub const ROOT: NodeIndex = 0;

// This is a special value that is used to indicate that the node has no parent.
const TOMBSTONE_PARENT: NodeIndex = usize::MAX;

/// Vertex of the search tree. The game state it corresponds to is implicit:
/// it is reached by applying the actions on the path from the root.
#[derive(Debug, Clone)]
pub struct Node<A> {
    parent: NodeIndex,
    parent_action: Option<A>,
    /// Insertion-ordered, so that iteration and tie-breaking are
    /// reproducible.
    children: Vec<NodeIndex>,
    /// Legal actions that have not produced a child yet.
    untried_actions: Vec<A>,
    /// Number of simulations folded into this node.
    visits: u32,
    /// Number of those simulations credited as wins by backpropagation.
    wins: u32,
}

impl<A> Node<A> {
    const fn new(parent: NodeIndex, parent_action: Option<A>, actions: Vec<A>) -> Self {
        Self {
            parent,
            parent_action,
            children: Vec::new(),
            untried_actions: actions,
            visits: 0,
            wins: 0,
        }
    }

    /// Returns the index of the parent, or `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeIndex> {
        if self.parent == TOMBSTONE_PARENT {
            None
        } else {
            Some(self.parent)
        }
    }

    /// Action that the parent applied to reach this node; `None` for the root.
    #[must_use]
    pub const fn parent_action(&self) -> Option<&A> {
        self.parent_action.as_ref()
    }

    /// Expanded children in the order they were created.
    #[must_use]
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    /// Legal actions that have not been expanded yet.
    #[must_use]
    pub fn untried_actions(&self) -> &[A] {
        &self.untried_actions
    }

    /// Returns `true` while some legal action has no child yet.
    #[must_use]
    pub fn has_untried_actions(&self) -> bool {
        !self.untried_actions.is_empty()
    }

    /// Number of simulations folded into this node.
    #[must_use]
    pub const fn visits(&self) -> u32 {
        self.visits
    }

    /// Number of simulations credited as a win to this node.
    #[must_use]
    pub const fn wins(&self) -> u32 {
        self.wins
    }

    /// Returns `true` once at least one simulation went through this node.
    #[must_use]
    pub const fn visited(&self) -> bool {
        self.visits > 0
    }
}

/// Partial game tree built for a single decision.
#[derive(Debug, Clone)]
pub struct Tree<A> {
    nodes: Vec<Node<A>>,
}

impl<A: Clone + Eq> Tree<A> {
    /// Creates a tree consisting of a single unvisited root with the legal
    /// actions of the state being searched.
    #[must_use]
    pub fn new(actions: Vec<A>) -> Self {
        Self {
            nodes: vec![Node::new(TOMBSTONE_PARENT, None, actions)],
        }
    }

    /// Returns the node of the state the search started from.
    #[must_use]
    pub fn root(&self) -> &Node<A> {
        &self.nodes[ROOT]
    }

    /// # Panics
    ///
    /// Panics if `index` does not belong to this tree.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> &Node<A> {
        &self.nodes[index]
    }

    /// Number of nodes in the tree, the root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always has a root, so it is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of edges between `node` and the root.
    #[must_use]
    pub fn depth(&self, node: NodeIndex) -> usize {
        let mut depth = 0;
        let mut current = self.nodes[node].parent;
        while current != TOMBSTONE_PARENT {
            depth += 1;
            current = self.nodes[current].parent;
        }
        depth
    }

    /// Iterates over all nodes in allocation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &Node<A>)> {
        self.nodes.iter().enumerate()
    }

    /// Returns the child of `node` reached by `action`, if it was expanded.
    #[must_use]
    pub fn child(&self, node: NodeIndex, action: &A) -> Option<NodeIndex> {
        self.nodes[node]
            .children
            .iter()
            .copied()
            .find(|&child| self.nodes[child].parent_action.as_ref() == Some(action))
    }

    /// Descends from the root while the current node is fully expanded and
    /// its state is not terminal, following the best-scoring child at every
    /// step.
    ///
    /// `state` corresponds to the root. The state is advanced along every
    /// traversed edge for the terminal check and the returned leaf state, but
    /// the perspective is fixed by the player to move at the root. Each
    /// node's wins belong to the player moving there, so every chooser
    /// minimizes the win rate of the player moving next. Returns the node
    /// where the descent stopped together with its state.
    pub fn select<G>(
        &self,
        game: &G,
        state: &G::State,
        identity: G::Player,
        exploration: f64,
    ) -> (NodeIndex, G::State)
    where
        G: Game<Action = A>,
    {
        let perspective = Perspective::for_mover(game.current_player(state) == identity);
        let mut current = ROOT;
        let mut state = state.clone();
        while !self.nodes[current].has_untried_actions() && !game.is_ended(&state) {
            let Some(best) = policy::best_child(self, current, perspective, exploration) else {
                warn!("fully expanded node {current} in a non-terminal state has no children");
                return (current, state);
            };
            if let Some(action) = &self.nodes[best].parent_action {
                state = game.next_state(&state, action);
            }
            current = best;
        }
        (current, state)
    }

    /// Materializes a child of `node` for one of its untried actions, picked
    /// uniformly at random. `state` is the state `node` represents.
    ///
    /// Returns the new child and its state. If `node` has no untried actions
    /// left, nothing is expanded and `node` is returned unchanged.
    pub fn expand<G, R>(
        &mut self,
        node: NodeIndex,
        game: &G,
        state: &G::State,
        rng: &mut R,
    ) -> (NodeIndex, G::State)
    where
        G: Game<Action = A>,
        R: Rng + ?Sized,
    {
        let untried = &mut self.nodes[node].untried_actions;
        if untried.is_empty() {
            return (node, state.clone());
        }
        let index = rng.gen_range(0..untried.len());
        let action = untried.remove(index);
        let next_state = game.next_state(state, &action);
        let child = self.nodes.len();
        self.nodes
            .push(Node::new(node, Some(action), game.legal_actions(&next_state)));
        self.nodes[node].children.push(child);
        (child, next_state)
    }

    /// Attaches a child without consulting a game.
    #[cfg(test)]
    pub(crate) fn add_child(&mut self, parent: NodeIndex, action: A) -> NodeIndex {
        let child = self.nodes.len();
        self.nodes.push(Node::new(parent, Some(action), Vec::new()));
        self.nodes[parent].children.push(child);
        child
    }

    /// Folds the outcome of a simulation started at `leaf` into every node on
    /// the path to the root.
    ///
    /// The outcome is for the player to move at `leaf`'s state. Credit
    /// alternates between plies: a win for the player at one level is a loss
    /// for the player one level up. Draws credit nobody.
    pub fn backpropagate(&mut self, leaf: NodeIndex, outcome: Outcome) {
        let mut credit = outcome == Outcome::Win;
        let mut current = leaf;
        while current != TOMBSTONE_PARENT {
            let node = &mut self.nodes[current];
            node.visits += 1;
            if credit {
                node.wins += 1;
            }
            if outcome != Outcome::Draw {
                credit = !credit;
            }
            current = node.parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::games::nim::{Nim, NimState};
    use crate::games::Player;

    fn check_invariants<A: Clone + Eq>(tree: &Tree<A>) {
        for (index, node) in tree.nodes() {
            assert!(node.wins() <= node.visits());
            for &child in node.children() {
                let action = tree.node(child).parent_action().unwrap();
                assert!(!node.untried_actions().contains(action));
                assert_eq!(tree.node(child).parent(), Some(index));
                assert_eq!(tree.child(index, action), Some(child));
            }
        }
    }

    /// Builds root -> child -> grandchild.
    fn three_node_path() -> (Tree<u32>, [NodeIndex; 3]) {
        let game = Nim::default();
        let state = NimState::new(5, Player::Red);
        let mut rng = StdRng::seed_from_u64(0);
        let mut tree = Tree::new(game.legal_actions(&state));
        let (child, child_state) = tree.expand(ROOT, &game, &state, &mut rng);
        let (grandchild, _) = tree.expand(child, &game, &child_state, &mut rng);
        (tree, [ROOT, child, grandchild])
    }

    #[test]
    fn new_tree() {
        let tree = Tree::new(vec![1, 2, 3]);
        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.root().parent(), None);
        assert_eq!(tree.root().parent_action(), None);
        assert_eq!(tree.root().untried_actions(), &[1, 2, 3]);
        assert!(!tree.root().visited());
    }

    #[test]
    fn expansion_moves_one_action() {
        let game = Nim::default();
        let state = NimState::new(5, Player::Red);
        let mut rng = StdRng::seed_from_u64(42);
        let mut tree = Tree::new(game.legal_actions(&state));

        let (child, child_state) = tree.expand(ROOT, &game, &state, &mut rng);
        assert_eq!(child, 1);
        assert_eq!(tree.root().untried_actions().len(), 2);
        assert_eq!(tree.root().children(), &[child]);

        let action = *tree.node(child).parent_action().unwrap();
        assert_eq!(child_state, game.next_state(&state, &action));
        assert_eq!(
            tree.node(child).untried_actions(),
            game.legal_actions(&child_state).as_slice()
        );
        check_invariants(&tree);
    }

    #[test]
    fn expansion_exhausts_actions() {
        let game = Nim::default();
        let state = NimState::new(5, Player::Red);
        let mut rng = StdRng::seed_from_u64(7);
        let mut tree = Tree::new(game.legal_actions(&state));
        for _ in 0..3 {
            let _ = tree.expand(ROOT, &game, &state, &mut rng);
            check_invariants(&tree);
        }
        assert!(!tree.root().has_untried_actions());
        assert_eq!(tree.root().children().len(), 3);

        // Nothing left to expand: the node is returned as is.
        let (node, same_state) = tree.expand(ROOT, &game, &state, &mut rng);
        assert_eq!(node, ROOT);
        assert_eq!(same_state, state);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn depth() {
        let (tree, [root, child, grandchild]) = three_node_path();
        assert_eq!(tree.depth(root), 0);
        assert_eq!(tree.depth(child), 1);
        assert_eq!(tree.depth(grandchild), 2);
    }

    #[test]
    fn select_minimizes_next_mover_wins() {
        // Red to move at the root, Blue one level down. Blue's child for
        // taking 1 recorded wins for Red (the mover there), the other did not.
        let game = Nim::default();
        let state = NimState::new(5, Player::Red);
        let mut tree = Tree::new(Vec::new());
        let blue = tree.add_child(ROOT, 1);
        let red_wins = tree.add_child(blue, 1);
        let red_loses = tree.add_child(blue, 2);
        tree.backpropagate(red_wins, Outcome::Win);
        tree.backpropagate(red_wins, Outcome::Win);
        tree.backpropagate(red_loses, Outcome::Loss);
        tree.backpropagate(red_loses, Outcome::Loss);
        let (node, selected_state) = tree.select(&game, &state, Player::Red, 0.0);
        assert_eq!(node, red_loses);
        assert_eq!(selected_state, NimState::new(2, Player::Red));
    }

    #[test]
    fn backpropagate_win_alternates() {
        let (mut tree, [root, child, grandchild]) = three_node_path();
        tree.backpropagate(grandchild, Outcome::Win);
        assert_eq!(tree.node(grandchild).wins(), 1);
        assert_eq!(tree.node(child).wins(), 0);
        assert_eq!(tree.node(root).wins(), 1);
        for node in [root, child, grandchild] {
            assert_eq!(tree.node(node).visits(), 1);
        }
    }

    #[test]
    fn backpropagate_loss_alternates() {
        let (mut tree, [root, child, grandchild]) = three_node_path();
        tree.backpropagate(grandchild, Outcome::Loss);
        assert_eq!(tree.node(grandchild).wins(), 0);
        assert_eq!(tree.node(child).wins(), 1);
        assert_eq!(tree.node(root).wins(), 0);
    }

    #[test]
    fn backpropagate_draw_holds_parity() {
        let (mut tree, path) = three_node_path();
        tree.backpropagate(path[2], Outcome::Draw);
        for node in path {
            assert_eq!(tree.node(node).wins(), 0);
            assert_eq!(tree.node(node).visits(), 1);
        }
    }

    #[test]
    fn visits_count_passes() {
        let (mut tree, [root, child, grandchild]) = three_node_path();
        for outcome in [Outcome::Win, Outcome::Loss, Outcome::Draw, Outcome::Win] {
            tree.backpropagate(grandchild, outcome);
        }
        tree.backpropagate(child, Outcome::Win);
        assert_eq!(tree.node(grandchild).visits(), 4);
        assert_eq!(tree.node(child).visits(), 5);
        assert_eq!(tree.node(root).visits(), 5);
        check_invariants(&tree);
    }

    #[test]
    fn select_stops_at_untried_actions() {
        let game = Nim::default();
        let state = NimState::new(5, Player::Red);
        let tree = Tree::new(game.legal_actions(&state));
        let (node, selected_state) = tree.select(&game, &state, Player::Red, 2.0);
        assert_eq!(node, ROOT);
        assert_eq!(selected_state, state);
    }

    #[test]
    fn select_threads_state() {
        let game = Nim::default();
        let state = NimState::new(5, Player::Red);
        let mut rng = StdRng::seed_from_u64(3);
        let mut tree = Tree::new(game.legal_actions(&state));
        for _ in 0..3 {
            let (leaf, _) = tree.expand(ROOT, &game, &state, &mut rng);
            tree.backpropagate(leaf, Outcome::Loss);
        }
        let (node, selected_state) = tree.select(&game, &state, Player::Red, 2.0);
        assert_ne!(node, ROOT);
        let action = tree.node(node).parent_action().unwrap();
        assert_eq!(selected_state, game.next_state(&state, action));
    }

    #[test]
    fn select_stops_at_terminal_state() {
        let game = Nim::default();
        let state = NimState::new(0, Player::Blue);
        let tree = Tree::new(Vec::new());
        let (node, _) = tree.select(&game, &state, Player::Red, 2.0);
        assert_eq!(node, ROOT);
    }

    #[test]
    fn select_without_children_falls_back() {
        // Inconsistent adapter: no actions in a state that is not terminal.
        let game = Nim::default();
        let state = NimState::new(5, Player::Red);
        let tree = Tree::new(Vec::new());
        let (node, selected_state) = tree.select(&game, &state, Player::Red, 2.0);
        assert_eq!(node, ROOT);
        assert_eq!(selected_state, state);
    }
}
