//! Scoring of tree edges: balances the empirical win rate of a child against
//! an exploration bonus that decays as the child gets more visits.
//!
//! The bonus is `C * 2 * ln(t) / n`, linear in `ln(t) / n` rather than the
//! square root used by UCB1.

use super::tree::{Node, NodeIndex, Tree};

/// Whose interests the score of a child favors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Perspective {
    /// The child's own win rate is maximized.
    Direct,
    /// The complement of the child's win rate is maximized.
    Complement,
}

impl Perspective {
    /// Children store wins of the player moving at the child, so when the
    /// searching player is the one choosing, the complement is favored.
    #[must_use]
    pub const fn for_mover(searching_player_to_move: bool) -> Self {
        if searching_player_to_move {
            Self::Complement
        } else {
            Self::Direct
        }
    }
}

/// Returns the desirability of `child` as a move from `parent`.
///
/// # Panics
///
/// Panics if `child` has never been visited: every child receives a
/// simulation right after it is created, so this is a broken invariant.
#[must_use]
pub fn score<A>(
    child: &Node<A>,
    parent: &Node<A>,
    perspective: Perspective,
    exploration: f64,
) -> f64 {
    assert!(child.visited(), "scored a child that was never visited");
    let visits = f64::from(child.visits());
    let exploit = f64::from(child.wins()) / visits;
    let explore = exploration * (2.0 * f64::from(parent.visits()).ln() / visits);
    match perspective {
        Perspective::Direct => exploit + explore,
        Perspective::Complement => (1.0 - exploit) + explore,
    }
}

/// Returns the child of `node` with the strictly highest score, or `None` if
/// it has no children. Ties go to the child expanded first.
#[must_use]
pub fn best_child<A: Clone + Eq>(
    tree: &Tree<A>,
    node: NodeIndex,
    perspective: Perspective,
    exploration: f64,
) -> Option<NodeIndex> {
    let parent = tree.node(node);
    let mut best: Option<(NodeIndex, f64)> = None;
    for &child in parent.children() {
        let value = score(tree.node(child), parent, perspective, exploration);
        if best.map_or(true, |(_, best_value)| value > best_value) {
            best = Some((child, value));
        }
    }
    best.map(|(child, _)| child)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Outcome;
    use crate::mcts::tree::ROOT;

    const EPSILON: f64 = 1e-9;

    /// Root with children for actions 0, 1 and 2.
    fn expanded_tree() -> Tree<u8> {
        let mut tree = Tree::new(Vec::new());
        for action in 0..3 {
            let _ = tree.add_child(ROOT, action);
        }
        tree
    }

    #[test]
    fn perspective() {
        assert_eq!(Perspective::for_mover(true), Perspective::Complement);
        assert_eq!(Perspective::for_mover(false), Perspective::Direct);
    }

    #[test]
    fn formula() {
        let mut tree = expanded_tree();
        // Child 1: 3 visits, 2 wins.
        tree.backpropagate(1, Outcome::Win);
        tree.backpropagate(1, Outcome::Win);
        tree.backpropagate(1, Outcome::Loss);
        // Parent gets an extra visit through another child.
        tree.backpropagate(2, Outcome::Draw);

        let (child, parent) = (tree.node(1), tree.root());
        assert_eq!(parent.visits(), 4);
        let explore = 2.0 * (2.0 * 4_f64.ln() / 3.0);
        let direct = score(child, parent, Perspective::Direct, 2.0);
        let complement = score(child, parent, Perspective::Complement, 2.0);
        assert!((direct - (2.0 / 3.0 + explore)).abs() < EPSILON);
        assert!((complement - (1.0 / 3.0 + explore)).abs() < EPSILON);
    }

    #[test]
    fn exploration_increases_score() {
        let mut tree = expanded_tree();
        tree.backpropagate(1, Outcome::Win);
        tree.backpropagate(2, Outcome::Loss);
        let (child, parent) = (tree.node(1), tree.root());
        let mut previous = score(child, parent, Perspective::Direct, 0.0);
        for exploration in [0.5, 1.0, 2.0, 4.0] {
            let current = score(child, parent, Perspective::Direct, exploration);
            assert!(current > previous);
            previous = current;
        }
    }

    #[test]
    #[should_panic(expected = "never visited")]
    fn unvisited_child() {
        let tree = expanded_tree();
        let _ = score(tree.node(1), tree.root(), Perspective::Direct, 2.0);
    }

    #[test]
    fn best_child_prefers_higher_score() {
        let mut tree = expanded_tree();
        tree.backpropagate(1, Outcome::Win);
        tree.backpropagate(2, Outcome::Loss);
        tree.backpropagate(3, Outcome::Loss);
        assert_eq!(best_child(&tree, ROOT, Perspective::Direct, 2.0), Some(1));
        // Children 2 and 3 are tied; the first one wins.
        assert_eq!(best_child(&tree, ROOT, Perspective::Complement, 2.0), Some(2));
    }

    #[test]
    fn best_child_of_leaf() {
        let tree = expanded_tree();
        assert_eq!(best_child(&tree, 1, Perspective::Direct, 2.0), None);
    }
}
