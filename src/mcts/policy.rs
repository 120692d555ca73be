//! Tree policies for choosing which child to descend into.
//!
//! - [`Uct`]: individual mode. The searching seat maximizes UCT, the opponent
//!   minimizes it.
//! - [`TeamUct`]: team mode. Always maximizes the normalized team score plus a
//!   small cooperation bonus.
//!
//! Both policies visit any unvisited child before comparing values, whatever
//! the exploration constant, and break ties in favour of the earlier child.

use crate::team::evaluation::{normalize_cooperation, normalize_team_score};
use crate::team::node::TeamNode;

use super::node::{Mover, NodeId, SearchNode};
use super::tree::{SearchTree, TreeNode};

/// Weight of the cooperation bonus in team UCT.
pub const COOPERATION_BONUS_WEIGHT: f64 = 0.1;

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for selecting which child of a node to explore.
pub trait SelectionPolicy<N: TreeNode> {
    /// Child of `id` to follow, or `None` for a node without children.
    fn select(&self, tree: &SearchTree<N>, id: NodeId, exploration: f64) -> Option<NodeId>;
}

/// `exploitation + C·sqrt(ln(parent_visits) / visits)`, infinite when unvisited.
#[inline]
#[must_use]
pub fn uct_value(exploitation: f64, visits: u32, parent_visits: u32, exploration: f64) -> f64 {
    if visits == 0 {
        return f64::INFINITY;
    }
    let ln_parent = f64::from(parent_visits.max(1)).ln();
    exploitation + exploration * (ln_parent / f64::from(visits)).sqrt()
}

/// Adversarial UCT over [`SearchNode`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct Uct;

impl SelectionPolicy<SearchNode> for Uct {
    fn select(&self, tree: &SearchTree<SearchNode>, id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = tree.get(id);
        let maximize = node.to_move == Mover::Ai;
        pick(
            tree.children(id).map(|(child_id, child)| {
                let value = uct_value(child.win_rate(), child.visits, node.visits, exploration);
                (child_id, child.visits, value)
            }),
            maximize,
        )
    }
}

/// Cooperative UCT over [`TeamNode`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct TeamUct;

impl TeamUct {
    /// Exploitation term: normalized average team score plus the cooperation bonus.
    #[must_use]
    pub fn exploitation(node: &TeamNode) -> f64 {
        let avg = if node.visits == 0 {
            0.0
        } else {
            node.team_score_sum / f64::from(node.visits)
        };
        normalize_team_score(avg)
            + normalize_cooperation(node.evaluation.team_cooperation_score)
                * COOPERATION_BONUS_WEIGHT
    }
}

impl SelectionPolicy<TeamNode> for TeamUct {
    fn select(&self, tree: &SearchTree<TeamNode>, id: NodeId, exploration: f64) -> Option<NodeId> {
        let parent_visits = tree.get(id).visits;
        pick(
            tree.children(id).map(|(child_id, child)| {
                let value =
                    uct_value(Self::exploitation(child), child.visits, parent_visits, exploration);
                (child_id, child.visits, value)
            }),
            true,
        )
    }
}

/// First unvisited child, else the strict best by `value`; earlier wins ties.
fn pick(candidates: impl Iterator<Item = (NodeId, u32, f64)>, maximize: bool) -> Option<NodeId> {
    let mut best: Option<(NodeId, f64)> = None;
    for (id, visits, value) in candidates {
        if visits == 0 {
            return Some(id);
        }
        let better = match best {
            None => true,
            Some((_, current)) if maximize => value > current,
            Some((_, current)) => value < current,
        };
        if better {
            best = Some((id, value));
        }
    }
    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, Rank, Suit};
    use crate::rules::{PlayOracle, StandardOracle};

    fn card(rank: u8, id: u32) -> Card {
        Card::new(Suit::Hearts, Rank(rank), id)
    }

    /// Root with three children whose (visits, wins) are given.
    fn tree_with(to_move: Mover, stats: &[(u32, u32)]) -> (SearchTree<SearchNode>, Vec<NodeId>) {
        let mut root = SearchNode::root(vec![card(3, 0), card(4, 1), card(5, 2)], None, Vec::new());
        root.to_move = to_move;
        root.visits = stats.iter().map(|(v, _)| v).sum();
        let mut tree = SearchTree::new(root);
        let ids = stats
            .iter()
            .enumerate()
            .map(|(i, &(visits, wins))| {
                let action = vec![card(3 + i as u8, i as u32)];
                let play = StandardOracle.classify(&action).unwrap();
                let mut child =
                    SearchNode::child(tree.root(), 0, to_move.flip(), Vec::new(), play, action);
                child.visits = visits;
                child.wins = wins;
                tree.add_child(tree.root(), child)
            })
            .collect();
        (tree, ids)
    }

    #[test]
    fn test_uct_value_unvisited_is_infinite() {
        assert!(uct_value(0.0, 0, 10, 1.414).is_infinite());
        let v = uct_value(0.5, 4, 16, 1.0);
        assert!((v - (0.5 + (16f64.ln() / 4.0).sqrt())).abs() < 1e-12);
    }

    #[test]
    fn test_unvisited_selected_for_every_constant() {
        for mover in [Mover::Ai, Mover::Opponent] {
            for c in [0.0, 0.5, 1.414, 10.0] {
                let (tree, ids) = tree_with(mover, &[(10, 9), (0, 0), (5, 1)]);
                assert_eq!(Uct.select(&tree, tree.root(), c), Some(ids[1]));
            }
        }
    }

    #[test]
    fn test_ai_maximizes_opponent_minimizes() {
        let (tree, ids) = tree_with(Mover::Ai, &[(10, 2), (10, 8), (10, 5)]);
        assert_eq!(Uct.select(&tree, tree.root(), 0.0), Some(ids[1]));

        let (tree, ids) = tree_with(Mover::Opponent, &[(10, 2), (10, 8), (10, 5)]);
        assert_eq!(Uct.select(&tree, tree.root(), 0.0), Some(ids[0]));
    }

    #[test]
    fn test_ties_go_to_earlier_child() {
        let (tree, ids) = tree_with(Mover::Ai, &[(10, 5), (10, 5), (10, 5)]);
        assert_eq!(Uct.select(&tree, tree.root(), 1.414), Some(ids[0]));
    }

    #[test]
    fn test_leaf_has_no_selection() {
        let (tree, ids) = tree_with(Mover::Ai, &[(1, 1)]);
        assert_eq!(Uct.select(&tree, ids[0], 1.0), None);
    }
}
