//! Search node for the individual (free-for-all) search.
//!
//! Uses arena-based allocation with index references (`NodeId`). A node
//! records the searching seat's hand at that point, the play on the table,
//! whose turn it is, and win/visit statistics.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::tree::TreeNode;
use crate::core::{Card, Play};

/// Index into a [`SearchTree`](super::SearchTree) arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// Who acts at a node of the individual tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mover {
    /// The searching seat (seat 0).
    Ai,
    /// Any other seat.
    Opponent,
}

impl Mover {
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Mover::Ai => Mover::Opponent,
            Mover::Opponent => Mover::Ai,
        }
    }
}

/// A node in the individual search tree.
#[derive(Clone, Debug)]
pub struct SearchNode {
    /// Parent node (NONE for root).
    pub parent: NodeId,

    /// Depth in tree (root = 0).
    pub depth: u16,

    /// The searching seat's hand at this node.
    pub hand: Vec<Card>,

    /// Play currently on the table.
    pub last_play: Option<Play>,

    pub to_move: Mover,

    pub visits: u32,

    /// Rollouts through this node won by the searching seat.
    pub wins: u32,

    /// SmallVec optimizes for typical branching factor < 8.
    pub children: SmallVec<[NodeId; 8]>,

    /// Cards played to reach this node (None for root).
    pub action: Option<Vec<Card>>,

    /// Legal actions not yet expanded into children.
    pub untried: Vec<Vec<Card>>,
}

impl SearchNode {
    /// Root node for the searching seat to move.
    pub fn root(hand: Vec<Card>, last_play: Option<Play>, untried: Vec<Vec<Card>>) -> Self {
        Self {
            parent: NodeId::NONE,
            depth: 0,
            hand,
            last_play,
            to_move: Mover::Ai,
            visits: 0,
            wins: 0,
            children: SmallVec::new(),
            action: None,
            untried,
        }
    }

    /// Fresh child reached from `parent` by playing `action`.
    pub fn child(
        parent: NodeId,
        parent_depth: u16,
        to_move: Mover,
        hand: Vec<Card>,
        play: Play,
        action: Vec<Card>,
    ) -> Self {
        Self {
            parent,
            depth: parent_depth.saturating_add(1),
            hand,
            last_play: Some(play),
            to_move,
            visits: 0,
            wins: 0,
            children: SmallVec::new(),
            action: Some(action),
            untried: Vec::new(),
        }
    }

    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.visits)
        }
    }

    /// Every action has been expanded into a child.
    #[must_use]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }
}

impl TreeNode for SearchNode {
    fn parent(&self) -> NodeId {
        self.parent
    }

    fn depth(&self) -> u16 {
        self.depth
    }

    fn visits(&self) -> u32 {
        self.visits
    }

    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    fn untried_count(&self) -> usize {
        self.untried.len()
    }
}
