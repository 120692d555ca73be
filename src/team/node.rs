//! Team search tree nodes.

use smallvec::SmallVec;

use crate::mcts::node::NodeId;
use crate::mcts::tree::TreeNode;
use crate::mcts::TeamAction;

use super::state::TeamState;

/// Heuristic annotations recorded when a node is expanded.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TeamEvaluation {
    /// Cooperative evaluator score of the action, against the parent state.
    pub expected_team_score: f64,
    /// Strategic pass value of the action (zero for anything but a strategic pass).
    pub strategic_pass_value: f64,
    /// Raw cooperation signal of the action.
    pub team_cooperation_score: f64,
}

/// A node in the team search tree.
#[derive(Clone, Debug)]
pub struct TeamNode {
    pub parent: NodeId,
    pub depth: u16,

    /// World after `action`.
    pub state: TeamState,

    pub visits: u32,

    /// Rollouts won by the searching seat's team.
    pub team_wins: u32,

    /// Sum of the searching team's final score over all rollouts.
    pub team_score_sum: f64,

    pub children: SmallVec<[NodeId; 8]>,

    /// Action that led here (None for root).
    pub action: Option<TeamAction>,

    pub untried: Vec<TeamAction>,

    pub evaluation: TeamEvaluation,
}

impl TeamNode {
    pub fn root(state: TeamState, untried: Vec<TeamAction>) -> Self {
        Self {
            parent: NodeId::NONE,
            depth: 0,
            state,
            visits: 0,
            team_wins: 0,
            team_score_sum: 0.0,
            children: SmallVec::new(),
            action: None,
            untried,
            evaluation: TeamEvaluation::default(),
        }
    }

    pub fn child(
        parent: NodeId,
        parent_depth: u16,
        state: TeamState,
        action: TeamAction,
        untried: Vec<TeamAction>,
        evaluation: TeamEvaluation,
    ) -> Self {
        Self {
            parent,
            depth: parent_depth.saturating_add(1),
            state,
            visits: 0,
            team_wins: 0,
            team_score_sum: 0.0,
            children: SmallVec::new(),
            action: Some(action),
            untried,
            evaluation,
        }
    }

    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            f64::from(self.team_wins) / f64::from(self.visits)
        }
    }

    #[must_use]
    pub fn avg_team_score(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.team_score_sum / f64::from(self.visits)
        }
    }
}

impl TreeNode for TeamNode {
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
