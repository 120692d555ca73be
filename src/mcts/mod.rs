//! Monte Carlo Tree Search for Guo Zha.
//!
//! ## Overview
//!
//! The individual search builds a fresh tree for every decision, rooted at the
//! searching seat's hand (always seat 0):
//!
//! - **Selection**: adversarial UCT ([`Uct`]). Unvisited children always go first.
//! - **Expansion**: one untried action, picked uniformly at random.
//! - **Simulation**: heuristic rollouts over a freshly sampled world
//!   (hidden hands are redealt for every rollout).
//! - **Backpropagation**: visits and wins walk up the parent chain.
//!
//! The search is anytime: it stops at the iteration budget or the wall-clock
//! budget, whichever comes first, and the partial statistics are always usable.
//!
//! ## Usage
//!
//! ```rust
//! use guozha_mcts::core::{Card, Rank, Suit};
//! use guozha_mcts::mcts::{choose_individual_play, SearchConfig};
//!
//! let hand: Vec<Card> = [3u8, 5, 5, 9, 12]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &r)| Card::new(Suit::Hearts, Rank(r), i as u32))
//!     .collect();
//! let config = SearchConfig::default().with_iterations(30).with_seed(7);
//!
//! let play = choose_individual_play(&hand, None, &config).unwrap();
//! assert!(play.is_some());
//! ```

pub mod actions;
pub mod config;
pub mod estimator;
pub mod heuristic;
pub mod node;
pub mod policy;
pub mod search;
pub mod simulation;
pub mod state;
pub mod stats;
pub mod tree;

pub use actions::{individual_actions, team_actions, TeamAction};
pub use config::SearchConfig;
pub use estimator::{estimate, estimate_hands};
pub use heuristic::{evaluate_action, select_by_heuristic, EvalContext, SeatRole};
pub use node::{Mover, NodeId, SearchNode};
pub use policy::{SelectionPolicy, TeamUct, Uct};
pub use search::{
    backpropagate, choose_individual_play, choose_individual_play_with, expand, IndividualSearch,
};
pub use simulation::{simulate, RolloutOutcome};
pub use state::{SimState, AI_SEAT};
pub use stats::SearchStats;
pub use tree::{SearchTree, TreeNode, TreeStats};
