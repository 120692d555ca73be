//! # guozha-mcts
//!
//! Monte Carlo Tree Search decision engine for the Guo Zha shedding game.
//!
//! ## Design Principles
//!
//! 1. **Rules behind a trait**: the search never interprets card shapes. Every
//!    legality, comparison and scoring question goes through
//!    [`PlayOracle`](rules::PlayOracle).
//!
//! 2. **Stateless calls**: each decision builds its own tree and owns its own
//!    RNG. Nothing is shared between calls, so independent searches can run on
//!    separate threads.
//!
//! 3. **Anytime**: the iteration and wall-clock budgets both bound a search,
//!    and a timed-out search still answers from its partial statistics.
//!
//! ## Architecture
//!
//! - **Individual search**: adversarial UCT over the searching seat's plays,
//!   with determinized heuristic rollouts. Returns the cards to play, or
//!   `None` to pass.
//!
//! - **Team search**: the cooperative variant. Scores the searching team,
//!   allows deliberate passes and ranks actions with a composite of visit
//!   count, win rate and the cooperation evaluator.
//!
//! ## Modules
//!
//! - `core`: cards, classified plays, RNG
//! - `rules`: the rules oracle
//! - `mcts`: individual search, heuristics, rollouts, tree
//! - `team`: team configuration, cooperative evaluation, team search
//! - `strategy`: pluggable play strategies built by name

pub mod core;
pub mod error;
pub mod mcts;
pub mod rules;
pub mod strategy;
pub mod team;

// Re-export commonly used types
pub use crate::core::{Card, CardId, GameRng, Play, PlayKind, Rank, Suit};

pub use crate::error::{Result, SearchError};

pub use crate::rules::{PlayOracle, StandardOracle};

pub use crate::mcts::{
    choose_individual_play, IndividualSearch, SearchConfig, SearchStats, TeamAction, TreeStats,
};

pub use crate::team::{
    choose_team_play, top_team_actions, RankedAction, TeamConfig, TeamSearch, TeamTableView,
    TeamWeights,
};

pub use crate::strategy::{build_strategy, PlayStrategy, SimpleStyle, StrategyKind};
