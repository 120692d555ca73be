//! Cooperative team variant.
//!
//! Seats are split into two fixed teams ([`TeamConfig`]). The searching seat
//! optimizes its team's score rather than its own finish, may pass on purpose
//! to leave a trick to a teammate, and ranks its options with the weighted
//! cooperation evaluator in [`evaluation`].

pub mod config;
pub mod evaluation;
pub mod node;
pub mod search;
pub mod simulation;
pub mod state;

pub use config::{Team, TeamConfig, TeamId, TeamWeights};
pub use evaluation::{evaluate_team_action, normalize_team_score};
pub use node::{TeamEvaluation, TeamNode};
pub use search::{
    choose_team_play, choose_team_play_with, composite_score, top_team_actions, RankedAction,
    TeamSearch, DEFAULT_TOP_N,
};
pub use simulation::{simulate_team, TeamOutcome};
pub use state::{TeamState, TeamTableView};
