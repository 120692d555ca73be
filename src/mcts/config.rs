//! Search configuration parameters.
//!
//! `SearchConfig` deserializes from the flat camelCase option map hosts
//! already pass around (`{"iterations": 80, "teamMode": true, ...}`). Team
//! weights sit flat in the same map; they are only recognised when every
//! weight is present.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::Card;
use crate::error::{Result, SearchError};
use crate::team::{TeamConfig, TeamWeights};

pub const DEFAULT_ITERATIONS: u32 = 50;
pub const DEFAULT_EXPLORATION: f64 = 1.414;
pub const DEFAULT_SIMULATION_DEPTH: u32 = 20;
pub const DEFAULT_TIME_BUDGET_MS: u64 = 2000;

/// Hard wall-clock ceiling for a team search, whatever the configured budget.
pub const TEAM_TIME_CEILING_MS: u64 = 3000;

/// Rollout depth never exceeds this, however large the hand.
pub const MAX_SIMULATION_DEPTH: u32 = 50;

/// Minimum rollout depth for the team variant.
pub const TEAM_SIMULATION_DEPTH: u32 = 50;

/// Search configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    /// Iteration budget (default: 50).
    pub iterations: u32,

    /// UCT exploration constant (default: 1.414).
    pub exploration_constant: f64,

    /// Base rollout depth in plays (default: 20).
    /// Scaled up for large hands, capped at [`MAX_SIMULATION_DEPTH`].
    pub simulation_depth: u32,

    /// Wall-clock budget in milliseconds (default: 2000).
    pub time_budget_ms: u64,

    /// Search with every hand visible instead of sampling hidden hands.
    pub perfect_information: bool,

    /// Every seat's hand, indexed by seat. Required with `perfect_information`.
    pub all_player_hands: Option<Vec<Vec<Card>>>,

    /// Points already on the table in the current trick.
    pub current_round_score: i32,

    /// Seats at the table (default: 2).
    pub player_count: usize,

    /// Public card counts per seat. Without them, sampled opponents hold as
    /// many cards as the searching seat.
    pub hand_counts: Option<Vec<usize>>,

    /// Run the cooperative team search.
    pub team_mode: bool,

    /// Seat partition. Required with `team_mode`.
    pub team_config: Option<TeamConfig>,

    /// Allow voluntary passes while holding a beating play.
    pub strategic_pass_enabled: bool,

    /// Team evaluator weights. Required with `team_mode`.
    #[serde(flatten)]
    pub team_weights: Option<TeamWeights>,

    /// RNG seed. `None` seeds from OS entropy so repeated searches sample
    /// independent hidden-hand worlds.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            exploration_constant: DEFAULT_EXPLORATION,
            simulation_depth: DEFAULT_SIMULATION_DEPTH,
            time_budget_ms: DEFAULT_TIME_BUDGET_MS,
            perfect_information: false,
            all_player_hands: None,
            current_round_score: 0,
            player_count: 2,
            hand_counts: None,
            team_mode: false,
            team_config: None,
            strategic_pass_enabled: false,
            team_weights: None,
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    pub fn with_simulation_depth(mut self, depth: u32) -> Self {
        self.simulation_depth = depth;
        self
    }

    pub fn with_time_budget_ms(mut self, ms: u64) -> Self {
        self.time_budget_ms = ms;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_player_count(mut self, player_count: usize) -> Self {
        self.player_count = player_count;
        self
    }

    pub fn with_round_score(mut self, score: i32) -> Self {
        self.current_round_score = score;
        self
    }

    pub fn with_hand_counts(mut self, counts: Vec<usize>) -> Self {
        self.hand_counts = Some(counts);
        self
    }

    /// Enable perfect information with the given per-seat hands.
    pub fn with_perfect_information(mut self, hands: Vec<Vec<Card>>) -> Self {
        self.perfect_information = true;
        self.all_player_hands = Some(hands);
        self
    }

    /// Enable team mode with the given partition and weights.
    pub fn with_team(mut self, team_config: TeamConfig, weights: TeamWeights) -> Self {
        self.team_mode = true;
        self.team_config = Some(team_config);
        self.team_weights = Some(weights);
        self
    }

    pub fn with_strategic_pass(mut self, enabled: bool) -> Self {
        self.strategic_pass_enabled = enabled;
        self
    }

    /// Reject configurations the search must never guess its way around.
    pub fn validate(&self) -> Result<()> {
        if self.player_count < 2 {
            return Err(SearchError::InvalidPlayerCount(self.player_count));
        }
        if self.perfect_information {
            let hands = self
                .all_player_hands
                .as_ref()
                .ok_or(SearchError::MissingPlayerHands)?;
            check_seat_count(self.player_count, hands.len())?;
        }
        if let Some(counts) = &self.hand_counts {
            check_seat_count(self.player_count, counts.len())?;
        }
        if self.team_mode {
            let teams = self
                .team_config
                .as_ref()
                .ok_or(SearchError::MissingTeamConfig)?;
            teams.validate(self.player_count)?;
            if self.team_weights.is_none() {
                return Err(SearchError::MissingTeamWeights);
            }
        }
        Ok(())
    }

    /// Iteration budget after large-hand throttling.
    #[must_use]
    pub fn effective_iterations(&self, hand_len: usize) -> u32 {
        let n = self.iterations;
        if hand_len > 30 {
            ((f64::from(n) * 0.6) as u32).max(30)
        } else if hand_len > 20 {
            ((f64::from(n) * 0.8) as u32).max(40)
        } else {
            n
        }
    }

    /// Rollout depth, grown with the hand but never past [`MAX_SIMULATION_DEPTH`].
    #[must_use]
    pub fn effective_depth(&self, hand_len: usize) -> u32 {
        let scaled = (hand_len as u32).saturating_mul(2).min(MAX_SIMULATION_DEPTH);
        self.simulation_depth.max(scaled)
    }

    #[must_use]
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }

    /// Wall-clock budget for a team search, capped at [`TEAM_TIME_CEILING_MS`].
    #[must_use]
    pub fn team_time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms.min(TEAM_TIME_CEILING_MS))
    }

    /// Rollout opponent size for `seat`: public count when known, else `fallback`.
    #[must_use]
    pub fn hand_count(&self, seat: usize, fallback: usize) -> usize {
        self.hand_counts
            .as_ref()
            .and_then(|counts| counts.get(seat).copied())
            .unwrap_or(fallback)
    }
}

fn check_seat_count(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(SearchError::PlayerCountMismatch { expected, actual })
    }
}
