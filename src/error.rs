//! Error types for search configuration.
//!
//! Only misconfiguration aborts a call. Anomalies inside a single iteration
//! (a rejected expansion, an empty rollout) are absorbed by the search and
//! show up in [`SearchStats`](crate::mcts::SearchStats) instead.

use thiserror::Error;

/// Errors surfaced by the public search entry points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("team mode is enabled but no team configuration was supplied")]
    MissingTeamConfig,

    #[error("team mode is enabled but team weights were not supplied")]
    MissingTeamWeights,

    #[error("perfect information is enabled but allPlayerHands was not supplied")]
    MissingPlayerHands,

    #[error("expected {expected} seats, got {actual}")]
    PlayerCountMismatch { expected: usize, actual: usize },

    #[error("unsupported player count: {0}")]
    InvalidPlayerCount(usize),

    #[error("invalid team configuration: {0}")]
    InvalidTeamConfig(String),

    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("{driver} search cannot run with teamMode={team_mode}")]
    SearchModeMismatch { driver: &'static str, team_mode: bool },
}

/// Result alias for fallible search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SearchError::PlayerCountMismatch { expected: 4, actual: 3 };
        assert_eq!(err.to_string(), "expected 4 seats, got 3");
        assert!(SearchError::MissingTeamConfig.to_string().contains("team"));

        let err = SearchError::SearchModeMismatch { driver: "individual", team_mode: true };
        assert_eq!(err.to_string(), "individual search cannot run with teamMode=true");
    }
}
