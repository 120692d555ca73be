//! Static seat-to-team partition and the team reward weights.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};

/// Team identifier. Valid ids are `0` and `1`, which also index team score tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u8);

impl TeamId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Team {}", self.0)
    }
}

/// One team and the seats it owns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub seats: Vec<usize>,
}

/// Partition of every seat into exactly two teams. Read-only during search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamConfig {
    pub teams: Vec<Team>,
}

impl TeamConfig {
    #[must_use]
    pub fn new(teams: Vec<Team>) -> Self {
        Self { teams }
    }

    /// Alternating seats: even seats form team 0, odd seats team 1.
    ///
    /// Only 4 (2v2) and 6 (3v3) seat tables are supported.
    pub fn alternating(player_count: usize) -> Result<Self> {
        if player_count != 4 && player_count != 6 {
            return Err(SearchError::InvalidPlayerCount(player_count));
        }
        let teams = (0..2u8)
            .map(|t| Team {
                id: TeamId(t),
                seats: (0..player_count).filter(|s| s % 2 == t as usize).collect(),
            })
            .collect();
        Ok(Self { teams })
    }

    /// Check the config partitions seats `0..player_count` into teams 0 and 1.
    pub fn validate(&self, player_count: usize) -> Result<()> {
        if self.teams.len() != 2 {
            return Err(SearchError::InvalidTeamConfig(format!(
                "expected 2 teams, got {}",
                self.teams.len()
            )));
        }
        let mut ids: Vec<_> = self.teams.iter().map(|t| t.id.0).collect();
        ids.sort_unstable();
        if ids != [0, 1] {
            return Err(SearchError::InvalidTeamConfig(format!(
                "team ids must be 0 and 1, got {ids:?}"
            )));
        }

        let mut owner = vec![None; player_count];
        for team in &self.teams {
            if team.seats.is_empty() {
                return Err(SearchError::InvalidTeamConfig(format!("{} has no seats", team.id)));
            }
            for &seat in &team.seats {
                let slot = owner.get_mut(seat).ok_or_else(|| {
                    SearchError::InvalidTeamConfig(format!("seat {seat} out of range"))
                })?;
                if slot.replace(team.id).is_some() {
                    return Err(SearchError::InvalidTeamConfig(format!(
                        "seat {seat} assigned twice"
                    )));
                }
            }
        }
        if let Some(seat) = owner.iter().position(Option::is_none) {
            return Err(SearchError::InvalidTeamConfig(format!("seat {seat} has no team")));
        }
        Ok(())
    }

    #[must_use]
    pub fn team_of(&self, seat: usize) -> Option<TeamId> {
        self.teams
            .iter()
            .find(|t| t.seats.contains(&seat))
            .map(|t| t.id)
    }

    /// Seats on `seat`'s team, excluding `seat` itself.
    #[must_use]
    pub fn teammates(&self, seat: usize) -> Vec<usize> {
        self.teams
            .iter()
            .find(|t| t.seats.contains(&seat))
            .map(|t| t.seats.iter().copied().filter(|&s| s != seat).collect())
            .unwrap_or_default()
    }

    /// Seats on every other team.
    #[must_use]
    pub fn opponents(&self, seat: usize) -> Vec<usize> {
        let Some(mine) = self.team_of(seat) else {
            return Vec::new();
        };
        let mut seats: Vec<usize> = self
            .teams
            .iter()
            .filter(|t| t.id != mine)
            .flat_map(|t| t.seats.iter().copied())
            .collect();
        seats.sort_unstable();
        seats
    }

    #[must_use]
    pub fn are_teammates(&self, a: usize, b: usize) -> bool {
        matches!((self.team_of(a), self.team_of(b)), (Some(x), Some(y)) if x == y)
    }

    /// Per-seat team lookup table. Requires a validated config.
    pub fn seat_teams(&self, player_count: usize) -> Result<Vec<TeamId>> {
        (0..player_count)
            .map(|seat| {
                self.team_of(seat).ok_or_else(|| {
                    SearchError::InvalidTeamConfig(format!("seat {seat} has no team"))
                })
            })
            .collect()
    }
}

/// Multipliers and bonuses for the team cooperation evaluator.
///
/// There is deliberately no `Default`: every weight must come from the caller.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamWeights {
    /// Multiplier on the trick pot credited to the team.
    pub team_score_weight: f64,
    /// Multiplier on the cooperation signal.
    pub cooperation_weight: f64,
    /// Multiplier on the strategic pass value.
    pub strategic_pass_weight: f64,
    /// Bonus for passing while holding a high "insurance" card.
    pub big_card_preservation_bonus: f64,
    /// Bonus for passing so a nearly-finished teammate can take the lead.
    pub teammate_support_bonus: f64,
    /// Multiplier on the long-term strategy term.
    pub long_term_strategy_weight: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternating_two_vs_two() {
        let config = TeamConfig::alternating(4).unwrap();
        assert_eq!(config.team_of(0), Some(TeamId(0)));
        assert_eq!(config.team_of(3), Some(TeamId(1)));
        assert_eq!(config.teammates(0), vec![2]);
        assert_eq!(config.opponents(0), vec![1, 3]);
        assert!(config.are_teammates(1, 3));
        assert!(!config.are_teammates(0, 1));
        assert!(config.validate(4).is_ok());
    }

    #[test]
    fn test_alternating_rejects_odd_tables() {
        assert_eq!(
            TeamConfig::alternating(5),
            Err(SearchError::InvalidPlayerCount(5))
        );
    }

    #[test]
    fn test_validate_rejects_bad_partitions() {
        let duplicate = TeamConfig::new(vec![
            Team { id: TeamId(0), seats: vec![0, 1] },
            Team { id: TeamId(1), seats: vec![1, 2, 3] },
        ]);
        assert!(matches!(duplicate.validate(4), Err(SearchError::InvalidTeamConfig(_))));

        let missing = TeamConfig::new(vec![
            Team { id: TeamId(0), seats: vec![0] },
            Team { id: TeamId(1), seats: vec![1, 2] },
        ]);
        assert!(missing.validate(4).is_err());

        let out_of_range = TeamConfig::new(vec![
            Team { id: TeamId(0), seats: vec![0, 7] },
            Team { id: TeamId(1), seats: vec![1] },
        ]);
        assert!(out_of_range.validate(2).is_err());
    }

    #[test]
    fn test_seat_teams() {
        let config = TeamConfig::alternating(6).unwrap();
        let table = config.seat_teams(6).unwrap();
        assert_eq!(table[4], TeamId(0));
        assert_eq!(table[5], TeamId(1));
    }

    #[test]
    fn test_weights_require_every_field() {
        let partial = r#"{"teamScoreWeight": 1.0, "cooperationWeight": 0.5}"#;
        assert!(serde_json::from_str::<TeamWeights>(partial).is_err());
    }
}
