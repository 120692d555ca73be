//! Candidate action generation.
//!
//! The individual search branches on card plays only. The team search adds a
//! pass: [`TeamAction::Pass`] with `strategic: true` is offered whenever the
//! table can be passed, even when a beating play exists, because cooperative
//! play sometimes prefers leaving the trick to a teammate.

use serde::{Deserialize, Serialize};

use crate::core::{Card, Play};
use crate::rules::PlayOracle;

/// A team-mode decision: play cards, or pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TeamAction {
    Play { cards: Vec<Card> },
    /// `strategic` marks a voluntary pass chosen over beating the table.
    Pass { strategic: bool },
}

impl TeamAction {
    #[must_use]
    pub fn play(cards: Vec<Card>) -> Self {
        TeamAction::Play { cards }
    }

    /// Cards played by this action (empty for a pass).
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        match self {
            TeamAction::Play { cards } => cards,
            TeamAction::Pass { .. } => &[],
        }
    }

    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, TeamAction::Pass { .. })
    }

    #[must_use]
    pub fn is_strategic_pass(&self) -> bool {
        matches!(self, TeamAction::Pass { strategic: true })
    }
}

impl std::fmt::Display for TeamAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamAction::Play { cards } => {
                write!(f, "play")?;
                for card in cards {
                    write!(f, " {card}")?;
                }
                Ok(())
            }
            TeamAction::Pass { strategic: true } => write!(f, "strategic pass"),
            TeamAction::Pass { strategic: false } => write!(f, "pass"),
        }
    }
}

/// Legal plays for `hand`: any opening, or every beat of `last_play`.
pub fn individual_actions<O: PlayOracle + ?Sized>(
    oracle: &O,
    hand: &[Card],
    last_play: Option<&Play>,
) -> Vec<Vec<Card>> {
    oracle.legal_beats(hand, last_play)
}

/// Whether the team action set includes a strategic pass.
#[inline]
#[must_use]
pub fn strategic_pass_allowed(enabled: bool, can_pass: bool, last_play: Option<&Play>) -> bool {
    enabled && can_pass && last_play.is_some()
}

/// Legal plays plus `Pass { strategic: true }` when a pass is allowed.
pub fn team_actions<O: PlayOracle + ?Sized>(
    oracle: &O,
    hand: &[Card],
    last_play: Option<&Play>,
    strategic_pass_enabled: bool,
    can_pass: bool,
) -> Vec<TeamAction> {
    let mut actions: Vec<TeamAction> = individual_actions(oracle, hand, last_play)
        .into_iter()
        .map(TeamAction::play)
        .collect();
    if strategic_pass_allowed(strategic_pass_enabled, can_pass, last_play) {
        actions.push(TeamAction::Pass { strategic: true });
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Rank, Suit};
    use crate::rules::StandardOracle;

    fn hand() -> Vec<Card> {
        vec![
            Card::new(Suit::Hearts, Rank(9), 1),
            Card::new(Suit::Spades, Rank(9), 2),
            Card::new(Suit::Clubs, Rank::ACE, 3),
        ]
    }

    #[test]
    fn test_individual_actions_lead() {
        let actions = individual_actions(&StandardOracle, &hand(), None);
        // 9, 99, A
        assert_eq!(actions.len(), 3);
    }

    #[test]
    fn test_strategic_pass_gating() {
        let oracle = StandardOracle;
        let last = oracle.classify(&[Card::new(Suit::Diamonds, Rank(8), 50)]).unwrap();

        for enabled in [false, true] {
            for can_pass in [false, true] {
                for table in [None, Some(&last)] {
                    let actions = team_actions(&oracle, &hand(), table, enabled, can_pass);
                    let has_pass = actions.iter().any(TeamAction::is_strategic_pass);
                    assert_eq!(has_pass, enabled && can_pass && table.is_some());
                }
            }
        }
    }

    #[test]
    fn test_pass_offered_alongside_beats() {
        let oracle = StandardOracle;
        let last = oracle.classify(&[Card::new(Suit::Diamonds, Rank(8), 50)]).unwrap();
        let actions = team_actions(&oracle, &hand(), Some(&last), true, true);

        assert!(actions.iter().any(|a| !a.is_pass()), "beats remain available");
        assert_eq!(actions.last(), Some(&TeamAction::Pass { strategic: true }));
        assert!(actions.last().unwrap().cards().is_empty());
    }

    #[test]
    fn test_team_action_serde() {
        let action = TeamAction::Pass { strategic: true };
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, r#"{"type":"pass","strategic":true}"#);
    }
}
