//! Team cooperation evaluator.
//!
//! Scores a [`TeamAction`] for the seat to move in a [`TeamState`]. The score
//! is a weighted sum of five terms, each a pure function of the action, the
//! state and the mover's hand:
//!
//! | Term | Weight |
//! |---|---|
//! | [`team_score_benefit`] | `team_score_weight` |
//! | [`strategic_pass_value`] (strategic passes only) | `strategic_pass_weight` |
//! | [`personal_score`] (plays only) | [`PERSONAL_SCORE_WEIGHT`] |
//! | [`cooperation_signal`] | `cooperation_weight` |
//! | [`long_term_value`] | `long_term_strategy_weight` |
//!
//! The weights come from [`TeamWeights`]; nothing here substitutes a default.

use crate::core::Card;
use crate::mcts::heuristic::INSURANCE_RANK;
use crate::mcts::TeamAction;
use crate::rules::PlayOracle;

use super::config::TeamWeights;
use super::state::TeamState;

/// Assumed ceiling of a team's score, used to normalize UCT rewards.
pub const TEAM_SCORE_CEILING: f64 = 200.0;

/// Ceiling used to normalize the cooperation signal into `[0, 1]`.
pub const COOPERATION_CEILING: f64 = 100.0;

/// Down-weighting of points the mover personally plays.
pub const PERSONAL_SCORE_WEIGHT: f64 = 0.3;

/// Share of the pot a pass is assumed to leave for the team.
pub const PASS_POT_SHARE: f64 = 0.5;

pub const TEAMMATE_CAN_BEAT_BONUS: f64 = 50.0;
pub const RICH_POT_BONUS: f64 = 20.0;
pub const POOR_POT_PENALTY: f64 = -10.0;
pub const RICH_POT_THRESHOLD: i32 = 15;
pub const SHORTER_TEAMMATE_BONUS: f64 = 25.0;
pub const OPPONENT_CAPTURE_PENALTY: f64 = -40.0;
pub const OPPONENT_CAPTURE_THRESHOLD: i32 = 5;

/// Teammates holding at most this many cards count as close to finishing.
pub const TEAMMATE_NEEDS_HELP_CARDS: usize = 5;
pub const HIGH_PLAY_VALUE: u8 = 12;
pub const PROTECT_TEAMMATE_BONUS: f64 = 20.0;
pub const HAND_BACK_LEAD_BONUS: f64 = 15.0;

pub const KEY_CARDS_KEPT_BONUS: f64 = 25.0;
pub const FUTURE_IMPACT_RICH: f64 = 20.0;
pub const FUTURE_IMPACT_POOR: f64 = 10.0;
pub const FUTURE_IMPACT_THRESHOLD: i32 = 10;
pub const FUTURE_IMPACT_WEIGHT: f64 = 0.5;
pub const TEAM_ADVANTAGE_WEIGHT: f64 = 1.5;

/// Map an average team score into `[0, 1]`.
#[inline]
#[must_use]
pub fn normalize_team_score(score: f64) -> f64 {
    (score / TEAM_SCORE_CEILING).clamp(0.0, 1.0)
}

/// Map a cooperation signal into `[0, 1]`.
#[inline]
#[must_use]
pub fn normalize_cooperation(score: f64) -> f64 {
    (score / COOPERATION_CEILING).clamp(0.0, 1.0)
}

/// Weighted team value of `action` for the seat to move, holding `hand`.
pub fn evaluate_team_action<O: PlayOracle + ?Sized>(
    oracle: &O,
    action: &TeamAction,
    state: &TeamState,
    hand: &[Card],
    weights: &TeamWeights,
) -> f64 {
    let mut score = team_score_benefit(oracle, action, state) * weights.team_score_weight;

    if action.is_strategic_pass() {
        score += strategic_pass_value(oracle, state, hand, weights) * weights.strategic_pass_weight;
    }
    if !action.is_pass() {
        score += personal_score(oracle, action) * PERSONAL_SCORE_WEIGHT;
    }
    score += cooperation_signal(action, state, hand, weights) * weights.cooperation_weight;
    score += long_term_value(action, state, hand) * weights.long_term_strategy_weight;
    score
}

/// Pot credited to the team: half of it for a pass, all of it plus the
/// played points for a play.
pub fn team_score_benefit<O: PlayOracle + ?Sized>(
    oracle: &O,
    action: &TeamAction,
    state: &TeamState,
) -> f64 {
    let pot = f64::from(state.table.round_score);
    match action {
        TeamAction::Pass { .. } => pot * PASS_POT_SHARE,
        TeamAction::Play { cards } => f64::from(oracle.cards_score(cards)) + pot,
    }
}

/// Value of passing voluntarily instead of beating the table.
pub fn strategic_pass_value<O: PlayOracle + ?Sized>(
    oracle: &O,
    state: &TeamState,
    hand: &[Card],
    weights: &TeamWeights,
) -> f64 {
    let seat = state.current_player();
    let mut value = 0.0;

    if teammate_can_beat(oracle, state, seat) {
        value += TEAMMATE_CAN_BEAT_BONUS;
    }
    if hand.iter().any(|c| c.rank >= INSURANCE_RANK) {
        value += weights.big_card_preservation_bonus;
    }
    value += if state.table.round_score > RICH_POT_THRESHOLD {
        RICH_POT_BONUS
    } else {
        POOR_POT_PENALTY
    };
    if shorter_teammate(state, seat, hand.len()) {
        value += SHORTER_TEAMMATE_BONUS;
    }
    let opponent_captures =
        state.last_player_is_opponent(seat) && state.table.round_score > OPPONENT_CAPTURE_THRESHOLD;
    if opponent_captures {
        value += OPPONENT_CAPTURE_PENALTY;
    }
    value
}

/// Points the mover plays personally, before down-weighting.
pub fn personal_score<O: PlayOracle + ?Sized>(oracle: &O, action: &TeamAction) -> f64 {
    f64::from(oracle.cards_score(action.cards()))
}

/// Rescuing a nearly-finished teammate, beating an opponent's high play, or
/// handing the lead to a shorter teammate.
pub fn cooperation_signal(
    action: &TeamAction,
    state: &TeamState,
    hand: &[Card],
    weights: &TeamWeights,
) -> f64 {
    let seat = state.current_player();
    let mut signal = 0.0;

    match action {
        TeamAction::Pass { strategic: true } => {
            let needs_help = state.teammates(seat).any(|s| {
                let n = state.table.hand(s).len();
                n > 0 && n <= TEAMMATE_NEEDS_HELP_CARDS
            });
            if needs_help {
                signal += weights.teammate_support_bonus;
            }
            if shorter_teammate(state, seat, hand.len()) {
                signal += HAND_BACK_LEAD_BONUS;
            }
        }
        TeamAction::Play { .. } => {
            let high_opponent_play = state.last_player_is_opponent(seat)
                && state
                    .table
                    .last_play
                    .as_ref()
                    .is_some_and(|p| p.value() >= HIGH_PLAY_VALUE);
            if high_opponent_play {
                signal += PROTECT_TEAMMATE_BONUS;
            }
        }
        TeamAction::Pass { strategic: false } => {}
    }
    signal
}

/// Keeping key cards through a pass, the pot's future weight, and the
/// team's current lead.
pub fn long_term_value(action: &TeamAction, state: &TeamState, hand: &[Card]) -> f64 {
    let seat = state.current_player();
    let mut value = 0.0;

    if action.is_strategic_pass() {
        if hand.iter().any(|c| c.rank >= INSURANCE_RANK) {
            value += KEY_CARDS_KEPT_BONUS;
        }
        let impact = if state.table.round_score > FUTURE_IMPACT_THRESHOLD {
            FUTURE_IMPACT_RICH
        } else {
            FUTURE_IMPACT_POOR
        };
        value += impact * FUTURE_IMPACT_WEIGHT;
    }

    let mine = state.team_of(seat);
    let scores = state.team_scores();
    let lead = scores[mine.index()] - scores[1 - mine.index()];
    value + f64::from(lead) * TEAM_ADVANTAGE_WEIGHT
}

fn teammate_can_beat<O: PlayOracle + ?Sized>(oracle: &O, state: &TeamState, seat: usize) -> bool {
    let last = state.table.last_play.as_ref();
    state.teammates(seat).any(|s| {
        let hand = state.table.hand(s);
        !hand.is_empty() && !oracle.legal_beats(hand, last).is_empty()
    })
}

fn shorter_teammate(state: &TeamState, seat: usize, hand_len: usize) -> bool {
    state.teammates(seat).any(|s| {
        let n = state.table.hand(s).len();
        n > 0 && n < hand_len
    })
}
