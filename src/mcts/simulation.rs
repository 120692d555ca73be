//! Heuristic rollouts for the individual search.
//!
//! Every seat plays from the same evaluator: candidates are scored, those
//! within [`ROLLOUT_MARGIN`] of the best are kept, and one is picked uniformly.
//! That keeps rollouts sensible without making them deterministic.

use crate::core::{Card, GameRng};
use crate::rules::PlayOracle;

use super::heuristic::{evaluate_action, EvalContext, SeatRole};
use super::state::{SimState, AI_SEAT};

/// Score margin below the best candidate still eligible in individual rollouts.
pub const ROLLOUT_MARGIN: f64 = 5.0;

/// How a rollout ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RolloutOutcome {
    /// Seat credited with the win.
    pub winner: usize,
    /// A hand emptied (false when the depth limit decided by fewest cards).
    pub natural: bool,
    /// Actions taken, passes included.
    pub steps: u32,
}

/// Pick uniformly among the items scoring within `margin` of the best.
///
/// Returns `None` only for empty input.
pub fn choose_near_best<T>(
    mut items: Vec<T>,
    scores: &[f64],
    margin: f64,
    rng: &mut GameRng,
) -> Option<T> {
    let best = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let keep: Vec<usize> = scores
        .iter()
        .enumerate()
        .filter(|(_, &s)| s >= best - margin)
        .map(|(i, _)| i)
        .collect();
    let &pick = rng.choose(&keep)?;
    Some(items.swap_remove(pick))
}

/// Play `state` forward for at most `max_depth` actions.
///
/// With `perfect_information`, the searching seat's evaluator also sees the
/// other hands.
pub fn simulate<O: PlayOracle + ?Sized>(
    oracle: &O,
    state: &mut SimState,
    max_depth: u32,
    perfect_information: bool,
    rng: &mut GameRng,
) -> RolloutOutcome {
    let mut steps = 0;

    while steps < max_depth && !state.terminal {
        let seat = state.current_player;
        if state.hand(seat).is_empty() {
            state.finish(seat);
            break;
        }
        steps += 1;

        let candidates = oracle.legal_beats(state.hand(seat), state.last_play.as_ref());
        if candidates.is_empty() {
            state.apply_pass();
            continue;
        }

        let choice = if candidates.len() == 1 {
            candidates.into_iter().next()
        } else {
            let scores = score_candidates(oracle, state, seat, &candidates, perfect_information);
            choose_near_best(candidates, &scores, ROLLOUT_MARGIN, rng)
        };

        match choice.and_then(|cards| oracle.playable(&cards, state.last_play.as_ref())) {
            Some(play) => state.apply_play(play),
            None => state.apply_pass(),
        }
    }

    match state.winner {
        Some(winner) => RolloutOutcome { winner, natural: true, steps },
        None => RolloutOutcome {
            winner: state.fewest_cards_seat(),
            natural: false,
            steps,
        },
    }
}

fn score_candidates<O: PlayOracle + ?Sized>(
    oracle: &O,
    state: &SimState,
    seat: usize,
    candidates: &[Vec<Card>],
    perfect_information: bool,
) -> Vec<f64> {
    let role = if seat == AI_SEAT {
        SeatRole::Searcher
    } else {
        SeatRole::Opponent
    };
    let visible: Vec<Vec<Card>> = if perfect_information && role == SeatRole::Searcher {
        state
            .hands
            .iter()
            .enumerate()
            .filter(|&(s, _)| s != seat)
            .map(|(_, hand)| hand.clone())
            .collect()
    } else {
        Vec::new()
    };
    let ctx = EvalContext::new(state.last_play.as_ref(), state.round_score, role)
        .with_visible_opponents(&visible);

    candidates
        .iter()
        .map(|cards| f64::from(evaluate_action(oracle, cards, state.hand(seat), &ctx)))
        .collect()
}
