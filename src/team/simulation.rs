//! Team rollouts.
//!
//! The policy is asymmetric: seats on the searching team pick cooperatively
//! (near-best under the team evaluator), opponents greedily answer with the
//! smallest beat they hold.

use crate::core::{Card, GameRng};
use crate::mcts::actions::team_actions;
use crate::mcts::simulation::choose_near_best;
use crate::mcts::TeamAction;
use crate::rules::PlayOracle;

use super::config::{TeamId, TeamWeights};
use super::evaluation::evaluate_team_action;
use super::state::TeamState;

/// Score margin below the best candidate still eligible for cooperative seats.
pub const TEAM_ROLLOUT_MARGIN: f64 = 10.0;

/// How a team rollout ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TeamOutcome {
    pub winning_team: Option<TeamId>,
    /// Final banked scores, indexed by team id.
    pub final_team_scores: [i32; 2],
    pub steps: u32,
}

/// Play `state` forward for at most `max_depth` actions.
pub fn simulate_team<O: PlayOracle + ?Sized>(
    oracle: &O,
    state: &mut TeamState,
    max_depth: u32,
    weights: &TeamWeights,
    strategic_pass_enabled: bool,
    rng: &mut GameRng,
) -> TeamOutcome {
    let ai_team = state.ai_team();
    let mut steps = 0;

    while steps < max_depth && !state.table.terminal {
        let seat = state.current_player();
        if state.table.hand(seat).is_empty() {
            state.table.finish(seat);
            break;
        }
        steps += 1;

        let action = if state.team_of(seat) == ai_team {
            cooperative_action(oracle, state, weights, strategic_pass_enabled, rng)
        } else {
            greedy_action(oracle, state)
        };

        let applied = action.is_some_and(|action| state.apply(oracle, &action));
        if !applied {
            state.table.apply_pass();
            state.can_pass = state.table.last_play.is_some();
        }
    }

    TeamOutcome {
        winning_team: state.winning_team(),
        final_team_scores: state.team_scores(),
        steps,
    }
}

fn cooperative_action<O: PlayOracle + ?Sized>(
    oracle: &O,
    state: &TeamState,
    weights: &TeamWeights,
    strategic_pass_enabled: bool,
    rng: &mut GameRng,
) -> Option<TeamAction> {
    let hand = state.table.hand(state.current_player());
    let actions = team_actions(
        oracle,
        hand,
        state.table.last_play.as_ref(),
        strategic_pass_enabled,
        state.can_pass,
    );
    if actions.len() <= 1 {
        return actions.into_iter().next();
    }
    let scores: Vec<f64> = actions
        .iter()
        .map(|action| evaluate_team_action(oracle, action, state, hand, weights))
        .collect();
    choose_near_best(actions, &scores, TEAM_ROLLOUT_MARGIN, rng)
}

/// Smallest beat: fewest cards, then lowest rank. `None` means pass.
fn greedy_action<O: PlayOracle + ?Sized>(oracle: &O, state: &TeamState) -> Option<TeamAction> {
    let hand = state.table.hand(state.current_player());
    oracle
        .legal_beats(hand, state.table.last_play.as_ref())
        .into_iter()
        .min_by_key(|cards| (cards.len(), cards.first().map(|c: &Card| c.rank)))
        .map(TeamAction::play)
}
