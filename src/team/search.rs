//! Team search driver.
//!
//! Same loop as the individual search with three differences: the reward is
//! the searching team's score, selection always maximizes ([`TeamUct`]), and
//! the wall-clock budget is capped at
//! [`TEAM_TIME_CEILING_MS`](crate::mcts::config::TEAM_TIME_CEILING_MS)
//! whatever the iteration budget. Root children are ranked by a composite of
//! visits, win rate, average team score and the evaluator's expectation.
//!
//! Under perfect information every expanded node gets the next mover's
//! actions, so the tree grows past the first decision. Otherwise children are
//! leaves and each rollout redeals the hidden hands.

use std::time::Instant;

use tracing::{debug, trace};

use crate::core::{full_deck, next_free_id, Card, GameRng};
use crate::error::{Result, SearchError};
use crate::mcts::actions::team_actions;
use crate::mcts::config::TEAM_SIMULATION_DEPTH;
use crate::mcts::node::NodeId;
use crate::mcts::policy::{SelectionPolicy, TeamUct};
use crate::mcts::tree::{SearchTree, TreeStats};
use crate::mcts::{SearchConfig, SearchStats, TeamAction};
use crate::rules::{PlayOracle, StandardOracle};

use super::config::{TeamId, TeamWeights};
use super::evaluation::{cooperation_signal, evaluate_team_action, strategic_pass_value};
use super::node::{TeamEvaluation, TeamNode};
use super::simulation::simulate_team;
use super::state::{TeamState, TeamTableView};

pub const VISIT_WEIGHT: f64 = 0.3;
pub const WIN_RATE_WEIGHT: f64 = 100.0;
pub const AVG_SCORE_WEIGHT: f64 = 0.5;
pub const EXPECTED_SCORE_WEIGHT: f64 = 0.2;

/// Upper bound on nodes reserved up front; deeper trees grow on demand.
pub const MAX_PREALLOCATED_NODES: usize = 1024;

/// Default length of the ranked candidate list.
pub const DEFAULT_TOP_N: usize = 5;

/// A root action with its statistics and composite score.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedAction {
    pub action: TeamAction,
    pub visits: u32,
    pub win_rate: f64,
    pub avg_team_score: f64,
    pub expected_team_score: f64,
    pub score: f64,
    /// Short human-readable summary.
    pub rationale: String,
}

impl RankedAction {
    fn from_node(node: &TeamNode) -> Option<Self> {
        let action = node.action.clone()?;
        let win_rate = node.win_rate();
        let avg_team_score = node.avg_team_score();
        let expected_team_score = node.evaluation.expected_team_score;
        let score = composite_score(node.visits, win_rate, avg_team_score, expected_team_score);
        let rationale = match &action {
            TeamAction::Play { cards } => format!(
                "play {} card(s): avg team score {:.1}, win rate {:.1}%",
                cards.len(),
                avg_team_score,
                win_rate * 100.0
            ),
            TeamAction::Pass { strategic: true } => format!(
                "strategic pass to let a teammate lead: expected team gain {expected_team_score:.1}"
            ),
            TeamAction::Pass { strategic: false } => "forced pass".to_string(),
        };
        Some(Self {
            action,
            visits: node.visits,
            win_rate,
            avg_team_score,
            expected_team_score,
            score,
            rationale,
        })
    }
}

/// `visits·0.3 + win_rate·100 + avg_team_score·0.5 + expected_team_score·0.2`.
#[must_use]
pub fn composite_score(visits: u32, win_rate: f64, avg_team_score: f64, expected: f64) -> f64 {
    f64::from(visits) * VISIT_WEIGHT
        + win_rate * WIN_RATE_WEIGHT
        + avg_team_score * AVG_SCORE_WEIGHT
        + expected * EXPECTED_SCORE_WEIGHT
}

/// Team-mode search context.
pub struct TeamSearch<O: PlayOracle> {
    oracle: O,
    config: SearchConfig,
    weights: TeamWeights,
    seat_teams: Vec<TeamId>,
    rng: GameRng,
    stats: SearchStats,
    tree_stats: Option<TreeStats>,
}

impl TeamSearch<StandardOracle> {
    pub fn standard(config: SearchConfig) -> Result<Self> {
        Self::new(StandardOracle, config)
    }
}

impl<O: PlayOracle> TeamSearch<O> {
    /// Create a team search, failing when the team setup is missing or invalid
    /// or when `team_mode` is off.
    pub fn new(oracle: O, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        if !config.team_mode {
            return Err(SearchError::SearchModeMismatch {
                driver: "team",
                team_mode: false,
            });
        }
        let teams = config
            .team_config
            .as_ref()
            .ok_or(SearchError::MissingTeamConfig)?;
        teams.validate(config.player_count)?;
        let seat_teams = teams.seat_teams(config.player_count)?;
        let weights = config.team_weights.ok_or(SearchError::MissingTeamWeights)?;
        let rng = GameRng::from_optional_seed(config.seed);
        Ok(Self {
            oracle,
            config,
            weights,
            seat_teams,
            rng,
            stats: SearchStats::default(),
            tree_stats: None,
        })
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    #[must_use]
    pub fn tree_stats(&self) -> Option<&TreeStats> {
        self.tree_stats.as_ref()
    }

    /// Best team action for `hand` at `view`, or `None` with no action available.
    pub fn search(&mut self, hand: &[Card], view: &TeamTableView) -> Option<TeamAction> {
        self.stats.reset();
        self.tree_stats = None;
        let mut actions = self.root_actions(hand, view);
        if actions.len() <= 1 {
            return actions.pop();
        }

        let tree = self.run(hand, view, actions.clone());
        let best = ranked_children(&tree).into_iter().next();
        match best {
            Some(ranked) => {
                debug!(
                    action = %ranked.action,
                    score = ranked.score,
                    visits = ranked.visits,
                    "team search pick"
                );
                Some(ranked.action)
            }
            None => actions.into_iter().next(),
        }
    }

    /// The `top_n` root actions by composite score, best first.
    pub fn top_actions(
        &mut self,
        hand: &[Card],
        view: &TeamTableView,
        top_n: usize,
    ) -> Vec<RankedAction> {
        self.stats.reset();
        self.tree_stats = None;
        let actions = self.root_actions(hand, view);
        if actions.is_empty() {
            return Vec::new();
        }

        let tree = self.run(hand, view, actions);
        let mut ranked = ranked_children(&tree);
        ranked.truncate(top_n);
        for (i, r) in ranked.iter().enumerate() {
            debug!(rank = i + 1, score = r.score, "{}", r.rationale);
        }
        ranked
    }

    fn root_actions(&self, hand: &[Card], view: &TeamTableView) -> Vec<TeamAction> {
        team_actions(
            &self.oracle,
            hand,
            view.last_play.as_ref(),
            self.config.strategic_pass_enabled,
            view.can_pass,
        )
    }

    fn run(
        &mut self,
        hand: &[Card],
        view: &TeamTableView,
        actions: Vec<TeamAction>,
    ) -> SearchTree<TeamNode> {
        let start = Instant::now();
        let budget = self.config.team_time_budget();
        let iterations = self.config.iterations;
        let max_depth = self.config.simulation_depth.max(TEAM_SIMULATION_DEPTH);

        let known = view.known_cards(hand);
        let deck = full_deck(self.config.player_count, next_free_id([&known[..]]));
        let root_state = TeamState::from_view(
            hand,
            view,
            &self.config,
            self.seat_teams.clone(),
            &deck,
            &mut self.rng,
        );
        debug!(
            hand = hand.len(),
            actions = actions.len(),
            iterations,
            budget_ms = budget.as_millis() as u64,
            "team search start"
        );

        let capacity = if self.config.perfect_information {
            (iterations as usize).min(MAX_PREALLOCATED_NODES)
        } else {
            actions.len()
        };
        let root = TeamNode::root(root_state, actions);
        let mut tree = SearchTree::with_capacity(root, capacity + 1);
        for _ in 0..iterations {
            if start.elapsed() >= budget {
                self.stats.timed_out = true;
                debug!(completed = self.stats.iterations, "team search timed out");
                break;
            }
            self.iteration(&mut tree, &known, &deck, max_depth);
            self.stats.iterations += 1;
        }

        self.stats.time_us = start.elapsed().as_micros() as u64;
        self.tree_stats = Some(tree.stats());
        tree
    }

    fn iteration(
        &mut self,
        tree: &mut SearchTree<TeamNode>,
        known: &[Card],
        deck: &[Card],
        max_depth: u32,
    ) {
        let mut current = tree.root();

        // Selection
        loop {
            let node = tree.get(current);
            if !node.untried.is_empty() || node.children.is_empty() {
                break;
            }
            match TeamUct.select(tree, current, self.config.exploration_constant) {
                Some(next) => current = next,
                None => break,
            }
        }

        // Expansion
        if !tree.get(current).untried.is_empty() {
            match self.expand(tree, current) {
                Some(child) => {
                    self.stats.nodes_expanded += 1;
                    current = child;
                }
                None => {
                    self.stats.expansions_rejected += 1;
                    trace!(node = %current, "team expansion rejected");
                    return;
                }
            }
        }

        // Simulation
        let mut rollout_rng = self.rng.fork();
        let mut state = tree.get(current).state.clone();
        if !self.config.perfect_information {
            state.resample_hidden(known, deck, &mut rollout_rng);
        }
        self.stats.simulations += 1;
        let outcome = simulate_team(
            &self.oracle,
            &mut state,
            max_depth,
            &self.weights,
            self.config.strategic_pass_enabled,
            &mut rollout_rng,
        );

        // Backpropagation
        let ai_team = state.ai_team();
        let score = f64::from(outcome.final_team_scores[ai_team.index()]);
        let won = outcome.winning_team == Some(ai_team);
        tree.update_path(current, |node| {
            node.visits += 1;
            node.team_score_sum += score;
            if won {
                node.team_wins += 1;
            }
        });
    }

    /// Expand one untried action of `id`, chosen uniformly at random.
    fn expand(&mut self, tree: &mut SearchTree<TeamNode>, id: NodeId) -> Option<NodeId> {
        let node = tree.get_mut(id);
        let idx = self.rng.gen_range_usize(0..node.untried.len());
        let action = node.untried.remove(idx);

        let node = tree.get(id);
        let mover = node.state.current_player();
        let hand = node.state.table.hand(mover);
        let mut state = node.state.clone();
        if !state.apply(&self.oracle, &action) {
            return None;
        }

        let parent = &node.state;
        let evaluation = TeamEvaluation {
            expected_team_score: evaluate_team_action(
                &self.oracle,
                &action,
                parent,
                hand,
                &self.weights,
            ),
            strategic_pass_value: if action.is_strategic_pass() {
                strategic_pass_value(&self.oracle, parent, hand, &self.weights)
            } else {
                0.0
            },
            team_cooperation_score: cooperation_signal(&action, parent, hand, &self.weights),
        };

        let untried = if self.config.perfect_information && !state.table.terminal {
            let next = state.current_player();
            team_actions(
                &self.oracle,
                state.table.hand(next),
                state.table.last_play.as_ref(),
                self.config.strategic_pass_enabled,
                state.can_pass,
            )
        } else {
            Vec::new()
        };

        let child = TeamNode::child(id, node.depth, state, action, untried, evaluation);
        Some(tree.add_child(id, child))
    }
}

/// Root children ranked by composite score; earlier children win ties.
fn ranked_children(tree: &SearchTree<TeamNode>) -> Vec<RankedAction> {
    let mut ranked: Vec<RankedAction> = tree
        .children(tree.root())
        .filter_map(|(_, node)| RankedAction::from_node(node))
        .collect();
    // Stable sort keeps creation order among equal scores.
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}

/// Choose a team action with the standard rules.
///
/// `Ok(None)` means no action is available.
pub fn choose_team_play(
    hand: &[Card],
    view: &TeamTableView,
    config: &SearchConfig,
) -> Result<Option<TeamAction>> {
    choose_team_play_with(StandardOracle, hand, view, config)
}

/// [`choose_team_play`] against a caller-supplied oracle.
pub fn choose_team_play_with<O: PlayOracle>(
    oracle: O,
    hand: &[Card],
    view: &TeamTableView,
    config: &SearchConfig,
) -> Result<Option<TeamAction>> {
    let mut search = TeamSearch::new(oracle, config.clone())?;
    Ok(search.search(hand, view))
}

/// The `top_n` candidate team actions with their rationale, best first.
pub fn top_team_actions(
    hand: &[Card],
    view: &TeamTableView,
    config: &SearchConfig,
    top_n: usize,
) -> Result<Vec<RankedAction>> {
    let mut search = TeamSearch::standard(config.clone())?;
    Ok(search.top_actions(hand, view, top_n))
}
