//! Individual search driver.
//!
//! Each call builds a fresh tree rooted at the searching seat's hand, runs
//! Select → Expand → Simulate → Backpropagate until the iteration budget or
//! the wall-clock budget runs out, and returns the most-visited root action.
//! Hidden hands are resampled for every rollout; the tree is dropped when the
//! call returns.

use std::time::Instant;

use tracing::{debug, trace};

use crate::core::{contains_all, full_deck, next_free_id, remove_cards, Card, GameRng, Play};
use crate::error::{Result, SearchError};
use crate::rules::{PlayOracle, StandardOracle};

use super::actions::individual_actions;
use super::config::SearchConfig;
use super::estimator::estimate_hands;
use super::heuristic::{select_by_heuristic, EvalContext, SeatRole};
use super::node::{Mover, NodeId, SearchNode};
use super::policy::{SelectionPolicy, Uct};
use super::simulation::simulate;
use super::state::{SimState, AI_SEAT};
use super::stats::SearchStats;
use super::tree::{SearchTree, TreeStats};

/// Individual-mode search context.
///
/// Generic over the play oracle. Owns the configuration and RNG; the tree
/// only lives for the duration of [`search`](Self::search).
pub struct IndividualSearch<O: PlayOracle> {
    oracle: O,
    config: SearchConfig,
    rng: GameRng,
    stats: SearchStats,
    tree_stats: Option<TreeStats>,
}

impl IndividualSearch<StandardOracle> {
    /// Search with the standard rules.
    pub fn standard(config: SearchConfig) -> Result<Self> {
        Self::new(StandardOracle, config)
    }
}

impl<O: PlayOracle> IndividualSearch<O> {
    /// Create a search context, rejecting fatal misconfigurations and team
    /// configurations (those belong to [`TeamSearch`](crate::team::TeamSearch)).
    pub fn new(oracle: O, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        if config.team_mode {
            return Err(SearchError::SearchModeMismatch {
                driver: "individual",
                team_mode: true,
            });
        }
        let rng = GameRng::from_optional_seed(config.seed);
        Ok(Self {
            oracle,
            config,
            rng,
            stats: SearchStats::default(),
            tree_stats: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Statistics of the most recent search.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Shape of the most recent search tree (None when no tree was built).
    #[must_use]
    pub fn tree_stats(&self) -> Option<&TreeStats> {
        self.tree_stats.as_ref()
    }

    /// Best play for `hand` against `last_play`, or `None` when the seat must pass.
    pub fn search(&mut self, hand: &[Card], last_play: Option<&Play>) -> Option<Vec<Card>> {
        let start = Instant::now();
        self.stats.reset();
        self.tree_stats = None;

        let mut actions = individual_actions(&self.oracle, hand, last_play);
        if actions.len() <= 1 {
            return actions.pop();
        }

        let iterations = self.config.effective_iterations(hand.len());
        let max_depth = self.config.effective_depth(hand.len());
        let budget = self.config.time_budget();
        debug!(
            hand = hand.len(),
            actions = actions.len(),
            iterations,
            max_depth,
            "individual search start"
        );

        let root = SearchNode::root(hand.to_vec(), last_play.cloned(), actions.clone());
        // Children are leaves, so the tree never outgrows root + one per action.
        let mut tree = SearchTree::with_capacity(root, actions.len() + 1);
        let known = known_cards(hand, last_play);

        for _ in 0..iterations {
            if start.elapsed() >= budget {
                self.stats.timed_out = true;
                debug!(completed = self.stats.iterations, "individual search timed out");
                break;
            }
            self.iteration(&mut tree, &known, hand.len(), max_depth);
            self.stats.iterations += 1;
        }

        self.stats.time_us = start.elapsed().as_micros() as u64;
        let tree_stats = tree.stats();

        let best = best_child(&tree);
        self.tree_stats = Some(tree_stats);
        match best {
            Some(id) => {
                let node = tree.get(id);
                debug!(
                    visits = node.visits,
                    win_rate = node.win_rate(),
                    iterations = self.stats.iterations,
                    "individual search pick"
                );
                node.action.clone()
            }
            None => {
                let ctx = EvalContext::new(
                    last_play,
                    self.config.current_round_score,
                    SeatRole::Searcher,
                );
                select_by_heuristic(&self.oracle, &actions, hand, &ctx)
                    .or_else(|| actions.into_iter().next())
            }
        }
    }

    fn iteration(
        &mut self,
        tree: &mut SearchTree<SearchNode>,
        known: &[Card],
        hand_len: usize,
        max_depth: u32,
    ) {
        let exploration = self.config.exploration_constant;
        let mut current = tree.root();

        // Selection
        loop {
            let node = tree.get(current);
            if !node.untried.is_empty() || node.children.is_empty() {
                break;
            }
            match Uct.select(tree, current, exploration) {
                Some(next) => current = next,
                None => break,
            }
        }

        // Expansion
        if !tree.get(current).untried.is_empty() {
            match expand(tree, current, &self.oracle, &mut self.rng) {
                Some(child) => {
                    self.stats.nodes_expanded += 1;
                    current = child;
                }
                None => {
                    self.stats.expansions_rejected += 1;
                    trace!(node = %current, "expansion rejected");
                    return;
                }
            }
        }

        // Simulation
        let winner = if tree.get(current).hand.is_empty() {
            AI_SEAT
        } else {
            // Each rollout draws its world and moves from its own stream.
            let mut rollout_rng = self.rng.fork();
            let mut state =
                self.rollout_state(tree.get(current), known, hand_len, &mut rollout_rng);
            self.stats.simulations += 1;
            simulate(
                &self.oracle,
                &mut state,
                max_depth,
                self.config.perfect_information,
                &mut rollout_rng,
            )
            .winner
        };

        // Backpropagation
        backpropagate(tree, Some(current), winner);
    }

    /// A concrete world for one rollout from `node`.
    ///
    /// Opponents without a public count hold `hand_len` cards.
    fn rollout_state(
        &self,
        node: &SearchNode,
        known: &[Card],
        hand_len: usize,
        rng: &mut GameRng,
    ) -> SimState {
        let seats = self.config.player_count;
        let mut hands = vec![Vec::new(); seats];
        hands[AI_SEAT] = node.hand.clone();

        match self.config.all_player_hands.as_ref() {
            Some(all) if self.config.perfect_information => {
                for (seat, hand) in all.iter().enumerate().skip(1).take(seats - 1) {
                    hands[seat] = hand.clone();
                }
            }
            _ => {
                let deck = full_deck(seats, next_free_id([known]));
                let config = &self.config;
                for (seat, hand) in estimate_hands(
                    known,
                    &deck,
                    1..seats,
                    |seat| config.hand_count(seat, hand_len),
                    rng,
                ) {
                    hands[seat] = hand;
                }
            }
        }

        let (current, last_player) = match node.to_move {
            Mover::Ai => (AI_SEAT, node.last_play.as_ref().map(|_| seats - 1)),
            Mover::Opponent => ((AI_SEAT + 1) % seats, Some(AI_SEAT)),
        };
        let played_points = node
            .action
            .as_deref()
            .map_or(0, |cards| self.oracle.cards_score(cards));

        SimState::new(hands, current).with_table(
            node.last_play.clone(),
            last_player,
            self.config.current_round_score + played_points,
        )
    }
}

/// Cards out of the sampling pool: the searching hand and the table play.
fn known_cards(hand: &[Card], last_play: Option<&Play>) -> Vec<Card> {
    let mut known = hand.to_vec();
    if let Some(play) = last_play {
        known.extend_from_slice(play.cards());
    }
    known
}

/// Expand one untried action of `id`, chosen uniformly at random.
///
/// The action leaves `untried` whether or not the child is created. Returns
/// `None` when the oracle rejects the action or it is not in the node's hand.
pub fn expand<O: PlayOracle + ?Sized>(
    tree: &mut SearchTree<SearchNode>,
    id: NodeId,
    oracle: &O,
    rng: &mut GameRng,
) -> Option<NodeId> {
    let node = tree.get_mut(id);
    if node.untried.is_empty() {
        return None;
    }
    let idx = rng.gen_range_usize(0..node.untried.len());
    let action = node.untried.remove(idx);

    let node = tree.get(id);
    if !contains_all(&node.hand, &action) {
        return None;
    }
    let play = oracle.playable(&action, node.last_play.as_ref())?;
    let child = SearchNode::child(
        id,
        node.depth,
        node.to_move.flip(),
        remove_cards(&node.hand, &action),
        play,
        action,
    );
    Some(tree.add_child(id, child))
}

/// Credit a rollout won by `winner` to every node from `from` up to the root.
///
/// A `None` start is a no-op.
pub fn backpropagate(tree: &mut SearchTree<SearchNode>, from: Option<NodeId>, winner: usize) {
    let Some(from) = from else {
        return;
    };
    let won = winner == AI_SEAT;
    tree.update_path(from, |node| {
        node.visits += 1;
        if won {
            node.wins += 1;
        }
    });
}

/// Most-visited root child; higher win rate, then the earlier child, break ties.
fn best_child(tree: &SearchTree<SearchNode>) -> Option<NodeId> {
    let mut best: Option<(NodeId, u32, f64)> = None;
    for (id, node) in tree.children(tree.root()) {
        if node.visits == 0 {
            continue;
        }
        let better = match best {
            None => true,
            Some((_, visits, rate)) => {
                node.visits > visits || (node.visits == visits && node.win_rate() > rate)
            }
        };
        if better {
            best = Some((id, node.visits, node.win_rate()));
        }
    }
    best.map(|(id, _, _)| id)
}

/// Choose a play for `hand` with the standard rules.
///
/// `Ok(None)` means no legal play exists and the seat must pass.
pub fn choose_individual_play(
    hand: &[Card],
    last_play: Option<&Play>,
    config: &SearchConfig,
) -> Result<Option<Vec<Card>>> {
    choose_individual_play_with(StandardOracle, hand, last_play, config)
}

/// [`choose_individual_play`] against a caller-supplied oracle.
pub fn choose_individual_play_with<O: PlayOracle>(
    oracle: O,
    hand: &[Card],
    last_play: Option<&Play>,
    config: &SearchConfig,
) -> Result<Option<Vec<Card>>> {
    let mut search = IndividualSearch::new(oracle, config.clone())?;
    Ok(search.search(hand, last_play))
}
