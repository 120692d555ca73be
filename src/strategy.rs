//! Play strategies behind one trait, built by name.
//!
//! Hosts pick a strategy from configuration text (`"mcts"`, `"heuristic"`,
//! `"simple:aggressive"`, ...) and get a boxed [`PlayStrategy`]. There is no
//! global registry: [`build_strategy`] is the whole factory.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{Card, Play};
use crate::error::{Result, SearchError};
use crate::mcts::heuristic::{select_by_heuristic, EvalContext, SeatRole};
use crate::mcts::{individual_actions, IndividualSearch, SearchConfig};
use crate::rules::{PlayOracle, StandardOracle};

/// Chooses a play for the seat to move. `None` means pass.
pub trait PlayStrategy {
    fn name(&self) -> &'static str;

    fn choose_play(&mut self, hand: &[Card], last_play: Option<&Play>) -> Option<Vec<Card>>;
}

/// How the simple strategy picks among value-ordered plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimpleStyle {
    /// Strongest play.
    Aggressive,
    /// Weakest play.
    Conservative,
    /// Median play.
    #[default]
    Balanced,
}

/// Strategy selector parsed from configuration text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Mcts,
    Heuristic,
    Simple(SimpleStyle),
}

impl FromStr for StrategyKind {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "mcts" => Ok(StrategyKind::Mcts),
            "heuristic" => Ok(StrategyKind::Heuristic),
            "simple" | "simple:balanced" => Ok(StrategyKind::Simple(SimpleStyle::Balanced)),
            "simple:aggressive" => Ok(StrategyKind::Simple(SimpleStyle::Aggressive)),
            "simple:conservative" => Ok(StrategyKind::Simple(SimpleStyle::Conservative)),
            _ => Err(SearchError::UnknownStrategy(s.to_string())),
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::Mcts => write!(f, "mcts"),
            StrategyKind::Heuristic => write!(f, "heuristic"),
            StrategyKind::Simple(SimpleStyle::Aggressive) => write!(f, "simple:aggressive"),
            StrategyKind::Simple(SimpleStyle::Conservative) => write!(f, "simple:conservative"),
            StrategyKind::Simple(SimpleStyle::Balanced) => write!(f, "simple:balanced"),
        }
    }
}

/// Build the strategy named by `kind` with the standard rules.
pub fn build_strategy(kind: StrategyKind, config: &SearchConfig) -> Result<Box<dyn PlayStrategy>> {
    let strategy: Box<dyn PlayStrategy> = match kind {
        StrategyKind::Mcts => {
            Box::new(MctsStrategy::new(IndividualSearch::standard(config.clone())?))
        }
        StrategyKind::Heuristic => {
            Box::new(HeuristicStrategy::new(StandardOracle, config.current_round_score))
        }
        StrategyKind::Simple(style) => Box::new(SimpleStrategy::new(StandardOracle, style)),
    };
    Ok(strategy)
}

/// Individual MCTS.
pub struct MctsStrategy<O: PlayOracle> {
    search: IndividualSearch<O>,
}

impl<O: PlayOracle> MctsStrategy<O> {
    pub fn new(search: IndividualSearch<O>) -> Self {
        Self { search }
    }

    #[must_use]
    pub fn search(&self) -> &IndividualSearch<O> {
        &self.search
    }
}

impl<O: PlayOracle> PlayStrategy for MctsStrategy<O> {
    fn name(&self) -> &'static str {
        "mcts"
    }

    fn choose_play(&mut self, hand: &[Card], last_play: Option<&Play>) -> Option<Vec<Card>> {
        self.search.search(hand, last_play)
    }
}

/// Highest heuristic score, no search.
pub struct HeuristicStrategy<O: PlayOracle> {
    oracle: O,
    round_score: i32,
}

impl<O: PlayOracle> HeuristicStrategy<O> {
    pub fn new(oracle: O, round_score: i32) -> Self {
        Self { oracle, round_score }
    }
}

impl<O: PlayOracle> PlayStrategy for HeuristicStrategy<O> {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn choose_play(&mut self, hand: &[Card], last_play: Option<&Play>) -> Option<Vec<Card>> {
        let candidates = individual_actions(&self.oracle, hand, last_play);
        let ctx = EvalContext::new(last_play, self.round_score, SeatRole::Searcher);
        select_by_heuristic(&self.oracle, &candidates, hand, &ctx)
    }
}

/// Orders legal plays by strength and takes one end or the middle.
pub struct SimpleStrategy<O: PlayOracle> {
    oracle: O,
    style: SimpleStyle,
}

impl<O: PlayOracle> SimpleStrategy<O> {
    pub fn new(oracle: O, style: SimpleStyle) -> Self {
        Self { oracle, style }
    }

    #[must_use]
    pub fn style(&self) -> SimpleStyle {
        self.style
    }
}

impl<O: PlayOracle> PlayStrategy for SimpleStrategy<O> {
    fn name(&self) -> &'static str {
        match self.style {
            SimpleStyle::Aggressive => "simple:aggressive",
            SimpleStyle::Conservative => "simple:conservative",
            SimpleStyle::Balanced => "simple:balanced",
        }
    }

    fn choose_play(&mut self, hand: &[Card], last_play: Option<&Play>) -> Option<Vec<Card>> {
        let mut plays: Vec<Play> = individual_actions(&self.oracle, hand, last_play)
            .iter()
            .filter_map(|cards| self.oracle.classify(cards))
            .collect();
        if plays.is_empty() {
            return None;
        }
        // Bomb-class last; then by value, then by size.
        plays.sort_by_key(|p| (p.is_bomb_class(), p.value(), p.len()));

        let idx = match self.style {
            SimpleStyle::Conservative => 0,
            SimpleStyle::Aggressive => plays.len() - 1,
            SimpleStyle::Balanced => plays.len() / 2,
        };
        Some(plays.swap_remove(idx).into_cards())
    }
}
