//! Play classification, comparison and enumeration.
//!
//! [`PlayOracle`] is the seam between the search and the card rules. The
//! search never inspects shapes itself; it only asks the oracle. Oracles must
//! be pure: the same inputs always give the same answer.
//!
//! [`StandardOracle`] implements the Guo Zha rules:
//!
//! - single, pair, triple: cards of one rank
//! - bomb: 4 to 6 cards of one rank
//! - dun: 7 or more cards of one rank
//! - fewer than four jokers never mix with normal cards, and small never
//!   mixes with big
//! - four or more jokers together form a bomb (or dun), valued as a big
//!   joker when bigs are at least as many as smalls
//!
//! A dun beats everything but a longer or higher dun; a bomb beats every
//! ordinary shape. Between two bombs (or two duns) the longer wins, then the
//! higher. Ordinary shapes only beat the same shape of a higher rank.

use rustc_hash::FxHashMap;

use crate::core::{Card, Play, PlayKind, Rank};

/// Smallest same-rank group that counts as a bomb.
pub const BOMB_MIN_CARDS: usize = 4;

/// Smallest same-rank group that counts as a dun.
pub const DUN_MIN_CARDS: usize = 7;

/// Rules contract consumed by the search.
pub trait PlayOracle {
    /// Classify a card set, or `None` if it is not a legal combination.
    fn classify(&self, cards: &[Card]) -> Option<Play>;

    /// Whether `play` beats `last`.
    fn beats(&self, play: &Play, last: &Play) -> bool;

    /// Every candidate play from `hand`: any legal opening when `last_play`
    /// is `None`, otherwise only plays that beat it.
    fn legal_beats(&self, hand: &[Card], last_play: Option<&Play>) -> Vec<Vec<Card>>;

    fn is_score_card(&self, card: &Card) -> bool {
        self.card_score(card) > 0
    }

    fn card_score(&self, card: &Card) -> i32 {
        card.points()
    }

    fn cards_score(&self, cards: &[Card]) -> i32 {
        cards.iter().map(|c| self.card_score(c)).sum()
    }

    /// Classify `cards` and check it answers `last_play`.
    fn playable(&self, cards: &[Card], last_play: Option<&Play>) -> Option<Play> {
        let play = self.classify(cards)?;
        match last_play {
            Some(last) if !self.beats(&play, last) => None,
            _ => Some(play),
        }
    }
}

/// The standard Guo Zha rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardOracle;

impl StandardOracle {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn group_kind(len: usize) -> PlayKind {
        if len >= DUN_MIN_CARDS {
            PlayKind::Dun
        } else {
            PlayKind::Bomb
        }
    }

    /// Maximal opening candidates, weakest rank first.
    fn openings(hand: &[Card]) -> Vec<Vec<Card>> {
        let mut groups: FxHashMap<Rank, Vec<Card>> = FxHashMap::default();
        for card in hand {
            groups.entry(card.rank).or_default().push(*card);
        }
        let mut ranks: Vec<Rank> = groups.keys().copied().collect();
        ranks.sort_unstable();

        let mut candidates = Vec::new();
        for rank in ranks {
            let Some(group) = groups.get(&rank) else { continue };
            candidates.push(group[..1].to_vec());
            if group.len() >= 2 {
                candidates.push(group[..2].to_vec());
            }
            if group.len() >= 3 {
                candidates.push(group[..3].to_vec());
            }
            if group.len() >= BOMB_MIN_CARDS && !rank.is_joker() {
                candidates.push(group.clone());
            }
        }

        let jokers: Vec<Card> = hand.iter().filter(|c| c.is_joker()).copied().collect();
        if jokers.len() >= BOMB_MIN_CARDS {
            candidates.push(jokers);
        }
        candidates
    }
}

impl PlayOracle for StandardOracle {
    fn classify(&self, cards: &[Card]) -> Option<Play> {
        let first = cards.first()?;
        let len = cards.len();

        if len >= BOMB_MIN_CARDS && cards.iter().all(Card::is_joker) {
            let big = cards.iter().filter(|c| c.rank == Rank::BIG_JOKER).count();
            let value = if big * 2 >= len {
                Rank::BIG_JOKER
            } else {
                Rank::SMALL_JOKER
            };
            return Some(Play::new(Self::group_kind(len), cards.to_vec(), value.value()));
        }

        if cards.iter().any(|c| c.rank != first.rank) {
            return None;
        }

        let kind = match len {
            1 => PlayKind::Single,
            2 => PlayKind::Pair,
            3 => PlayKind::Triple,
            n => Self::group_kind(n),
        };
        Some(Play::new(kind, cards.to_vec(), first.rank.value()))
    }

    fn beats(&self, play: &Play, last: &Play) -> bool {
        use PlayKind::*;

        let longer_or_higher = || {
            play.len() > last.len() || (play.len() == last.len() && play.value() > last.value())
        };

        match (play.kind(), last.kind()) {
            (Dun, Dun) | (Bomb, Bomb) => longer_or_higher(),
            (Dun, _) => true,
            (_, Dun) => false,
            (Bomb, _) => true,
            (_, Bomb) => false,
            (mine, theirs) => {
                mine == theirs && play.len() == last.len() && play.value() > last.value()
            }
        }
    }

    fn legal_beats(&self, hand: &[Card], last_play: Option<&Play>) -> Vec<Vec<Card>> {
        let openings = Self::openings(hand);
        match last_play {
            None => openings,
            Some(last) => openings
                .into_iter()
                .filter(|cards| {
                    self.classify(cards)
                        .is_some_and(|play| self.beats(&play, last))
                })
                .collect(),
        }
    }
}
