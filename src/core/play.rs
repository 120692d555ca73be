//! Classified card combinations.
//!
//! A [`Play`] is always derived from its cards by a
//! [`PlayOracle`](crate::rules::PlayOracle); there is no public constructor,
//! so a kind or value can never drift from the cards it describes.

use serde::{Deserialize, Serialize};

use super::card::Card;

/// Shape of a legal combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayKind {
    Single,
    Pair,
    Triple,
    /// 4 to 6 cards of one rank.
    Bomb,
    /// 7 or more cards of one rank.
    Dun,
}

impl PlayKind {
    /// Bombs and duns beat any ordinary shape.
    #[inline]
    #[must_use]
    pub const fn is_bomb_class(self) -> bool {
        matches!(self, PlayKind::Bomb | PlayKind::Dun)
    }
}

/// A classified combination: shape, cards and comparison value.
///
/// Serialize-only: deserializing would bypass classification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Play {
    kind: PlayKind,
    cards: Vec<Card>,
    value: u8,
}

impl Play {
    pub(crate) fn new(kind: PlayKind, cards: Vec<Card>, value: u8) -> Self {
        Self { kind, cards, value }
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> PlayKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Rank value used for same-shape comparison.
    #[inline]
    #[must_use]
    pub fn value(&self) -> u8 {
        self.value
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn is_bomb_class(&self) -> bool {
        self.kind.is_bomb_class()
    }

    /// Total point value of the cards in this play.
    #[must_use]
    pub fn points(&self) -> i32 {
        self.cards.iter().map(Card::points).sum()
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}

impl std::fmt::Display for Play {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}[", self.kind)?;
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{card}")?;
        }
        write!(f, "]")
    }
}
