//! Cards, ranks and suits.
//!
//! ## Rank encoding
//!
//! Ranks are plain integers so that strength comparison is integer ordering:
//!
//! | Rank | Card |
//! |------|------|
//! | 3..=10 | face value |
//! | 11 / 12 / 13 | J / Q / K |
//! | 14 | A |
//! | 15 | 2 |
//! | 16 / 17 | small / big joker |
//!
//! Suits never affect strength. Two cards with the same suit and rank are
//! interchangeable for play purposes and differ only by [`CardId`].

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Card suit. Jokers carry their own pseudo-suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
    Joker,
}

impl Suit {
    /// The four non-joker suits.
    pub const NORMAL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    fn symbol(self) -> &'static str {
        match self {
            Suit::Spades => "♠",
            Suit::Hearts => "♥",
            Suit::Diamonds => "♦",
            Suit::Clubs => "♣",
            Suit::Joker => "",
        }
    }
}

/// Card rank (3..=17). See the module docs for the encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rank(pub u8);

impl Rank {
    pub const THREE: Rank = Rank(3);
    pub const FIVE: Rank = Rank(5);
    pub const TEN: Rank = Rank(10);
    pub const JACK: Rank = Rank(11);
    pub const QUEEN: Rank = Rank(12);
    pub const KING: Rank = Rank(13);
    pub const ACE: Rank = Rank(14);
    pub const TWO: Rank = Rank(15);
    pub const SMALL_JOKER: Rank = Rank(16);
    pub const BIG_JOKER: Rank = Rank(17);

    /// Numeric strength of the rank.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_joker(self) -> bool {
        self.0 >= Self::SMALL_JOKER.0
    }

    /// Point value carried by cards of this rank: 5 → 5, 10 → 10, K → 10.
    #[inline]
    #[must_use]
    pub const fn points(self) -> i32 {
        match self.0 {
            5 => 5,
            10 | 13 => 10,
            _ => 0,
        }
    }

    /// Iterate over the thirteen non-joker ranks, weakest first.
    pub fn normal() -> impl Iterator<Item = Rank> {
        (Self::THREE.0..=Self::TWO.0).map(Rank)
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            3..=10 => write!(f, "{}", self.0),
            11 => write!(f, "J"),
            12 => write!(f, "Q"),
            13 => write!(f, "K"),
            14 => write!(f, "A"),
            15 => write!(f, "2"),
            16 => write!(f, "SJ"),
            17 => write!(f, "BJ"),
            other => write!(f, "?{other}"),
        }
    }
}

/// Globally unique card identifier within one dealt game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

/// An immutable physical card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
    pub id: CardId,
}

impl Card {
    #[must_use]
    pub const fn new(suit: Suit, rank: Rank, id: u32) -> Self {
        Self {
            suit,
            rank,
            id: CardId(id),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_joker(&self) -> bool {
        self.rank.is_joker()
    }

    #[inline]
    #[must_use]
    pub const fn points(&self) -> i32 {
        self.rank.points()
    }

    /// Same suit and rank, regardless of id.
    #[inline]
    #[must_use]
    pub fn same_face(&self, other: &Card) -> bool {
        self.suit == other.suit && self.rank == other.rank
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank, self.suit.symbol())
    }
}

/// Number of cards in one standard deck including both jokers.
pub const DECK_SIZE: usize = 54;

/// Build `deck_count` standard decks with consecutive ids starting at `first_id`.
#[must_use]
pub fn full_deck(deck_count: usize, first_id: u32) -> Vec<Card> {
    let mut cards = Vec::with_capacity(deck_count * DECK_SIZE);
    let mut next_id = first_id;
    for _ in 0..deck_count {
        for suit in Suit::NORMAL {
            for rank in Rank::normal() {
                cards.push(Card::new(suit, rank, next_id));
                next_id += 1;
            }
        }
        for rank in [Rank::SMALL_JOKER, Rank::BIG_JOKER] {
            cards.push(Card::new(Suit::Joker, rank, next_id));
            next_id += 1;
        }
    }
    cards
}

/// First id not used by any card in `groups`.
#[must_use]
pub fn next_free_id<'a>(groups: impl IntoIterator<Item = &'a [Card]>) -> u32 {
    groups
        .into_iter()
        .flat_map(|cards| cards.iter())
        .map(|card| card.id.0.saturating_add(1))
        .max()
        .unwrap_or(0)
}

/// `hand` minus every card whose id appears in `removed`.
#[must_use]
pub fn remove_cards(hand: &[Card], removed: &[Card]) -> Vec<Card> {
    let ids: FxHashSet<CardId> = removed.iter().map(|c| c.id).collect();
    hand.iter().filter(|c| !ids.contains(&c.id)).copied().collect()
}

/// True when every card of `subset` (by id) is present in `hand`.
#[must_use]
pub fn contains_all(hand: &[Card], subset: &[Card]) -> bool {
    let ids: FxHashSet<CardId> = hand.iter().map(|c| c.id).collect();
    subset.iter().all(|c| ids.contains(&c.id))
}
