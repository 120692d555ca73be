//! Core value types: cards, classified plays and the search RNG.
//!
//! Everything here is game data with no search logic attached, shared by the
//! rules oracle, the individual search and the team variant.

pub mod card;
pub mod play;
pub mod rng;

pub use card::{
    contains_all, full_deck, next_free_id, remove_cards, Card, CardId, Rank, Suit, DECK_SIZE,
};
pub use play::{Play, PlayKind};
pub use rng::GameRng;
