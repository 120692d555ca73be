//! Card rules consumed by the search.
//!
//! The search calls into [`PlayOracle`] for every legality, comparison and
//! scoring question and never interprets shapes directly. Hosts with a rules
//! variant implement the trait; [`StandardOracle`] covers the stock game.

pub mod oracle;

pub use oracle::{PlayOracle, StandardOracle, BOMB_MIN_CARDS, DUN_MIN_CARDS};
