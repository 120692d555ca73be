//! Hidden-hand sampling (determinization).
//!
//! A sampled hand is drawn from the cards nobody is known to hold. Known cards
//! are matched against the deck by id when the face agrees and by face
//! otherwise, so callers whose ids come from a different dealer still get a
//! consistent complement. Sampling never invents a card: if fewer cards remain
//! than requested, all of them are returned.

use rustc_hash::FxHashMap;

use crate::core::{Card, CardId, GameRng, Rank, Suit};

/// Cards of `full_deck` not accounted for by `known`.
#[must_use]
pub fn available_cards(known: &[Card], full_deck: &[Card]) -> Vec<Card> {
    let by_id: FxHashMap<CardId, usize> = full_deck
        .iter()
        .enumerate()
        .map(|(i, card)| (card.id, i))
        .collect();
    let mut taken = vec![false; full_deck.len()];
    let mut unmatched = Vec::new();

    for card in known {
        match by_id.get(&card.id) {
            Some(&i) if !taken[i] && full_deck[i].same_face(card) => taken[i] = true,
            _ => unmatched.push(*card),
        }
    }

    if !unmatched.is_empty() {
        let mut by_face: FxHashMap<(Suit, Rank), Vec<usize>> = FxHashMap::default();
        for (i, card) in full_deck.iter().enumerate().rev() {
            if !taken[i] {
                by_face.entry((card.suit, card.rank)).or_default().push(i);
            }
        }
        for card in unmatched {
            if let Some(i) = by_face.get_mut(&(card.suit, card.rank)).and_then(Vec::pop) {
                taken[i] = true;
            }
        }
    }

    full_deck
        .iter()
        .zip(taken)
        .filter(|(_, taken)| !taken)
        .map(|(card, _)| *card)
        .collect()
}

/// Sample `target_size` cards from `full_deck − known`.
///
/// Every call shuffles afresh, so repeated calls give independent samples.
pub fn estimate(
    known: &[Card],
    full_deck: &[Card],
    target_size: usize,
    rng: &mut GameRng,
) -> Vec<Card> {
    let mut pool = available_cards(known, full_deck);
    rng.shuffle(&mut pool);
    pool.truncate(target_size);
    pool
}

/// Sample disjoint hands for `seats`, each sized by `size_of(seat)`.
///
/// Cards dealt to one seat count as known for the next.
pub fn estimate_hands(
    known: &[Card],
    full_deck: &[Card],
    seats: impl IntoIterator<Item = usize>,
    mut size_of: impl FnMut(usize) -> usize,
    rng: &mut GameRng,
) -> Vec<(usize, Vec<Card>)> {
    let mut pool = available_cards(known, full_deck);
    rng.shuffle(&mut pool);
    seats
        .into_iter()
        .map(|seat| {
            let take = size_of(seat).min(pool.len());
            let hand = pool.split_off(pool.len() - take);
            (seat, hand)
        })
        .collect()
}
