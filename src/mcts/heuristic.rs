//! Search-free action scoring.
//!
//! [`evaluate_action`] scores one candidate play against the hand it comes
//! from. It is the rollout policy for every seat and the fallback ranking when
//! a search ends without children. It has no internal randomness, so equal
//! inputs always rank equally.
//!
//! The score is a sum of independent terms, highest priority first:
//!
//! 1. breaking a held triple, bomb or dun (triple ≪ bomb ≪ dun)
//! 2. point-card exposure and retention
//! 3. joker discipline
//! 4. tempo: cards shed, smallest sufficient beat, early bombs
//! 5. perfect-information baiting and capture
//!
//! The magnitudes are policy. They are named constants so they can be tuned
//! independently.

use rustc_hash::FxHashMap;

use crate::core::{contains_all, remove_cards, Card, Play, PlayKind, Rank};
use crate::rules::{PlayOracle, BOMB_MIN_CARDS, DUN_MIN_CARDS};

// =============================================================================
// Weights
// =============================================================================

/// Score for an action the oracle rejects or the hand cannot cover.
pub const INVALID_ACTION_SCORE: i32 = -1000;

/// Leading a whole triple instead of splitting it.
pub const TRIPLE_KEPT_BONUS: i32 = 50;
pub const LEAD_TRIPLE_TO_SINGLE_PENALTY: i32 = -80;
pub const LEAD_TRIPLE_TO_PAIR_PENALTY: i32 = -100;
pub const LEAD_PAIR_SPLIT_PENALTY: i32 = -20;
/// Splitting a bomb group and leaving 1–2 cards of it behind.
pub const LEAD_BOMB_DEAD_REMAINDER_PENALTY: i32 = -150;
/// Splitting a bomb group down to a triple.
pub const LEAD_BOMB_TO_TRIPLE_PENALTY: i32 = -120;
pub const LEAD_DUN_SPLIT_PENALTY: i32 = -200;
pub const FOLLOW_TRIPLE_SPLIT_PENALTY: i32 = -40;
pub const FOLLOW_BOMB_DEAD_REMAINDER_PENALTY: i32 = -90;
pub const FOLLOW_BOMB_TO_TRIPLE_PENALTY: i32 = -75;
pub const FOLLOW_DUN_SPLIT_PENALTY: i32 = -150;
/// Peeling cards off a group that stays bomb-class (or stays a dun).
pub const LEAD_GROUP_SHRINK_PENALTY: i32 = -50;
pub const FOLLOW_GROUP_SHRINK_PENALTY: i32 = -25;

pub const TRIPLE_SHAPE_BONUS: i32 = 20;
pub const PAIR_SHAPE_BONUS: i32 = 10;

/// Leading point cards while a covering high card stays in hand.
pub const COVERED_POINTS_BONUS: i32 = 30;
pub const EXPOSED_POINTS_PENALTY: i32 = -50;
/// Following with point cards onto a live pot.
pub const CAPTURE_WITH_POINTS_BONUS: i32 = 40;
pub const UNFORCED_POINTS_PENALTY: i32 = -30;
pub const RETAINED_POINTS_BONUS: i32 = 20;
/// Opponent seats grabbing a pot worth more than [`POT_GRAB_THRESHOLD`].
pub const POT_GRAB_BONUS: i32 = 40;
pub const POT_GRAB_THRESHOLD: i32 = 10;

pub const JOKER_ENDGAME_BONUS: i32 = 40;
pub const JOKER_ANSWERS_BOMB_BONUS: i32 = 30;
pub const JOKER_SPEND_PENALTY: i32 = -20;
/// Hand size at or below which spending jokers is encouraged.
pub const JOKER_ENDGAME_CARDS: usize = 3;

pub const DISCARD_BONUS_PER_CARD: i32 = 10;
pub const SMALLEST_BEAT_BONUS: i32 = 15;
/// A beat within this many ranks of the table counts as "smallest".
pub const SMALLEST_BEAT_MARGIN: u8 = 3;
pub const LONE_SINGLE_PENALTY: i32 = -5;
pub const LONE_SINGLE_HAND_SIZE: usize = 8;
/// Spending a bomb on an ordinary play while holding more than [`EARLY_BOMB_HAND_SIZE`] cards.
pub const EARLY_BOMB_PENALTY: i32 = -100;
pub const EARLY_BOMB_HAND_SIZE: usize = 10;
pub const BOMB_FINISH_BONUS: i32 = 30;
pub const BOMB_FINISH_CARDS: usize = 5;
pub const BOMB_SPEND_PENALTY: i32 = -10;
/// Keeping a bomb in hand while points are on the table.
pub const BOMB_HELD_FOR_POT_BONUS: i32 = 15;

/// Leading low to draw out visible opponent points.
pub const BAIT_BONUS: i32 = 25;
pub const BAIT_MAX_VALUE: u8 = 8;
pub const BAIT_POINTS_THRESHOLD: i32 = 20;
pub const CAPTURE_VISIBLE_POT_BONUS: i32 = 35;

/// Lowest rank that counts as a high "insurance" card.
pub const INSURANCE_RANK: Rank = Rank::QUEEN;

/// Lowest rank left in hand that covers point cards led out.
pub const POINT_COVER_RANK: Rank = Rank::TEN;

// =============================================================================
// Context
// =============================================================================

/// Which side of the search the acting seat is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeatRole {
    /// The seat the search is choosing for.
    Searcher,
    Opponent,
}

/// Table facts an evaluation depends on besides the action and hand.
#[derive(Clone, Copy, Debug)]
pub struct EvalContext<'a> {
    pub last_play: Option<&'a Play>,
    /// Points in the current trick.
    pub round_score: i32,
    pub role: SeatRole,
    /// Opponent hands, only under perfect information.
    pub visible_opponents: &'a [Vec<Card>],
}

impl<'a> EvalContext<'a> {
    #[must_use]
    pub fn new(last_play: Option<&'a Play>, round_score: i32, role: SeatRole) -> Self {
        Self {
            last_play,
            round_score,
            role,
            visible_opponents: &[],
        }
    }

    #[must_use]
    pub fn with_visible_opponents(mut self, hands: &'a [Vec<Card>]) -> Self {
        self.visible_opponents = hands;
        self
    }

    fn leading(&self) -> bool {
        self.last_play.is_none()
    }
}

// =============================================================================
// Evaluation
// =============================================================================

/// Score `action` played from `hand`. Higher is better.
pub fn evaluate_action<O: PlayOracle + ?Sized>(
    oracle: &O,
    action: &[Card],
    hand: &[Card],
    ctx: &EvalContext<'_>,
) -> i32 {
    if action.is_empty() || !contains_all(hand, action) {
        return INVALID_ACTION_SCORE;
    }
    let Some(play) = oracle.classify(action) else {
        return INVALID_ACTION_SCORE;
    };
    let remaining = remove_cards(hand, action);

    let role_term = match ctx.role {
        SeatRole::Searcher => point_card_strategy(oracle, action, &remaining, ctx),
        SeatRole::Opponent => pot_grab(ctx),
    };

    combo_preservation(hand, &play, ctx)
        + shape_bonus(&play)
        + tempo(&play, hand.len(), ctx)
        + bomb_usage(&play, hand.len(), remaining.len(), ctx)
        + joker_discipline(action, remaining.len(), ctx)
        + role_term
        + perfect_information_bias(oracle, &play, ctx)
        + bomb_retention(&remaining, ctx)
}

/// Candidate with the highest score; the earliest wins ties.
pub fn select_by_heuristic<O: PlayOracle + ?Sized>(
    oracle: &O,
    candidates: &[Vec<Card>],
    hand: &[Card],
    ctx: &EvalContext<'_>,
) -> Option<Vec<Card>> {
    let mut best: Option<(&Vec<Card>, i32)> = None;
    for candidate in candidates {
        let score = evaluate_action(oracle, candidate, hand, ctx);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }
    best.map(|(cards, _)| cards.clone())
}

/// Penalty for splitting the rank group the play is taken from.
pub fn combo_preservation(hand: &[Card], play: &Play, ctx: &EvalContext<'_>) -> i32 {
    let Some(first) = play.cards().first() else {
        return 0;
    };
    if play.cards().iter().any(|c| c.rank != first.rank) {
        // Mixed joker bombs consume whole joker groups.
        return 0;
    }
    let held = hand.iter().filter(|c| c.rank == first.rank).count();
    let left = held.saturating_sub(play.len());
    let kind = play.kind();
    let lead = ctx.leading();

    if held >= DUN_MIN_CARDS && kind != PlayKind::Dun {
        return match (left >= DUN_MIN_CARDS, lead) {
            (true, true) => LEAD_GROUP_SHRINK_PENALTY,
            (true, false) => FOLLOW_GROUP_SHRINK_PENALTY,
            (false, true) => LEAD_DUN_SPLIT_PENALTY,
            (false, false) => FOLLOW_DUN_SPLIT_PENALTY,
        };
    }
    if held >= BOMB_MIN_CARDS && !kind.is_bomb_class() {
        return match (left, lead) {
            (1..=2, true) => LEAD_BOMB_DEAD_REMAINDER_PENALTY,
            (1..=2, false) => FOLLOW_BOMB_DEAD_REMAINDER_PENALTY,
            (3, true) => LEAD_BOMB_TO_TRIPLE_PENALTY,
            (3, false) => FOLLOW_BOMB_TO_TRIPLE_PENALTY,
            (_, true) => LEAD_GROUP_SHRINK_PENALTY,
            (_, false) => FOLLOW_GROUP_SHRINK_PENALTY,
        };
    }

    if lead {
        match (held, kind) {
            (3, PlayKind::Triple) => TRIPLE_KEPT_BONUS,
            (3, PlayKind::Single) => LEAD_TRIPLE_TO_SINGLE_PENALTY,
            (3, PlayKind::Pair) => LEAD_TRIPLE_TO_PAIR_PENALTY,
            (2, PlayKind::Single) => LEAD_PAIR_SPLIT_PENALTY,
            _ => 0,
        }
    } else if held == 3 && left > 0 {
        FOLLOW_TRIPLE_SPLIT_PENALTY
    } else {
        0
    }
}

pub fn shape_bonus(play: &Play) -> i32 {
    match play.kind() {
        PlayKind::Triple => TRIPLE_SHAPE_BONUS,
        PlayKind::Pair => PAIR_SHAPE_BONUS,
        _ => 0,
    }
}

/// Shedding cards, answering with the smallest sufficient beat, avoiding
/// lone singles from a big hand.
pub fn tempo(play: &Play, hand_len: usize, ctx: &EvalContext<'_>) -> i32 {
    let mut score = DISCARD_BONUS_PER_CARD * play.len() as i32;
    if let Some(last) = ctx.last_play {
        if !play.is_bomb_class() && play.value() <= last.value().saturating_add(SMALLEST_BEAT_MARGIN) {
            score += SMALLEST_BEAT_BONUS;
        }
    }
    if play.kind() == PlayKind::Single && hand_len > LONE_SINGLE_HAND_SIZE {
        score += LONE_SINGLE_PENALTY;
    }
    score
}

/// Bombs spent on ordinary plays: costly early, welcome near the finish.
pub fn bomb_usage(play: &Play, hand_len: usize, remaining: usize, ctx: &EvalContext<'_>) -> i32 {
    if !play.is_bomb_class() || ctx.last_play.is_some_and(Play::is_bomb_class) {
        return 0;
    }
    if hand_len > EARLY_BOMB_HAND_SIZE {
        EARLY_BOMB_PENALTY
    } else if remaining <= BOMB_FINISH_CARDS {
        BOMB_FINISH_BONUS
    } else {
        BOMB_SPEND_PENALTY
    }
}

pub fn joker_discipline(action: &[Card], remaining: usize, ctx: &EvalContext<'_>) -> i32 {
    if !action.iter().any(Card::is_joker) {
        return 0;
    }
    if remaining <= JOKER_ENDGAME_CARDS {
        JOKER_ENDGAME_BONUS
    } else if ctx.last_play.is_some_and(Play::is_bomb_class) {
        JOKER_ANSWERS_BOMB_BONUS
    } else {
        JOKER_SPEND_PENALTY
    }
}

/// Point-card exposure and retention for the searching seat.
pub fn point_card_strategy<O: PlayOracle + ?Sized>(
    oracle: &O,
    action: &[Card],
    remaining: &[Card],
    ctx: &EvalContext<'_>,
) -> i32 {
    let exposed = oracle.cards_score(action);
    if exposed == 0 {
        return if oracle.cards_score(remaining) > 0 {
            RETAINED_POINTS_BONUS
        } else {
            0
        };
    }
    if ctx.leading() {
        if remaining.iter().any(|c| c.rank >= POINT_COVER_RANK) {
            COVERED_POINTS_BONUS
        } else {
            EXPOSED_POINTS_PENALTY
        }
    } else if ctx.round_score > 0 {
        CAPTURE_WITH_POINTS_BONUS
    } else {
        UNFORCED_POINTS_PENALTY
    }
}

/// Opponent seats chase a fat pot.
pub fn pot_grab(ctx: &EvalContext<'_>) -> i32 {
    if !ctx.leading() && ctx.round_score > POT_GRAB_THRESHOLD {
        POT_GRAB_BONUS
    } else {
        0
    }
}

/// With every hand visible: bait out opponent points, take live pots.
pub fn perfect_information_bias<O: PlayOracle + ?Sized>(
    oracle: &O,
    play: &Play,
    ctx: &EvalContext<'_>,
) -> i32 {
    if ctx.role != SeatRole::Searcher || ctx.visible_opponents.is_empty() {
        return 0;
    }
    if ctx.leading() {
        let opponent_points: i32 = ctx.visible_opponents.iter().map(|h| oracle.cards_score(h)).sum();
        let quiet = oracle.cards_score(play.cards()) == 0;
        if opponent_points > BAIT_POINTS_THRESHOLD && play.value() <= BAIT_MAX_VALUE && quiet {
            return BAIT_BONUS;
        }
        0
    } else if ctx.round_score > 0 {
        CAPTURE_VISIBLE_POT_BONUS
    } else {
        0
    }
}

/// Holding a bomb back while points sit on the table.
pub fn bomb_retention(remaining: &[Card], ctx: &EvalContext<'_>) -> i32 {
    if ctx.round_score > 0 && holds_bomb(remaining) {
        BOMB_HELD_FOR_POT_BONUS
    } else {
        0
    }
}

fn holds_bomb(cards: &[Card]) -> bool {
    let mut counts: FxHashMap<Rank, usize> = FxHashMap::default();
    let mut jokers = 0;
    for card in cards {
        if card.is_joker() {
            jokers += 1;
        }
        *counts.entry(card.rank).or_default() += 1;
    }
    jokers >= BOMB_MIN_CARDS || counts.values().any(|&n| n >= BOMB_MIN_CARDS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Suit;
    use crate::rules::StandardOracle;

    fn card(rank: u8, id: u32) -> Card {
        let suit = if rank >= 16 { Suit::Joker } else { Suit::NORMAL[(id % 4) as usize] };
        Card::new(suit, Rank(rank), id)
    }

    fn hand(ranks: &[u8]) -> Vec<Card> {
        ranks.iter().enumerate().map(|(i, &r)| card(r, i as u32)).collect()
    }

    fn pick(hand: &[Card], ranks: &[u8]) -> Vec<Card> {
        let mut out = Vec::new();
        for &rank in ranks {
            let next = hand
                .iter()
                .find(|c| c.rank.value() == rank && !out.contains(*c))
                .copied()
                .unwrap();
            out.push(next);
        }
        out
    }

    fn single(rank: u8) -> Play {
        StandardOracle.classify(&[card(rank, 900)]).unwrap()
    }

    #[test]
    fn test_pair_kept_over_split() {
        let oracle = StandardOracle;
        let hand = vec![
            Card::new(Suit::Hearts, Rank::FIVE, 1),
            Card::new(Suit::Spades, Rank::FIVE, 2),
        ];
        let ctx = EvalContext::new(None, 0, SeatRole::Searcher);

        let pair = evaluate_action(&oracle, &hand, &hand, &ctx);
        let split = evaluate_action(&oracle, &hand[..1], &hand, &ctx);
        assert!(pair > split, "pair {pair} should beat single {split}");
    }

    #[test]
    fn test_bomb_not_spent_on_weak_single() {
        let oracle = StandardOracle;
        let hand = hand(&[7, 7, 7, 7, 3, 3, 4, 6, 8, 9, 11, 12]);
        let last = single(6);
        let ctx = EvalContext::new(Some(&last), 0, SeatRole::Searcher);

        let bomb = pick(&hand, &[7, 7, 7, 7]);
        let eight = pick(&hand, &[8]);
        assert!(evaluate_action(&oracle, &bomb, &hand, &ctx) < evaluate_action(&oracle, &eight, &hand, &ctx));

        let candidates = oracle.legal_beats(&hand, Some(&last));
        let choice = select_by_heuristic(&oracle, &candidates, &hand, &ctx).unwrap();
        assert_ne!(choice.len(), 4, "heuristic must not prefer the bomb");
    }

    #[test]
    fn test_split_penalties_scale_with_group() {
        let lead = EvalContext::new(None, 0, SeatRole::Searcher);
        let oracle = StandardOracle;

        let triple = hand(&[9, 9, 9]);
        let bomb = hand(&[9, 9, 9, 9]);
        let dun = hand(&[9; 7]);
        let one = oracle.classify(&triple[..1]).unwrap();

        let t = combo_preservation(&triple, &one, &lead);
        let b = combo_preservation(&bomb, &one, &lead);
        let d = combo_preservation(&dun, &one, &lead);
        assert!(t > b && b > d, "triple {t} > bomb {b} > dun {d}");

        let four = single(4);
        let follow_ctx = EvalContext::new(Some(&four), 0, SeatRole::Searcher);
        let tf = combo_preservation(&triple, &one, &follow_ctx);
        let bf = combo_preservation(&bomb, &one, &follow_ctx);
        let df = combo_preservation(&dun, &one, &follow_ctx);
        assert!(tf > bf && bf > df);
    }

    #[test]
    fn test_dead_remainder_penalized_hardest() {
        let lead = EvalContext::new(None, 0, SeatRole::Searcher);
        let oracle = StandardOracle;
        let four = hand(&[9, 9, 9, 9]);

        let triple = oracle.classify(&four[..3]).unwrap();
        let single = oracle.classify(&four[..1]).unwrap();
        assert_eq!(combo_preservation(&four, &triple, &lead), LEAD_BOMB_DEAD_REMAINDER_PENALTY);
        assert_eq!(combo_preservation(&four, &single, &lead), LEAD_BOMB_TO_TRIPLE_PENALTY);

        let five = hand(&[9, 9, 9, 9, 9]);
        let peel = oracle.classify(&five[..1]).unwrap();
        assert_eq!(combo_preservation(&five, &peel, &lead), LEAD_GROUP_SHRINK_PENALTY);
    }

    #[test]
    fn test_joker_discipline() {
        let joker = [card(17, 1)];
        let nine = single(9);
        let quiet = EvalContext::new(Some(&nine), 0, SeatRole::Searcher);
        assert_eq!(joker_discipline(&joker, 8, &quiet), JOKER_SPEND_PENALTY);
        assert_eq!(joker_discipline(&joker, 2, &quiet), JOKER_ENDGAME_BONUS);

        let bomb = StandardOracle.classify(&hand(&[5, 5, 5, 5])).unwrap();
        let answer = EvalContext::new(Some(&bomb), 0, SeatRole::Searcher);
        assert_eq!(joker_discipline(&joker, 8, &answer), JOKER_ANSWERS_BOMB_BONUS);
        assert_eq!(joker_discipline(&[card(9, 2)], 8, &answer), 0);
    }

    #[test]
    fn test_point_cards_exposed_vs_covered() {
        let oracle = StandardOracle;
        let lead = EvalContext::new(None, 0, SeatRole::Searcher);
        let five = [card(5, 1)];

        assert_eq!(point_card_strategy(&oracle, &five, &[card(4, 2)], &lead), EXPOSED_POINTS_PENALTY);
        assert_eq!(point_card_strategy(&oracle, &five, &[card(14, 2)], &lead), COVERED_POINTS_BONUS);
        assert_eq!(point_card_strategy(&oracle, &five, &[card(10, 2)], &lead), COVERED_POINTS_BONUS);
        assert_eq!(point_card_strategy(&oracle, &five, &[card(9, 2)], &lead), EXPOSED_POINTS_PENALTY);
        assert_eq!(point_card_strategy(&oracle, &[card(4, 2)], &five, &lead), RETAINED_POINTS_BONUS);

        let three = single(3);
        let live_pot = EvalContext::new(Some(&three), 15, SeatRole::Searcher);
        assert_eq!(point_card_strategy(&oracle, &five, &[], &live_pot), CAPTURE_WITH_POINTS_BONUS);
        let empty_pot = EvalContext::new(Some(&three), 0, SeatRole::Searcher);
        assert_eq!(point_card_strategy(&oracle, &five, &[], &empty_pot), UNFORCED_POINTS_PENALTY);
    }

    #[test]
    fn test_perfect_information_bias() {
        let oracle = StandardOracle;
        let rich = vec![hand(&[13, 13, 10, 5])];
        let low = oracle.classify(&[card(4, 1)]).unwrap();
        let lead = EvalContext::new(None, 0, SeatRole::Searcher).with_visible_opponents(&rich);
        assert_eq!(perfect_information_bias(&oracle, &low, &lead), BAIT_BONUS);

        let blind = EvalContext::new(None, 0, SeatRole::Searcher);
        assert_eq!(perfect_information_bias(&oracle, &low, &blind), 0);

        let opponent = EvalContext::new(None, 0, SeatRole::Opponent).with_visible_opponents(&rich);
        assert_eq!(perfect_information_bias(&oracle, &low, &opponent), 0);
    }

    #[test]
    fn test_invalid_actions() {
        let oracle = StandardOracle;
        let hand = hand(&[3, 4]);
        let ctx = EvalContext::new(None, 0, SeatRole::Searcher);
        assert_eq!(evaluate_action(&oracle, &hand, &hand, &ctx), INVALID_ACTION_SCORE);
        assert_eq!(evaluate_action(&oracle, &[], &hand, &ctx), INVALID_ACTION_SCORE);
        assert_eq!(evaluate_action(&oracle, &[card(9, 99)], &hand, &ctx), INVALID_ACTION_SCORE);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let oracle = StandardOracle;
        let hand = hand(&[5, 5, 9, 10, 13, 13, 13]);
        let ctx = EvalContext::new(None, 10, SeatRole::Searcher);
        for action in oracle.legal_beats(&hand, None) {
            let a = evaluate_action(&oracle, &action, &hand, &ctx);
            let b = evaluate_action(&oracle, &action, &hand, &ctx);
            assert_eq!(a, b);
        }
    }
}
