//! Individual search integration tests.

use guozha_mcts::core::{contains_all, full_deck, Card, GameRng, Rank, Suit};
use guozha_mcts::mcts::{choose_individual_play, IndividualSearch, SearchConfig};
use guozha_mcts::rules::{PlayOracle, StandardOracle};
use guozha_mcts::strategy::{build_strategy, StrategyKind};
use guozha_mcts::team::{TeamConfig, TeamSearch, TeamWeights};
use guozha_mcts::SearchError;

fn card(rank: u8, id: u32) -> Card {
    Card::new(Suit::NORMAL[(id % 4) as usize], Rank(rank), id)
}

fn hand(ranks: &[u8]) -> Vec<Card> {
    ranks
        .iter()
        .enumerate()
        .map(|(i, &r)| card(r, i as u32))
        .collect()
}

/// Deal `per_seat` cards to each of `seats` seats from one shuffled deck.
fn deal(seats: usize, per_seat: usize, seed: u64) -> Vec<Vec<Card>> {
    let mut deck = full_deck(2, 0);
    GameRng::new(seed).shuffle(&mut deck);
    (0..seats)
        .map(|s| deck[s * per_seat..(s + 1) * per_seat].to_vec())
        .collect()
}

// =============================================================================
// Basic Search Tests
// =============================================================================

#[test]
fn test_search_returns_legal_lead() {
    let h = hand(&[3, 4, 4, 8, 10, 13, 14]);
    let config = SearchConfig::default().with_iterations(60).with_seed(42);

    let play = choose_individual_play(&h, None, &config).unwrap().unwrap();

    assert!(contains_all(&h, &play));
    assert!(StandardOracle.classify(&play).is_some());
}

#[test]
fn test_search_follow_beats_table() {
    let h = hand(&[3, 6, 9, 9, 12]);
    let last = StandardOracle.classify(&[card(7, 200)]).unwrap();
    let config = SearchConfig::default().with_iterations(60).with_seed(1);

    let play = choose_individual_play(&h, Some(&last), &config).unwrap();

    // Passing is allowed, but any play must beat the single 7.
    if let Some(cards) = play {
        let classified = StandardOracle.classify(&cards).unwrap();
        assert!(StandardOracle.beats(&classified, &last));
        assert!(contains_all(&h, &cards));
    }
}

#[test]
fn test_search_passes_without_beats() {
    let h = hand(&[3, 4, 5]);
    let last = StandardOracle.classify(&[card(17, 200)]).unwrap();
    let config = SearchConfig::default().with_iterations(30).with_seed(3);

    assert_eq!(choose_individual_play(&h, Some(&last), &config), Ok(None));
}

#[test]
fn test_empty_hand_passes() {
    let config = SearchConfig::default().with_seed(3);
    assert_eq!(choose_individual_play(&[], None, &config), Ok(None));
}

// =============================================================================
// Determinism Tests
// =============================================================================

#[test]
fn test_search_deterministic_with_seed() {
    let h = hand(&[3, 5, 5, 7, 9, 11, 11, 11, 14]);
    let config = SearchConfig::default()
        .with_iterations(80)
        .with_player_count(4)
        .with_time_budget_ms(60_000)
        .with_seed(12345);

    let a = choose_individual_play(&h, None, &config).unwrap();
    let b = choose_individual_play(&h, None, &config).unwrap();

    assert_eq!(a, b, "Same seed should produce same play");
}

#[test]
fn test_search_stats() {
    let h = hand(&[3, 5, 5, 7, 9, 11, 14]);
    let config = SearchConfig::default()
        .with_iterations(50)
        .with_time_budget_ms(60_000)
        .with_seed(9);
    let mut search = IndividualSearch::standard(config).unwrap();

    search.search(&h, None);

    let stats = search.stats();
    assert_eq!(stats.iterations, 50);
    assert!(stats.nodes_expanded > 0, "Should expand some nodes");
    assert!(stats.simulations > 0, "Should run some simulations");
    assert!(!stats.timed_out);

    let tree = search.tree_stats().unwrap();
    assert_eq!(tree.root_visits, 50);
    assert!(tree.node_count > 1);
    assert_eq!(tree.max_depth, 1);
}

#[test]
fn test_zero_time_budget_still_answers() {
    let h = hand(&[3, 5, 5, 7, 9, 11, 14]);
    let config = SearchConfig::default()
        .with_iterations(10_000)
        .with_time_budget_ms(0)
        .with_seed(4);
    let mut search = IndividualSearch::standard(config).unwrap();

    let play = search.search(&h, None);

    assert!(play.is_some());
    assert!(search.stats().timed_out);
    assert!(search.stats().iterations < 10_000);
}

#[test]
fn test_unbounded_iterations_end_on_time_budget() {
    let h = deal(4, 13, 21).swap_remove(0);
    let config = SearchConfig::default()
        .with_player_count(4)
        .with_iterations(u32::MAX)
        .with_time_budget_ms(40)
        .with_seed(2);
    let mut search = IndividualSearch::standard(config).unwrap();

    let play = search.search(&h, None).unwrap();

    assert!(contains_all(&h, &play));
    assert!(search.stats().timed_out);
    assert!(search.stats().iterations < u32::MAX);
}

#[test]
fn test_team_mode_needs_team_driver() {
    let weights = TeamWeights {
        team_score_weight: 1.5,
        cooperation_weight: 1.0,
        strategic_pass_weight: 1.0,
        big_card_preservation_bonus: 30.0,
        teammate_support_bonus: 40.0,
        long_term_strategy_weight: 0.5,
    };
    let config = SearchConfig::default()
        .with_player_count(4)
        .with_team(TeamConfig::alternating(4).unwrap(), weights)
        .with_seed(1);

    assert_eq!(
        choose_individual_play(&hand(&[3, 9]), None, &config).unwrap_err(),
        SearchError::SearchModeMismatch { driver: "individual", team_mode: true }
    );
    assert!(build_strategy(StrategyKind::Mcts, &config).is_err());

    let mut individual = config;
    individual.team_mode = false;
    assert!(matches!(
        TeamSearch::standard(individual).err(),
        Some(SearchError::SearchModeMismatch { driver: "team", .. })
    ));
}

// =============================================================================
// Information Mode Tests
// =============================================================================

#[test]
fn test_perfect_information_search() {
    let hands = deal(4, 12, 77);
    let config = SearchConfig::default()
        .with_iterations(60)
        .with_player_count(4)
        .with_seed(5)
        .with_perfect_information(hands.clone());

    let play = choose_individual_play(&hands[0], None, &config)
        .unwrap()
        .unwrap();
    assert!(contains_all(&hands[0], &play));
}

#[test]
fn test_perfect_information_requires_hands() {
    let mut config = SearchConfig::default().with_player_count(4);
    config.perfect_information = true;

    assert_eq!(
        choose_individual_play(&hand(&[3, 4]), None, &config),
        Err(SearchError::MissingPlayerHands)
    );
}

#[test]
fn test_hand_counts_must_match_seats() {
    let config = SearchConfig::default()
        .with_player_count(4)
        .with_hand_counts(vec![5, 5, 5]);

    assert_eq!(
        choose_individual_play(&hand(&[3, 4]), None, &config),
        Err(SearchError::PlayerCountMismatch { expected: 4, actual: 3 })
    );
}

#[test]
fn test_large_hand_throttles_iterations() {
    let hands = deal(2, 34, 8);
    let config = SearchConfig::default()
        .with_iterations(100)
        .with_time_budget_ms(60_000)
        .with_seed(6)
        .with_hand_counts(vec![34, 34]);
    let mut search = IndividualSearch::standard(config).unwrap();

    search.search(&hands[0], None);

    assert_eq!(search.stats().iterations, 60);
}

// =============================================================================
// Strategy Tests
// =============================================================================

#[test]
fn test_strategies_agree_on_forced_play() {
    let h = hand(&[3, 4, 13]);
    let last = StandardOracle.classify(&[card(12, 300)]).unwrap();
    let config = SearchConfig::default().with_iterations(20).with_seed(2);

    for name in ["mcts", "heuristic", "simple:aggressive", "simple:conservative"] {
        let kind: StrategyKind = name.parse().unwrap();
        let mut strategy = build_strategy(kind, &config).unwrap();
        let play = strategy.choose_play(&h, Some(&last)).unwrap();
        assert_eq!(play.len(), 1, "{name}");
        assert_eq!(play[0].rank, Rank::KING, "{name}");
    }
}

#[test]
fn test_unknown_strategy_rejected() {
    assert_eq!(
        "random".parse::<StrategyKind>(),
        Err(SearchError::UnknownStrategy("random".into()))
    );
}
