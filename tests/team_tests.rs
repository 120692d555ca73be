//! Team search integration tests.

use guozha_mcts::core::{full_deck, Card, GameRng, Rank, Suit};
use guozha_mcts::mcts::{SearchConfig, TeamAction};
use guozha_mcts::rules::{PlayOracle, StandardOracle};
use guozha_mcts::team::{
    choose_team_play, top_team_actions, Team, TeamConfig, TeamId, TeamSearch, TeamTableView,
    TeamWeights,
};
use guozha_mcts::SearchError;

fn card(rank: u8, id: u32) -> Card {
    Card::new(Suit::NORMAL[(id % 4) as usize], Rank(rank), id)
}

fn weights() -> TeamWeights {
    TeamWeights {
        team_score_weight: 1.5,
        cooperation_weight: 1.0,
        strategic_pass_weight: 1.0,
        big_card_preservation_bonus: 30.0,
        teammate_support_bonus: 40.0,
        long_term_strategy_weight: 0.5,
    }
}

fn team_config(iterations: u32) -> SearchConfig {
    SearchConfig::default()
        .with_player_count(4)
        .with_team(TeamConfig::alternating(4).unwrap(), weights())
        .with_strategic_pass(true)
        .with_iterations(iterations)
        .with_time_budget_ms(60_000)
        .with_seed(31)
}

fn deal(seats: usize, per_seat: usize, seed: u64) -> Vec<Vec<Card>> {
    let mut deck = full_deck(seats, 0);
    GameRng::new(seed).shuffle(&mut deck);
    (0..seats)
        .map(|s| deck[s * per_seat..(s + 1) * per_seat].to_vec())
        .collect()
}

fn in_hand(hand: &[Card], action: &TeamAction) -> bool {
    action.cards().iter().all(|c| hand.iter().any(|h| h.id == c.id))
}

// =============================================================================
// Configuration Tests
// =============================================================================

#[test]
fn test_config_from_option_map() {
    let json = r#"{
        "iterations": 40,
        "playerCount": 4,
        "timeBudgetMs": 60000,
        "seed": 3,
        "teamMode": true,
        "strategicPassEnabled": true,
        "teamConfig": {"teams": [{"id": 0, "seats": [0, 2]}, {"id": 1, "seats": [1, 3]}]},
        "teamScoreWeight": 1.5,
        "cooperationWeight": 1.0,
        "strategicPassWeight": 1.0,
        "bigCardPreservationBonus": 30.0,
        "teammateSupportBonus": 40.0,
        "longTermStrategyWeight": 0.5
    }"#;
    let config: SearchConfig = serde_json::from_str(json).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.team_weights, Some(weights()));

    let hand = deal(4, 10, 1).swap_remove(0);
    let action = choose_team_play(&hand, &TeamTableView::lead(), &config)
        .unwrap()
        .unwrap();
    assert!(in_hand(&hand, &action));
}

#[test]
fn test_partial_weights_are_missing() {
    let json = r#"{
        "playerCount": 4,
        "teamMode": true,
        "teamConfig": {"teams": [{"id": 0, "seats": [0, 2]}, {"id": 1, "seats": [1, 3]}]},
        "teamScoreWeight": 1.5
    }"#;
    let config: SearchConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.validate(), Err(SearchError::MissingTeamWeights));
}

#[test]
fn test_overlapping_teams_rejected() {
    let teams = TeamConfig::new(vec![
        Team { id: TeamId(0), seats: vec![0, 2] },
        Team { id: TeamId(1), seats: vec![2, 3] },
    ]);
    let config = SearchConfig::default()
        .with_player_count(4)
        .with_team(teams, weights());

    assert!(matches!(
        TeamSearch::standard(config).err(),
        Some(SearchError::InvalidTeamConfig(_))
    ));
}

#[test]
fn test_team_action_json_shape() {
    let pass = serde_json::to_value(TeamAction::Pass { strategic: true }).unwrap();
    assert_eq!(pass["type"], "pass");
    assert_eq!(pass["strategic"], true);

    let play = TeamAction::play(vec![card(9, 1)]);
    let back: TeamAction = serde_json::from_str(&serde_json::to_string(&play).unwrap()).unwrap();
    assert_eq!(back, play);
}

// =============================================================================
// Search Tests
// =============================================================================

#[test]
fn test_six_seat_table() {
    let hands = deal(6, 9, 12);
    let config = SearchConfig::default()
        .with_player_count(6)
        .with_team(TeamConfig::alternating(6).unwrap(), weights())
        .with_iterations(40)
        .with_time_budget_ms(60_000)
        .with_seed(8);

    let action = choose_team_play(&hands[0], &TeamTableView::lead(), &config)
        .unwrap()
        .unwrap();
    assert!(!action.is_pass());
    assert!(in_hand(&hands[0], &action));
}

#[test]
fn test_follow_plays_or_passes_legally() {
    let hand = deal(4, 12, 5).swap_remove(0);
    let last = StandardOracle.classify(&[card(6, 900)]).unwrap();
    let view = TeamTableView::follow(last.clone(), 1)
        .with_round_score(20)
        .with_hand_counts(vec![12, 11, 12, 12]);

    let action = choose_team_play(&hand, &view, &team_config(60))
        .unwrap()
        .unwrap();
    match &action {
        TeamAction::Play { cards } => {
            let play = StandardOracle.classify(cards).unwrap();
            assert!(StandardOracle.beats(&play, &last));
            assert!(in_hand(&hand, &action));
        }
        TeamAction::Pass { strategic } => assert!(strategic),
    }
}

#[test]
fn test_team_search_deterministic_with_seed() {
    let hand = deal(4, 8, 6).swap_remove(0);
    let view = TeamTableView::lead().with_team_scores([10, 5]);

    let a = choose_team_play(&hand, &view, &team_config(20)).unwrap();
    let b = choose_team_play(&hand, &view, &team_config(20)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_top_actions_sorted_and_bounded() {
    let hand = deal(4, 12, 7).swap_remove(0);
    let ranked = top_team_actions(&hand, &TeamTableView::lead(), &team_config(60), 4).unwrap();

    assert!(!ranked.is_empty() && ranked.len() <= 4);
    assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    for r in &ranked {
        assert!((0.0..=1.0).contains(&r.win_rate));
        assert!(in_hand(&hand, &r.action));
    }
}

#[test]
fn test_perfect_information_deepens_tree() {
    let hands = deal(4, 6, 9);
    let config = team_config(200).with_perfect_information(hands.clone());
    let mut search = TeamSearch::standard(config).unwrap();

    let action = search.search(&hands[0], &TeamTableView::lead());

    assert!(action.is_some());
    assert!(search.tree_stats().unwrap().max_depth > 1);
}

#[test]
fn test_sampled_tree_stays_shallow() {
    let hand = deal(4, 6, 9).swap_remove(0);
    let mut search = TeamSearch::standard(team_config(100)).unwrap();

    search.search(&hand, &TeamTableView::lead());

    assert_eq!(search.tree_stats().unwrap().max_depth, 1);
}
