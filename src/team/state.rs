//! Team-mode game state.
//!
//! [`TeamTableView`] is what the host knows about the table when asking for a
//! decision. [`TeamState`] is the concrete world a team search works on: the
//! view plus sampled (or, with perfect information, real) hidden hands.

use crate::core::{contains_all, Card, GameRng, Play};
use crate::mcts::estimator::estimate_hands;
use crate::mcts::state::{SimState, AI_SEAT};
use crate::mcts::{SearchConfig, TeamAction};
use crate::rules::PlayOracle;

use super::config::TeamId;

/// Public table information handed in by the host.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TeamTableView {
    /// Play currently on the table.
    pub last_play: Option<Play>,
    /// Seat that made `last_play`.
    pub last_player: Option<usize>,
    /// Points in the open trick.
    pub round_score: i32,
    /// Cards held by each seat. Empty when unknown.
    pub hand_counts: Vec<usize>,
    /// Points already banked, indexed by team id.
    pub team_scores: [i32; 2],
    /// Whether the searching seat may pass.
    pub can_pass: bool,
    /// Cards already out of play.
    pub played_cards: Vec<Card>,
}

impl TeamTableView {
    /// The searching seat leads a fresh trick.
    #[must_use]
    pub fn lead() -> Self {
        Self::default()
    }

    /// The searching seat answers `play` made by `seat`.
    #[must_use]
    pub fn follow(play: Play, seat: usize) -> Self {
        Self {
            last_play: Some(play),
            last_player: Some(seat),
            can_pass: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_round_score(mut self, score: i32) -> Self {
        self.round_score = score;
        self
    }

    #[must_use]
    pub fn with_hand_counts(mut self, counts: Vec<usize>) -> Self {
        self.hand_counts = counts;
        self
    }

    #[must_use]
    pub fn with_team_scores(mut self, scores: [i32; 2]) -> Self {
        self.team_scores = scores;
        self
    }

    #[must_use]
    pub fn with_played_cards(mut self, cards: Vec<Card>) -> Self {
        self.played_cards = cards;
        self
    }

    /// Cards nobody else can hold: `hand`, the table play and the played cards.
    #[must_use]
    pub fn known_cards(&self, hand: &[Card]) -> Vec<Card> {
        let mut known = hand.to_vec();
        if let Some(play) = &self.last_play {
            known.extend_from_slice(play.cards());
        }
        known.extend_from_slice(&self.played_cards);
        known
    }
}

/// A concrete team-mode world.
#[derive(Clone, Debug)]
pub struct TeamState {
    pub table: SimState,
    /// Team of each seat.
    pub seat_teams: Vec<TeamId>,
    /// Points banked before this search, indexed by team id.
    pub base_team_scores: [i32; 2],
    /// Whether the seat to move may pass.
    pub can_pass: bool,
    pub last_pass_player: Option<usize>,
}

impl TeamState {
    #[must_use]
    pub fn new(
        table: SimState,
        seat_teams: Vec<TeamId>,
        base_team_scores: [i32; 2],
        can_pass: bool,
    ) -> Self {
        Self {
            table,
            seat_teams,
            base_team_scores,
            can_pass,
            last_pass_player: None,
        }
    }

    /// Build a world from the host's view, the searching hand and the config.
    ///
    /// Hidden hands come from `all_player_hands` under perfect information and
    /// are sampled from `deck` otherwise. Public counts in the view win over
    /// the config's `hand_counts`; without either, a hidden hand matches `hand`.
    pub fn from_view(
        hand: &[Card],
        view: &TeamTableView,
        config: &SearchConfig,
        seat_teams: Vec<TeamId>,
        deck: &[Card],
        rng: &mut GameRng,
    ) -> Self {
        let seats = seat_teams.len();
        let mut hands = vec![Vec::new(); seats];
        hands[AI_SEAT] = hand.to_vec();

        match config.all_player_hands.as_ref() {
            Some(all) if config.perfect_information => {
                for (seat, cards) in all.iter().enumerate().skip(1).take(seats - 1) {
                    hands[seat] = cards.clone();
                }
            }
            _ => {
                let known = view.known_cards(hand);
                let size_of = |seat: usize| {
                    view.hand_counts
                        .get(seat)
                        .copied()
                        .unwrap_or_else(|| config.hand_count(seat, hand.len()))
                };
                for (seat, cards) in estimate_hands(&known, deck, 1..seats, size_of, rng) {
                    hands[seat] = cards;
                }
            }
        }

        let table = SimState::new(hands, AI_SEAT).with_table(
            view.last_play.clone(),
            view.last_player,
            view.round_score,
        );
        Self::new(table, seat_teams, view.team_scores, view.can_pass)
    }

    #[inline]
    #[must_use]
    pub fn current_player(&self) -> usize {
        self.table.current_player
    }

    #[inline]
    #[must_use]
    pub fn team_of(&self, seat: usize) -> TeamId {
        self.seat_teams[seat]
    }

    /// Seats sharing `seat`'s team, excluding `seat`.
    pub fn teammates(&self, seat: usize) -> impl Iterator<Item = usize> + '_ {
        let team = self.team_of(seat);
        (0..self.seat_teams.len()).filter(move |&s| s != seat && self.seat_teams[s] == team)
    }

    #[must_use]
    pub fn ai_team(&self) -> TeamId {
        self.team_of(AI_SEAT)
    }

    /// `last_player` belongs to a team other than `seat`'s.
    #[must_use]
    pub fn last_player_is_opponent(&self, seat: usize) -> bool {
        self.table
            .last_player
            .is_some_and(|last| self.team_of(last) != self.team_of(seat))
    }

    /// Apply `action` for the seat to move. Returns false, leaving the state
    /// untouched, when the action is not legal here.
    pub fn apply<O: PlayOracle + ?Sized>(&mut self, oracle: &O, action: &TeamAction) -> bool {
        let seat = self.current_player();
        match action {
            TeamAction::Play { cards } => {
                if !contains_all(self.table.hand(seat), cards) {
                    return false;
                }
                let Some(play) = oracle.playable(cards, self.table.last_play.as_ref()) else {
                    return false;
                };
                self.table.apply_play(play);
            }
            TeamAction::Pass { .. } => {
                if self.table.last_play.is_none() {
                    return false;
                }
                self.last_pass_player = Some(seat);
                self.table.apply_pass();
            }
        }
        self.can_pass = self.table.last_play.is_some();
        true
    }

    /// Banked score of `team`, base plus everything its seats banked since.
    #[must_use]
    pub fn team_score(&self, team: TeamId) -> i32 {
        let banked: i32 = self
            .table
            .seat_scores
            .iter()
            .zip(&self.seat_teams)
            .filter(|(_, &t)| t == team)
            .map(|(score, _)| score)
            .sum();
        self.base_team_scores.get(team.index()).copied().unwrap_or(0) + banked
    }

    #[must_use]
    pub fn team_scores(&self) -> [i32; 2] {
        [self.team_score(TeamId(0)), self.team_score(TeamId(1))]
    }

    /// Team with the higher score. A tie goes to the team of the seat that
    /// emptied its hand; with no such seat there is no winner.
    #[must_use]
    pub fn winning_team(&self) -> Option<TeamId> {
        let [a, b] = self.team_scores();
        match a.cmp(&b) {
            std::cmp::Ordering::Greater => Some(TeamId(0)),
            std::cmp::Ordering::Less => Some(TeamId(1)),
            std::cmp::Ordering::Equal => self.table.winner.map(|seat| self.team_of(seat)),
        }
    }

    /// Redeal every hidden hand at its current size from `deck − known − played`.
    pub fn resample_hidden(&mut self, known: &[Card], deck: &[Card], rng: &mut GameRng) {
        let mut excluded = known.to_vec();
        excluded.extend_from_slice(&self.table.played);
        excluded.extend_from_slice(self.table.hand(AI_SEAT));
        if let Some(play) = &self.table.last_play {
            excluded.extend_from_slice(play.cards());
        }

        let sizes: Vec<usize> = self.table.hands.iter().map(Vec::len).collect();
        let seats = sizes.len();
        for (seat, cards) in estimate_hands(&excluded, deck, 1..seats, |s| sizes[s], rng) {
            self.table.hands[seat] = cards;
        }
    }
}
