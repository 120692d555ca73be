//! Disposable game state owned by a single rollout.
//!
//! `SimState` models just enough of a round to play it out: hands, the play
//! on the table, whose turn it is, and the trick pot. Every rollout works on
//! its own clone, so nothing is shared between rollouts.
//!
//! ## Trick rules
//!
//! - A play removes its cards from the mover's hand, adds its points to the
//!   pot and becomes the table play.
//! - A pass advances the turn. Once every other seat has passed since the last
//!   play, the trick closes: the pot is banked to the last player, the table
//!   clears and play resumes from the seat after them.
//! - A seat that empties its hand banks the pot and ends the round.

use crate::core::{remove_cards, Card, Play};

/// Seat index of the searching player.
pub const AI_SEAT: usize = 0;

#[derive(Clone, Debug)]
pub struct SimState {
    /// Hands indexed by seat.
    pub hands: Vec<Vec<Card>>,
    pub last_play: Option<Play>,
    /// Seat that made `last_play`, when known.
    pub last_player: Option<usize>,
    pub current_player: usize,
    /// Points in the open trick.
    pub round_score: i32,
    /// Points banked by each seat during this rollout.
    pub seat_scores: Vec<i32>,
    /// Consecutive passes since the last play.
    pub passes: usize,
    /// Cards played during this rollout.
    pub played: Vec<Card>,
    pub terminal: bool,
    pub winner: Option<usize>,
}

impl SimState {
    pub fn new(hands: Vec<Vec<Card>>, current_player: usize) -> Self {
        let seats = hands.len();
        Self {
            hands,
            last_play: None,
            last_player: None,
            current_player,
            round_score: 0,
            seat_scores: vec![0; seats],
            passes: 0,
            played: Vec::new(),
            terminal: false,
            winner: None,
        }
    }

    /// Put `play` (made by `last_player`) on the table with `round_score` in the pot.
    pub fn with_table(
        mut self,
        play: Option<Play>,
        last_player: Option<usize>,
        round_score: i32,
    ) -> Self {
        self.last_play = play;
        self.last_player = last_player;
        self.round_score = round_score;
        self
    }

    #[inline]
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.hands.len()
    }

    #[inline]
    #[must_use]
    pub fn hand(&self, seat: usize) -> &[Card] {
        &self.hands[seat]
    }

    #[inline]
    #[must_use]
    pub fn next_seat(&self, seat: usize) -> usize {
        (seat + 1) % self.player_count()
    }

    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.hands.iter().map(Vec::len).sum()
    }

    /// Play `play` for the current seat.
    ///
    /// The caller has already checked the play is legal for that seat.
    pub fn apply_play(&mut self, play: Play) {
        let seat = self.current_player;
        self.hands[seat] = remove_cards(&self.hands[seat], play.cards());
        self.round_score += play.points();
        self.played.extend_from_slice(play.cards());
        self.last_play = Some(play);
        self.last_player = Some(seat);
        self.passes = 0;

        if self.hands[seat].is_empty() {
            self.finish(seat);
        } else {
            self.current_player = self.next_seat(seat);
        }
    }

    /// Pass for the current seat, closing the trick once everyone else has.
    pub fn apply_pass(&mut self) {
        let seat = self.current_player;
        if self.last_play.is_none() {
            self.current_player = self.next_seat(seat);
            return;
        }

        self.passes += 1;
        if self.passes + 1 >= self.player_count() {
            let resume_after = self.last_player.unwrap_or(seat);
            self.bank_pot();
            self.last_play = None;
            self.last_player = None;
            self.passes = 0;
            self.current_player = self.next_seat(resume_after);
        } else {
            self.current_player = self.next_seat(seat);
        }
    }

    /// End the round with `seat` as the winner.
    pub fn finish(&mut self, seat: usize) {
        self.bank_pot();
        self.terminal = true;
        self.winner = Some(seat);
    }

    /// Seat holding the fewest cards; the lowest seat wins ties.
    #[must_use]
    pub fn fewest_cards_seat(&self) -> usize {
        self.hands
            .iter()
            .enumerate()
            .min_by_key(|(_, hand)| hand.len())
            .map_or(AI_SEAT, |(seat, _)| seat)
    }

    fn bank_pot(&mut self) {
        if let Some(seat) = self.last_player {
            self.seat_scores[seat] += self.round_score;
            self.round_score = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Rank, Suit};
    use crate::rules::{PlayOracle, StandardOracle};

    fn card(rank: u8, id: u32) -> Card {
        Card::new(Suit::NORMAL[(id % 4) as usize], Rank(rank), id)
    }

    fn three_seats() -> SimState {
        SimState::new(
            vec![
                vec![card(5, 0), card(9, 1)],
                vec![card(10, 2), card(3, 3)],
                vec![card(4, 4), card(6, 5)],
            ],
            0,
        )
    }

    #[test]
    fn test_play_moves_cards_and_pot() {
        let mut state = three_seats();
        let play = StandardOracle.classify(&[card(5, 0)]).unwrap();
        state.apply_play(play);

        assert_eq!(state.hand(0).len(), 1);
        assert_eq!(state.round_score, 5);
        assert_eq!(state.last_player, Some(0));
        assert_eq!(state.current_player, 1);
        assert_eq!(state.played.len(), 1);
    }

    #[test]
    fn test_all_pass_banks_to_last_player() {
        let mut state = three_seats();
        let play = StandardOracle.classify(&[card(5, 0)]).unwrap();
        state.apply_play(play);
        state.apply_pass();
        assert!(state.last_play.is_some());
        state.apply_pass();

        assert!(state.last_play.is_none());
        assert_eq!(state.seat_scores[0], 5);
        assert_eq!(state.round_score, 0);
        assert_eq!(state.current_player, 1, "play resumes after the trick winner");
    }

    #[test]
    fn test_emptying_hand_finishes() {
        let mut state = SimState::new(vec![vec![card(10, 0)], vec![card(3, 1)]], 0)
            .with_table(None, None, 5);
        let play = StandardOracle.classify(&[card(10, 0)]).unwrap();
        state.apply_play(play);

        assert!(state.terminal);
        assert_eq!(state.winner, Some(0));
        assert_eq!(state.seat_scores[0], 15);
    }

    #[test]
    fn test_fewest_cards_seat() {
        let state = SimState::new(
            vec![vec![card(3, 0), card(4, 1)], vec![card(5, 2)], vec![card(6, 3)]],
            0,
        );
        assert_eq!(state.fewest_cards_seat(), 1);
    }
}
