use crate::model::card::Card;
use crate::model::deck::{DealError, Dealer};
use crate::model::player::{Player, PlayerId, find_seat};
use crate::model::score::RoundScore;
use crate::model::trick::{PlayError, Trick, TrickOutcome};
use crate::protocol::{TrickSummary, TurnRequest};
use tracing::{Level, event};

#[derive(Debug, Clone)]
pub struct Round {
    seating: Vec<PlayerId>,
    opening_card: Card,
    point_pool: u32,
    tricks: Vec<Trick>,
    hearts_broken: bool,
    score: Option<RoundScore>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundProgress {
    /// The trick is still open.
    Played,
    TrickCompleted(TrickSummary),
    /// The final trick closed the round and scores have been applied.
    RoundCompleted {
        last_trick: TrickSummary,
        score: RoundScore,
    },
}

impl Round {
    /// Deals fresh hands to `players` and opens the first trick, led by whoever
    /// holds the deal's opening card. Nothing is dealt if the deal is invalid.
    pub fn start<D: Dealer + ?Sized>(
        players: &mut [Player],
        dealer: &mut D,
    ) -> Result<Self, DealError> {
        let deal = dealer.deal(players.len())?;
        deal.validate(players.len())?;

        let opening_card = deal.opening_card;
        let point_pool = deal.point_pool();
        let leader_seat = deal
            .hands
            .iter()
            .position(|hand| hand.contains(&opening_card))
            .ok_or(DealError::OpeningCardNotDealt(opening_card))?;

        for (player, cards) in players.iter_mut().zip(deal.hands) {
            player.receive_hand(cards);
        }

        let seating: Vec<PlayerId> = players.iter().map(Player::id).collect();
        let leader = seating[leader_seat];
        let first = Trick::opening(rotate_from(&seating, leader), opening_card);

        event!(
            target: "hearts_core::round",
            Level::DEBUG,
            leader = %leader,
            opening_card = %opening_card,
            point_pool,
            hand_size = players.first().map_or(0, |p| p.hand().len()),
            "round dealt"
        );

        Ok(Self {
            seating,
            opening_card,
            point_pool,
            tricks: vec![first],
            hearts_broken: false,
            score: None,
        })
    }

    pub fn seating(&self) -> &[PlayerId] {
        &self.seating
    }

    pub fn opening_card(&self) -> Card {
        self.opening_card
    }

    /// Sum of the points in every dealt card; the moon award.
    pub fn point_pool(&self) -> u32 {
        self.point_pool
    }

    /// Every trick of the round so far, the open one last.
    pub fn tricks(&self) -> &[Trick] {
        &self.tricks
    }

    pub fn current_trick(&self) -> Option<&Trick> {
        self.tricks.last().filter(|trick| !trick.is_complete())
    }

    pub fn tricks_completed(&self) -> usize {
        self.tricks.iter().filter(|trick| trick.is_complete()).count()
    }

    pub fn is_first_trick(&self) -> bool {
        self.tricks.len() == 1
    }

    pub fn hearts_broken(&self) -> bool {
        self.hearts_broken
    }

    pub fn is_complete(&self) -> bool {
        self.score.is_some()
    }

    pub fn score(&self) -> Option<&RoundScore> {
        self.score.as_ref()
    }

    /// Points carried by the tricks `player` has won so far this round.
    pub fn points_taken(&self, player: PlayerId) -> u32 {
        self.outcomes()
            .filter(|outcome| outcome.winner == player)
            .map(|outcome| outcome.points)
            .sum()
    }

    pub fn current_player(&self) -> Option<PlayerId> {
        self.current_trick().and_then(Trick::current_player)
    }

    pub fn legal_cards(&self, players: &[Player], player: PlayerId) -> Vec<Card> {
        match (self.current_trick(), find_seat(players, player)) {
            (Some(trick), Some(seat)) => trick.legal_cards(&players[seat]),
            _ => Vec::new(),
        }
    }

    pub fn turn_request(&self, players: &[Player]) -> Option<TurnRequest> {
        let trick = self.current_trick()?;
        let seat = find_seat(players, trick.current_player()?)?;
        Some(trick.turn_request(&players[seat]))
    }

    pub fn play_card(
        &mut self,
        players: &mut [Player],
        player: PlayerId,
        card: Card,
    ) -> Result<RoundProgress, PlayError> {
        if self.is_complete() {
            return Err(PlayError::RoundComplete);
        }
        let seat = find_seat(players, player).ok_or(PlayError::UnknownPlayer(player))?;
        let number = self.tricks.len();
        let trick = self.tricks.last_mut().ok_or(PlayError::RoundComplete)?;

        let progress = trick.play(&mut players[seat], card)?;
        self.hearts_broken |= progress.hearts_broken;

        let Some(outcome) = progress.outcome else {
            return Ok(RoundProgress::Played);
        };

        let summary = TrickSummary {
            number,
            plays: trick.plays().to_vec(),
            winner: outcome.winner,
            points: outcome.points,
        };
        event!(
            target: "hearts_core::round",
            Level::DEBUG,
            trick = number,
            winner = %outcome.winner,
            points = outcome.points,
            hearts_broken = self.hearts_broken,
            "trick completed"
        );

        if players.iter().all(|p| p.hand().is_empty()) {
            let score = self.finish(players);
            return Ok(RoundProgress::RoundCompleted {
                last_trick: summary,
                score,
            });
        }

        self.tricks.push(Trick::new(
            rotate_from(&self.seating, outcome.winner),
            self.hearts_broken,
        ));
        Ok(RoundProgress::TrickCompleted(summary))
    }

    fn outcomes(&self) -> impl Iterator<Item = TrickOutcome> + '_ {
        self.tricks.iter().filter_map(Trick::outcome)
    }

    fn finish(&mut self, players: &mut [Player]) -> RoundScore {
        let outcomes: Vec<TrickOutcome> = self.outcomes().collect();
        let score = RoundScore::tally(&self.seating, &outcomes, self.point_pool);
        for player in players.iter_mut() {
            player.add_points(score.awarded_to(player.id()));
        }

        event!(
            target: "hearts_core::round",
            Level::INFO,
            tricks = outcomes.len(),
            moon_shooter = ?score.moon_shooter,
            points_taken = score.total_taken(),
            "round scored"
        );

        self.score = Some(score.clone());
        score
    }
}

/// Turn order for a trick: seating order, starting from `leader`.
fn rotate_from(seating: &[PlayerId], leader: PlayerId) -> Vec<PlayerId> {
    let start = seating.iter().position(|&id| id == leader).unwrap_or(0);
    seating[start..]
        .iter()
        .chain(&seating[..start])
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{Round, RoundProgress, rotate_from};
    use crate::model::card::{Card, STANDARD_POINT_POOL};
    use crate::model::deck::{Deal, DealError, ScriptedDealer, ShuffledDealer};
    use crate::model::player::{Player, PlayerId};
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use crate::model::trick::{IllegalCardReason, PlayError};

    fn roster() -> Vec<Player> {
        ["north", "east", "south", "west"]
            .iter()
            .enumerate()
            .map(|(i, name)| Player::new(PlayerId::new(i as u32 + 1), *name))
            .collect()
    }

    fn suit_hand(suit: Suit) -> Vec<Card> {
        Rank::ORDERED
            .iter()
            .map(|&rank| Card::new(rank, suit))
            .collect()
    }

    /// Plays the lowest legal card for whoever is up until the round ends.
    fn play_out(round: &mut Round, players: &mut [Player]) -> Vec<RoundProgress> {
        let mut events = Vec::new();
        while let Some(request) = round.turn_request(players) {
            let card = request.legal_cards[0];
            events.push(round.play_card(players, request.player, card).unwrap());
        }
        events
    }

    #[test]
    fn dealing_distributes_thirteen_cards_per_player() {
        let mut players = roster();
        let round = Round::start(&mut players, &mut ShuffledDealer::from_seed(3)).unwrap();

        for player in &players {
            assert_eq!(player.hand().len(), 13, "{} should have 13 cards", player.name());
        }
        assert_eq!(round.point_pool(), STANDARD_POINT_POOL);
        assert_eq!(round.tricks().len(), 1);
        assert!(round.is_first_trick());
        assert!(!round.hearts_broken());
    }

    #[test]
    fn leader_holds_two_of_clubs() {
        let mut players = roster();
        let round = Round::start(&mut players, &mut ShuffledDealer::from_seed(99)).unwrap();
        let two_of_clubs = Card::new(Rank::Two, Suit::Clubs);

        let expected = players
            .iter()
            .find(|p| p.holds(two_of_clubs))
            .map(Player::id)
            .expect("two of clubs is dealt");

        assert_eq!(round.current_player(), Some(expected));
        assert_eq!(round.legal_cards(&players, expected), vec![two_of_clubs]);
    }

    #[test]
    fn invalid_deal_leaves_hands_untouched() {
        let mut players = roster();
        let two = Card::new(Rank::Two, Suit::Clubs);
        let deal = Deal::from_hands(vec![vec![two], vec![two], vec![two], vec![two]]).unwrap();
        let err = Round::start(&mut players, &mut ScriptedDealer::new([deal])).unwrap_err();
        assert_eq!(err, DealError::DuplicateCard(two));
        assert!(players.iter().all(|p| p.hand().is_empty()));
    }

    #[test]
    fn full_round_conserves_cards_and_points() {
        let mut players = roster();
        let mut round = Round::start(&mut players, &mut ShuffledDealer::from_seed(11)).unwrap();
        let mut remaining = 52;
        let mut broken_seen = false;

        while let Some(request) = round.turn_request(&players) {
            let card = *request.legal_cards.last().unwrap();
            let progress = round.play_card(&mut players, request.player, card).unwrap();
            if broken_seen {
                assert!(round.hearts_broken(), "hearts broken must not revert");
            }
            broken_seen |= round.hearts_broken();
            if !matches!(progress, RoundProgress::Played) {
                remaining -= 4;
                let held: usize = players.iter().map(|p| p.hand().len()).sum();
                assert_eq!(held, remaining);
            }
        }

        assert!(round.is_complete());
        assert_eq!(round.tricks_completed(), 13);
        let score = round.score().unwrap();
        assert_eq!(score.total_taken(), STANDARD_POINT_POOL);
        let awarded: u32 = players.iter().map(Player::score).sum();
        if score.moon_shooter.is_some() {
            assert_eq!(awarded, 3 * STANDARD_POINT_POOL);
        } else {
            assert_eq!(awarded, STANDARD_POINT_POOL);
        }
    }

    #[test]
    fn winner_leads_next_trick() {
        let mut players = roster();
        let mut round = Round::start(&mut players, &mut ShuffledDealer::from_seed(5)).unwrap();
        for _ in 0..4 {
            let request = round.turn_request(&players).unwrap();
            let card = request.legal_cards[0];
            let progress = round.play_card(&mut players, request.player, card).unwrap();
            if let RoundProgress::TrickCompleted(summary) = progress {
                assert_eq!(round.current_player(), Some(summary.winner));
                assert_eq!(summary.number, 1);
                assert_eq!(summary.plays.len(), 4);
            }
        }
        assert_eq!(round.tricks_completed(), 1);
    }

    #[test]
    fn single_suit_hands_let_clubs_holder_shoot_the_moon() {
        let mut players = roster();
        let deal = Deal::from_hands(vec![
            suit_hand(Suit::Clubs),
            suit_hand(Suit::Diamonds),
            suit_hand(Suit::Spades),
            suit_hand(Suit::Hearts),
        ])
        .unwrap();
        let mut round = Round::start(&mut players, &mut ScriptedDealer::new([deal])).unwrap();

        let events = play_out(&mut round, &mut players);
        match events.last() {
            Some(RoundProgress::RoundCompleted { score, .. }) => {
                assert_eq!(score.moon_shooter, Some(PlayerId::new(1)));
                assert_eq!(score.taken_by(PlayerId::new(1)), 26);
            }
            other => panic!("expected RoundCompleted, got {other:?}"),
        }
        let scores: Vec<u32> = players.iter().map(Player::score).collect();
        assert_eq!(scores, vec![0, 26, 26, 26]);
        assert!(round.tricks().iter().all(|t| t.winner() == Some(PlayerId::new(1))));
    }

    #[test]
    fn unknown_player_and_completed_round_are_rejected() {
        let mut players = roster();
        let deal = Deal::from_hands(vec![
            vec![Card::new(Rank::Two, Suit::Clubs)],
            vec![Card::new(Rank::Three, Suit::Clubs)],
            vec![Card::new(Rank::Four, Suit::Clubs)],
            vec![Card::new(Rank::Five, Suit::Clubs)],
        ])
        .unwrap();
        let mut round = Round::start(&mut players, &mut ScriptedDealer::new([deal])).unwrap();

        assert_eq!(
            round.play_card(&mut players, PlayerId::new(42), Card::new(Rank::Two, Suit::Clubs)),
            Err(PlayError::UnknownPlayer(PlayerId::new(42)))
        );
        assert!(matches!(
            round.play_card(&mut players, PlayerId::new(1), Card::new(Rank::Ace, Suit::Clubs)),
            Err(PlayError::IllegalCard {
                reason: IllegalCardReason::NotInHand,
                ..
            })
        ));

        play_out(&mut round, &mut players);
        assert!(round.is_complete());
        assert_eq!(round.score().unwrap().moon_shooter, None);
        assert_eq!(round.turn_request(&players), None);
        assert_eq!(
            round.play_card(&mut players, PlayerId::new(1), Card::new(Rank::Two, Suit::Clubs)),
            Err(PlayError::RoundComplete)
        );
    }

    #[test]
    fn rotation_starts_at_leader() {
        let seating: Vec<PlayerId> = (1..=4).map(PlayerId::new).collect();
        let order = rotate_from(&seating, PlayerId::new(3));
        let raw: Vec<u32> = order.iter().map(|id| id.get()).collect();
        assert_eq!(raw, vec![3, 4, 1, 2]);
    }
}
