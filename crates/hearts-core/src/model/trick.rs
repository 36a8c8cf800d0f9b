use crate::model::card::Card;
use crate::model::player::{Player, PlayerId};
use crate::model::suit::Suit;
use crate::protocol::TurnRequest;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Trick {
    order: Vec<PlayerId>,
    plays: Vec<Play>,
    opening_card: Option<Card>,
    hearts_broken: bool,
    outcome: Option<TrickOutcome>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub player: PlayerId,
    pub card: Card,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickOutcome {
    pub winner: PlayerId,
    pub points: u32,
}

/// Result of one accepted play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrickProgress {
    pub hearts_broken: bool,
    pub outcome: Option<TrickOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("trick already complete")]
    TrickComplete,
    #[error("round already complete")]
    RoundComplete,
    #[error("{0} is not seated at this table")]
    UnknownPlayer(PlayerId),
    #[error("expected {expected} to play next but got {actual}")]
    OutOfTurn {
        expected: PlayerId,
        actual: PlayerId,
    },
    #[error("{card} cannot be played: {reason}")]
    IllegalCard {
        card: Card,
        reason: IllegalCardReason,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IllegalCardReason {
    #[error("card is not in hand")]
    NotInHand,
    #[error("the round must open with {0}")]
    MustLeadOpeningCard(Card),
    #[error("must follow {0}")]
    MustFollowSuit(Suit),
    #[error("hearts have not been broken")]
    HeartsNotBroken,
}

impl Trick {
    pub fn new(order: Vec<PlayerId>, hearts_broken: bool) -> Self {
        Self {
            plays: Vec::with_capacity(order.len()),
            order,
            opening_card: None,
            hearts_broken,
            outcome: None,
        }
    }

    /// First trick of a round: `order` starts with the holder of `opening_card`,
    /// who must lead it.
    pub fn opening(order: Vec<PlayerId>, opening_card: Card) -> Self {
        Self {
            opening_card: Some(opening_card),
            ..Self::new(order, false)
        }
    }

    pub fn leader(&self) -> Option<PlayerId> {
        self.order.first().copied()
    }

    pub fn order(&self) -> &[PlayerId] {
        &self.order
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn lead_suit(&self) -> Option<Suit> {
        self.plays.first().map(|play| play.card.suit)
    }

    pub fn is_complete(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn hearts_broken(&self) -> bool {
        self.hearts_broken
    }

    pub fn current_player(&self) -> Option<PlayerId> {
        if self.is_complete() {
            return None;
        }
        self.order.get(self.plays.len()).copied()
    }

    pub fn outcome(&self) -> Option<TrickOutcome> {
        self.outcome
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.outcome.map(|outcome| outcome.winner)
    }

    pub fn points(&self) -> Option<u32> {
        self.outcome.map(|outcome| outcome.points)
    }

    /// Cards `player` may play right now. Rules apply in order; the first that
    /// matches decides.
    pub fn legal_cards(&self, player: &Player) -> Vec<Card> {
        let hand = player.hand();

        if let Some(opening) = self.opening_card
            && self.plays.is_empty()
            && self.current_player() == Some(player.id())
            && hand.contains(opening)
        {
            return vec![opening];
        }

        if hand.is_all_hearts() {
            return hand.cards().to_vec();
        }

        let without_hearts = || -> Vec<Card> {
            hand.iter()
                .copied()
                .filter(|card| !card.suit.is_heart())
                .collect()
        };

        match self.lead_suit() {
            None if self.hearts_broken => hand.cards().to_vec(),
            None => without_hearts(),
            Some(lead) if hand.has_suit(lead) => hand
                .iter()
                .copied()
                .filter(|card| card.suit == lead)
                .collect(),
            Some(_) if self.hearts_broken => hand.cards().to_vec(),
            Some(_) => without_hearts(),
        }
    }

    pub fn turn_request(&self, player: &Player) -> TurnRequest {
        TurnRequest {
            player: player.id(),
            cards_played: self.plays.clone(),
            leading_suit: self.lead_suit(),
            legal_cards: self.legal_cards(player),
        }
    }

    /// Validates before touching any state, so a rejected play leaves both the
    /// trick and the player's hand as they were.
    pub fn play(&mut self, player: &mut Player, card: Card) -> Result<TrickProgress, PlayError> {
        let expected = self.current_player().ok_or(PlayError::TrickComplete)?;
        if expected != player.id() {
            return Err(PlayError::OutOfTurn {
                expected,
                actual: player.id(),
            });
        }

        if !self.legal_cards(player).contains(&card) {
            return Err(PlayError::IllegalCard {
                card,
                reason: self.rejection_reason(player, card),
            });
        }

        player.give_up(card);
        self.plays.push(Play {
            player: player.id(),
            card,
        });
        if card.breaks_hearts() {
            self.hearts_broken = true;
        }

        if self.plays.len() == self.order.len() {
            self.outcome = self.resolve();
        }

        Ok(TrickProgress {
            hearts_broken: self.hearts_broken,
            outcome: self.outcome,
        })
    }

    fn resolve(&self) -> Option<TrickOutcome> {
        let lead_suit = self.lead_suit()?;
        let winner = self
            .plays
            .iter()
            .filter(|play| play.card.suit == lead_suit)
            .max_by_key(|play| play.card.rank)?
            .player;
        let points = self.plays.iter().map(|play| play.card.points()).sum();
        Some(TrickOutcome { winner, points })
    }

    fn rejection_reason(&self, player: &Player, card: Card) -> IllegalCardReason {
        let hand = player.hand();
        if !hand.contains(card) {
            return IllegalCardReason::NotInHand;
        }
        if let Some(opening) = self.opening_card
            && self.plays.is_empty()
            && hand.contains(opening)
        {
            return IllegalCardReason::MustLeadOpeningCard(opening);
        }
        match self.lead_suit() {
            Some(lead) if hand.has_suit(lead) => IllegalCardReason::MustFollowSuit(lead),
            _ => IllegalCardReason::HeartsNotBroken,
        }
    }
}
