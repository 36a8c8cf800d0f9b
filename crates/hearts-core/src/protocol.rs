//! Messages exchanged between the game state machine and whoever chooses cards.
//!
//! Every mutating call on [`crate::game::state::Game`] returns the notifications it
//! produced, in order. The last [`Notification::TurnRequested`] names the player the
//! game is waiting on; the answer goes back through `Game::play_card`.

use crate::model::card::Card;
use crate::model::deck::DealError;
use crate::model::player::PlayerId;
use crate::model::score::RoundScore;
use crate::model::suit::Suit;
use crate::model::trick::Play;
use serde::{Deserialize, Serialize};

/// A decision point: `player` must answer with one of `legal_cards`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRequest {
    pub player: PlayerId,
    /// Cards already on the table for this trick, in play order.
    pub cards_played: Vec<Play>,
    pub leading_suit: Option<Suit>,
    /// Sorted by suit then rank.
    pub legal_cards: Vec<Card>,
}

impl TurnRequest {
    pub fn allows(&self, card: Card) -> bool {
        self.legal_cards.contains(&card)
    }

    pub fn is_lead(&self) -> bool {
        self.cards_played.is_empty()
    }

    /// Highest card of the leading suit played so far.
    pub fn winning_card(&self) -> Option<Card> {
        let lead = self.leading_suit?;
        self.cards_played
            .iter()
            .map(|play| play.card)
            .filter(|card| card.suit == lead)
            .max_by_key(|card| card.rank)
    }

    pub fn points_on_table(&self) -> u32 {
        self.cards_played.iter().map(|play| play.card.points()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickSummary {
    /// 1-based position of the trick within its round.
    pub number: usize,
    pub plays: Vec<Play>,
    pub winner: PlayerId,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// 1-based position of the round within its game.
    pub number: usize,
    pub score: RoundScore,
    /// Cumulative scores after this round, in seating order.
    pub standings: Vec<(PlayerId, u32)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    TurnRequested(TurnRequest),
    TrickCompleted(TrickSummary),
    RoundCompleted(RoundSummary),
    /// The round scored but the next one could not be dealt. No turn is
    /// pending until `Game::redeal` succeeds.
    DealFailed(DealError),
    GameCompleted,
}

impl Notification {
    pub fn as_turn_request(&self) -> Option<&TurnRequest> {
        match self {
            Notification::TurnRequested(request) => Some(request),
            _ => None,
        }
    }
}

/// The request a batch of notifications leaves the game waiting on, if any.
pub fn pending_request(notifications: &[Notification]) -> Option<&TurnRequest> {
    notifications
        .iter()
        .rev()
        .find_map(Notification::as_turn_request)
}
