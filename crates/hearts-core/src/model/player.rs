use crate::model::card::Card;
use crate::model::hand::Hand;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Stable identifier handed out when a player joins a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(u32);

impl PlayerId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    name: String,
    hand: Hand,
    score: u32,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            hand: Hand::new(),
            score: 0,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    /// Cumulative score across every round of the current game.
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn holds(&self, card: Card) -> bool {
        self.hand.contains(card)
    }

    pub(crate) fn receive_hand(&mut self, cards: Vec<Card>) {
        self.hand = Hand::with_cards(cards);
    }

    pub(crate) fn give_up(&mut self, card: Card) -> bool {
        self.hand.remove(card)
    }

    pub(crate) fn add_points(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }
}

pub(crate) fn find_seat(players: &[Player], id: PlayerId) -> Option<usize> {
    players.iter().position(|player| player.id == id)
}
