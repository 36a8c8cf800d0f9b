use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::{HashSet, VecDeque};
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.cards.shuffle(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Deals round-robin so each of `players` hands receives the same count.
    /// Cards that would leave the hands uneven stay undealt.
    pub fn deal_round_robin(&self, players: usize) -> Vec<Vec<Card>> {
        let mut hands = vec![Vec::new(); players];
        if players == 0 {
            return hands;
        }
        let dealt = self.cards.len() - self.cards.len() % players;
        for (index, card) in self.cards.iter().take(dealt).enumerate() {
            hands[index % players].push(*card);
        }
        hands
    }
}

/// One round's worth of hands plus the card that must open the first trick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub hands: Vec<Vec<Card>>,
    pub opening_card: Card,
}

impl Deal {
    /// Builds a deal whose opening card is the lowest club dealt (the lowest card
    /// overall when no clubs were dealt).
    pub fn from_hands(hands: Vec<Vec<Card>>) -> Result<Self, DealError> {
        let all = || hands.iter().flatten().copied();
        let opening_card = all()
            .filter(|card| card.suit == Suit::Clubs)
            .min_by_key(|card| card.rank)
            .or_else(|| all().min_by_key(|card| (card.rank, card.suit)))
            .ok_or(DealError::EmptyHands)?;
        Ok(Self {
            hands,
            opening_card,
        })
    }

    pub fn point_pool(&self) -> u32 {
        self.hands.iter().flatten().map(|card| card.points()).sum()
    }

    pub fn validate(&self, players: usize) -> Result<(), DealError> {
        if self.hands.len() != players {
            return Err(DealError::HandCount {
                expected: players,
                found: self.hands.len(),
            });
        }

        let size = self.hands.first().map(Vec::len).unwrap_or(0);
        if size == 0 {
            return Err(DealError::EmptyHands);
        }
        if self.hands.iter().any(|hand| hand.len() != size) {
            return Err(DealError::UnevenHands);
        }

        let mut seen = HashSet::with_capacity(size * players);
        for card in self.hands.iter().flatten() {
            if !seen.insert(*card) {
                return Err(DealError::DuplicateCard(*card));
            }
        }

        if !seen.contains(&self.opening_card) {
            return Err(DealError::OpeningCardNotDealt(self.opening_card));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DealError {
    #[error("expected {expected} hands but the deal produced {found}")]
    HandCount { expected: usize, found: usize },
    #[error("deal left every hand empty")]
    EmptyHands,
    #[error("hands must all hold the same number of cards")]
    UnevenHands,
    #[error("{0} was dealt more than once")]
    DuplicateCard(Card),
    #[error("opening card {0} was not dealt to any player")]
    OpeningCardNotDealt(Card),
    #[error("no scripted deals remain")]
    Exhausted,
}

/// Source of fresh hands at the start of every round.
pub trait Dealer {
    fn deal(&mut self, players: usize) -> Result<Deal, DealError>;
}

/// Shuffles a standard deck for every round.
#[derive(Debug, Clone)]
pub struct ShuffledDealer {
    rng: StdRng,
}

impl ShuffledDealer {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Dealer for ShuffledDealer {
    fn deal(&mut self, players: usize) -> Result<Deal, DealError> {
        let deck = Deck::shuffled(&mut self.rng);
        Deal::from_hands(deck.deal_round_robin(players))
    }
}

/// Hands out a fixed sequence of deals; used to stage specific rounds.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDealer {
    deals: VecDeque<Deal>,
}

impl ScriptedDealer {
    pub fn new(deals: impl IntoIterator<Item = Deal>) -> Self {
        Self {
            deals: deals.into_iter().collect(),
        }
    }

    pub fn push(&mut self, deal: Deal) {
        self.deals.push_back(deal);
    }

    pub fn remaining(&self) -> usize {
        self.deals.len()
    }
}

impl Dealer for ScriptedDealer {
    fn deal(&mut self, _players: usize) -> Result<Deal, DealError> {
        self.deals.pop_front().ok_or(DealError::Exhausted)
    }
}
