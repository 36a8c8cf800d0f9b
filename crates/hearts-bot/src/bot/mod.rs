mod play;

pub use play::PlayPlanner;

use crate::policy::{HeuristicPolicy, Policy, RandomPolicy};
use hearts_core::model::card::Card;
use hearts_core::model::suit::Suit;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BotDifficulty {
    /// Uniformly random legal card.
    Random,
    /// First legal card in suit-then-rank order.
    Easy,
    #[default]
    Normal,
}

impl BotDifficulty {
    pub const fn as_str(self) -> &'static str {
        match self {
            BotDifficulty::Random => "random",
            BotDifficulty::Easy => "easy",
            BotDifficulty::Normal => "normal",
        }
    }

    /// Builds a policy for this difficulty. `seed` only matters for `Random`.
    pub fn spawn(self, seed: u64) -> Box<dyn Policy> {
        match self {
            BotDifficulty::Random => Box::new(RandomPolicy::from_seed(seed)),
            BotDifficulty::Easy => Box::new(HeuristicPolicy::easy()),
            BotDifficulty::Normal => Box::new(HeuristicPolicy::normal()),
        }
    }
}

impl fmt::Display for BotDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown bot difficulty '{0}' (expected random, easy or normal)")]
pub struct ParseDifficultyError(String);

impl FromStr for BotDifficulty {
    type Err = ParseDifficultyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(BotDifficulty::Random),
            "easy" | "legacy" => Ok(BotDifficulty::Easy),
            "normal" | "default" | "heuristic" => Ok(BotDifficulty::Normal),
            _ => Err(ParseDifficultyError(raw.to_string())),
        }
    }
}

/// Weights used by [`PlayPlanner`] to rank candidate cards. Higher scores win.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BotParams {
    pub lead_rank_mult: i32,
    pub lead_points_penalty: i32,
    pub lead_high_spade_penalty: i32,
    pub follow_duck_bonus: i32,
    pub follow_rank_mult: i32,
    pub follow_clean_take_bonus: i32,
    pub slough_points_mult: i32,
    pub slough_rank_mult: i32,
}

impl Default for BotParams {
    fn default() -> Self {
        Self {
            lead_rank_mult: -10,
            lead_points_penalty: -200,
            lead_high_spade_penalty: -150,
            follow_duck_bonus: 500,
            follow_rank_mult: 10,
            follow_clean_take_bonus: 300,
            slough_points_mult: 200,
            slough_rank_mult: 10,
        }
    }
}

pub(crate) fn card_sort_key(card: Card) -> (u8, u8) {
    (card.suit as u8, card.rank.value())
}

pub(crate) fn count_cards_in_suit(cards: &[Card], suit: Suit) -> usize {
    cards.iter().filter(|card| card.suit == suit).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearts_core::model::rank::Rank;

    #[test]
    fn difficulty_parses_aliases() {
        assert_eq!("Easy".parse::<BotDifficulty>(), Ok(BotDifficulty::Easy));
        assert_eq!("legacy".parse::<BotDifficulty>(), Ok(BotDifficulty::Easy));
        assert_eq!(" heuristic ".parse::<BotDifficulty>(), Ok(BotDifficulty::Normal));
        assert_eq!("random".parse::<BotDifficulty>(), Ok(BotDifficulty::Random));
        assert!("brutal".parse::<BotDifficulty>().is_err());
        assert_eq!(BotDifficulty::default(), BotDifficulty::Normal);
    }

    #[test]
    fn display_matches_parse() {
        for difficulty in [BotDifficulty::Random, BotDifficulty::Easy, BotDifficulty::Normal] {
            assert_eq!(difficulty.to_string().parse::<BotDifficulty>(), Ok(difficulty));
        }
    }

    #[test]
    fn sort_key_orders_by_suit_then_rank() {
        let low_spade = Card::new(Rank::Two, Suit::Spades);
        let high_diamond = Card::new(Rank::Ace, Suit::Diamonds);
        assert!(card_sort_key(high_diamond) < card_sort_key(low_spade));
        assert_eq!(count_cards_in_suit(&[low_spade, high_diamond], Suit::Spades), 1);
    }
}
