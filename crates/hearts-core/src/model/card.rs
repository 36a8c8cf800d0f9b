use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Total points carried by a standard 52-card deck: thirteen hearts plus the queen of spades.
pub const STANDARD_POINT_POOL: u32 = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn is_queen_of_spades(self) -> bool {
        matches!(self.rank, Rank::Queen) && matches!(self.suit, Suit::Spades)
    }

    pub const fn points(self) -> u32 {
        if self.is_queen_of_spades() {
            13
        } else if self.suit.is_heart() {
            1
        } else {
            0
        }
    }

    pub const fn carries_points(self) -> bool {
        self.points() > 0
    }

    /// Playing any heart or the queen of spades breaks hearts for the rest of the round.
    pub const fn breaks_hearts(self) -> bool {
        self.carries_points()
    }
}

impl Ord for Card {
    fn cmp(&self, other: &Self) -> Ordering {
        self.suit.cmp(&other.suit).then(self.rank.cmp(&other.rank))
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a card code")]
pub struct ParseCardError(String);

/// Parses codes as printed by `Display` (`QS`, `10H`), case-insensitive. `T`
/// stands for ten and suit symbols such as `♠` are accepted.
impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseCardError(raw.to_string());
        let code = raw.trim().to_ascii_uppercase();
        let mut chars = code.chars();
        let suit = match chars.next_back().ok_or_else(invalid)? {
            'C' | '♣' => Suit::Clubs,
            'D' | '♦' => Suit::Diamonds,
            'S' | '♠' => Suit::Spades,
            'H' | '♥' => Suit::Hearts,
            _ => return Err(invalid()),
        };
        let rank = match chars.as_str() {
            "T" => Rank::Ten,
            text => Rank::ORDERED
                .into_iter()
                .find(|rank| rank.to_string() == text)
                .ok_or_else(invalid)?,
        };
        Ok(Card::new(rank, suit))
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, ParseCardError, Rank, Suit};

    #[test]
    fn queen_of_spades_identified() {
        let card = Card::new(Rank::Queen, Suit::Spades);
        assert!(card.is_queen_of_spades());
        assert!(card.breaks_hearts());
        assert_eq!(card.points(), 13);
    }

    #[test]
    fn regular_card_has_no_points() {
        let card = Card::new(Rank::Ten, Suit::Clubs);
        assert!(!card.carries_points());
        assert_eq!(card.points(), 0);
        assert_eq!(Card::new(Rank::Queen, Suit::Clubs).points(), 0);
    }

    #[test]
    fn hearts_are_one_point() {
        let card = Card::new(Rank::Ace, Suit::Hearts);
        assert!(card.breaks_hearts());
        assert_eq!(card.points(), 1);
    }

    #[test]
    fn cards_order_by_suit_then_rank() {
        let two_spades = Card::new(Rank::Two, Suit::Spades);
        let ace_clubs = Card::new(Rank::Ace, Suit::Clubs);
        assert!(ace_clubs < two_spades);
        assert_eq!(two_spades.to_string(), "2S");
    }

    #[test]
    fn parses_display_codes() {
        for suit in Suit::ALL {
            for rank in Rank::ORDERED {
                let card = Card::new(rank, suit);
                assert_eq!(card.to_string().parse::<Card>(), Ok(card));
            }
        }
        assert_eq!(" qs ".parse::<Card>(), Ok(Card::new(Rank::Queen, Suit::Spades)));
        assert_eq!("th".parse::<Card>(), Ok(Card::new(Rank::Ten, Suit::Hearts)));
        assert_eq!("A♣".parse::<Card>(), Ok(Card::new(Rank::Ace, Suit::Clubs)));
        assert_eq!("1S".parse::<Card>(), Err(ParseCardError("1S".to_string())));
        assert!("QX".parse::<Card>().is_err());
        assert!("".parse::<Card>().is_err());
    }
}
