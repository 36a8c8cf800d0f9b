use super::{BotParams, card_sort_key, count_cards_in_suit};
use hearts_core::game::state::PLAYER_COUNT;
use hearts_core::model::card::Card;
use hearts_core::model::rank::Rank;
use hearts_core::model::suit::Suit;
use hearts_core::protocol::TurnRequest;
use std::cmp::Ordering;

pub struct PlayPlanner;

impl PlayPlanner {
    /// Scores every legal card and returns the best one. Ties go to the card
    /// that sorts first.
    pub fn choose(request: &TurnRequest, params: &BotParams) -> Option<Card> {
        let legal = &request.legal_cards;
        let mut best: Option<(Card, i32)> = None;

        for &card in legal {
            let score = match request.leading_suit {
                None => lead_score(card, legal, params),
                Some(lead) if card.suit == lead => follow_score(card, request, params),
                Some(_) => slough_score(card, params),
            };

            match best {
                None => best = Some((card, score)),
                Some((best_card, best_score)) => {
                    if score > best_score
                        || (score == best_score
                            && card_sort_key(card).cmp(&card_sort_key(best_card)) == Ordering::Less)
                    {
                        best = Some((card, score));
                    }
                }
            }
        }

        best.map(|(card, _)| card)
    }
}

fn lead_score(card: Card, legal: &[Card], params: &BotParams) -> i32 {
    let mut score = card.rank.value() as i32 * params.lead_rank_mult;
    if card.carries_points() {
        score += params.lead_points_penalty;
    }
    // Leading the top spades invites the queen onto our own trick.
    if card.suit == Suit::Spades && card.rank > Rank::Queen {
        score += params.lead_high_spade_penalty;
    }
    // Short suits are worth clearing so we can slough later.
    if count_cards_in_suit(legal, card.suit) == 1 {
        score += 1;
    }
    score
}

fn follow_score(card: Card, request: &TurnRequest, params: &BotParams) -> i32 {
    let rank = card.rank.value() as i32;
    let Some(winning) = request.winning_card() else {
        return -rank * params.follow_rank_mult;
    };

    if card.rank < winning.rank {
        // Highest card that still ducks; unload the queen under a higher spade.
        return params.follow_duck_bonus
            + rank * params.follow_rank_mult
            + card.points() as i32 * params.slough_points_mult;
    }

    let last_to_play = request.cards_played.len() + 1 == PLAYER_COUNT;
    if last_to_play && request.points_on_table() == 0 && !card.carries_points() {
        return params.follow_clean_take_bonus + rank * params.follow_rank_mult;
    }

    -rank * params.follow_rank_mult - card.points() as i32 * params.slough_points_mult
}

fn slough_score(card: Card, params: &BotParams) -> i32 {
    card.points() as i32 * params.slough_points_mult
        + card.rank.value() as i32 * params.slough_rank_mult
}

#[cfg(test)]
mod tests {
    use super::PlayPlanner;
    use crate::bot::BotParams;
    use hearts_core::model::card::Card;
    use hearts_core::model::player::PlayerId;
    use hearts_core::model::rank::Rank;
    use hearts_core::model::suit::Suit;
    use hearts_core::model::trick::Play;
    use hearts_core::protocol::TurnRequest;

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    fn request(played: &[Card], legal: Vec<Card>) -> TurnRequest {
        TurnRequest {
            player: PlayerId::new(played.len() as u32 + 1),
            cards_played: played
                .iter()
                .enumerate()
                .map(|(idx, &card)| Play {
                    player: PlayerId::new(idx as u32 + 1),
                    card,
                })
                .collect(),
            leading_suit: played.first().map(|card| card.suit),
            legal_cards: legal,
        }
    }

    fn choose(req: &TurnRequest) -> Card {
        PlayPlanner::choose(req, &BotParams::default()).unwrap()
    }

    #[test]
    fn leads_low_and_avoids_points() {
        let req = request(
            &[],
            vec![
                c(Rank::Nine, Suit::Clubs),
                c(Rank::Four, Suit::Diamonds),
                c(Rank::Ace, Suit::Spades),
                c(Rank::Two, Suit::Hearts),
            ],
        );
        assert_eq!(choose(&req), c(Rank::Four, Suit::Diamonds));
    }

    #[test]
    fn ducks_with_highest_card_below_the_winner() {
        let req = request(
            &[c(Rank::Ten, Suit::Diamonds)],
            vec![
                c(Rank::Three, Suit::Diamonds),
                c(Rank::Nine, Suit::Diamonds),
                c(Rank::King, Suit::Diamonds),
            ],
        );
        assert_eq!(choose(&req), c(Rank::Nine, Suit::Diamonds));
    }

    #[test]
    fn drops_queen_under_higher_spade() {
        let req = request(
            &[c(Rank::King, Suit::Spades)],
            vec![c(Rank::Four, Suit::Spades), c(Rank::Queen, Suit::Spades)],
        );
        assert_eq!(choose(&req), c(Rank::Queen, Suit::Spades));
    }

    #[test]
    fn takes_clean_trick_with_highest_card_when_last() {
        let req = request(
            &[
                c(Rank::Two, Suit::Clubs),
                c(Rank::Five, Suit::Clubs),
                c(Rank::Three, Suit::Diamonds),
            ],
            vec![c(Rank::Jack, Suit::Clubs), c(Rank::Ace, Suit::Clubs)],
        );
        assert_eq!(choose(&req), c(Rank::Ace, Suit::Clubs));
    }

    #[test]
    fn plays_lowest_when_forced_to_win_with_points_on_table() {
        let req = request(
            &[c(Rank::Two, Suit::Clubs), c(Rank::Five, Suit::Hearts)],
            vec![c(Rank::Jack, Suit::Clubs), c(Rank::Ace, Suit::Clubs)],
        );
        assert_eq!(choose(&req), c(Rank::Jack, Suit::Clubs));
    }

    #[test]
    fn sloughs_queen_then_hearts_when_void() {
        let legal = vec![
            c(Rank::Ace, Suit::Diamonds),
            c(Rank::Queen, Suit::Spades),
            c(Rank::Ten, Suit::Hearts),
        ];
        let req = request(&[c(Rank::Two, Suit::Clubs)], legal.clone());
        assert_eq!(choose(&req), c(Rank::Queen, Suit::Spades));

        let without_queen: Vec<Card> = legal
            .into_iter()
            .filter(|card| !card.is_queen_of_spades())
            .collect();
        let req = request(&[c(Rank::Two, Suit::Clubs)], without_queen);
        assert_eq!(choose(&req), c(Rank::Ten, Suit::Hearts));
    }

    #[test]
    fn empty_legal_set_yields_none() {
        let req = request(&[], Vec::new());
        assert_eq!(PlayPlanner::choose(&req, &BotParams::default()), None);
    }
}
