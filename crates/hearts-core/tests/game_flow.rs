use hearts_core::game::config::GameConfig;
use hearts_core::game::report::GameReport;
use hearts_core::game::state::{Game, GameError, GamePhase};
use hearts_core::model::card::{Card, STANDARD_POINT_POOL};
use hearts_core::model::deck::{Deal, Dealer, ScriptedDealer};
use hearts_core::model::player::PlayerId;
use hearts_core::model::rank::Rank;
use hearts_core::model::suit::Suit;
use hearts_core::protocol::{Notification, RoundSummary, pending_request};

fn seat(raw: u32) -> PlayerId {
    PlayerId::new(raw)
}

fn suit_hand(suit: Suit) -> Vec<Card> {
    Rank::ORDERED.iter().map(|&rank| Card::new(rank, suit)).collect()
}

/// Whoever holds the clubs leads every trick and takes every heart.
fn moon_deal(clubs_seat: usize) -> Deal {
    let mut suits = vec![Suit::Diamonds, Suit::Spades, Suit::Hearts];
    suits.insert(clubs_seat, Suit::Clubs);
    Deal::from_hands(suits.into_iter().map(suit_hand).collect()).unwrap()
}

/// Two point-bearing tricks split between A and D, one point each.
fn split_points_deal() -> Deal {
    use Rank::*;
    let c = Card::new;
    Deal::from_hands(vec![
        vec![c(Two, Suit::Clubs), c(Ace, Suit::Diamonds), c(Nine, Suit::Spades)],
        vec![c(Three, Suit::Clubs), c(Two, Suit::Hearts), c(Three, Suit::Hearts)],
        vec![c(Four, Suit::Clubs), c(Three, Suit::Diamonds), c(Four, Suit::Spades)],
        vec![c(Five, Suit::Clubs), c(Four, Suit::Diamonds), c(Ace, Suit::Spades)],
    ])
    .unwrap()
}

fn seated<D: Dealer>(mut game: Game<D>) -> Game<D> {
    for name in ["A", "B", "C", "D"] {
        game.add_player(name).unwrap();
    }
    game
}

/// Answers every request with its first legal card; returns everything emitted.
fn autoplay<D: Dealer>(game: &mut Game<D>, first: Vec<Notification>) -> Vec<Notification> {
    let mut log = Vec::new();
    let mut notes = first;
    while let Some(request) = pending_request(&notes).cloned() {
        log.append(&mut notes);
        notes = game
            .play_card(request.player, request.legal_cards[0])
            .unwrap();
    }
    log.append(&mut notes);
    log
}

fn round_summaries(log: &[Notification]) -> Vec<&RoundSummary> {
    log.iter()
        .filter_map(|note| match note {
            Notification::RoundCompleted(summary) => Some(summary),
            _ => None,
        })
        .collect()
}

#[test]
fn shooting_the_moon_gives_everyone_else_the_pool() {
    let dealer = ScriptedDealer::new([moon_deal(2)]);
    let mut game = seated(Game::with_dealer(
        GameConfig::default().with_target_score(26),
        dealer,
    ));
    let first = game.start().unwrap();
    let log = autoplay(&mut game, first);

    let summaries = round_summaries(&log);
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].score.moon_shooter, Some(seat(3)));
    assert_eq!(summaries[0].score.taken_by(seat(3)), STANDARD_POINT_POOL);
    assert_eq!(
        summaries[0].standings,
        vec![(seat(1), 26), (seat(2), 26), (seat(3), 0), (seat(4), 26)]
    );
    assert_eq!(game.leaders(), vec![seat(3)]);
}

#[test]
fn crossing_the_threshold_ends_the_game() {
    let dealer = ScriptedDealer::new([split_points_deal(), moon_deal(1), moon_deal(0)]);
    let mut game = seated(Game::with_dealer(
        GameConfig::default().with_target_score(25),
        dealer,
    ));
    let first = game.start().unwrap();
    let log = autoplay(&mut game, first);

    let summaries = round_summaries(&log);
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].score.moon_shooter, None);
    assert_eq!(
        summaries[0].standings,
        vec![(seat(1), 1), (seat(2), 0), (seat(3), 0), (seat(4), 1)]
    );
    assert_eq!(
        summaries[1].standings,
        vec![(seat(1), 27), (seat(2), 0), (seat(3), 26), (seat(4), 27)]
    );

    assert_eq!(log.last(), Some(&Notification::GameCompleted));
    assert_eq!(game.phase(), GamePhase::Complete);
    assert_eq!(game.rounds().len(), 2);
    assert!(game.pending_request().is_none());
    assert_eq!(
        game.play_card(seat(2), Card::new(Rank::Two, Suit::Clubs)),
        Err(GameError::NoActiveRound)
    );

    let report = GameReport::capture(&game);
    assert_eq!(report.winners, vec![seat(2)]);
    assert_eq!(report.moons(), 1);
    assert_eq!(report.rounds[0].point_pool, 2);
}

#[test]
fn round_start_follows_every_round_below_threshold() {
    let dealer = ScriptedDealer::new([moon_deal(0), moon_deal(1), moon_deal(2), moon_deal(3)]);
    let mut game = seated(Game::with_dealer(
        GameConfig::default().with_target_score(60),
        dealer,
    ));
    let first = game.start().unwrap();
    let log = autoplay(&mut game, first);

    // Nobody passes 52 before the third round.
    let summaries = round_summaries(&log);
    assert_eq!(summaries.len(), 3);
    for (idx, note) in log.iter().enumerate() {
        if let Notification::RoundCompleted(summary) = note {
            let next = log.get(idx + 1);
            if summary.standings.iter().any(|&(_, score)| score >= 60) {
                assert_eq!(next, Some(&Notification::GameCompleted));
            } else {
                assert!(matches!(next, Some(Notification::TurnRequested(_))));
            }
        }
    }
    assert_eq!(
        game.standings(),
        vec![(seat(1), 52), (seat(2), 52), (seat(3), 52), (seat(4), 78)]
    );
}

#[test]
fn seeded_games_replay_identically() {
    let play = |seed| {
        let mut game = seated(Game::new(
            GameConfig::default().with_seed(seed).with_target_score(50),
        ));
        let first = game.start().unwrap();
        autoplay(&mut game, first);
        GameReport::to_json(&game).unwrap()
    };
    assert_eq!(play(77), play(77));
}
