//! Thread-safe handle around a [`Game`].
//!
//! Plays may arrive from several threads (one per connected agent). The lock
//! makes each `play_card` atomic with respect to the others, so validation and
//! mutation never interleave.

use crate::game::state::{Game, GameError};
use crate::model::card::Card;
use crate::model::deck::{Dealer, ShuffledDealer};
use crate::model::player::PlayerId;
use crate::protocol::{Notification, TurnRequest};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug)]
pub struct SharedGame<D = ShuffledDealer> {
    inner: Arc<Mutex<Game<D>>>,
}

impl<D> Clone for SharedGame<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: Dealer> SharedGame<D> {
    pub fn new(game: Game<D>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(game)),
        }
    }

    pub fn add_player(&self, name: impl Into<String>) -> Result<PlayerId, GameError> {
        self.inner.lock().add_player(name)
    }

    pub fn start(&self) -> Result<Vec<Notification>, GameError> {
        self.inner.lock().start()
    }

    pub fn submit_play(&self, player: PlayerId, card: Card) -> Result<Vec<Notification>, GameError> {
        self.inner.lock().play_card(player, card)
    }

    pub fn redeal(&self) -> Result<Vec<Notification>, GameError> {
        self.inner.lock().redeal()
    }

    pub fn pending_request(&self) -> Option<TurnRequest> {
        self.inner.lock().pending_request()
    }

    pub fn is_complete(&self) -> bool {
        self.inner.lock().is_complete()
    }

    /// Runs `f` against the game while holding the lock.
    pub fn with<R>(&self, f: impl FnOnce(&Game<D>) -> R) -> R {
        f(&self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::SharedGame;
    use crate::game::config::GameConfig;
    use crate::game::state::{Game, GameError};
    use crate::model::trick::PlayError;
    use std::thread;

    #[test]
    fn concurrent_seats_play_to_completion() {
        let shared = SharedGame::new(Game::new(
            GameConfig::default().with_seed(31).with_target_score(40),
        ));
        let ids: Vec<_> = ["north", "east", "south", "west"]
            .into_iter()
            .map(|name| shared.add_player(name).unwrap())
            .collect();
        shared.start().unwrap();

        let workers: Vec<_> = ids
            .into_iter()
            .map(|id| {
                let game = shared.clone();
                thread::spawn(move || {
                    let mut played = 0usize;
                    while !game.is_complete() {
                        let Some(request) = game.pending_request() else {
                            continue;
                        };
                        if request.player != id {
                            thread::yield_now();
                            continue;
                        }
                        match game.submit_play(id, request.legal_cards[0]) {
                            Ok(_) => played += 1,
                            Err(GameError::Play(PlayError::OutOfTurn { .. })) => {}
                            Err(err) => panic!("unexpected error: {err}"),
                        }
                    }
                    played
                })
            })
            .collect();

        let plays: usize = workers.into_iter().map(|w| w.join().unwrap()).sum();
        let rounds = shared.with(|game| game.rounds().len());
        assert!(shared.is_complete());
        assert_eq!(plays, rounds * 52);
        assert!(shared.with(|game| game.standings().iter().any(|&(_, s)| s >= 40)));
    }
}
