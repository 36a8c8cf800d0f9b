use crate::game::config::{ConfigError, GameConfig};
use crate::model::card::Card;
use crate::model::deck::{DealError, Dealer, ShuffledDealer};
use crate::model::player::{Player, PlayerId, find_seat};
use crate::model::round::{Round, RoundProgress};
use crate::model::trick::PlayError;
use crate::protocol::{Notification, RoundSummary, TurnRequest};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{Level, event};

pub const PLAYER_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Players may still join.
    Seating,
    Playing,
    Complete,
}

/// Broad class of a [`GameError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Capacity,
    Config,
    Lifecycle,
    Turn,
    IllegalCard,
    Deal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("a game of hearts seats at most {capacity} players")]
    RosterFull { capacity: usize },
    #[error("the game has already started")]
    AlreadyStarted,
    #[error("a game of hearts needs exactly {expected} players but {found} are seated")]
    WrongPlayerCount { expected: usize, found: usize },
    #[error("there is no round in progress")]
    NoActiveRound,
    #[error("invalid game configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Play(#[from] PlayError),
    #[error("dealer produced an unusable deal: {0}")]
    Deal(#[from] DealError),
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::RosterFull { .. } => ErrorKind::Capacity,
            GameError::Config(_) => ErrorKind::Config,
            GameError::AlreadyStarted
            | GameError::WrongPlayerCount { .. }
            | GameError::NoActiveRound => ErrorKind::Lifecycle,
            GameError::Play(PlayError::OutOfTurn { .. } | PlayError::UnknownPlayer(_)) => {
                ErrorKind::Turn
            }
            GameError::Play(PlayError::IllegalCard { .. }) => ErrorKind::IllegalCard,
            GameError::Play(PlayError::TrickComplete | PlayError::RoundComplete) => {
                ErrorKind::Lifecycle
            }
            GameError::Deal(_) => ErrorKind::Deal,
        }
    }
}

/// A full game: seat four players, start, then feed plays until complete.
///
/// Each mutating call returns the [`Notification`]s it produced. Calls are
/// synchronous and must not overlap; see [`crate::game::shared::SharedGame`]
/// when plays can arrive from several threads. The configuration is checked
/// when the game starts.
#[derive(Debug, Clone)]
pub struct Game<D = ShuffledDealer> {
    config: GameConfig,
    dealer: D,
    players: Vec<Player>,
    rounds: Vec<Round>,
    phase: GamePhase,
    next_player_id: u32,
}

impl Game<ShuffledDealer> {
    pub fn new(config: GameConfig) -> Self {
        let dealer = match config.seed {
            Some(seed) => ShuffledDealer::from_seed(seed),
            None => ShuffledDealer::from_entropy(),
        };
        Self::with_dealer(config, dealer)
    }
}

impl<D: Dealer> Game<D> {
    pub fn with_dealer(config: GameConfig, dealer: D) -> Self {
        Self {
            config,
            dealer,
            players: Vec::with_capacity(PLAYER_COUNT),
            rounds: Vec::new(),
            phase: GamePhase::Seating,
            next_player_id: 0,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == GamePhase::Complete
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        find_seat(&self.players, id).map(|seat| &self.players[seat])
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// The round currently accepting plays.
    pub fn current_round(&self) -> Option<&Round> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        self.rounds.last().filter(|round| !round.is_complete())
    }

    pub fn pending_request(&self) -> Option<TurnRequest> {
        self.current_round()?.turn_request(&self.players)
    }

    pub fn legal_cards(&self, player: PlayerId) -> Vec<Card> {
        self.current_round()
            .map(|round| round.legal_cards(&self.players, player))
            .unwrap_or_default()
    }

    /// Cumulative scores in seating order.
    pub fn standings(&self) -> Vec<(PlayerId, u32)> {
        self.players.iter().map(|p| (p.id(), p.score())).collect()
    }

    /// Players sharing the lowest cumulative score.
    pub fn leaders(&self) -> Vec<PlayerId> {
        let Some(best) = self.players.iter().map(Player::score).min() else {
            return Vec::new();
        };
        self.players
            .iter()
            .filter(|p| p.score() == best)
            .map(Player::id)
            .collect()
    }

    pub fn add_player(&mut self, name: impl Into<String>) -> Result<PlayerId, GameError> {
        if self.phase != GamePhase::Seating {
            return Err(GameError::AlreadyStarted);
        }
        if self.players.len() >= PLAYER_COUNT {
            return Err(GameError::RosterFull {
                capacity: PLAYER_COUNT,
            });
        }

        self.next_player_id += 1;
        let id = PlayerId::new(self.next_player_id);
        let player = Player::new(id, name);
        event!(
            target: "hearts_core::game",
            Level::DEBUG,
            player = %id,
            name = player.name(),
            "player seated"
        );
        self.players.push(player);
        Ok(id)
    }

    pub fn start(&mut self) -> Result<Vec<Notification>, GameError> {
        if self.phase != GamePhase::Seating {
            return Err(GameError::AlreadyStarted);
        }
        if self.players.len() != PLAYER_COUNT {
            return Err(GameError::WrongPlayerCount {
                expected: PLAYER_COUNT,
                found: self.players.len(),
            });
        }
        self.config.validate()?;

        let round = Round::start(&mut self.players, &mut self.dealer)?;
        self.rounds.push(round);
        self.phase = GamePhase::Playing;
        event!(
            target: "hearts_core::game",
            Level::INFO,
            target_score = self.config.target_score,
            "game started"
        );

        Ok(self.turn_notification().into_iter().collect())
    }

    pub fn play_card(
        &mut self,
        player: PlayerId,
        card: Card,
    ) -> Result<Vec<Notification>, GameError> {
        let round = match self.phase {
            GamePhase::Playing => self.rounds.last_mut(),
            _ => None,
        }
        .filter(|round| !round.is_complete())
        .ok_or(GameError::NoActiveRound)?;

        let progress = round.play_card(&mut self.players, player, card)?;

        let mut notifications = Vec::with_capacity(4);
        match progress {
            RoundProgress::Played => {}
            RoundProgress::TrickCompleted(summary) => {
                notifications.push(Notification::TrickCompleted(summary));
            }
            RoundProgress::RoundCompleted { last_trick, score } => {
                notifications.push(Notification::TrickCompleted(last_trick));
                notifications.push(Notification::RoundCompleted(RoundSummary {
                    number: self.rounds.len(),
                    score,
                    standings: self.standings(),
                }));
                if self.reached_target() {
                    self.finish();
                    notifications.push(Notification::GameCompleted);
                    return Ok(notifications);
                }
                match Round::start(&mut self.players, &mut self.dealer) {
                    Ok(round) => self.rounds.push(round),
                    Err(err) => {
                        event!(
                            target: "hearts_core::game",
                            Level::WARN,
                            error = %err,
                            rounds = self.rounds.len(),
                            "next deal failed, waiting for redeal"
                        );
                        notifications.push(Notification::DealFailed(err));
                        return Ok(notifications);
                    }
                }
            }
        }

        notifications.extend(self.turn_notification());
        Ok(notifications)
    }

    /// Deals the next round after a [`Notification::DealFailed`]. Has no effect
    /// while a round is in progress.
    pub fn redeal(&mut self) -> Result<Vec<Notification>, GameError> {
        if self.phase != GamePhase::Playing {
            return Err(GameError::NoActiveRound);
        }
        if self.current_round().is_none() {
            self.rounds
                .push(Round::start(&mut self.players, &mut self.dealer)?);
        }
        Ok(self.turn_notification().into_iter().collect())
    }

    fn reached_target(&self) -> bool {
        self.players
            .iter()
            .any(|p| p.score() >= self.config.target_score)
    }

    fn finish(&mut self) {
        self.phase = GamePhase::Complete;
        event!(
            target: "hearts_core::game",
            Level::INFO,
            rounds = self.rounds.len(),
            standings = ?self.standings(),
            "game completed"
        );
    }

    fn turn_notification(&self) -> Option<Notification> {
        self.pending_request().map(Notification::TurnRequested)
    }
}
