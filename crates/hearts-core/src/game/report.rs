use crate::game::state::{Game, GamePhase};
use crate::model::card::Card;
use crate::model::deck::Dealer;
use crate::model::player::PlayerId;
use crate::model::round::Round;
use crate::model::score::RoundScore;
use crate::protocol::TrickSummary;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStanding {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub number: usize,
    pub opening_card: Card,
    pub point_pool: u32,
    /// Completed tricks only.
    pub tricks: Vec<TrickSummary>,
    pub score: Option<RoundScore>,
}

impl RoundRecord {
    fn capture(number: usize, round: &Round) -> Self {
        let tricks = round
            .tricks()
            .iter()
            .enumerate()
            .filter_map(|(idx, trick)| {
                let outcome = trick.outcome()?;
                Some(TrickSummary {
                    number: idx + 1,
                    plays: trick.plays().to_vec(),
                    winner: outcome.winner,
                    points: outcome.points,
                })
            })
            .collect();
        Self {
            number,
            opening_card: round.opening_card(),
            point_pool: round.point_pool(),
            tricks,
            score: round.score().cloned(),
        }
    }
}

/// Read-only record of a game for logs and result files. Hands still held are
/// not included, so a report cannot be turned back into a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameReport {
    pub target_score: u32,
    pub seed: Option<u64>,
    pub phase: GamePhase,
    pub standings: Vec<PlayerStanding>,
    pub rounds: Vec<RoundRecord>,
    /// Lowest cumulative score; empty until the game completes.
    #[serde(default)]
    pub winners: Vec<PlayerId>,
}

impl GameReport {
    pub fn capture<D: Dealer>(game: &Game<D>) -> Self {
        let standings = game
            .players()
            .iter()
            .map(|player| PlayerStanding {
                id: player.id(),
                name: player.name().to_string(),
                score: player.score(),
            })
            .collect();
        let rounds = game
            .rounds()
            .iter()
            .enumerate()
            .map(|(idx, round)| RoundRecord::capture(idx + 1, round))
            .collect();
        let winners = if game.is_complete() {
            game.leaders()
        } else {
            Vec::new()
        };

        GameReport {
            target_score: game.config().target_score,
            seed: game.config().seed,
            phase: game.phase(),
            standings,
            rounds,
            winners,
        }
    }

    pub fn to_json<D: Dealer>(game: &Game<D>) -> serde_json::Result<String> {
        let report = Self::capture(game);
        serde_json::to_string_pretty(&report)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn moons(&self) -> usize {
        self.rounds
            .iter()
            .filter(|round| round.score.as_ref().is_some_and(|s| s.moon_shooter.is_some()))
            .count()
    }
}
