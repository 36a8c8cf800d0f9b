use super::Policy;
use crate::bot::{BotDifficulty, BotParams, PlayPlanner};
use hearts_core::model::card::Card;
use hearts_core::protocol::TurnRequest;
use thiserror::Error;
use tracing::{Level, event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("'{0}' is not a heuristic difficulty; use RandomPolicy")]
pub struct NotHeuristic(pub BotDifficulty);

/// Rule-based player. `Easy` takes the first legal card; `Normal` goes
/// through [`PlayPlanner`].
pub struct HeuristicPolicy {
    difficulty: BotDifficulty,
    params: BotParams,
}

impl HeuristicPolicy {
    pub fn new(difficulty: BotDifficulty) -> Result<Self, NotHeuristic> {
        Self::with_params(difficulty, BotParams::default())
    }

    pub fn with_params(difficulty: BotDifficulty, params: BotParams) -> Result<Self, NotHeuristic> {
        match difficulty {
            BotDifficulty::Easy | BotDifficulty::Normal => Ok(Self { difficulty, params }),
            BotDifficulty::Random => Err(NotHeuristic(difficulty)),
        }
    }

    pub fn easy() -> Self {
        Self {
            difficulty: BotDifficulty::Easy,
            params: BotParams::default(),
        }
    }

    pub fn normal() -> Self {
        Self {
            difficulty: BotDifficulty::Normal,
            params: BotParams::default(),
        }
    }

    pub fn difficulty(&self) -> BotDifficulty {
        self.difficulty
    }
}

impl Policy for HeuristicPolicy {
    fn name(&self) -> &str {
        self.difficulty.as_str()
    }

    fn choose_play(&mut self, request: &TurnRequest) -> Option<Card> {
        let (chosen, reason) = match self.difficulty {
            BotDifficulty::Normal => (PlayPlanner::choose(request, &self.params), "heuristic_play"),
            BotDifficulty::Easy => (request.legal_cards.first().copied(), "easy_first_legal"),
            BotDifficulty::Random => return None,
        };
        if let Some(card) = chosen {
            log_play_decision(request, self.difficulty, card, reason);
        }
        chosen
    }
}

fn log_play_decision(
    request: &TurnRequest,
    difficulty: BotDifficulty,
    chosen: Card,
    reason: &str,
) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let legal_preview = if request.legal_cards.len() <= 6 {
        request
            .legal_cards
            .iter()
            .map(|card| card.to_string())
            .collect::<Vec<_>>()
            .join(",")
    } else {
        format!("{} moves", request.legal_cards.len())
    };

    event!(
        target: "hearts_bot::play",
        Level::DEBUG,
        player = %request.player,
        difficulty = %difficulty,
        legal_count = request.legal_cards.len(),
        legal_moves = %legal_preview,
        chosen = %chosen,
        trick_cards = request.cards_played.len(),
        points_on_table = request.points_on_table(),
        reason,
    );
}
