mod heuristic;
mod random;

pub use heuristic::{HeuristicPolicy, NotHeuristic};
pub use random::RandomPolicy;

use hearts_core::model::card::Card;
use hearts_core::protocol::{Notification, TurnRequest};

/// Anything that can answer a [`TurnRequest`]: bots, console prompts, remote seats.
pub trait Policy: Send {
    /// Short label used in logs and result rows.
    fn name(&self) -> &str;

    /// Picks one of `request.legal_cards`. `None` only when nothing is legal.
    fn choose_play(&mut self, request: &TurnRequest) -> Option<Card>;

    /// Sees every notification other than turn requests. Bots ignore them.
    fn observe(&mut self, _notification: &Notification) {}
}
