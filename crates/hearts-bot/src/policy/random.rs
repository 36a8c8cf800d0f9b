use super::Policy;
use hearts_core::model::card::Card;
use hearts_core::protocol::TurnRequest;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_play(&mut self, request: &TurnRequest) -> Option<Card> {
        request.legal_cards.choose(&mut self.rng).copied()
    }
}
