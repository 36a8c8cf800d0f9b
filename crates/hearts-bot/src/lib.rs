#![deny(warnings)]
pub mod bot;
pub mod policy;

pub use bot::{BotDifficulty, BotParams, PlayPlanner};
pub use policy::{HeuristicPolicy, NotHeuristic, Policy, RandomPolicy};
