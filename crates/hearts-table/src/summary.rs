use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::config::{AgentKind, TableConfig};
use crate::runner::GameOutcome;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("agent '{0}' appears in results but not in the configuration")]
    UnknownAgent(String),
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Running totals for one configured agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSummary {
    pub name: String,
    pub kind: AgentKind,
    pub games: usize,
    /// Games in which this agent shared the lowest final score.
    pub wins: usize,
    pub total_score: u64,
    pub moons: usize,
    pub decisions: u64,
    pub total_ms: f64,
}

impl AgentSummary {
    fn new(name: String, kind: AgentKind) -> Self {
        Self {
            name,
            kind,
            games: 0,
            wins: 0,
            total_score: 0,
            moons: 0,
            decisions: 0,
            total_ms: 0.0,
        }
    }

    pub fn avg_score(&self) -> f64 {
        ratio(self.total_score as f64, self.games)
    }

    pub fn win_rate(&self) -> f64 {
        ratio(self.wins as f64, self.games)
    }

    pub fn avg_ms_per_decision(&self) -> f64 {
        ratio(self.total_ms, self.decisions as usize)
    }
}

fn ratio(value: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { value / count as f64 }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSummary {
    pub run_id: String,
    pub target_score: u32,
    pub games: usize,
    pub rounds: usize,
    pub agents: Vec<AgentSummary>,
}

impl TableSummary {
    pub fn new(config: &TableConfig) -> Self {
        Self {
            run_id: config.run_id.clone(),
            target_score: config.rules.target_score,
            games: 0,
            rounds: 0,
            agents: config
                .agents
                .iter()
                .map(|agent| AgentSummary::new(agent.name.clone(), agent.kind))
                .collect(),
        }
    }

    pub fn record_game(&mut self, outcome: &GameOutcome) -> Result<(), SummaryError> {
        for seat in &outcome.seat_results {
            let agent = self
                .agents
                .iter_mut()
                .find(|agent| agent.name == seat.agent_name)
                .ok_or_else(|| SummaryError::UnknownAgent(seat.agent_name.clone()))?;
            agent.games += 1;
            agent.wins += usize::from(seat.won);
            agent.total_score += u64::from(seat.score);
            agent.moons += seat.moons;
            agent.decisions += u64::from(seat.metrics.decisions);
            agent.total_ms += seat.metrics.total_ms;
        }
        self.games += 1;
        self.rounds += outcome.rounds;
        Ok(())
    }

    pub fn agent(&self, name: &str) -> Option<&AgentSummary> {
        self.agents.iter().find(|agent| agent.name == name)
    }

    pub fn to_markdown(&self) -> String {
        let mut rows = String::new();
        rows.push_str("# Table Summary\n\n");
        rows.push_str(&format!(
            "Run `{}`: {} game{} to {} points, {} rounds played\n\n",
            self.run_id,
            self.games,
            if self.games == 1 { "" } else { "s" },
            self.target_score,
            self.rounds
        ));
        rows.push_str("| Agent | Kind | Games | Wins | Win % | Avg score | Moons | Avg ms/decision |\n");
        rows.push_str("|-------|------|-------|------|-------|-----------|-------|-----------------|\n");

        for agent in &self.agents {
            rows.push_str(&format!(
                "| {name} | {kind:?} | {games} | {wins} | {win:.1}% | {avg:.2} | {moons} | {latency:.3} |\n",
                name = agent.name,
                kind = agent.kind,
                games = agent.games,
                wins = agent.wins,
                win = agent.win_rate() * 100.0,
                avg = agent.avg_score(),
                moons = agent.moons,
                latency = agent.avg_ms_per_decision(),
            ));
        }
        rows
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), SummaryError> {
        fs::write(path, self.to_markdown()).map_err(|source| SummaryError::Io {
            context: "writing summary markdown",
            source,
        })
    }
}
