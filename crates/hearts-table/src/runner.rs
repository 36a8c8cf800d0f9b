use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use hearts_bot::{BotDifficulty, Policy, RandomPolicy};
use hearts_core::game::report::GameReport;
use hearts_core::game::state::{Game, GameError, PLAYER_COUNT};
use hearts_core::model::player::PlayerId;
use hearts_core::protocol::Notification;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{
    AgentConfig, AgentKind, ResolvedOutputs, TableConfig, ValidationError, difficulty_param,
    seed_param,
};
use crate::console::ConsolePolicy;
use crate::summary::{SummaryError, TableSummary};

/// Plays the configured number of games and writes the result files.
pub struct TableRunner {
    config: TableConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub games_played: usize,
    pub rounds_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub table: TableSummary,
}

impl TableRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: TableConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let agents = AgentBlueprint::from_configs(&config.agents)?;
        if agents.len() != PLAYER_COUNT {
            return Err(RunnerError::SeatCount {
                found: agents.len(),
            });
        }

        Ok(Self {
            config,
            outputs,
            agents,
        })
    }

    /// Hands seat `seat` (0-based) to a human on stdin/stdout.
    pub fn with_console_seat(mut self, seat: usize) -> Result<Self, RunnerError> {
        let agent = self
            .agents
            .get_mut(seat)
            .ok_or(RunnerError::SeatOutOfRange { seat })?;
        agent.implementation = AgentImplementation::Console;
        if let Some(config) = self.config.agents.get_mut(seat) {
            config.kind = AgentKind::Console;
        }
        Ok(self)
    }

    /// Execute every game, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut rows_written = 0usize;
        let mut table = TableSummary::new(&self.config);

        for game_index in 0..self.config.games.count {
            let game_seed = rng.next_u64();
            let outcome = self.play_game(game_index, game_seed)?;
            table.record_game(&outcome)?;
            rows_written += write_game_rows(&mut writer, &self.config, &outcome)?;
        }

        writer.flush()?;
        table.write_markdown(&self.outputs.summary_md)?;

        event!(
            target: "hearts_table::run",
            Level::INFO,
            run_id = %self.config.run_id,
            games = table.games,
            rounds = table.rounds,
            rows_written,
            "run complete"
        );

        Ok(RunSummary {
            games_played: table.games,
            rounds_played: table.rounds,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            table,
        })
    }

    fn play_game(&self, game_index: usize, game_seed: u64) -> Result<GameOutcome, RunnerError> {
        let game_error = |source| RunnerError::Game { game_index, source };

        let mut game = Game::new(self.config.rules.game_config(Some(game_seed)));
        let mut roster = Vec::with_capacity(self.agents.len());
        for agent in &self.agents {
            let id = game.add_player(agent.name.clone()).map_err(game_error)?;
            roster.push((id, agent.name.clone()));
        }

        let mut seats: Vec<SeatState> = self
            .agents
            .iter()
            .zip(&roster)
            .enumerate()
            .map(|(seat, (agent, &(player, _)))| SeatState {
                seat,
                player,
                agent_name: agent.name.clone(),
                kind: agent.kind(),
                policy: agent.spawn_policy(game_seed, seat, &roster),
                metrics: DecisionMetrics::default(),
            })
            .collect();

        let mut notes = game.start().map_err(game_error)?;
        loop {
            let mut pending = None;
            for note in notes {
                match note {
                    Notification::TurnRequested(request) => pending = Some(request),
                    Notification::DealFailed(err) => {
                        return Err(game_error(GameError::Deal(err)));
                    }
                    other => {
                        self.log_notification(game_index, &other);
                        for seat in &mut seats {
                            seat.policy.observe(&other);
                        }
                    }
                }
            }
            let Some(request) = pending else {
                break;
            };

            let seat = seats
                .iter_mut()
                .find(|seat| seat.player == request.player)
                .ok_or(RunnerError::UnknownSeat(request.player))?;
            let start = Instant::now();
            let card = seat
                .policy
                .choose_play(&request)
                .ok_or_else(|| RunnerError::NoMove {
                    agent: seat.agent_name.clone(),
                })?;
            let elapsed_ms = seat.metrics.record(start.elapsed());

            if tracing::enabled!(Level::DEBUG) {
                event!(
                    target: "hearts_table::play",
                    Level::DEBUG,
                    run_id = %self.config.run_id,
                    game_index = game_index as u32,
                    agent = %seat.agent_name,
                    card = %card,
                    elapsed_ms
                );
            }

            notes = game.play_card(request.player, card).map_err(game_error)?;
        }

        if !game.is_complete() {
            return Err(RunnerError::Stalled { game_index });
        }

        let report = GameReport::capture(&game);
        let seat_results = seats
            .into_iter()
            .map(|seat| {
                let score = report
                    .standings
                    .iter()
                    .find(|standing| standing.id == seat.player)
                    .map_or(0, |standing| standing.score);
                let moons = report
                    .rounds
                    .iter()
                    .filter(|round| {
                        round
                            .score
                            .as_ref()
                            .is_some_and(|score| score.moon_shooter == Some(seat.player))
                    })
                    .count();
                SeatResult {
                    agent_name: seat.agent_name,
                    kind: seat.kind,
                    seat: seat.seat,
                    player: seat.player,
                    score,
                    won: report.winners.contains(&seat.player),
                    moons,
                    metrics: seat.metrics.finalize(),
                }
            })
            .collect();

        Ok(GameOutcome {
            game_index,
            game_seed,
            rounds: report.rounds.len(),
            seat_results,
        })
    }

    fn log_notification(&self, game_index: usize, note: &Notification) {
        match note {
            Notification::RoundCompleted(summary) => {
                event!(
                    target: "hearts_table::play",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    game_index = game_index as u32,
                    round = summary.number as u32,
                    moon_shooter = ?summary.score.moon_shooter,
                    standings = ?summary.standings,
                    "round completed"
                );
            }
            Notification::GameCompleted => {
                event!(
                    target: "hearts_table::play",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    game_index = game_index as u32,
                    "game completed"
                );
            }
            _ => {}
        }
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_game_rows(
    writer: &mut BufWriter<File>,
    config: &TableConfig,
    outcome: &GameOutcome,
) -> Result<usize, RunnerError> {
    let game_id = format!("G{:05}", outcome.game_index);

    let mut rows_written = 0usize;
    for seat in &outcome.seat_results {
        let row = GameLogRow {
            run_id: config.run_id.clone(),
            game_id: game_id.clone(),
            game_index: outcome.game_index,
            game_seed: outcome.game_seed,
            seat: seat.seat + 1,
            agent: seat.agent_name.clone(),
            kind: seat.kind,
            score: seat.score,
            won: seat.won,
            moons: seat.moons,
            rounds: outcome.rounds,
            decisions: seat.metrics.decisions,
            speed_ms_turn: seat.metrics.avg_ms_per_decision,
        };

        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }

    Ok(rows_written)
}

struct SeatState {
    seat: usize,
    player: PlayerId,
    agent_name: String,
    kind: AgentKind,
    policy: Box<dyn Policy>,
    metrics: DecisionMetrics,
}

pub struct GameOutcome {
    pub game_index: usize,
    pub game_seed: u64,
    pub rounds: usize,
    pub seat_results: Vec<SeatResult>,
}

pub struct SeatResult {
    pub agent_name: String,
    pub kind: AgentKind,
    /// 0-based seat in configuration order.
    pub seat: usize,
    pub player: PlayerId,
    pub score: u32,
    pub won: bool,
    pub moons: usize,
    pub metrics: DecisionSummary,
}

#[derive(Default)]
struct DecisionMetrics {
    total: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) -> f64 {
        self.total += duration;
        self.decisions += 1;
        duration.as_secs_f64() * 1000.0
    }

    fn finalize(self) -> DecisionSummary {
        let avg_ms = if self.decisions == 0 {
            0.0
        } else {
            self.total.as_secs_f64() * 1000.0 / f64::from(self.decisions)
        };

        DecisionSummary {
            decisions: self.decisions,
            avg_ms_per_decision: avg_ms,
            total_ms: self.total.as_secs_f64() * 1000.0,
        }
    }
}

#[derive(Clone)]
pub struct DecisionSummary {
    pub decisions: u32,
    pub avg_ms_per_decision: f64,
    pub total_ms: f64,
}

#[derive(Serialize)]
struct GameLogRow {
    run_id: String,
    game_id: String,
    game_index: usize,
    game_seed: u64,
    seat: usize,
    agent: String,
    kind: AgentKind,
    score: u32,
    won: bool,
    moons: usize,
    rounds: usize,
    decisions: u32,
    speed_ms_turn: f64,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid agent: {0}")]
    Agent(#[from] ValidationError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("summary error: {0}")]
    Summary(#[from] SummaryError),
    #[error("game {game_index} failed: {source}")]
    Game {
        game_index: usize,
        #[source]
        source: GameError,
    },
    #[error("game {game_index} stopped before completion")]
    Stalled { game_index: usize },
    #[error("configuration requires exactly 4 agents but found {found}")]
    SeatCount { found: usize },
    #[error("seat {seat} does not exist at this table")]
    SeatOutOfRange { seat: usize },
    #[error("no agent is seated as {0}")]
    UnknownSeat(PlayerId),
    #[error("agent '{agent}' did not choose a card")]
    NoMove { agent: String },
}

struct AgentBlueprint {
    name: String,
    implementation: AgentImplementation,
}

enum AgentImplementation {
    Heuristic(BotDifficulty),
    Random { seed: Option<u64> },
    Console,
}

impl AgentBlueprint {
    fn from_configs(configs: &[AgentConfig]) -> Result<Vec<Self>, ValidationError> {
        configs.iter().map(Self::from_config).collect()
    }

    fn from_config(config: &AgentConfig) -> Result<Self, ValidationError> {
        let implementation = match config.kind {
            AgentKind::Heuristic => AgentImplementation::Heuristic(
                difficulty_param(&config.name, &config.params)?.unwrap_or_default(),
            ),
            AgentKind::Random => AgentImplementation::Random {
                seed: seed_param(&config.name, &config.params)?,
            },
            AgentKind::Console => AgentImplementation::Console,
        };

        Ok(Self {
            name: config.name.clone(),
            implementation,
        })
    }

    fn kind(&self) -> AgentKind {
        match self.implementation {
            AgentImplementation::Heuristic(_) => AgentKind::Heuristic,
            AgentImplementation::Random { .. } => AgentKind::Random,
            AgentImplementation::Console => AgentKind::Console,
        }
    }

    fn spawn_policy(
        &self,
        game_seed: u64,
        seat: usize,
        roster: &[(PlayerId, String)],
    ) -> Box<dyn Policy> {
        match self.implementation {
            AgentImplementation::Heuristic(difficulty) => {
                difficulty.spawn(game_seed.wrapping_add(seat as u64))
            }
            AgentImplementation::Random { seed } => Box::new(RandomPolicy::from_seed(
                seed.unwrap_or(game_seed).wrapping_add(seat as u64),
            )),
            AgentImplementation::Console => {
                let mut console = ConsolePolicy::stdio(self.name.clone());
                console.set_roster(roster.to_vec());
                Box::new(console)
            }
        }
    }
}
