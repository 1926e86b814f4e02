use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use bigtwo_bot::CpuAgent;
use bigtwo_core::game::agent::PlayerAgent;
use bigtwo_core::game::engine::{GameOutcome, TurnEngine};
use bigtwo_core::model::seat::{PLAYER_COUNT, Seat};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{ResolvedOutputs, SimConfig};

/// Plays the configured number of all-CPU games and writes the results.
pub struct SimulationRunner {
    config: SimConfig,
    outputs: ResolvedOutputs,
    master_seed: u64,
}

/// Summary details returned after a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub games_played: usize,
    pub master_seed: u64,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub standings: Vec<SeatStanding>,
}

/// Finishing statistics for one seat across the run.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatStanding {
    pub seat: Seat,
    pub name: String,
    /// `placements[0]` counts first places, `placements[3]` last places.
    pub placements: [usize; PLAYER_COUNT],
}

impl SeatStanding {
    pub fn wins(&self) -> usize {
        self.placements[0]
    }

    /// Mean finishing position, 1-based. Zero before any game is recorded.
    pub fn average_place(&self) -> f64 {
        let games: usize = self.placements.iter().sum();
        if games == 0 {
            return 0.0;
        }
        let weighted: usize = self
            .placements
            .iter()
            .enumerate()
            .map(|(idx, count)| (idx + 1) * count)
            .sum();
        weighted as f64 / games as f64
    }
}

impl SimulationRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: SimConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        if config.seats.len() != PLAYER_COUNT {
            return Err(RunnerError::SeatCount {
                found: config.seats.len(),
            });
        }
        let master_seed = config.games.seed.unwrap_or_else(rand::random);
        Ok(Self {
            config,
            outputs,
            master_seed,
        })
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Execute every game, streaming one JSONL row per game to disk. Events
    /// raised while playing sit inside a `simulation` span carrying the run
    /// id and master seed.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        let span = tracing::info_span!(
            target: "bigtwo_sim::run",
            "simulation",
            run_id = %self.config.run_id,
            master_seed = self.master_seed,
            games = self.config.games.count,
        );
        let _entered = span.enter();

        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.master_seed);
        let names = self.config.seat_names();
        let mut standings: Vec<SeatStanding> = Seat::LOOP
            .iter()
            .map(|&seat| SeatStanding {
                seat,
                name: names[seat.index()].clone(),
                placements: [0; PLAYER_COUNT],
            })
            .collect();
        let mut rows_written = 0usize;

        for game_index in 0..self.config.games.count {
            let game_seed = rng.next_u64();
            let outcome = self.play_game(game_seed);
            if outcome.win_order.len() != PLAYER_COUNT {
                return Err(RunnerError::Incomplete {
                    game_index,
                    finishers: outcome.win_order.len(),
                });
            }

            for (place, seat) in outcome.win_order.iter().enumerate() {
                standings[seat.index()].placements[place] += 1;
            }
            write_game_row(
                &mut writer,
                &self.config.run_id,
                &names,
                game_index,
                game_seed,
                &outcome,
            )?;
            rows_written += 1;
            log_game(game_index, game_seed, &names, &outcome);
        }

        writer.flush()?;
        write_summary_markdown(
            &self.outputs.summary_md,
            &self.config.run_id,
            self.master_seed,
            self.config.games.count,
            &standings,
        )?;

        Ok(RunSummary {
            games_played: self.config.games.count,
            master_seed: self.master_seed,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            standings,
        })
    }

    fn play_game(&self, seed: u64) -> GameOutcome {
        let agents: [Box<dyn PlayerAgent>; PLAYER_COUNT] = self
            .config
            .seat_names()
            .map(|name| Box::new(CpuAgent::new(name)) as Box<dyn PlayerAgent>);
        let mut engine = TurnEngine::with_options(agents, seed, self.config.engine);
        engine.run()
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct GameLogRow<'a> {
    run_id: &'a str,
    game_id: String,
    game_index: usize,
    game_seed: u64,
    turns: usize,
    win_order: &'a [Seat],
    finishers: Vec<&'a str>,
}

fn write_game_row(
    writer: &mut BufWriter<File>,
    run_id: &str,
    names: &[String; PLAYER_COUNT],
    game_index: usize,
    game_seed: u64,
    outcome: &GameOutcome,
) -> Result<(), RunnerError> {
    let row = GameLogRow {
        run_id,
        game_id: format!("G{game_index:05}"),
        game_index,
        game_seed,
        turns: outcome.turns,
        win_order: &outcome.win_order,
        finishers: outcome
            .win_order
            .iter()
            .map(|seat| names[seat.index()].as_str())
            .collect(),
    };
    serde_json::to_writer(&mut *writer, &row)?;
    writer.write_all(b"\n")?;
    Ok(())
}

fn write_summary_markdown(
    path: &Path,
    run_id: &str,
    master_seed: u64,
    games: usize,
    standings: &[SeatStanding],
) -> Result<(), RunnerError> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "# Simulation summary: {run_id}")?;
    writeln!(out)?;
    writeln!(out, "- Games: {games}")?;
    writeln!(out, "- Master seed: {master_seed}")?;
    writeln!(out)?;
    writeln!(
        out,
        "| Seat | Name | Wins | Win % | 1st | 2nd | 3rd | 4th | Avg place |"
    )?;
    writeln!(out, "|---|---|---:|---:|---:|---:|---:|---:|---:|")?;
    for standing in standings {
        let [first, second, third, fourth] = standing.placements;
        let win_pct = if games == 0 {
            0.0
        } else {
            standing.wins() as f64 * 100.0 / games as f64
        };
        writeln!(
            out,
            "| {} | {} | {} | {:.1} | {} | {} | {} | {} | {:.2} |",
            standing.seat,
            standing.name,
            standing.wins(),
            win_pct,
            first,
            second,
            third,
            fourth,
            standing.average_place()
        )?;
    }
    out.flush()?;
    Ok(())
}

fn log_game(game_index: usize, game_seed: u64, names: &[String; PLAYER_COUNT], outcome: &GameOutcome) {
    if !tracing::enabled!(Level::INFO) {
        return;
    }
    let order = outcome
        .win_order
        .iter()
        .map(|seat| names[seat.index()].as_str())
        .collect::<Vec<_>>()
        .join(">");
    event!(
        target: "bigtwo_sim::game",
        Level::INFO,
        game_index,
        game_seed,
        turns = outcome.turns,
        win_order = %order,
    );
}

#[derive(Debug, Error)]
pub enum RunnerError {
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
    #[error("configuration requires exactly 4 seats but found {found}")]
    SeatCount { found: usize },
    #[error("game {game_index} ended with {finishers} finishers")]
    Incomplete { game_index: usize, finishers: usize },
}
