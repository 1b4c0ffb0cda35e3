//! Monte Carlo game simulation.
//!
//! Plays complete games from a fixed starting board, one seeded RNG per
//! game, and records how each one ended. Games are independent, so with
//! more than one thread they run on a rayon pool and stream back to the
//! caller through a channel.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::board::Board;
use crate::config::GameConfig;
use crate::game::{Game, GameError, TurnReport};

/// Configuration for a batch of simulated games.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of games to play.
    pub num_games: usize,
    pub players: usize,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Base seed; game `i` uses `seed + i`. 0 = use entropy.
    pub seed: u64,
    /// Stop every game after its first turn.
    pub short: bool,
    /// Keep every turn report in the game record.
    pub record_turns: bool,
    /// Suppress per-game progress output.
    pub quiet: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            num_games: 10,
            players: 4,
            threads: 4,
            seed: 0,
            short: false,
            record_turns: false,
            quiet: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("game {game_id} failed: {source}")]
    Game { game_id: usize, source: GameError },

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("simulation worker thread panicked")]
    WorkerPanicked,
}

/// How one game ended.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub game_id: usize,
    pub turns: u32,
    /// Seat with the most cash at the end.
    pub winner: Option<u8>,
    pub black_train_col: usize,
    pub final_cash: Vec<i64>,
    pub barrels_sold: Vec<u32>,
    pub train_cols: Vec<usize>,
    pub derricks_built: Vec<u32>,
    pub final_prices: Vec<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub turn_reports: Vec<TurnReport>,
}

/// RNG for game `game_id`: seeded from `seed + game_id`, or from entropy
/// when `seed` is 0.
pub fn game_rng(seed: u64, game_id: usize) -> SmallRng {
    if seed != 0 {
        SmallRng::seed_from_u64(seed.wrapping_add(game_id as u64))
    } else {
        SmallRng::from_entropy()
    }
}

/// Plays one game on a copy of `board` until the black train leaves the
/// board or the turn limit is reached.
pub fn play_game(
    board: &Board,
    config: &SimulationConfig,
    game_config: &GameConfig,
    game_id: usize,
    rng: &mut SmallRng,
) -> Result<GameRecord, GameError> {
    let mut game = Game::new(board.clone(), config.players, game_config.clone(), rng)?;
    let mut turn_reports = Vec::new();

    while !game.over {
        let report = game.play_turn(rng)?;
        if config.record_turns {
            turn_reports.push(report);
        }
        if config.short {
            break;
        }
    }

    Ok(record_game(&game, game_id, turn_reports))
}

/// Summarises a finished (or stopped) game.
pub fn record_game(game: &Game, game_id: usize, turn_reports: Vec<TurnReport>) -> GameRecord {
    GameRecord {
        game_id,
        turns: game.turn,
        winner: game.leader().map(|p| p.0),
        black_train_col: game.black_train_col,
        final_cash: game.players.iter().map(|p| p.cash).collect(),
        barrels_sold: game.players.iter().map(|p| p.barrels_sold).collect(),
        train_cols: game.players.iter().map(|p| p.train_col).collect(),
        derricks_built: game.players.iter().map(|p| p.derricks_built).collect(),
        final_prices: game.oil_prices.clone(),
        turn_reports,
    }
}

fn report_progress(game: &GameRecord, n: usize, total: usize, elapsed: f64) {
    let outcome = match game.winner {
        Some(w) => format!("P{} wins", w),
        None => "no winner".to_string(),
    };
    eprintln!(
        "Game {}/{}: {} after {} turns ({:.2}s)",
        n, total, outcome, game.turns, elapsed
    );
}

/// Runs a batch of simulations and collects every record.
pub fn run_simulations(
    board: &Board,
    config: &SimulationConfig,
    game_config: &GameConfig,
) -> Result<Vec<GameRecord>, SimulationError> {
    let mut games = Vec::with_capacity(config.num_games);
    run_simulations_with_callback(board, config, game_config, |game| {
        games.push(game);
    })?;
    Ok(games)
}

/// Runs a batch of simulations, calling `on_game` with each completed record.
///
/// A failing game does not stop the others; the first failure is returned
/// once the batch is done.
pub fn run_simulations_with_callback<F>(
    board: &Board,
    config: &SimulationConfig,
    game_config: &GameConfig,
    on_game: F,
) -> Result<(), SimulationError>
where
    F: FnMut(GameRecord) + Send,
{
    if config.threads > 1 {
        run_parallel(board, config, game_config, on_game)
    } else {
        run_sequential(board, config, game_config, on_game)
    }
}

fn run_sequential<F>(
    board: &Board,
    config: &SimulationConfig,
    game_config: &GameConfig,
    mut on_game: F,
) -> Result<(), SimulationError>
where
    F: FnMut(GameRecord),
{
    let mut first_error = None;
    for i in 0..config.num_games {
        let start = Instant::now();
        let mut rng = game_rng(config.seed, i);
        match play_game(board, config, game_config, i, &mut rng) {
            Ok(game) => {
                if !config.quiet {
                    report_progress(&game, i + 1, config.num_games, start.elapsed().as_secs_f64());
                }
                on_game(game);
            }
            Err(source) => {
                log::error!("game {} failed: {}", i, source);
                first_error.get_or_insert(SimulationError::Game { game_id: i, source });
            }
        }
    }
    first_error.map_or(Ok(()), Err)
}

fn run_parallel<F>(
    board: &Board,
    config: &SimulationConfig,
    game_config: &GameConfig,
    mut on_game: F,
) -> Result<(), SimulationError>
where
    F: FnMut(GameRecord) + Send,
{
    use rayon::prelude::*;
    use std::sync::mpsc;

    let completed = AtomicUsize::new(0);
    let (tx, rx) = mpsc::channel::<(usize, Result<GameRecord, GameError>)>();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    let board = board.clone();
    let config_clone = config.clone();
    let game_config = game_config.clone();
    let handle = std::thread::spawn(move || {
        pool.install(|| {
            (0..config_clone.num_games)
                .into_par_iter()
                .for_each_with(tx, |tx, i| {
                    let start = Instant::now();
                    let mut rng = game_rng(config_clone.seed, i);
                    let result = play_game(&board, &config_clone, &game_config, i, &mut rng);
                    if let (Ok(game), false) = (&result, config_clone.quiet) {
                        let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                        report_progress(
                            game,
                            n,
                            config_clone.num_games,
                            start.elapsed().as_secs_f64(),
                        );
                    }
                    let _ = tx.send((i, result));
                });
        });
    });

    let mut first_error = None;
    for (game_id, result) in rx {
        match result {
            Ok(game) => on_game(game),
            Err(source) => {
                log::error!("game {} failed: {}", game_id, source);
                first_error.get_or_insert(SimulationError::Game { game_id, source });
            }
        }
    }

    handle.join().map_err(|_| SimulationError::WorkerPanicked)?;
    first_error.map_or(Ok(()), Err)
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for game in games {
        write_game_json(game, out)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Writes a single game record as a JSON object.
pub fn write_game_json<W: Write>(game: &GameRecord, out: &mut W) -> std::io::Result<()> {
    serde_json::to_writer(&mut *out, game).map_err(std::io::Error::from)
}

/// Prints a summary of simulation results to stderr.
pub fn print_summary(games: &[GameRecord], players: usize) {
    let total = games.len();
    let denom = total.max(1) as f64;
    let mut wins = vec![0usize; players];
    let mut cash = vec![0i64; players];
    let mut barrels = vec![0u64; players];
    let mut derricks = vec![0u64; players];
    let mut total_turns = 0u64;

    for game in games {
        total_turns += game.turns as u64;
        if let Some(w) = game.winner {
            if let Some(count) = wins.get_mut(w as usize) {
                *count += 1;
            }
        }
        for seat in 0..players.min(game.final_cash.len()) {
            cash[seat] += game.final_cash[seat];
            barrels[seat] += game.barrels_sold[seat] as u64;
            derricks[seat] += game.derricks_built[seat] as u64;
        }
    }

    eprintln!("=== Simulation Summary ===");
    eprintln!("Games: {}", total);
    eprintln!("Avg turns/game: {:.1}", total_turns as f64 / denom);
    eprintln!("Seat  wins      avg cash  avg barrels  avg derricks");
    for seat in 0..players {
        eprintln!(
            "  P{}  {:>4} ({:>5.1}%)  {:>9.0}  {:>11.1}  {:>12.1}",
            seat,
            wins[seat],
            100.0 * wins[seat] as f64 / denom,
            cash[seat] as f64 / denom,
            barrels[seat] as f64 / denom,
            derricks[seat] as f64 / denom,
        );
    }
}
