//! Monte Carlo simulation CLI.
//!
//! Plays many Giganten games on one board and writes a JSONL record per game.
//!
//! Usage:
//!   cargo run --release --bin simulate -- BOARD [OPTIONS]
//!
//! Options:
//!   --games N       Number of games to play (default: 10)
//!   --players N     Number of players (default: 4)
//!   --threads N     Number of parallel threads (default: 4)
//!   --seed N        Random seed, 0 for entropy (default: 0)
//!   --bycols        Board file lists columns, not rows
//!   --config FILE   Game configuration JSON
//!   --turns         Include every turn in the records
//!   --output FILE   Output file path (default: stdout)
//!   --verbose N     Log level, 0 warn to 3 trace (default: 0)
//!   --quiet         Suppress progress and summary output

use std::env;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::process;
use std::str::FromStr;
use std::time::Instant;

use giganten::board::Board;
use giganten::config::{load_config, GameConfig};
use giganten::simulate::{self, SimulationConfig};

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    print_usage();
    process::exit(1);
}

fn value<T: FromStr>(args: &[String], i: usize, flag: &str) -> T {
    match args.get(i).map(|s| s.parse()) {
        Some(Ok(v)) => v,
        _ => fail(&format!("invalid {} value", flag)),
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut config = SimulationConfig::default();
    let mut board_path: Option<String> = None;
    let mut config_path: Option<String> = None;
    let mut output_path: Option<String> = None;
    let mut by_cols = false;
    let mut verbose = 0u8;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                i += 1;
                config.num_games = value(&args, i, "--games");
            }
            "--players" => {
                i += 1;
                config.players = value(&args, i, "--players");
            }
            "--threads" => {
                i += 1;
                config.threads = value(&args, i, "--threads");
            }
            "--seed" => {
                i += 1;
                config.seed = value(&args, i, "--seed");
            }
            "--bycols" => by_cols = true,
            "--config" => {
                i += 1;
                config_path = Some(value(&args, i, "--config"));
            }
            "--turns" => config.record_turns = true,
            "--output" => {
                i += 1;
                output_path = Some(value(&args, i, "--output"));
            }
            "--verbose" => {
                i += 1;
                verbose = value(&args, i, "--verbose");
            }
            "--quiet" => config.quiet = true,
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other if other.starts_with("--") => fail(&format!("Unknown argument: {}", other)),
            other => board_path = Some(other.to_string()),
        }
        i += 1;
    }

    giganten::logging::init(verbose);
    let Some(board_path) = board_path else {
        fail("Missing board file");
    };

    if let Err(e) = run(&board_path, by_cols, config_path, output_path, &config) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(
    board_path: &str,
    by_cols: bool,
    config_path: Option<String>,
    output_path: Option<String>,
    config: &SimulationConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = fs::read_to_string(board_path)
        .map_err(|e| format!("failed to read {}: {}", board_path, e))?;
    let board = Board::from_text(&text, by_cols, config.players == 3)?;
    let game_config = match config_path {
        Some(path) => load_config(path.as_ref())?,
        None => GameConfig::default(),
    };

    if !config.quiet {
        eprintln!(
            "Simulating {} games, {} players, {}x{} board, {} threads",
            config.num_games,
            config.players,
            board.rows(),
            board.cols(),
            config.threads
        );
    }

    let start = Instant::now();
    let games = simulate::run_simulations(&board, config, &game_config)?;
    let elapsed = start.elapsed();

    if !config.quiet {
        eprintln!(
            "Completed {} games in {:.1}s ({:.1} games/s)",
            games.len(),
            elapsed.as_secs_f64(),
            games.len() as f64 / elapsed.as_secs_f64().max(1e-9)
        );
        simulate::print_summary(&games, config.players);
    }

    match output_path {
        Some(path) => {
            let file = File::create(&path)
                .map_err(|e| format!("failed to create {}: {}", path, e))?;
            let mut writer = BufWriter::new(file);
            simulate::write_jsonl(&games, &mut writer)?;
            if !config.quiet {
                eprintln!("Wrote {} games to {}", games.len(), path);
            }
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            simulate::write_jsonl(&games, &mut writer)?;
        }
    }
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: simulate BOARD [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --games N       Number of games to play (default: 10)");
    eprintln!("  --players N     Number of players (default: 4)");
    eprintln!("  --threads N     Number of parallel threads (default: 4)");
    eprintln!("  --seed N        Random seed, 0 for entropy (default: 0)");
    eprintln!("  --bycols        Board file lists columns, not rows");
    eprintln!("  --config FILE   Game configuration JSON");
    eprintln!("  --turns         Include every turn in the records");
    eprintln!("  --output FILE   Output file path (default: stdout)");
    eprintln!("  --verbose N     Log level, 0 warn to 3 trace (default: 0)");
    eprintln!("  --quiet         Suppress progress and summary output");
    eprintln!("  --help          Show this help");
}
