//! Giganten -- play or inspect a game on a board file.
//!
//! Usage:
//!   giganten BOARD [OPTIONS]
//!
//! Options:
//!   --bycols              Board file lists columns, not rows
//!   --players N           Number of players (default: 4)
//!   --row R               Search start row (default: 0)
//!   --column C            Search start column (default: 0)
//!   --maxcost M           Search movement budget (default: unlimited)
//!   --search              Run one search from (R, C) and print the board
//!   --timeit N            Time N searches from (R, C)
//!   --print               Print the board when done
//!   --short               Stop the game after one turn
//!   --config FILE         Game configuration JSON
//!   --seed S              Random seed, 0 for entropy (default: 0)
//!   --verbose N           0 warn, 1 info, 2 debug, 3 trace (default: 0)
//!   --dump-raw-board FILE Write the board back out by rows

use std::env;
use std::fs;
use std::io::Write;
use std::process;
use std::str::FromStr;
use std::time::Instant;

use giganten::board::Board;
use giganten::config::{load_config, GameConfig};
use giganten::game::Game;
use giganten::protocol::{dump_raw_board, render_board};
use giganten::search::{all_drill_sites, constrained_search, search_from};
use giganten::simulate::{game_rng, record_game, write_game_json};

struct Args {
    board_path: String,
    by_cols: bool,
    players: usize,
    row: usize,
    column: usize,
    maxcost: i32,
    search: bool,
    timeit: Option<usize>,
    print: bool,
    short: bool,
    config_path: Option<String>,
    seed: u64,
    verbose: u8,
    dump_path: Option<String>,
}

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

fn parse_args(args: &[String]) -> Args {
    let mut parsed = Args {
        board_path: String::new(),
        by_cols: false,
        players: 4,
        row: 0,
        column: 0,
        maxcost: i32::MAX,
        search: false,
        timeit: None,
        print: false,
        short: false,
        config_path: None,
        seed: 0,
        verbose: 0,
        dump_path: None,
    };
    let mut board_path = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bycols" => parsed.by_cols = true,
            "--players" => {
                i += 1;
                parsed.players = value(args, i, "--players");
            }
            "--row" => {
                i += 1;
                parsed.row = value(args, i, "--row");
            }
            "--column" => {
                i += 1;
                parsed.column = value(args, i, "--column");
            }
            "--maxcost" => {
                i += 1;
                parsed.maxcost = value(args, i, "--maxcost");
            }
            "--search" => {
                parsed.search = true;
                parsed.print = true;
            }
            "--timeit" => {
                i += 1;
                parsed.timeit = Some(value(args, i, "--timeit"));
            }
            "--print" => parsed.print = true,
            "--short" => parsed.short = true,
            "--config" => {
                i += 1;
                parsed.config_path = Some(value(args, i, "--config"));
            }
            "--seed" => {
                i += 1;
                parsed.seed = value(args, i, "--seed");
            }
            "--verbose" => {
                i += 1;
                parsed.verbose = value(args, i, "--verbose");
            }
            "--dump-raw-board" => {
                i += 1;
                parsed.dump_path = Some(value(args, i, "--dump-raw-board"));
            }
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other if other.starts_with("--") => fail(&format!("Unknown argument: {}", other)),
            other => {
                if board_path.is_some() {
                    fail(&format!("Unexpected argument: {}", other));
                }
                board_path = Some(other.to_string());
            }
        }
        i += 1;
    }

    match board_path {
        Some(path) => parsed.board_path = path,
        None => fail("Missing board file"),
    }
    parsed
}

fn main() {
    let argv: Vec<String> = env::args().collect();
    let args = parse_args(&argv);
    giganten::logging::init(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let text = fs::read_to_string(&args.board_path)
        .map_err(|e| format!("failed to read {}: {}", args.board_path, e))?;
    let board = Board::from_text(&text, args.by_cols, args.players == 3)?;
    log::info!("rows={} cols={}", board.rows(), board.cols());

    if let Some(path) = &args.dump_path {
        fs::write(path, dump_raw_board(&board))
            .map_err(|e| format!("failed to write {}: {}", path, e))?;
    }

    let game_config = match &args.config_path {
        Some(path) => load_config(path.as_ref())?,
        None => GameConfig::default(),
    };

    if let Some(iterations) = args.timeit {
        let root = start_cell(&board, args)?;
        let mut state = board.search_state();
        let start = Instant::now();
        for _ in 0..iterations {
            constrained_search(&board, &mut state, root, args.maxcost)?;
        }
        println!("{:.6}", start.elapsed().as_secs_f64());
        if args.print {
            print!("{}", render_board(&board, Some(&state)));
        }
    } else if args.search {
        let root = start_cell(&board, args)?;
        let state = search_from(&board, root, args.maxcost)?;
        println!(
            "visited {} cells, {} goals",
            state.visited().len(),
            state.goals().len()
        );
        for (goal, sites) in all_drill_sites(&board, &state)? {
            let sites: Vec<String> = sites
                .iter()
                .map(|s| format!("{}@{}", board.cell(s.well), board.cell(s.stop)))
                .collect();
            println!("{} {}", board.cell(goal), sites.join(" "));
        }
        if args.print {
            print!("{}", render_board(&board, Some(&state)));
        }
    } else {
        let mut rng = game_rng(args.seed, 0);
        let mut game = Game::new(board, args.players, game_config, &mut rng)?;
        let mut turn_reports = Vec::new();
        while !game.over {
            let report = game.play_turn(&mut rng)?;
            if args.verbose >= 1 {
                turn_reports.push(report);
            }
            if args.print {
                eprintln!("after turn {}:", game.turn);
                eprint!("{}", render_board(&game.board, Some(game.last_search())));
            }
            if args.short {
                break;
            }
        }
        let record = record_game(&game, 0, turn_reports);
        let mut out = std::io::stdout().lock();
        write_game_json(&record, &mut out)?;
        writeln!(out)?;
    }
    Ok(())
}

fn start_cell(board: &Board, args: &Args) -> Result<giganten::board::CellId, String> {
    board.id(args.row, args.column).ok_or_else(|| {
        format!(
            "start ({}, {}) is outside a {}x{} board",
            args.row,
            args.column,
            board.rows(),
            board.cols()
        )
    })
}

fn print_usage() {
    eprintln!("Usage: giganten BOARD [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --bycols              Board file lists columns, not rows");
    eprintln!("  --players N           Number of players (default: 4)");
    eprintln!("  --row R               Search start row (default: 0)");
    eprintln!("  --column C            Search start column (default: 0)");
    eprintln!("  --maxcost M           Search movement budget (default: unlimited)");
    eprintln!("  --search              Run one search from (R, C) and print the board");
    eprintln!("  --timeit N            Time N searches from (R, C)");
    eprintln!("  --print               Print the board when done");
    eprintln!("  --short               Stop the game after one turn");
    eprintln!("  --config FILE         Game configuration JSON");
    eprintln!("  --seed S              Random seed, 0 for entropy (default: 0)");
    eprintln!("  --verbose N           0 warn, 1 info, 2 debug, 3 trace (default: 0)");
    eprintln!("  --dump-raw-board FILE Write the board back out by rows");
}
