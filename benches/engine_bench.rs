use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use giganten::board::{Board, CellId};
use giganten::config::GameConfig;
use giganten::eval::{choose_destination, ScoreRequest, ScoringWeights};
use giganten::search::{all_drill_sites, constrained_search, search_from};
use giganten::simulate::{play_game, run_simulations, SimulationConfig};

const BOARD: &str = "\
1 1 .1 1 2 1 .2 1 1 1 3 1 .1 1 1 2 1 1 .3 1
1 2 1 1 1 .3 1 1 2 1 1 1 1 2 .2 1 1 1 1 1
1 1 .2 1 1 1 1 .1 1 1 2 .1 1 1 1 1 3 .2 1 1
2 1 1 1 .1 1 2 1 1 .2 1 1 1 .1 1 1 1 1 1 2
1 1 1 .1 1 1 1 1 .1 1 1 2 1 1 1 .3 1 1 .1 1
1 2 1 1 1 1 .1 1 1 1 .2 1 1 1 2 1 1 1 1 1
1 1 1 2 .2 1 1 1 3 1 1 1 .1 1 1 1 .1 2 1 1
1 1 .1 1 1 1 2 1 1 .1 1 1 1 1 .2 1 1 1 1 .1
2 1 1 1 1 .3 1 1 1 1 1 .2 1 2 1 1 1 .1 1 1
";

fn board() -> Board {
    Board::from_text(BOARD, false, false).unwrap()
}

fn bench_search_budget_8(c: &mut Criterion) {
    let board = board();
    let mut state = board.search_state();
    let root = board.id(4, 0).unwrap();
    c.bench_function("constrained_search_budget_8", |b| {
        b.iter(|| constrained_search(black_box(&board), &mut state, root, black_box(8)).unwrap())
    });
}

fn bench_search_unbounded(c: &mut Criterion) {
    let board = board();
    let mut state = board.search_state();
    c.bench_function("constrained_search_unbounded", |b| {
        b.iter(|| {
            constrained_search(black_box(&board), &mut state, CellId(0), black_box(i32::MAX))
                .unwrap()
        })
    });
}

fn bench_choose_destination(c: &mut Criterion) {
    let board = board();
    let root = board.id(4, 0).unwrap();
    let state = search_from(&board, root, 10).unwrap();
    let config = GameConfig::default();
    let request = ScoreRequest {
        start: root,
        budget: 10,
        train_col: 0,
        train_costs: &config.train_costs,
    };
    let weights = ScoringWeights::default();
    c.bench_function("choose_destination_budget_10", |b| {
        b.iter(|| choose_destination(black_box(&board), &state, &request, &weights).unwrap())
    });
}

fn bench_drill_sites(c: &mut Criterion) {
    let board = board();
    let state = search_from(&board, board.id(4, 0).unwrap(), 10).unwrap();
    c.bench_function("all_drill_sites_budget_10", |b| {
        b.iter(|| all_drill_sites(black_box(&board), &state).unwrap())
    });
}

fn bench_full_game(c: &mut Criterion) {
    let board = board();
    let game_config = GameConfig::default();
    let config = SimulationConfig {
        quiet: true,
        ..Default::default()
    };
    let mut group = c.benchmark_group("full_game");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));
    group.bench_function("four_players", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            let mut rng = SmallRng::seed_from_u64(seed);
            play_game(&board, &config, &game_config, 0, &mut rng).unwrap()
        })
    });
    group.finish();
}

fn bench_parallel_simulations(c: &mut Criterion) {
    let board = board();
    let game_config = GameConfig::default();
    let config = SimulationConfig {
        num_games: 32,
        threads: 4,
        seed: 1,
        quiet: true,
        ..Default::default()
    };
    let mut group = c.benchmark_group("simulations");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(15));
    group.bench_function("32_games_4_threads", |b| {
        b.iter(|| run_simulations(&board, &config, &game_config).unwrap())
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_search_budget_8,
    bench_search_unbounded,
    bench_choose_destination,
    bench_drill_sites,
    bench_full_game,
    bench_parallel_simulations,
);
criterion_main!(benches);
