//! Benchmark command - compare search cost with and without pruning
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_position(), run_depth_benchmarks(), report_results()
//! - Level 3: benchmark_search(), benchmark_parallel()
//! - Level 4: timing utilities, formatting

use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use clap::Args;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use kinrow_core::{is_win, search, search_parallel, Board, Player, SearchConfig, TieBreak};

use crate::GameArgs;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct BenchmarkArgs {
    #[command(flatten)]
    pub game: GameArgs,

    /// Maximum search depth to test (runs 1..=depth)
    #[arg(long, default_value = "6")]
    pub depth: u32,

    /// Random moves to play before searching
    #[arg(long, default_value = "0")]
    pub opening: usize,

    /// Also time the parallel root search
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// One timed search
#[derive(Clone, Debug)]
struct BenchmarkResult {
    name: String,
    depth: u32,
    score: i32,
    nodes: u64,
    time: Duration,
}

/// All benchmark results
#[derive(Clone, Debug)]
struct AllResults {
    position: String,
    to_move: Player,
    results: Vec<BenchmarkResult>,
    /// Depths where the pruned and exhaustive scores disagreed
    mismatches: Vec<u32>,
    system_info: String,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run benchmark command
///
/// 1. Build the start position
/// 2. Search it at every depth, with and without pruning
/// 3. Report all results
pub fn run(args: BenchmarkArgs, seed: Option<u64>) -> Result<()> {
    let config = args.game.load()?;
    if args.depth == 0 {
        bail!("Benchmark depth must be at least 1");
    }
    tracing::info!("Starting benchmarks on {}: depths 1..={}", config.name, args.depth);

    let mut rng = create_rng(seed);
    let (mut board, to_move) = build_position(config.new_board(), args.opening, &mut rng);

    let mut all_results = AllResults {
        position: board.to_string(),
        to_move,
        results: Vec::new(),
        mismatches: Vec::new(),
        system_info: get_system_info(),
    };

    run_depth_benchmarks(&mut board, to_move, &args, &mut all_results);

    report_results(&all_results, &args);

    if !all_results.mismatches.is_empty() {
        tracing::warn!("Pruned scores differ at depths {:?}", all_results.mismatches);
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play up to `opening` random moves, stopping early if one of them wins
fn build_position(mut board: Board, opening: usize, rng: &mut ChaCha8Rng) -> (Board, Player) {
    let mut player = Player::A;
    for _ in 0..opening {
        let Some(&mv) = board.placeable_moves().choose(rng) else { break };
        let coord = board.apply_unchecked(mv, player);
        if is_win(&board, coord, player) {
            board.undo(coord);
            break;
        }
        player = player.opponent();
    }
    (board, player)
}

/// Search the position at each depth, pruned and exhaustive
fn run_depth_benchmarks(board: &mut Board, player: Player, args: &BenchmarkArgs, results: &mut AllResults) {
    for depth in 1..=args.depth {
        tracing::info!("Benchmarking depth {}...", depth);

        let pruned = benchmark_search(board, player, depth, true);
        let exhaustive = benchmark_search(board, player, depth, false);
        if pruned.score != exhaustive.score {
            results.mismatches.push(depth);
        }
        results.results.push(pruned);
        results.results.push(exhaustive);

        if args.parallel {
            results.results.push(benchmark_parallel(board, player, depth));
        }
    }
}

/// Report all benchmark results
fn report_results(results: &AllResults, args: &BenchmarkArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn bench_config(depth: u32, pruning: bool) -> SearchConfig {
    SearchConfig {
        depth,
        pruning,
        tie_break: TieBreak::FirstInOrder,
        ..SearchConfig::default()
    }
}

/// Time one sequential search
fn benchmark_search(board: &mut Board, player: Player, depth: u32, pruning: bool) -> BenchmarkResult {
    let config = bench_config(depth, pruning);
    // FirstInOrder never draws from the rng
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let start = Instant::now();
    let outcome = search(board, player, &config, &mut rng);
    let time = start.elapsed();

    BenchmarkResult {
        name: if pruning { "alpha-beta" } else { "exhaustive" }.to_string(),
        depth,
        score: outcome.score,
        nodes: outcome.nodes,
        time,
    }
}

/// Time the parallel root search
fn benchmark_parallel(board: &Board, player: Player, depth: u32) -> BenchmarkResult {
    let config = bench_config(depth, true);

    let start = Instant::now();
    let outcome = search_parallel(board, player, &config, 0);
    let time = start.elapsed();

    BenchmarkResult {
        name: "parallel".to_string(),
        depth,
        score: outcome.score,
        nodes: outcome.nodes,
        time,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Get system information string
fn get_system_info() -> String {
    format!(
        "kinrow {}, {} CPUs",
        env!("CARGO_PKG_VERSION"),
        std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(1)
    )
}

/// Format duration for display
fn format_duration(d: Duration) -> String {
    if d.as_secs() >= 1 {
        format!("{:.2}s", d.as_secs_f64())
    } else if d.as_millis() >= 1 {
        format!("{:.1}ms", d.as_secs_f64() * 1000.0)
    } else {
        format!("{:.1}us", d.as_secs_f64() * 1_000_000.0)
    }
}

fn nodes_per_second(r: &BenchmarkResult) -> f64 {
    let secs = r.time.as_secs_f64();
    if secs > 0.0 {
        r.nodes as f64 / secs
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &AllResults) {
    #[derive(serde::Serialize)]
    struct JsonBenchmark {
        name: String,
        depth: u32,
        score: i32,
        nodes: u64,
        time_ms: f64,
        nodes_per_second: f64,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        system_info: String,
        position: String,
        to_move: Player,
        scores_match: bool,
        benchmarks: Vec<JsonBenchmark>,
    }

    let output = JsonOutput {
        system_info: results.system_info.clone(),
        position: results.position.clone(),
        to_move: results.to_move,
        scores_match: results.mismatches.is_empty(),
        benchmarks: results
            .results
            .iter()
            .map(|r| JsonBenchmark {
                name: r.name.clone(),
                depth: r.depth,
                score: r.score,
                nodes: r.nodes,
                time_ms: r.time.as_secs_f64() * 1000.0,
                nodes_per_second: nodes_per_second(r),
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text table
fn print_text_results(results: &AllResults) {
    println!("\n=== KINROW Search Benchmark ===");
    println!("System: {}", results.system_info);
    println!("Position ({} to move):\n{}", results.to_move, results.position);

    println!(
        "{:<12} {:>6} {:>10} {:>12} {:>12} {:>14}",
        "Search", "Depth", "Score", "Nodes", "Time", "Nodes/s"
    );
    println!("{}", "-".repeat(72));

    for r in &results.results {
        println!(
            "{:<12} {:>6} {:>10} {:>12} {:>12} {:>14.0}",
            r.name,
            r.depth,
            r.score,
            r.nodes,
            format_duration(r.time),
            nodes_per_second(r)
        );
    }

    if results.mismatches.is_empty() {
        println!("\nPruned and exhaustive scores agree at every depth.");
    } else {
        println!("\nScore mismatch at depths: {:?}", results.mismatches);
    }
}

// ============================================================================
// TESTS
// ============================================================================
