//! Match command - play games between two AI configurations
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use kinrow_core::{AiConfig, AiPlayer, Difficulty, Game, GameConfig, GameResult, Move, Player};

use crate::GameArgs;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    #[command(flatten)]
    pub game: GameArgs,

    /// Difficulty of AI "a"
    #[arg(long, default_value = "hard")]
    pub a: Difficulty,

    /// Difficulty of AI "b"
    #[arg(long, default_value = "medium")]
    pub b: Difficulty,

    /// Search depth for hard-tier players
    #[arg(long, default_value = "4")]
    pub depth: u32,

    /// Number of games to play (will alternate who moves first)
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Play games on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Which configuration an outcome belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    A,
    B,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    /// Side that moved first
    first: Side,
    winner: Option<Side>,
    moves: Vec<Move>,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    a_wins: usize,
    b_wins: usize,
    draws: usize,
    avg_moves: f32,
    /// First-move frequency across games
    openings: FxHashMap<Move, usize>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Resolve the game and both AI configurations
/// 2. Play the match (multiple games)
/// 3. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let config = args.game.load()?;
    let a = AiConfig {
        difficulty: args.a,
        depth: args.depth,
        ..AiConfig::default()
    };
    let b = AiConfig {
        difficulty: args.b,
        depth: args.depth,
        ..AiConfig::default()
    };
    a.validate().context("Invalid configuration for AI a")?;
    b.validate().context("Invalid configuration for AI b")?;

    tracing::info!(
        "Starting match on {}: {} vs {} ({} games, depth={})",
        config.name,
        args.a,
        args.b,
        args.games,
        args.depth
    );

    let base_seed = seed.unwrap_or_else(|| ChaCha8Rng::from_entropy().gen());
    let results = play_match(&config, &a, &b, &args, base_seed)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games in the match
fn play_match(config: &GameConfig, a: &AiConfig, b: &AiConfig, args: &MatchArgs, base_seed: u64) -> Result<MatchResults> {
    let progress = if args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(args.games as u64)
    };
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} games ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let play = |game_num: usize| -> Result<GameRecord> {
        let record = play_single_game(config, a, b, game_num, base_seed)?;
        tracing::debug!(
            "Game {}: first={:?} winner={:?} ({} moves)",
            record.game_number,
            record.first,
            record.winner,
            record.moves.len()
        );
        progress.inc(1);
        Ok(record)
    };

    let games: Vec<GameRecord> = if args.parallel {
        (0..args.games).into_par_iter().map(play).collect::<Result<_>>()?
    } else {
        (0..args.games).map(play).collect::<Result<_>>()?
    };
    progress.finish_and_clear();

    Ok(compute_match_statistics(games))
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) {
    if args.json {
        print_json_results(results, args);
    } else {
        print_text_results(results, args);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game, alternating which side moves first. Each game owns its board.
fn play_single_game(
    config: &GameConfig,
    a: &AiConfig,
    b: &AiConfig,
    game_num: usize,
    base_seed: u64,
) -> Result<GameRecord> {
    let first = if game_num % 2 == 0 { Side::A } else { Side::B };
    let seed = base_seed.wrapping_add(2 * game_num as u64);
    let mut ai_a = AiPlayer::new(a.clone().with_seed(seed));
    let mut ai_b = AiPlayer::new(b.clone().with_seed(seed.wrapping_add(1)));

    let side_of = |player: Player| match (player, first) {
        (Player::A, side) => side,
        (Player::B, Side::A) => Side::B,
        (Player::B, Side::B) => Side::A,
    };

    let mut game = Game::new(config.clone())?;
    let mut moves = Vec::new();

    while game.result() == GameResult::InProgress {
        let ai = match side_of(game.to_move()) {
            Side::A => &mut ai_a,
            Side::B => &mut ai_b,
        };
        let Some(mv) = game.choose_ai_move(ai) else { break };
        game.apply_move(mv)
            .with_context(|| format!("AI produced an illegal move in game {}", game_num + 1))?;
        moves.push(mv);
    }

    Ok(GameRecord {
        game_number: game_num + 1,
        first,
        winner: game.result().winner().map(side_of),
        moves,
    })
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let a_wins = games.iter().filter(|g| g.winner == Some(Side::A)).count();
    let b_wins = games.iter().filter(|g| g.winner == Some(Side::B)).count();
    let draws = games.iter().filter(|g| g.winner.is_none()).count();

    let total_moves: usize = games.iter().map(|g| g.moves.len()).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    let mut openings = FxHashMap::default();
    for mv in games.iter().filter_map(|g| g.moves.first()) {
        *openings.entry(*mv).or_insert(0) += 1;
    }

    MatchResults {
        games,
        a_wins,
        b_wins,
        draws,
        avg_moves,
        openings,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn percent(n: usize, total: usize) -> f32 {
    if total > 0 {
        n as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Openings sorted by frequency, then by move
fn sorted_openings(results: &MatchResults) -> Vec<(Move, usize)> {
    let mut openings: Vec<(Move, usize)> = results.openings.iter().map(|(&m, &n)| (m, n)).collect();
    openings.sort_by(|x, y| y.1.cmp(&x.1).then_with(|| format!("{}", x.0).cmp(&format!("{}", y.0))));
    openings
}

/// Print results as JSON
fn print_json_results(results: &MatchResults, args: &MatchArgs) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        first: String,
        winner: Option<String>,
        moves: Vec<Move>,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        a: String,
        b: String,
        total_games: usize,
        a_wins: usize,
        b_wins: usize,
        draws: usize,
        avg_moves: f32,
        openings: Vec<(Move, usize)>,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        a: args.a.to_string(),
        b: args.b.to_string(),
        total_games: results.games.len(),
        a_wins: results.a_wins,
        b_wins: results.b_wins,
        draws: results.draws,
        avg_moves: results.avg_moves,
        openings: sorted_openings(results),
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                first: format!("{:?}", g.first),
                winner: g.winner.map(|s| format!("{:?}", s)),
                moves: g.moves.clone(),
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults, args: &MatchArgs) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games: {}", total);
    println!("A ({}) wins: {} ({:.1}%)", args.a, results.a_wins, percent(results.a_wins, total));
    println!("B ({}) wins: {} ({:.1}%)", args.b, results.b_wins, percent(results.b_wins, total));
    println!("Draws:       {} ({:.1}%)", results.draws, percent(results.draws, total));
    println!("Avg moves:   {:.1}", results.avg_moves);

    println!("\nOpening moves:");
    for (mv, n) in sorted_openings(results) {
        println!("  {}: {}", mv, n);
    }

    println!("\nGame details:");
    for game in &results.games {
        let outcome = match game.winner {
            Some(side) => format!("{:?} wins", side),
            None => "draw".to_string(),
        };
        println!(
            "  Game {}: {:?} first, {} in {} moves",
            game.game_number,
            game.first,
            outcome,
            game.moves.len()
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================
