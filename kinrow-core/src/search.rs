//! Depth-bounded minimax with alpha-beta pruning
//!
//! The search plays hypothetical moves on the caller's board and takes each one
//! back before trying the next sibling, so the board must not be touched by
//! anything else while a search runs.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Coord, Move, Player};
use crate::eval::{evaluate, Weights, WIN_SCORE};
use crate::win::is_win;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// How equally scored moves are resolved
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Pick a random move up front and score it first; later moves replace it
    /// only when strictly better
    #[default]
    Random,
    /// Fixed enumeration order, first best move wins (reproducible)
    FirstInOrder,
}

/// Search parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Plies to look ahead (at least 1)
    pub depth: u32,
    /// Alpha-beta cutoffs; off means exhaustive minimax
    pub pruning: bool,
    pub tie_break: TieBreak,
    pub weights: Weights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 4,
            pruning: true,
            tie_break: TieBreak::Random,
            weights: Weights::default(),
        }
    }
}

impl SearchConfig {
    pub fn with_depth(depth: u32) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }
}

/// Result of a search from the root player's point of view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    pub score: i32,
    /// `None` only when nothing is placeable
    pub best_move: Option<Move>,
    /// Nodes visited, root included
    pub nodes: u64,
}

// ============================================================================
// MINIMAX WITH ALPHA-BETA
// ============================================================================

struct Search<'a, R: Rng> {
    config: &'a SearchConfig,
    root: Player,
    rng: &'a mut R,
    nodes: u64,
}

impl<R: Rng> Search<'_, R> {
    /// Score for a finished line by `winner`, preferring quick wins and slow losses
    fn win_score(&self, winner: Player, depth: u32) -> i32 {
        let score = WIN_SCORE + depth as i32;
        if winner == self.root {
            score
        } else {
            -score
        }
    }

    fn minimax(
        &mut self,
        board: &mut Board,
        depth: u32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
        last: Option<Coord>,
    ) -> (i32, Option<Move>) {
        self.nodes += 1;

        // Terminal checks
        if let Some(coord) = last {
            if let Cell::Taken(mover) = board.get(coord) {
                if is_win(board, coord, mover) {
                    return (self.win_score(mover, depth), None);
                }
            }
        }
        if board.is_full() {
            return (0, None);
        }
        if depth == 0 {
            return (evaluate(board, self.root, &self.config.weights), None);
        }

        let mut moves = board.placeable_moves();
        if self.config.tie_break == TieBreak::Random {
            let pick = self.rng.gen_range(0..moves.len());
            moves[..=pick].rotate_right(1);
        }

        let mover = if maximizing { self.root } else { self.root.opponent() };
        let mut best_move = moves.first().copied();
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for mv in moves {
            let coord = board.apply_unchecked(mv, mover);
            let (score, _) = self.minimax(board, depth - 1, !maximizing, alpha, beta, Some(coord));
            board.undo(coord);

            if maximizing {
                if score > best {
                    best = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(score);
            } else {
                if score < best {
                    best = score;
                    best_move = Some(mv);
                }
                beta = beta.min(score);
            }

            if self.config.pruning && beta <= alpha {
                break;
            }
        }

        (best, best_move)
    }
}

/// Search for `player`'s best move. The board is restored before returning.
pub fn search<R: Rng>(board: &mut Board, player: Player, config: &SearchConfig, rng: &mut R) -> SearchOutcome {
    let mut search = Search {
        config,
        root: player,
        rng,
        nodes: 0,
    };
    let depth = config.depth.max(1);
    let (score, best_move) = search.minimax(board, depth, true, i32::MIN, i32::MAX, None);

    tracing::debug!(
        depth,
        nodes = search.nodes,
        score,
        best = ?best_move,
        pruning = config.pruning,
        "search complete"
    );

    SearchOutcome {
        score,
        best_move,
        nodes: search.nodes,
    }
}

/// Search each root move on its own board copy, one rayon task per move.
///
/// Root siblings don't share alpha-beta bounds, so this visits more nodes than
/// [`search`] but returns the same score.
#[cfg(feature = "parallel")]
pub fn search_parallel(board: &Board, player: Player, config: &SearchConfig, seed: u64) -> SearchOutcome {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rayon::prelude::*;

    let moves = board.placeable_moves();
    if moves.is_empty() {
        return SearchOutcome {
            score: 0,
            best_move: None,
            nodes: 1,
        };
    }
    let depth = config.depth.max(1);

    let scored: Vec<(Move, i32, u64)> = moves
        .par_iter()
        .enumerate()
        .map(|(i, &mv)| {
            let mut local = board.clone();
            let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(i as u64));
            let mut search = Search {
                config,
                root: player,
                rng: &mut rng,
                nodes: 0,
            };
            let coord = local.apply_unchecked(mv, player);
            let (score, _) = search.minimax(&mut local, depth - 1, false, i32::MIN, i32::MAX, Some(coord));
            (mv, score, search.nodes)
        })
        .collect();

    let nodes = 1 + scored.iter().map(|&(_, _, n)| n).sum::<u64>();
    let best_score = scored.iter().map(|&(_, s, _)| s).max().unwrap_or(0);
    let ties: Vec<Move> = scored
        .iter()
        .filter(|&&(_, s, _)| s == best_score)
        .map(|&(mv, _, _)| mv)
        .collect();

    let best_move = match config.tie_break {
        TieBreak::FirstInOrder => ties.first().copied(),
        TieBreak::Random => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let pick = rng.gen_range(0..ties.len());
            ties.get(pick).copied()
        }
    };

    tracing::debug!(depth, nodes, score = best_score, best = ?best_move, "parallel search complete");

    SearchOutcome {
        score: best_score,
        best_move,
        nodes,
    }
}

// ============================================================================
// TESTS
// ============================================================================
