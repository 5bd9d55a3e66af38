//! Position evaluation

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Coord, Player, AXES};

/// Window weights for position evaluation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weights {
    /// K own markers
    pub complete: i32,
    /// K-1 own markers, one empty
    pub three: i32,
    /// K-2 own markers, two empty
    pub two: i32,
    /// K-1 opponent markers, one empty
    pub opp_three: i32,
    /// K-2 opponent markers, two empty
    pub opp_two: i32,
    /// Per own marker in the center column
    pub center: i32,
}

impl Default for Weights {
    fn default() -> Self {
        // Blocking an opponent's near line outweighs extending our own
        Self {
            complete: 100,
            three: 10,
            two: 2,
            opp_three: -80,
            opp_two: -2,
            center: 3,
        }
    }
}

/// Score for a completed line found by the search, well above any window sum
pub const WIN_SCORE: i32 = 1_000_000;

/// Score one window from its marker counts.
///
/// Own and opponent patterns are scored independently and summed.
pub fn score_window(own: usize, opp: usize, empty: usize, k: usize, weights: &Weights) -> i32 {
    let mut score = 0;

    if own == k {
        score += weights.complete;
    } else if own + 1 == k && empty == 1 {
        score += weights.three;
    } else if own + 2 == k && empty == 2 {
        score += weights.two;
    }

    if opp + 1 == k && empty == 1 {
        score += weights.opp_three;
    } else if opp + 2 == k && empty == 2 {
        score += weights.opp_two;
    }

    score
}

/// Evaluate the board from `player`'s point of view
pub fn evaluate(board: &Board, player: Player, weights: &Weights) -> i32 {
    let k = board.win_length();
    let (rows, cols) = (board.rows() as isize, board.cols() as isize);
    let mut score = 0;

    let center = board.center_col();
    for row in 0..board.rows() {
        if board.get(Coord::new(row, center)) == Cell::Taken(player) {
            score += weights.center;
        }
    }

    let span = k as isize - 1;
    for &(dr, dc) in AXES.iter() {
        for row in 0..rows {
            for col in 0..cols {
                let (end_r, end_c) = (row + dr * span, col + dc * span);
                if end_r < 0 || end_r >= rows || end_c < 0 || end_c >= cols {
                    continue;
                }

                let (mut own, mut opp, mut empty) = (0, 0, 0);
                for i in 0..k as isize {
                    let c = Coord::new((row + dr * i) as usize, (col + dc * i) as usize);
                    match board.get(c) {
                        Cell::Empty => empty += 1,
                        Cell::Taken(p) if p == player => own += 1,
                        Cell::Taken(_) => opp += 1,
                    }
                }
                score += score_window(own, opp, empty, k, weights);
            }
        }
    }

    score
}
