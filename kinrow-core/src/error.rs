//! Error types

use crate::board::{Coord, Move};

/// Why a move can't be placed on the current board
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("cell ({row}, {col}) is outside the board")]
    OutOfRange { row: usize, col: usize },

    #[error("cell {0} is already occupied")]
    Occupied(Coord),

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("{0} does not match the board's placement rule")]
    WrongKind(Move),
}

/// Errors surfaced by a game session
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("invalid move: {0}")]
    InvalidMove(#[from] MoveError),

    #[error("the game is already over")]
    GameOver,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
