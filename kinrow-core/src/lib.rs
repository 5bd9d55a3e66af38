//! KINROW Core - K-in-a-row game engine and AI
//!
//! This crate provides the core logic shared by Connect-Four style (gravity
//! drop) and Tic-Tac-Toe style (free placement) games:
//! - Board model with in-place apply/undo
//! - Local win detection around the last placed cell
//! - Windowed heuristic evaluation
//! - Minimax search with alpha-beta pruning
//! - Easy / Medium / Hard difficulty tiers

pub mod board;
pub mod config;
pub mod error;
pub mod eval;
pub mod game;
pub mod policy;
pub mod search;
pub mod win;

// Re-exports for convenient access
pub use board::{Board, Cell, Coord, Move, Placement, Player};
pub use config::{GameConfig, MAX_DIMENSION};
pub use error::{GameError, MoveError};
pub use eval::{evaluate, Weights, WIN_SCORE};
pub use game::{Game, GameResult};
pub use policy::{tactical_move, winning_moves, AiConfig, AiPlayer, Difficulty};
pub use search::{search, SearchConfig, SearchOutcome, TieBreak};
pub use win::{find_win, is_win, WinLine};

#[cfg(feature = "parallel")]
pub use search::search_parallel;
