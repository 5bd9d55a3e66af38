//! Difficulty tiers for the computer player

use std::fmt;
use std::str::FromStr;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Move, Player};
use crate::error::GameError;
use crate::eval::Weights;
use crate::search::{search, SearchConfig, SearchOutcome, TieBreak};
use crate::win::is_win;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Strength of the computer player
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Random placeable move
    Easy,
    /// Win if possible, else block, else play near the center
    #[default]
    Medium,
    /// Full alpha-beta search
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}' (expected easy, medium or hard)", other)),
        }
    }
}

/// Computer player configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    /// Search depth for the hard tier
    pub depth: u32,
    pub tie_break: TieBreak,
    /// Alpha-beta cutoffs in the hard tier
    pub pruning: bool,
    pub weights: Weights,
    /// Random seed for reproducibility (None = OS entropy)
    pub seed: Option<u64>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            depth: 4,
            tie_break: TieBreak::Random,
            pruning: true,
            weights: Weights::default(),
            seed: None,
        }
    }
}

impl AiConfig {
    pub fn easy() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            ..Default::default()
        }
    }

    pub fn medium() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            ..Default::default()
        }
    }

    /// Hard tier searching `depth` plies
    pub fn hard(depth: u32) -> Self {
        Self {
            difficulty: Difficulty::Hard,
            depth,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_pruning(mut self, pruning: bool) -> Self {
        self.pruning = pruning;
        self
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.difficulty == Difficulty::Hard && self.depth == 0 {
            return Err(GameError::InvalidConfig("search depth must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            depth: self.depth,
            pruning: self.pruning,
            tie_break: self.tie_break,
            weights: self.weights.clone(),
        }
    }
}

// ============================================================================
// TACTICS
// ============================================================================

/// Would `player` complete a line by playing `mv`? The board is left unchanged.
pub fn would_win(board: &mut Board, mv: Move, player: Player) -> bool {
    let coord = board.apply_unchecked(mv, player);
    let won = is_win(board, coord, player);
    board.undo(coord);
    won
}

/// Placeable moves that win on the spot for `player`
pub fn winning_moves(board: &mut Board, player: Player) -> Vec<Move> {
    board
        .placeable_moves()
        .into_iter()
        .filter(|&mv| would_win(board, mv, player))
        .collect()
}

/// One-ply tactics: win, else block the opponent's win, else nearest the center.
///
/// Also used for hints.
pub fn tactical_move(board: &mut Board, player: Player) -> Option<Move> {
    let moves = board.placeable_moves();

    if let Some(&mv) = moves.iter().find(|&&mv| would_win(board, mv, player)) {
        tracing::trace!(?mv, "tactical: winning move");
        return Some(mv);
    }

    let opponent = player.opponent();
    if let Some(&mv) = moves.iter().find(|&&mv| would_win(board, mv, opponent)) {
        tracing::trace!(?mv, "tactical: blocking move");
        return Some(mv);
    }

    board
        .preference_order()
        .into_iter()
        .find(|&mv| board.is_placeable(mv))
}

// ============================================================================
// AI PLAYER
// ============================================================================

/// Computer player for one difficulty tier
pub struct AiPlayer {
    config: AiConfig,
    rng: ChaCha8Rng,
    last_search: Option<SearchOutcome>,
}

impl AiPlayer {
    pub fn new(config: AiConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            config,
            rng,
            last_search: None,
        }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    /// Outcome of the most recent hard-tier search
    pub fn last_search(&self) -> Option<SearchOutcome> {
        self.last_search
    }

    /// Pick a move for `player`. `None` only when nothing is placeable.
    ///
    /// The board is used as scratch space and is restored before returning.
    pub fn choose_move(&mut self, board: &mut Board, player: Player) -> Option<Move> {
        let mv = match self.config.difficulty {
            Difficulty::Easy => board.placeable_moves().choose(&mut self.rng).copied(),
            Difficulty::Medium => tactical_move(board, player),
            Difficulty::Hard => {
                let outcome = search(board, player, &self.config.search_config(), &mut self.rng);
                self.last_search = Some(outcome);
                outcome.best_move
            }
        };

        tracing::debug!(difficulty = %self.config.difficulty, %player, ?mv, "ai move");
        mv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Coord, Placement};

    fn scenario_b() -> Board {
        Board::from_rows(&["XX.", "OO.", "..."], 3, Placement::FreeCell).unwrap()
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert!("brutal".parse::<Difficulty>().is_err());
        for d in Difficulty::ALL {
            assert_eq!(d.to_string().parse::<Difficulty>().unwrap(), d);
        }
    }

    #[test]
    fn test_medium_prefers_win_over_block() {
        let mut board = scenario_b();
        assert_eq!(tactical_move(&mut board, Player::A), Some(Move::Place(Coord::new(0, 2))));
        // O to move wins on its own row first
        assert_eq!(tactical_move(&mut board, Player::B), Some(Move::Place(Coord::new(1, 2))));
    }

    #[test]
    fn test_medium_blocks() {
        let mut board = Board::from_rows(&["X..", ".OO", "..X"], 3, Placement::FreeCell).unwrap();
        assert_eq!(tactical_move(&mut board, Player::A), Some(Move::Place(Coord::new(1, 0))));
    }

    #[test]
    fn test_medium_center_fallback() {
        let mut board = Board::new(6, 7, 4, Placement::Gravity);
        assert_eq!(tactical_move(&mut board, Player::B), Some(Move::Drop(3)));

        // Center full: next column outward, left first
        let mut board2 = Board::from_rows(
            &["...O...", "...X...", "...O...", "...X...", "...O...", "...X..."],
            4,
            Placement::Gravity,
        )
        .unwrap();
        assert_eq!(tactical_move(&mut board2, Player::A), Some(Move::Drop(2)));
    }

    #[test]
    fn test_winning_moves() {
        let mut board = Board::from_rows(&["X.X", "...", "X.."], 3, Placement::FreeCell).unwrap();
        let wins = winning_moves(&mut board, Player::A);
        assert_eq!(
            wins,
            vec![Move::Place(Coord::new(0, 1)), Move::Place(Coord::new(1, 0)), Move::Place(Coord::new(1, 1))]
        );
    }

    #[test]
    fn test_easy_picks_placeable() {
        let mut board = Board::from_rows(&["XOX", "OXO", "OX."], 3, Placement::FreeCell).unwrap();
        let mut ai = AiPlayer::new(AiConfig::easy().with_seed(9));
        assert_eq!(ai.choose_move(&mut board, Player::A), Some(Move::Place(Coord::new(2, 2))));
    }

    #[test]
    fn test_hard_records_search() {
        let mut board = scenario_b();
        let mut ai = AiPlayer::new(AiConfig::hard(4).with_seed(1));
        assert_eq!(ai.choose_move(&mut board, Player::A), Some(Move::Place(Coord::new(0, 2))));
        assert!(ai.last_search().map(|s| s.nodes > 0).unwrap_or(false));
    }

    #[test]
    fn test_no_move_on_full_board() {
        let mut board = Board::from_rows(&["XOX", "XOO", "OXX"], 3, Placement::FreeCell).unwrap();
        for d in Difficulty::ALL {
            let mut ai = AiPlayer::new(AiConfig { difficulty: d, ..AiConfig::default() }.with_seed(0));
            assert_eq!(ai.choose_move(&mut board, Player::A), None);
        }
    }

    #[test]
    fn test_zero_depth_rejected() {
        assert!(AiConfig::hard(0).validate().is_err());
        assert!(AiConfig::hard(1).validate().is_ok());
    }
}
