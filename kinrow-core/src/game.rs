//! Game session: board, turn order and result

use serde::{Deserialize, Serialize};

use crate::board::{Board, Coord, Move, Player};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::eval::{evaluate, Weights};
use crate::policy::{tactical_move, AiPlayer};
use crate::win::{find_win, is_win, WinLine};

/// Game result, derived from the board and the last move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    InProgress,
    Win(Player),
    Draw,
}

impl GameResult {
    pub fn is_over(self) -> bool {
        self != GameResult::InProgress
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            GameResult::Win(p) => Some(p),
            _ => None,
        }
    }
}

/// A single game. Player A moves first.
#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    board: Board,
    /// Filled cells in play order
    history: Vec<(Coord, Player)>,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let board = config.new_board();
        Ok(Self {
            config,
            board,
            history: Vec::new(),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &[(Coord, Player)] {
        &self.history
    }

    pub fn to_move(&self) -> Player {
        match self.history.last() {
            Some(&(_, p)) => p.opponent(),
            None => Player::A,
        }
    }

    pub fn is_placeable(&self, mv: Move) -> bool {
        self.board.is_placeable(mv)
    }

    /// Play `mv` for the player to move
    pub fn apply_move(&mut self, mv: Move) -> Result<Coord, GameError> {
        if self.result().is_over() {
            return Err(GameError::GameOver);
        }
        let player = self.to_move();
        let coord = self.board.apply(mv, player)?;
        self.history.push((coord, player));
        tracing::debug!(%player, %coord, "move applied");
        Ok(coord)
    }

    pub fn check_win(&self, coord: Coord, player: Player) -> Option<WinLine> {
        find_win(&self.board, coord, player)
    }

    pub fn is_board_full(&self) -> bool {
        self.board.is_full()
    }

    pub fn result(&self) -> GameResult {
        if let Some(&(coord, player)) = self.history.last() {
            if is_win(&self.board, coord, player) {
                return GameResult::Win(player);
            }
        }
        if self.board.is_full() {
            GameResult::Draw
        } else {
            GameResult::InProgress
        }
    }

    /// The line that ended the game, if it was won
    pub fn winning_line(&self) -> Option<WinLine> {
        let &(coord, player) = self.history.last()?;
        find_win(&self.board, coord, player)
    }

    /// Ask `ai` for a move for the player to move (not played)
    pub fn choose_ai_move(&mut self, ai: &mut AiPlayer) -> Option<Move> {
        let player = self.to_move();
        ai.choose_move(&mut self.board, player)
    }

    /// Tactical suggestion for the player to move, `None` once the game is over
    pub fn hint(&mut self) -> Option<Move> {
        if self.result().is_over() {
            return None;
        }
        let player = self.to_move();
        tactical_move(&mut self.board, player)
    }

    /// Heuristic score of the position for `player`
    pub fn evaluate(&self, player: Player) -> i32 {
        evaluate(&self.board, player, &Weights::default())
    }

    /// Take back the last move
    pub fn undo_last(&mut self) -> Option<Coord> {
        let (coord, _) = self.history.pop()?;
        self.board.undo(coord);
        Some(coord)
    }

    /// Start over with an empty board
    pub fn reset(&mut self) {
        self.board.clear();
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MoveError;
    use crate::policy::AiConfig;

    fn play_all(game: &mut Game, moves: &[(usize, usize)]) {
        for &(r, c) in moves {
            game.apply_move(Move::Place(Coord::new(r, c))).unwrap();
        }
    }

    #[test]
    fn test_turns_alternate() {
        let mut game = Game::new(GameConfig::connect_four()).unwrap();
        assert_eq!(game.to_move(), Player::A);
        game.apply_move(Move::Drop(3)).unwrap();
        assert_eq!(game.to_move(), Player::B);
        assert_eq!(game.board().filled(), 1);
    }

    #[test]
    fn test_invalid_move_reported() {
        let mut game = Game::new(GameConfig::tic_tac_toe()).unwrap();
        game.apply_move(Move::Place(Coord::new(0, 0))).unwrap();
        let err = game.apply_move(Move::Place(Coord::new(0, 0))).unwrap_err();
        assert_eq!(err, GameError::InvalidMove(MoveError::Occupied(Coord::new(0, 0))));
        // Rejected input doesn't change whose turn it is
        assert_eq!(game.to_move(), Player::B);
    }

    #[test]
    fn test_win_detected_and_game_over() {
        let mut game = Game::new(GameConfig::tic_tac_toe()).unwrap();
        play_all(&mut game, &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        assert_eq!(game.result(), GameResult::Win(Player::A));
        let line = game.winning_line().unwrap();
        assert_eq!(line.cells, vec![Coord::new(0, 0), Coord::new(0, 1), Coord::new(0, 2)]);
        assert_eq!(game.apply_move(Move::Place(Coord::new(2, 2))), Err(GameError::GameOver));
    }

    #[test]
    fn test_draw() {
        let mut game = Game::new(GameConfig::tic_tac_toe()).unwrap();
        // X O X / X O O / O X X
        play_all(
            &mut game,
            &[(0, 0), (0, 1), (0, 2), (1, 1), (1, 0), (1, 2), (2, 1), (2, 0), (2, 2)],
        );
        assert!(game.is_board_full());
        assert_eq!(game.result(), GameResult::Draw);
        let mut ai = AiPlayer::new(AiConfig::hard(4).with_seed(3));
        assert_eq!(game.choose_ai_move(&mut ai), None);
    }

    #[test]
    fn test_undo_and_reset() {
        let mut game = Game::new(GameConfig::connect_four()).unwrap();
        game.apply_move(Move::Drop(0)).unwrap();
        game.apply_move(Move::Drop(0)).unwrap();
        assert_eq!(game.undo_last(), Some(Coord::new(4, 0)));
        assert_eq!(game.to_move(), Player::B);
        game.reset();
        assert!(game.board().is_empty());
        assert_eq!(game.to_move(), Player::A);
        assert_eq!(game.undo_last(), None);
    }

    #[test]
    fn test_hint_blocks() {
        let mut game = Game::new(GameConfig::connect_four()).unwrap();
        for col in [0, 6, 1, 6, 2] {
            game.apply_move(Move::Drop(col)).unwrap();
        }
        // B to move must stop A's bottom row
        assert_eq!(game.hint(), Some(Move::Drop(3)));
    }

    #[test]
    fn test_no_hint_after_win() {
        let mut game = Game::new(GameConfig::tic_tac_toe()).unwrap();
        play_all(&mut game, &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        assert_eq!(game.result(), GameResult::Win(Player::A));
        assert_eq!(game.hint(), None);
    }

    #[test]
    fn test_invalid_config() {
        let mut cfg = GameConfig::tic_tac_toe();
        cfg.rows = 0;
        assert!(Game::new(cfg).is_err());
    }
}
