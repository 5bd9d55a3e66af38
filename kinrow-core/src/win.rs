//! Line detection around a just-placed cell

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Coord, Player, AXES};

/// K coordinates in a row holding one player's marker, ordered along the axis
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLine {
    pub player: Player,
    pub cells: Vec<Coord>,
}

impl WinLine {
    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains(&coord)
    }
}

/// Count contiguous `player` cells stepping from `from` by (dr, dc), excluding `from`
fn run_length(board: &Board, from: Coord, dr: isize, dc: isize, player: Player) -> usize {
    let mut count = 0;
    let mut cur = from.offset(dr, dc);
    while let Some(c) = cur {
        if board.get(c) != Cell::Taken(player) {
            break;
        }
        count += 1;
        cur = c.offset(dr, dc);
    }
    count
}

/// Does the marker at `coord` complete a line of K for `player`?
pub fn is_win(board: &Board, coord: Coord, player: Player) -> bool {
    let k = board.win_length();
    AXES.iter().any(|&(dr, dc)| {
        1 + run_length(board, coord, dr, dc, player) + run_length(board, coord, -dr, -dc, player) >= k
    })
}

/// Find the line completed by the marker at `coord`, if any.
///
/// Runs longer than K are cut to the earliest K-window along the axis that still
/// contains `coord`.
pub fn find_win(board: &Board, coord: Coord, player: Player) -> Option<WinLine> {
    if board.get(coord) != Cell::Taken(player) {
        return None;
    }
    let k = board.win_length();

    for &(dr, dc) in AXES.iter() {
        let back = run_length(board, coord, -dr, -dc, player);
        let forward = run_length(board, coord, dr, dc, player);
        if 1 + back + forward < k {
            continue;
        }

        // Window start, measured in steps behind `coord`
        let start_back = back.min(k - 1);
        let first = coord.offset(-dr * start_back as isize, -dc * start_back as isize)?;
        let cells = (0..k)
            .map(|i| first.offset(dr * i as isize, dc * i as isize))
            .collect::<Option<Vec<_>>>()?;
        return Some(WinLine { player, cells });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Move, Placement};

    #[test]
    fn test_horizontal_exact_k() {
        let board = Board::from_rows(&[".......", "XXXX..."], 4, Placement::Gravity).unwrap();
        let line = find_win(&board, Coord::new(1, 3), Player::A).unwrap();
        assert_eq!(
            line.cells,
            vec![Coord::new(1, 0), Coord::new(1, 1), Coord::new(1, 2), Coord::new(1, 3)]
        );
        assert!(is_win(&board, Coord::new(1, 0), Player::A));
    }

    #[test]
    fn test_k_minus_one_is_not_win() {
        let board = Board::from_rows(&[".......", "XXX.O.."], 4, Placement::Gravity).unwrap();
        for col in 0..3 {
            assert!(!is_win(&board, Coord::new(1, col), Player::A));
            assert!(find_win(&board, Coord::new(1, col), Player::A).is_none());
        }
    }

    #[test]
    fn test_vertical_and_diagonals() {
        let vertical = Board::from_rows(&["X..", "X..", "X.."], 3, Placement::FreeCell).unwrap();
        assert!(is_win(&vertical, Coord::new(1, 0), Player::A));

        let diag = Board::from_rows(&["O..", ".O.", "..O"], 3, Placement::FreeCell).unwrap();
        let line = find_win(&diag, Coord::new(2, 2), Player::B).unwrap();
        assert_eq!(line.cells, vec![Coord::new(0, 0), Coord::new(1, 1), Coord::new(2, 2)]);

        let anti = Board::from_rows(&["..X", ".X.", "X.."], 3, Placement::FreeCell).unwrap();
        let line = find_win(&anti, Coord::new(1, 1), Player::A).unwrap();
        assert_eq!(line.cells, vec![Coord::new(0, 2), Coord::new(1, 1), Coord::new(2, 0)]);
    }

    #[test]
    fn test_long_run_cut_to_k() {
        let board = Board::from_rows(&["XXXXX"], 3, Placement::FreeCell).unwrap();
        let line = find_win(&board, Coord::new(0, 4), Player::A).unwrap();
        assert_eq!(line.cells.len(), 3);
        assert!(line.contains(Coord::new(0, 4)));
        assert_eq!(line.cells[0], Coord::new(0, 2));
    }

    #[test]
    fn test_other_player_not_counted() {
        let mut board = Board::new(6, 7, 4, Placement::Gravity);
        for _ in 0..3 {
            board.apply(Move::Drop(0), Player::A).unwrap();
        }
        let top = board.apply(Move::Drop(0), Player::B).unwrap();
        assert!(!is_win(&board, top, Player::B));
        assert!(find_win(&board, top, Player::A).is_none());
    }
}
