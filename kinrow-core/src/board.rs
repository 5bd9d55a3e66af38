//! Rectangular grid board with gravity-drop and free-cell placement

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, MoveError};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player marker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    A = 0,
    B = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }

    /// Marker used in text rendering
    pub fn symbol(self) -> char {
        match self {
            Player::A => 'X',
            Player::B => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Contents of a single cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Taken(Player),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Taken(p) => Some(p),
        }
    }
}

/// Grid coordinate. Row 0 is the top row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Step by (dr, dc), `None` when leaving the non-negative quadrant
    pub fn offset(self, dr: isize, dc: isize) -> Option<Coord> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Some(Coord { row, col })
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// How a move chooses its cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    /// Pieces settle into the lowest empty cell of a column
    Gravity,
    /// Pieces go into any empty cell
    FreeCell,
}

/// A move, only meaningful against a specific board at a specific instant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Drop(usize),
    Place(Coord),
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Drop(col) => write!(f, "column {}", col),
            Move::Place(c) => write!(f, "{}", c),
        }
    }
}

/// The four line axes: horizontal, vertical, diagonal, anti-diagonal
pub const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

// ============================================================================
// BOARD
// ============================================================================

/// R x C grid of cells (mutated in place, undo with [`Board::undo`])
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    win_length: usize,
    placement: Placement,
    /// Row-major cells
    cells: Vec<Cell>,
    /// Number of non-empty cells
    filled: usize,
}

impl Board {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    pub fn new(rows: usize, cols: usize, win_length: usize, placement: Placement) -> Self {
        Self {
            rows,
            cols,
            win_length,
            placement,
            cells: vec![Cell::Empty; rows * cols],
            filled: 0,
        }
    }

    /// Build a board from text rows (`X`/`x` = A, `O`/`o` = B, anything else empty)
    pub fn from_rows(rows: &[&str], win_length: usize, placement: Placement) -> Result<Self, GameError> {
        let cols = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if cols == 0 {
            return Err(GameError::InvalidConfig("board has no cells".to_string()));
        }
        let mut board = Board::new(rows.len(), cols, win_length, placement);

        for (r, line) in rows.iter().enumerate() {
            if line.chars().count() != cols {
                return Err(GameError::InvalidConfig(format!(
                    "row {} has {} cells, expected {}",
                    r,
                    line.chars().count(),
                    cols
                )));
            }
            for (c, ch) in line.chars().enumerate() {
                let cell = match ch {
                    'X' | 'x' => Cell::Taken(Player::A),
                    'O' | 'o' => Cell::Taken(Player::B),
                    _ => Cell::Empty,
                };
                if let Cell::Taken(_) = cell {
                    board.cells[r * cols + c] = cell;
                    board.filled += 1;
                }
            }
        }

        if placement == Placement::Gravity {
            for r in 0..board.rows.saturating_sub(1) {
                for c in 0..cols {
                    if !board.cells[r * cols + c].is_empty() && board.cells[(r + 1) * cols + c].is_empty() {
                        return Err(GameError::InvalidConfig(format!(
                            "piece at {} has an empty cell below it",
                            Coord::new(r, c)
                        )));
                    }
                }
            }
        }

        Ok(board)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn win_length(&self) -> usize {
        self.win_length
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Number of occupied cells
    pub fn filled(&self) -> usize {
        self.filled
    }

    pub fn center_col(&self) -> usize {
        self.cols / 2
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    /// Cell at `coord`; off-board reads as empty
    pub fn get(&self, coord: Coord) -> Cell {
        if self.contains(coord) {
            self.cells[coord.row * self.cols + coord.col]
        } else {
            Cell::Empty
        }
    }

    pub fn is_full(&self) -> bool {
        self.filled == self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    // ========================================================================
    // PLACEMENT
    // ========================================================================

    /// Lowest empty row of `col`, if any
    fn drop_row(&self, col: usize) -> Option<usize> {
        (0..self.rows)
            .rev()
            .find(|&row| self.cells[row * self.cols + col].is_empty())
    }

    /// Cell a move would fill, or why it can't be played
    pub fn landing_cell(&self, mv: Move) -> Result<Coord, MoveError> {
        match (self.placement, mv) {
            (Placement::Gravity, Move::Drop(col)) => {
                if col >= self.cols {
                    return Err(MoveError::OutOfRange { row: 0, col });
                }
                self.drop_row(col)
                    .map(|row| Coord::new(row, col))
                    .ok_or(MoveError::ColumnFull(col))
            }
            (Placement::FreeCell, Move::Place(coord)) => {
                if !self.contains(coord) {
                    return Err(MoveError::OutOfRange { row: coord.row, col: coord.col });
                }
                if !self.get(coord).is_empty() {
                    return Err(MoveError::Occupied(coord));
                }
                Ok(coord)
            }
            _ => Err(MoveError::WrongKind(mv)),
        }
    }

    pub fn is_placeable(&self, mv: Move) -> bool {
        self.landing_cell(mv).is_ok()
    }

    /// All placeable moves, ascending column or row-major
    pub fn placeable_moves(&self) -> Vec<Move> {
        match self.placement {
            Placement::Gravity => (0..self.cols)
                .filter(|&col| self.cells[col].is_empty())
                .map(Move::Drop)
                .collect(),
            Placement::FreeCell => self
                .cells
                .iter()
                .enumerate()
                .filter(|(_, cell)| cell.is_empty())
                .map(|(i, _)| Move::Place(Coord::new(i / self.cols, i % self.cols)))
                .collect(),
        }
    }

    /// Validate and play a move
    pub fn apply(&mut self, mv: Move, player: Player) -> Result<Coord, MoveError> {
        let coord = self.landing_cell(mv)?;
        self.set(coord, player);
        Ok(coord)
    }

    /// Play a move already known to be placeable
    ///
    /// # Panics
    ///
    /// Panics on a drop into a full column.
    pub fn apply_unchecked(&mut self, mv: Move, player: Player) -> Coord {
        debug_assert!(self.is_placeable(mv), "unplaceable move {:?}", mv);
        let coord = match mv {
            Move::Drop(col) => match self.drop_row(col) {
                Some(row) => Coord::new(row, col),
                None => panic!("unplaceable move {:?}", mv),
            },
            Move::Place(coord) => coord,
        };
        self.set(coord, player);
        coord
    }

    fn set(&mut self, coord: Coord, player: Player) {
        let cell = &mut self.cells[coord.row * self.cols + coord.col];
        if cell.is_empty() {
            self.filled += 1;
        }
        *cell = Cell::Taken(player);
    }

    /// Empty a single cell. Calls must nest with `apply` (stack order).
    pub fn undo(&mut self, coord: Coord) {
        let cell = &mut self.cells[coord.row * self.cols + coord.col];
        if !cell.is_empty() {
            *cell = Cell::Empty;
            self.filled -= 1;
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
        self.filled = 0;
    }

    // ========================================================================
    // MOVE PREFERENCE
    // ========================================================================

    /// Fallback order for the tactical policy: outward from the center.
    ///
    /// Gravity boards rank columns by distance from the center column (left first
    /// on ties). Free-cell boards take the center cell(s), then the corners, then
    /// the rest by distance from center.
    pub fn preference_order(&self) -> Vec<Move> {
        if self.cells.is_empty() {
            return Vec::new();
        }
        match self.placement {
            Placement::Gravity => {
                let center = self.center_col();
                let mut cols: Vec<usize> = (0..self.cols).collect();
                cols.sort_by_key(|&c| (c.abs_diff(center), c > center));
                cols.into_iter().map(Move::Drop).collect()
            }
            Placement::FreeCell => {
                let (cr, cc) = ((self.rows - 1) as f32 / 2.0, (self.cols - 1) as f32 / 2.0);
                let last = (self.rows - 1, self.cols - 1);
                let mut cells: Vec<(u8, u32, Coord)> = Vec::with_capacity(self.cells.len());
                for row in 0..self.rows {
                    for col in 0..self.cols {
                        let dist = (row as f32 - cr).abs() + (col as f32 - cc).abs();
                        let is_corner = (row == 0 || row == last.0) && (col == 0 || col == last.1);
                        let is_center = (row as f32 - cr).abs() < 1.0 && (col as f32 - cc).abs() < 1.0;
                        let tier = if is_center {
                            0
                        } else if is_corner {
                            1
                        } else {
                            2
                        };
                        cells.push((tier, (dist * 2.0) as u32, Coord::new(row, col)));
                    }
                }
                cells.sort();
                cells.into_iter().map(|(_, _, c)| Move::Place(c)).collect()
            }
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let ch = match self.cells[row * self.cols + col] {
                    Cell::Empty => '.',
                    Cell::Taken(p) => p.symbol(),
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
