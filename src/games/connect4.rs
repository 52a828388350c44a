//! Connect 4 on a 7-column, 6-row board.
//!
//! The board is stored in row-major order, with row 0 at the bottom:
//! ```text
//! Row 5: [35][36][37][38][39][40][41]  <- Top
//! Row 4: [28][29][30][31][32][33][34]
//! Row 3: [21][22][23][24][25][26][27]
//! Row 2: [14][15][16][17][18][19][20]
//! Row 1: [ 7][ 8][ 9][10][11][12][13]
//! Row 0: [ 0][ 1][ 2][ 3][ 4][ 5][ 6]  <- Bottom
//!         Col 0  1  2  3  4  5  6
//! ```

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;
use crate::error::{MctsError, Result};
use crate::rules::{GameResult, GameState};

/// Board dimensions
pub const COLS: usize = 7;
pub const ROWS: usize = 6;
pub const BOARD_SIZE: usize = COLS * ROWS;

/// Discs in a row needed to win.
const CONNECT: i32 = 4;

/// A disc dropped into a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    column: u8,
}

impl Column {
    /// Create a move, rejecting columns off the board.
    pub fn new(column: u8) -> Result<Self> {
        if column as usize >= COLS {
            return Err(MctsError::invalid_move(format!(
                "column {column} is outside the {COLS}-column board"
            )));
        }
        Ok(Self { column })
    }

    /// Target column, 0-based from the left.
    #[must_use]
    pub fn column(self) -> u8 {
        self.column
    }
}

/// Connect 4 position.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Connect4 {
    board: Vec<Option<PlayerId>>,
    /// Number of discs in each column.
    heights: [u8; COLS],
    current_player: PlayerId,
    winner: Option<GameResult>,
    last_move: Option<Column>,
}

impl Default for Connect4 {
    fn default() -> Self {
        Self::new()
    }
}

impl Connect4 {
    /// Empty board, player 1 to move.
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: vec![None; BOARD_SIZE],
            heights: [0; COLS],
            current_player: PlayerId::FIRST,
            winner: None,
            last_move: None,
        }
    }

    /// Convert column and row to board index
    #[inline]
    fn pos(col: usize, row: usize) -> usize {
        row * COLS + col
    }

    /// Owner of the disc at (col, row), if any.
    #[must_use]
    pub fn disc(&self, col: usize, row: usize) -> Option<PlayerId> {
        if col >= COLS || row >= ROWS {
            return None;
        }
        self.board[Self::pos(col, row)]
    }

    /// Discs in `column`.
    #[must_use]
    pub fn height(&self, column: u8) -> u8 {
        self.heights[column as usize]
    }

    /// Check if the disc at (col, row) creates a winning line
    fn completes_line(&self, col: usize, row: usize, player: PlayerId) -> bool {
        let owned = |c: i32, r: i32| {
            c >= 0
                && c < COLS as i32
                && r >= 0
                && r < ROWS as i32
                && self.board[Self::pos(c as usize, r as usize)] == Some(player)
        };

        // Horizontal, vertical, diagonal /, diagonal \
        let directions: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

        directions.iter().any(|&(dc, dr)| {
            let mut count = 1;
            for sign in [1, -1] {
                let (mut c, mut r) = (col as i32 + sign * dc, row as i32 + sign * dr);
                while owned(c, r) {
                    count += 1;
                    c += sign * dc;
                    r += sign * dr;
                }
            }
            count >= CONNECT
        })
    }
}

// Positions compare by board and side to move; the move that produced
// them is ignored so transpositions are equal.
impl PartialEq for Connect4 {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.current_player == other.current_player
            && self.winner == other.winner
    }
}

impl Eq for Connect4 {}

impl Hash for Connect4 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.board.hash(state);
        self.current_player.hash(state);
        self.winner.hash(state);
    }
}

impl GameState for Connect4 {
    type Move = Column;

    fn current_player(&self) -> PlayerId {
        self.current_player
    }

    fn winner(&self) -> Option<GameResult> {
        self.winner
    }

    fn last_move(&self) -> Option<&Column> {
        self.last_move.as_ref()
    }

    fn possible_moves(&self) -> Vec<Column> {
        if self.winner.is_some() {
            return Vec::new();
        }

        (0..COLS as u8)
            .filter(|&col| (self.heights[col as usize] as usize) < ROWS)
            .map(|column| Column { column })
            .collect()
    }

    fn make_move(&mut self, mv: &Column) -> Result<&mut Self> {
        let mv = &Column::new(mv.column)?;
        let col = mv.column as usize;

        if self.winner.is_some() {
            return Err(MctsError::invalid_move("game is already over"));
        }
        if self.heights[col] as usize >= ROWS {
            return Err(MctsError::invalid_move(format!("column {col} is full")));
        }

        let player = self.current_player;
        let row = self.heights[col] as usize;
        self.board[Self::pos(col, row)] = Some(player);
        self.heights[col] += 1;
        self.last_move = Some(*mv);

        if self.completes_line(col, row, player) {
            self.winner = Some(GameResult::Winner(player));
        } else if self.heights.iter().all(|&h| h as usize >= ROWS) {
            self.winner = Some(GameResult::Draw);
        }

        self.current_player = self.next_player();
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameRng;

    fn drop_in(game: &mut Connect4, columns: &[u8]) {
        for &col in columns {
            game.make_move(&Column::new(col).unwrap()).unwrap();
        }
    }

    #[test]
    fn test_new_board() {
        let game = Connect4::new();
        assert_eq!(game.current_player(), PlayerId::new(1));
        assert_eq!(game.possible_moves().len(), COLS);
        assert!(!game.is_terminal());
    }

    #[test]
    fn test_column_bounds() {
        assert!(Column::new(6).is_ok());
        assert!(matches!(Column::new(7), Err(MctsError::InvalidMove { .. })));
    }

    #[test]
    fn test_discs_stack() {
        let mut game = Connect4::new();
        drop_in(&mut game, &[3, 3]);

        assert_eq!(game.disc(3, 0), Some(PlayerId::new(1)));
        assert_eq!(game.disc(3, 1), Some(PlayerId::new(2)));
        assert_eq!(game.height(3), 2);
    }

    #[test]
    fn test_full_column() {
        let mut game = Connect4::new();
        drop_in(&mut game, &[0, 0, 0, 0, 0]);
        assert_eq!(game.possible_moves().len(), COLS);

        drop_in(&mut game, &[0]);
        assert_eq!(game.possible_moves().len(), COLS - 1);
        assert!(!game.possible_moves().contains(&Column::new(0).unwrap()));

        let result = game.make_move(&Column::new(0).unwrap());
        assert!(matches!(result, Err(MctsError::InvalidMove { .. })));
    }

    #[test]
    fn test_vertical_win() {
        let mut game = Connect4::new();
        drop_in(&mut game, &[0, 1, 0, 1, 0, 1, 0]);

        assert_eq!(game.winner(), Some(GameResult::Winner(PlayerId::new(1))));
        assert!(game.possible_moves().is_empty());
    }

    #[test]
    fn test_horizontal_win() {
        let mut game = Connect4::new();
        drop_in(&mut game, &[0, 0, 1, 1, 2, 2, 3]);

        assert_eq!(game.winner(), Some(GameResult::Winner(PlayerId::new(1))));
    }

    #[test]
    fn test_diagonal_win() {
        let mut game = Connect4::new();
        // Player 1 builds / from (0,0) to (3,3)
        drop_in(&mut game, &[0, 1, 1, 2, 2, 3, 2, 3, 3, 6, 3]);

        assert_eq!(game.winner(), Some(GameResult::Winner(PlayerId::new(1))));
    }

    #[test]
    fn test_duplicate_is_deep() {
        let mut original = Connect4::new();
        let mut copy = original.duplicate();

        drop_in(&mut original, &[2]);
        drop_in(&mut copy, &[5]);

        assert_eq!(original.disc(2, 0), Some(PlayerId::new(1)));
        assert_eq!(original.disc(5, 0), None);
        assert_eq!(copy.disc(5, 0), Some(PlayerId::new(1)));
        assert_eq!(copy.disc(2, 0), None);
    }

    #[test]
    fn test_random_games_terminate() {
        let game = Connect4::new();
        let mut rng = GameRng::new(3);

        for _ in 0..50 {
            game.simulate_until_end(&mut rng).unwrap();
        }
        assert_eq!(game, Connect4::new());
    }
}
