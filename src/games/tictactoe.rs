//! Tic-Tac-Toe on a 3x3 board.
//!
//! Cells are stored in row-major order:
//! ```text
//! [0][1][2]
//! [3][4][5]
//! [6][7][8]
//! ```

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;
use crate::error::{MctsError, Result};
use crate::rules::{GameResult, GameState};

/// Board side length.
pub const SIZE: usize = 3;
/// Number of cells.
pub const CELLS: usize = SIZE * SIZE;

/// A mark placed in one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    row: u8,
    col: u8,
}

impl Cell {
    /// Create a move, rejecting coordinates off the board.
    pub fn new(row: u8, col: u8) -> Result<Self> {
        if row as usize >= SIZE || col as usize >= SIZE {
            return Err(MctsError::invalid_move(format!(
                "cell ({row}, {col}) is outside the {SIZE}x{SIZE} board"
            )));
        }
        Ok(Self { row, col })
    }

    /// Row, 0-based from the top.
    #[must_use]
    pub fn row(self) -> u8 {
        self.row
    }

    /// Column, 0-based from the left.
    #[must_use]
    pub fn col(self) -> u8 {
        self.col
    }

    #[inline]
    fn index(self) -> usize {
        self.row as usize * SIZE + self.col as usize
    }

    fn from_index(idx: usize) -> Self {
        Self {
            row: (idx / SIZE) as u8,
            col: (idx % SIZE) as u8,
        }
    }
}

/// Tic-Tac-Toe position.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TicTacToe {
    board: [Option<PlayerId>; CELLS],
    current_player: PlayerId,
    winner: Option<GameResult>,
    last_move: Option<Cell>,
    moves_played: u8,
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl TicTacToe {
    /// Empty board, player 1 to move.
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: [None; CELLS],
            current_player: PlayerId::FIRST,
            winner: None,
            last_move: None,
            moves_played: 0,
        }
    }

    /// Owner of a cell, if marked.
    #[must_use]
    pub fn cell(&self, cell: Cell) -> Option<PlayerId> {
        self.board[cell.index()]
    }

    /// Number of marks on the board.
    #[must_use]
    pub fn moves_played(&self) -> u8 {
        self.moves_played
    }

    /// Check the row, column and diagonals through `cell` for a line.
    fn completes_line(&self, cell: Cell, player: PlayerId) -> bool {
        let (r, c) = (cell.row as usize, cell.col as usize);
        let owned = |row: usize, col: usize| self.board[row * SIZE + col] == Some(player);

        (0..SIZE).all(|i| owned(r, i))
            || (0..SIZE).all(|i| owned(i, c))
            || (r == c && (0..SIZE).all(|i| owned(i, i)))
            || (r + c == SIZE - 1 && (0..SIZE).all(|i| owned(i, SIZE - 1 - i)))
    }
}

// Positions compare by board and side to move; the move that produced
// them is ignored so transpositions are equal.
impl PartialEq for TicTacToe {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.current_player == other.current_player
            && self.winner == other.winner
    }
}

impl Eq for TicTacToe {}

impl Hash for TicTacToe {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.board.hash(state);
        self.current_player.hash(state);
        self.winner.hash(state);
    }
}

impl GameState for TicTacToe {
    type Move = Cell;

    fn current_player(&self) -> PlayerId {
        self.current_player
    }

    fn winner(&self) -> Option<GameResult> {
        self.winner
    }

    fn last_move(&self) -> Option<&Cell> {
        self.last_move.as_ref()
    }

    fn possible_moves(&self) -> Vec<Cell> {
        if self.winner.is_some() {
            return Vec::new();
        }

        (0..CELLS)
            .filter(|&idx| self.board[idx].is_none())
            .map(Cell::from_index)
            .collect()
    }

    fn make_move(&mut self, mv: &Cell) -> Result<&mut Self> {
        // Decoded moves bypass `Cell::new`
        let mv = &Cell::new(mv.row, mv.col)?;
        if self.winner.is_some() {
            return Err(MctsError::invalid_move("game is already over"));
        }
        if let Some(owner) = self.board[mv.index()] {
            return Err(MctsError::invalid_move(format!(
                "cell ({}, {}) is already taken by {owner}",
                mv.row, mv.col
            )));
        }

        let player = self.current_player;
        self.board[mv.index()] = Some(player);
        self.moves_played += 1;
        self.last_move = Some(*mv);

        if self.completes_line(*mv, player) {
            self.winner = Some(GameResult::Winner(player));
        } else if self.moves_played as usize == CELLS {
            self.winner = Some(GameResult::Draw);
        }

        self.current_player = self.next_player();
        Ok(self)
    }
}

impl std::fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..SIZE {
            for col in 0..SIZE {
                let mark = match self.board[row * SIZE + col] {
                    Some(PlayerId(1)) => 'X',
                    Some(_) => 'O',
                    None => '.',
                };
                write!(f, "{mark}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
