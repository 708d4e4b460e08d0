//! Tic-tac-toe on a 3x3 board.

use std::collections::HashMap;
use std::fmt;

use anyhow::bail;

use super::Player;
use crate::game::Game;

/// Index of a cell, `0..9`, row by row from the top left corner.
pub type Cell = usize;

const CELLS: usize = 9;

const LINES: [[Cell; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Marks on the board and the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Player>; CELLS],
    to_move: Player,
}

impl Board {
    /// Empty board with Red to move.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            cells: [None; CELLS],
            to_move: Player::Red,
        }
    }

    /// Player who places the next mark.
    #[must_use]
    pub const fn to_move(&self) -> Player {
        self.to_move
    }

    /// Returns the owner of the mark at `cell`, if any.
    #[must_use]
    pub fn at(&self, cell: Cell) -> Option<Player> {
        self.cells[cell]
    }

    /// Returns the player owning a complete line, if any.
    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        LINES.iter().find_map(|&[a, b, c]| match self.cells[a] {
            Some(player) if self.cells[b] == Some(player) && self.cells[c] == Some(player) => {
                Some(player)
            },
            _ => None,
        })
    }

    /// Returns `true` if every cell is marked.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    fn count(&self, player: Player) -> usize {
        self.cells.iter().filter(|&&cell| cell == Some(player)).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl TryFrom<&str> for Board {
    type Error = anyhow::Error;

    /// Parses rows of `R` (Red), `B` (Blue) and `.` (empty) cells separated by
    /// `/`, e.g. `RB./.R./..B`. The side to move follows from the number of
    /// marks since Red always starts.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let rows: Vec<&str> = input.trim().split('/').collect();
        if rows.len() != 3 {
            bail!("expected 3 rows, got {}", rows.len());
        }
        let mut cells = [None; CELLS];
        for (row_index, row) in rows.iter().enumerate() {
            if row.chars().count() != 3 {
                bail!("expected 3 cells in row {}, got '{row}'", row_index + 1);
            }
            for (column, symbol) in row.chars().enumerate() {
                cells[row_index * 3 + column] = match symbol {
                    'R' => Some(Player::Red),
                    'B' => Some(Player::Blue),
                    '.' => None,
                    _ => bail!("unknown cell symbol '{symbol}'"),
                };
            }
        }
        let mut board = Self {
            cells,
            to_move: Player::Red,
        };
        let (red, blue) = (board.count(Player::Red), board.count(Player::Blue));
        board.to_move = match red.checked_sub(blue) {
            Some(0) => Player::Red,
            Some(1) => Player::Blue,
            _ => bail!("Red moves first: got {red} red and {blue} blue marks"),
        };
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.chunks(3).enumerate() {
            if row > 0 {
                write!(f, "/")?;
            }
            for cell in cells {
                let symbol = match cell {
                    Some(Player::Red) => 'R',
                    Some(Player::Blue) => 'B',
                    None => '.',
                };
                write!(f, "{symbol}")?;
            }
        }
        Ok(())
    }
}

/// Rules of tic-tac-toe: three in a row wins, a full board without a line is
/// a draw.
#[derive(Clone, Copy, Debug, Default)]
pub struct TicTacToe;

impl Game for TicTacToe {
    type State = Board;
    type Action = Cell;
    type Player = Player;

    fn current_player(&self, state: &Board) -> Player {
        state.to_move
    }

    fn legal_actions(&self, state: &Board) -> Vec<Cell> {
        if state.winner().is_some() {
            return Vec::new();
        }
        (0..CELLS).filter(|&cell| state.cells[cell].is_none()).collect()
    }

    fn next_state(&self, state: &Board, action: &Cell) -> Board {
        debug_assert!(state.cells[*action].is_none());
        let mut next = *state;
        next.cells[*action] = Some(state.to_move);
        next.to_move = !state.to_move;
        next
    }

    fn is_ended(&self, state: &Board) -> bool {
        state.winner().is_some() || state.is_full()
    }

    fn win_values(&self, state: &Board) -> HashMap<Player, f64> {
        match state.winner() {
            Some(winner) => HashMap::from([(winner, 1.0), (!winner, 0.0)]),
            None => HashMap::from([(Player::Red, 0.5), (Player::Blue, 0.5)]),
        }
    }
}
