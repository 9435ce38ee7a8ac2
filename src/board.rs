//! Grid representation of a Connect 4 board under gravity

use std::fmt;

use serde::Serialize;

use crate::error::{LayoutError, MoveError};
use crate::{DEFAULT_COLUMNS, DEFAULT_ROWS, WIN_LENGTH};

/// The occupant of a single board cell
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
#[repr(u8)]
pub enum Cell {
    Empty = 0,
    Player = 1,
    Ai = 2,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// The occupant playing against this one
    pub fn opponent(&self) -> Cell {
        match self {
            Cell::Player => Cell::Ai,
            Cell::Ai => Cell::Player,
            Cell::Empty => Cell::Empty,
        }
    }

    fn glyph(&self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Player => 'X',
            Cell::Ai => 'O',
        }
    }

    fn from_glyph(glyph: char) -> Result<Self, LayoutError> {
        match glyph {
            '.' => Ok(Cell::Empty),
            'X' | 'x' => Ok(Cell::Player),
            'O' | 'o' => Ok(Cell::Ai),
            _ => Err(LayoutError::UnknownCell(glyph)),
        }
    }
}

/// A cell position, with row 0 at the bottom of the board
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Serialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A window of contiguous cells in one orientation
pub type Line = [Coord; WIN_LENGTH];

/// The outcome of scanning a board for an alignment
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WinResult {
    /// The first winning window found, in scan order
    pub line: Option<Line>,
}

impl WinResult {
    pub fn is_win(&self) -> bool {
        self.line.is_some()
    }
}

fn line(row: usize, col: usize, d_row: isize, d_col: isize) -> Line {
    let mut line = [Coord::new(row, col); WIN_LENGTH];
    for (i, coord) in line.iter_mut().enumerate() {
        coord.row = (row as isize + d_row * i as isize) as usize;
        coord.col = (col as isize + d_col * i as isize) as usize;
    }
    line
}

/// A rows x columns grid of cells
///
/// Pieces always sit on top of each other: every column is a contiguous run of
/// occupied cells starting at row 0. The only way to add a piece is to drop it
/// into a column, where it lands on the lowest empty row.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    cells: Vec<Cell>, // cells are stored left-to-right, bottom-to-top
    heights: Vec<usize>,
    rows: usize,
    columns: usize,
    num_moves: usize,
}

impl Board {
    /// Creates an empty board
    ///
    /// # Panics
    /// If either dimension cannot hold a winning line.
    pub fn new(rows: usize, columns: usize) -> Self {
        assert!(
            rows >= WIN_LENGTH && columns >= WIN_LENGTH,
            "a {}x{} board cannot hold a line of {}",
            rows,
            columns,
            WIN_LENGTH
        );
        Self {
            cells: vec![Cell::Empty; rows * columns],
            heights: vec![0; columns],
            rows,
            columns,
            num_moves: 0,
        }
    }

    /// Parses a picture of a board, top row first
    ///
    /// `.` is an empty cell, `X` a player piece and `O` an AI piece.
    pub fn from_layout<S: AsRef<str>>(layout: &[S]) -> Result<Self, LayoutError> {
        let rows = layout.len();
        let columns = layout.first().map_or(0, |row| row.as_ref().chars().count());
        if rows < WIN_LENGTH || columns < WIN_LENGTH {
            return Err(LayoutError::TooSmall {
                rows,
                columns,
                min: WIN_LENGTH,
            });
        }

        // bottom row first
        let mut grid = Vec::with_capacity(rows);
        for (row, text) in layout.iter().rev().enumerate() {
            let cells = text
                .as_ref()
                .chars()
                .map(Cell::from_glyph)
                .collect::<Result<Vec<_>, _>>()?;
            if cells.len() != columns {
                return Err(LayoutError::RaggedRow {
                    row,
                    found: cells.len(),
                    expected: columns,
                });
            }
            grid.push(cells);
        }

        let mut board = Self::new(rows, columns);
        for col in 0..columns {
            for (row, cells) in grid.iter().enumerate() {
                let cell = cells[col];
                if cell.is_empty() {
                    continue;
                }
                if board.heights[col] != row {
                    return Err(LayoutError::FloatingPiece { row, col });
                }
                board.push(col, cell);
            }
        }
        Ok(board)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// The number of pieces on the board
    pub fn num_moves(&self) -> usize {
        self.num_moves
    }

    /// The column offering the most windows
    pub fn center_column(&self) -> usize {
        self.columns / 2
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[col + self.columns * row]
    }

    pub fn cell(&self, coord: Coord) -> Cell {
        self.get(coord.row, coord.col)
    }

    /// The number of pieces in a column
    pub fn height(&self, col: usize) -> usize {
        self.heights[col]
    }

    pub fn playable(&self, col: usize) -> bool {
        col < self.columns && self.heights[col] < self.rows
    }

    /// Columns whose top cell is empty, in ascending order
    pub fn legal_moves(&self) -> Vec<usize> {
        (0..self.columns).filter(|&col| self.playable(col)).collect()
    }

    pub fn is_full(&self) -> bool {
        self.num_moves == self.rows * self.columns
    }

    /// Drops a piece into a column, returning the row it landed on
    ///
    /// # Panics
    /// If `cell` is [`Cell::Empty`].
    pub fn play(&mut self, col: usize, cell: Cell) -> Result<usize, MoveError> {
        assert!(!cell.is_empty(), "only pieces can be dropped");
        if col >= self.columns {
            return Err(MoveError::ColumnOutOfRange {
                column: col,
                columns: self.columns,
            });
        }
        if !self.playable(col) {
            return Err(MoveError::ColumnFull { column: col });
        }
        Ok(self.push(col, cell))
    }

    /// Returns a copy of this board with a piece dropped into a column
    pub fn drop(&self, col: usize, cell: Cell) -> Result<Self, MoveError> {
        let mut next = self.clone();
        next.play(col, cell)?;
        Ok(next)
    }

    // assumes the column is playable
    pub(crate) fn push(&mut self, col: usize, cell: Cell) -> usize {
        debug_assert!(self.playable(col) && !cell.is_empty());
        let row = self.heights[col];
        self.cells[col + self.columns * row] = cell;
        self.heights[col] += 1;
        self.num_moves += 1;
        row
    }

    // undoes the last push into this column
    pub(crate) fn pop(&mut self, col: usize) {
        debug_assert!(self.heights[col] > 0);
        self.heights[col] -= 1;
        self.cells[col + self.columns * self.heights[col]] = Cell::Empty;
        self.num_moves -= 1;
    }

    /// Every window on the board
    ///
    /// Windows come horizontal first (row by row), then vertical (column by
    /// column), then upward diagonals, then downward diagonals. Each window
    /// lists its cells starting from its leftmost (or lowest) end.
    pub fn lines(&self) -> impl Iterator<Item = Line> {
        let (rows, columns) = (self.rows, self.columns);
        let span = WIN_LENGTH - 1;

        let horizontal = (0..rows)
            .flat_map(move |row| (0..columns - span).map(move |col| line(row, col, 0, 1)));
        let vertical = (0..columns)
            .flat_map(move |col| (0..rows - span).map(move |row| line(row, col, 1, 0)));
        let upward = (0..columns - span)
            .flat_map(move |col| (0..rows - span).map(move |row| line(row, col, 1, 1)));
        let downward = (0..columns - span)
            .flat_map(move |col| (span..rows).map(move |row| line(row, col, -1, 1)));

        horizontal.chain(vertical).chain(upward).chain(downward)
    }

    /// The occupants of a window
    pub fn window(&self, line: &Line) -> [Cell; WIN_LENGTH] {
        line.map(|coord| self.cell(coord))
    }

    /// Finds the first window fully owned by `cell`
    pub fn check_win(&self, cell: Cell) -> WinResult {
        WinResult {
            line: self
                .lines()
                .find(|line| line.iter().all(|&coord| self.cell(coord) == cell)),
        }
    }

    pub fn has_won(&self, cell: Cell) -> bool {
        self.check_win(cell).is_win()
    }

    /// Whether the game on this board has concluded, by a win or a full board
    pub fn is_terminal(&self) -> bool {
        self.has_won(Cell::Player) || self.has_won(Cell::Ai) || self.is_full()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS, DEFAULT_COLUMNS)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.rows).rev() {
            let text: String = (0..self.columns)
                .map(|col| self.get(row, col).glyph())
                .collect();
            writeln!(f, "{}", text)?;
        }
        Ok(())
    }
}
