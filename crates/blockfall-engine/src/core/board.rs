use super::{
    BOARD_HEIGHT, BOARD_WIDTH, HIDDEN_ROWS,
    piece::{Piece, PieceKind},
};

/// A single board cell: empty, or filled by a locked piece.
///
/// The kind tag is only consumed by renderers for coloring; game logic cares
/// about empty vs. not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Block {
    #[default]
    Empty,
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }
}

/// One board row.
pub type BlockRow = [Block; BOARD_WIDTH];

const W: i16 = BOARD_WIDTH as i16;
const H: i16 = BOARD_HEIGHT as i16;

const fn in_bounds(x: i16, y: i16) -> bool {
    0 <= x && x < W && 0 <= y && y < H
}

/// The playfield: `BOARD_WIDTH` × `BOARD_HEIGHT` cells, row 0 at the top.
///
/// The top [`HIDDEN_ROWS`] rows are a buffer above the visible area; pieces
/// spawn there and the stack reaching them is a top-out. Dimensions never
/// change; only [`Board::fill_piece`] and [`Board::clear_lines`] mutate cell
/// contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [BlockRow; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const EMPTY: Self = Self {
        rows: [[Block::Empty; BOARD_WIDTH]; BOARD_HEIGHT],
    };

    /// Returns the block at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the board.
    #[must_use]
    pub fn block_at(&self, x: usize, y: usize) -> Block {
        self.rows[y][x]
    }

    /// Iterates over the rows below the hidden buffer, top to bottom: the
    /// part of the board a renderer shows.
    pub fn visible_rows(&self) -> impl Iterator<Item = &BlockRow> {
        self.rows[HIDDEN_ROWS..].iter()
    }

    /// Checks whether `piece` overlaps an occupied cell or leaves the board.
    ///
    /// This is the single source of truth for legality: every movement,
    /// rotation, and drop routes its candidate through here.
    #[must_use]
    pub fn is_colliding(&self, piece: Piece) -> bool {
        piece.cells().any(|(x, y)| {
            !in_bounds(x, y) || !self.rows[y as usize][x as usize].is_empty()
        })
    }

    /// True when `(x, y)` is inside the board and holds a locked block.
    /// Out-of-bounds coordinates are simply unoccupied.
    #[must_use]
    pub fn is_occupied(&self, x: i16, y: i16) -> bool {
        in_bounds(x, y) && !self.rows[y as usize][x as usize].is_empty()
    }

    /// Writes the piece's kind into every cell it occupies.
    ///
    /// Cells outside the board are skipped rather than written; some
    /// rotation states reference coordinates past the edges.
    pub fn fill_piece(&mut self, piece: Piece) {
        for (x, y) in piece.cells() {
            if in_bounds(x, y) {
                self.rows[y as usize][x as usize] = Block::Piece(piece.kind());
            }
        }
    }

    /// Removes every filled row and returns how many were removed.
    ///
    /// Rows above a removed row shift down one step and fresh empty rows
    /// enter at the top, so the row count is conserved. The bottom-up scan
    /// carries a shift counter, which re-evaluates each index after rows
    /// move into it, so stacked filled rows all clear in a single pass.
    pub fn clear_lines(&mut self) -> usize {
        let mut count = 0;
        for y in (0..BOARD_HEIGHT).rev() {
            if self.rows[y].iter().all(|block| !block.is_empty()) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        for row in &mut self.rows[..count] {
            *row = [Block::Empty; BOARD_WIDTH];
        }
        count
    }

    /// True when any buffer-zone cell is occupied: the stack has climbed
    /// into the hidden rows, the stricter top-out condition.
    #[must_use]
    pub fn buffer_rows_occupied(&self) -> bool {
        self.rows[..HIDDEN_ROWS]
            .iter()
            .flatten()
            .any(|block| !block.is_empty())
    }

    /// Builds a board from ASCII art for tests: `#` is an occupied cell,
    /// `.` an empty one. Rows are given top to bottom and aligned to the
    /// board's bottom; omitted rows above stay empty.
    ///
    /// # Panics
    ///
    /// Panics if a row does not have exactly [`BOARD_WIDTH`] cells or more
    /// than [`BOARD_HEIGHT`] rows are given.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut board = Self::EMPTY;
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(
            lines.len() <= BOARD_HEIGHT,
            "expected at most {BOARD_HEIGHT} rows, got {}",
            lines.len()
        );

        let y0 = BOARD_HEIGHT - lines.len();
        for (dy, line) in lines.iter().enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                cells.len(),
                BOARD_WIDTH,
                "each row must have exactly {BOARD_WIDTH} cells"
            );
            for (x, &cell) in cells.iter().enumerate() {
                if cell == '#' {
                    board.rows[y0 + dy][x] = Block::Piece(PieceKind::I);
                }
            }
        }
        board
    }
}
