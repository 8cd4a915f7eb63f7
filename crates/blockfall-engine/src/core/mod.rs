//! Core data structures: the board, pieces, and the shape table.

pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;
pub(crate) mod shape;

/// Board width in cells.
pub const BOARD_WIDTH: usize = 10;
/// Total board height in cells, including the hidden buffer rows.
pub const BOARD_HEIGHT: usize = 22;
/// Buffer rows above the visible area; pieces spawn here.
pub const HIDDEN_ROWS: usize = 2;
/// Height of the area a renderer is expected to show.
pub const VISIBLE_HEIGHT: usize = BOARD_HEIGHT - HIDDEN_ROWS;
