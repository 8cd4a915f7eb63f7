use blockfall_engine::{BOARD_WIDTH, Board, HIDDEN_ROWS, Piece, VISIBLE_HEIGHT};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::BlockDisplay;

/// The visible 10×20 playfield, with the falling piece and its ghost
/// painted over the locked blocks.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    falling: Option<Piece>,
    ghost: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            falling: None,
            ghost: None,
            block: None,
        }
    }

    pub fn falling_piece(self, piece: Piece) -> Self {
        Self {
            falling: Some(piece),
            ..self
        }
    }

    pub fn ghost(self, piece: Piece) -> Self {
        Self {
            ghost: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        BOARD_WIDTH as u16 * BlockDisplay::WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        VISIBLE_HEIGHT as u16 * BlockDisplay::HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }
}

fn covers(piece: Piece, x: usize, y: usize) -> bool {
    piece
        .cells()
        .any(|(cx, cy)| cx == x as i16 && cy == y as i16)
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let rows = Layout::vertical(
            (0..VISIBLE_HEIGHT).map(|_| Constraint::Length(BlockDisplay::HEIGHT)),
        )
        .split(area);

        for (dy, row_area) in rows.iter().enumerate() {
            let cols = Layout::horizontal(
                (0..BOARD_WIDTH).map(|_| Constraint::Length(BlockDisplay::WIDTH)),
            )
            .split(*row_area);
            let y = dy + HIDDEN_ROWS;

            for (x, cell_area) in cols.iter().enumerate() {
                let display = if let Some(piece) = self.falling
                    && covers(piece, x, y)
                {
                    BlockDisplay::piece(piece.kind())
                } else if let Some(ghost) = self.ghost
                    && covers(ghost, x, y)
                {
                    BlockDisplay::ghost()
                } else {
                    BlockDisplay::from_block(self.board.block_at(x, y), true)
                };
                display.render(*cell_area, buf);
            }
        }
    }
}
