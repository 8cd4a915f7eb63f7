use blockfall_engine::{PieceKind, PieceRotation};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::BlockDisplay;

/// A single piece preview in its spawn orientation, centered in a 4×2 cell
/// box. Renders just the frame when no piece is set (an empty held slot).
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            piece: None,
            block: None,
        }
    }

    pub fn piece(self, piece: PieceKind) -> Self {
        Self {
            piece: Some(piece),
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
        4 * BlockDisplay::WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        2 * BlockDisplay::HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(kind) = self.piece else {
            return;
        };

        let rotation = PieceRotation::default();
        let (cells_w, cells_h) = kind.size(rotation);
        let piece_width = u16::from(cells_w) * BlockDisplay::WIDTH;
        let piece_height = u16::from(cells_h) * BlockDisplay::HEIGHT;
        let piece_area = Rect {
            x: area.x + area.width.saturating_sub(piece_width) / 2,
            y: area.y + area.height.saturating_sub(piece_height) / 2,
            width: piece_width.min(area.width),
            height: piece_height.min(area.height),
        };

        let display = BlockDisplay::piece(kind);
        for y in 0..cells_h {
            for x in 0..cells_w {
                if !kind.is_occupied(rotation, (x, y)) {
                    continue;
                }
                let cell_area = Rect {
                    x: piece_area.x + u16::from(x) * BlockDisplay::WIDTH,
                    y: piece_area.y + u16::from(y) * BlockDisplay::HEIGHT,
                    width: BlockDisplay::WIDTH,
                    height: BlockDisplay::HEIGHT,
                };
                Widget::render(&display, cell_area.intersection(area), buf);
            }
        }
    }
}
