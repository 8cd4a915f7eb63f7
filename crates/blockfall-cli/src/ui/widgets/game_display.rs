use blockfall_engine::Game;
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block as BlockWidget, Clear, Padding, Widget},
};

use super::{BoardDisplay, PieceDisplay, PieceStackDisplay, StatsDisplay, color, style};

/// The whole session screen: hold and stats on the left, the board in the
/// center, the upcoming pieces on the right, and the pause / game-over
/// popup on top.
#[derive(Debug)]
pub struct GameDisplay<'a> {
    game: &'a Game,
    show_ghost: bool,
    paused: bool,
    toast: Option<&'a str>,
}

impl<'a> GameDisplay<'a> {
    pub fn new(game: &'a Game) -> Self {
        Self {
            game,
            show_ghost: true,
            paused: false,
            toast: None,
        }
    }

    pub fn show_ghost(self, show_ghost: bool) -> Self {
        Self { show_ghost, ..self }
    }

    pub fn paused(self, paused: bool) -> Self {
        Self { paused, ..self }
    }

    /// A transient line shown under the board (clear feedback).
    pub fn toast(self, toast: Option<&'a str>) -> Self {
        Self { toast, ..self }
    }
}

impl Widget for GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.game.is_game_over() {
            color::RED
        } else if self.paused {
            color::YELLOW
        } else {
            color::WHITE
        };
        let block_padding = Padding::symmetric(1, 0);
        let panel_block = || {
            BlockWidget::bordered()
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT)
        };

        let board = {
            let mut board_block = BlockWidget::bordered()
                .border_style(border_style)
                .style(style::DEFAULT);
            if let Some(toast) = self.toast {
                board_block = board_block.title_bottom(Line::from(toast).centered());
            }
            let widget = BoardDisplay::new(self.game.board())
                .falling_piece(self.game.falling_piece())
                .block(board_block);
            if self.show_ghost {
                widget.ghost(self.game.ghost_piece())
            } else {
                widget
            }
        };

        let hold_panel = {
            let panel =
                PieceDisplay::new().block(panel_block().title(Line::from("HOLD").centered()));
            if let Some(piece) = self.game.held_piece() {
                panel.piece(piece)
            } else {
                panel
            }
        };

        let piece_stack = PieceStackDisplay::new(self.game.next_pieces())
            .block(panel_block().title(Line::from("NEXT").centered()));

        let stats = StatsDisplay::new(self.game)
            .block(panel_block().title(Line::from("STATS").centered()));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(u16::max(hold_panel.width(), stats.width())),
            Constraint::Length(board.width()),
            Constraint::Length(piece_stack.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [hold_area, stats_area] = Layout::vertical([
            Constraint::Length(hold_panel.height()),
            Constraint::Length(stats.height()),
        ])
        .spacing(1)
        .areas(left_column);

        let [board_area] =
            Layout::vertical([Constraint::Length(board.height())]).areas(center_column);
        let [stack_area] =
            Layout::vertical([Constraint::Length(piece_stack.height())]).areas(right_column);

        hold_panel.render(hold_area, buf);
        stats.render(stats_area, buf);
        board.render(board_area, buf);
        piece_stack.render(stack_area, buf);

        let popup = if self.game.is_game_over() {
            Some(("GAME OVER", Style::new().fg(color::WHITE).bg(color::RED)))
        } else if self.paused {
            Some(("PAUSED", Style::new().fg(color::BLACK).bg(color::YELLOW)))
        } else {
            None
        };

        if let Some((text, popup_style)) = popup {
            let height = 3.min(board_area.height);
            let popup_area = Rect {
                x: board_area.x,
                y: board_area.y + board_area.height.saturating_sub(height) / 2,
                width: board_area.width,
                height,
            };
            Clear.render(popup_area, buf);
            BlockWidget::new().style(popup_style).render(popup_area, buf);
            if popup_area.height > 1 {
                let text_area = Rect {
                    y: popup_area.y + popup_area.height / 2,
                    height: 1,
                    ..popup_area
                };
                Text::styled(text, popup_style).centered().render(text_area, buf);
            }
        }
    }
}
