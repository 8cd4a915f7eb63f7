use std::time::Duration;

use blockfall_engine::{DropEvent, Game};
use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::{tui::App, ui::widgets::GameDisplay};

/// How long a clear toast stays on screen.
const TOAST_TIME: Duration = Duration::from_millis(1500);

#[derive(Debug)]
struct Toast {
    text: &'static str,
    remaining: Duration,
}

/// The interactive session: maps keys to engine actions, feeds the fixed
/// tick quantum to the engine, and turns returned [`DropEvent`]s into
/// feedback. Pause lives here, not in the engine: a paused app simply
/// stops ticking it.
#[derive(Debug)]
pub(crate) struct PlayApp {
    game: Game,
    show_ghost: bool,
    paused: bool,
    exiting: bool,
    toast: Option<Toast>,
    last_level: usize,
    logged_game_over: bool,
}

impl PlayApp {
    /// The fixed per-tick time quantum fed to the engine (60 Hz).
    pub(crate) const TICK: Duration = Duration::from_micros(1_000_000 / 60);

    pub(crate) fn new(game: Game, show_ghost: bool) -> Self {
        let last_level = game.stats().level();
        Self {
            game,
            show_ghost,
            paused: false,
            exiting: false,
            toast: None,
            last_level,
            logged_game_over: false,
        }
    }

    pub(crate) fn into_game(self) -> Game {
        self.game
    }

    fn is_playing(&self) -> bool {
        !self.exiting && !self.paused && !self.game.is_game_over()
    }

    /// Consumes one action's event: toast text, level-up and game-over
    /// logging. Each event is seen exactly once, straight off the return
    /// value.
    fn consume(&mut self, event: DropEvent) {
        if let DropEvent::LockedCleared { lines, t_spin } = event {
            let text = match (t_spin, lines) {
                (true, 0) => "T-SPIN!",
                (true, 1) => "T-SPIN SINGLE!",
                (true, 2) => "T-SPIN DOUBLE!",
                (true, _) => "T-SPIN TRIPLE!",
                (false, 1) => "SINGLE",
                (false, 2) => "DOUBLE!",
                (false, 3) => "TRIPLE!",
                (false, _) => "QUAD!!",
            };
            tracing::debug!(lines, t_spin, score = self.game.stats().score(), "clear");
            self.toast = Some(Toast {
                text,
                remaining: TOAST_TIME,
            });
        }

        let level = self.game.stats().level();
        if level > self.last_level {
            tracing::info!(level, lines = self.game.stats().lines(), "level up");
            self.last_level = level;
        }

        if self.game.is_game_over() && !self.logged_game_over {
            tracing::info!(score = self.game.stats().score(), "game over");
            self.logged_game_over = true;
        }
    }

    fn restart(&mut self) {
        self.game.reset();
        self.paused = false;
        self.toast = None;
        self.last_level = self.game.stats().level();
        self.logged_game_over = false;
        tracing::info!(seed = %self.game.seed(), "session restarted");
    }
}

impl App for PlayApp {
    fn should_exit(&self) -> bool {
        self.exiting
    }

    fn handle_event(&mut self, event: &Event) {
        let Event::Key(key) = event else { return };
        if key.kind != KeyEventKind::Press {
            return;
        }

        let playing = self.is_playing();
        match key.code {
            KeyCode::Left if playing => self.game.move_left(),
            KeyCode::Right if playing => self.game.move_right(),
            KeyCode::Down if playing => {
                let event = self.game.soft_drop();
                self.consume(event);
            }
            KeyCode::Up if playing => {
                let event = self.game.hard_drop();
                self.consume(event);
            }
            KeyCode::Char('z') if playing => self.game.rotate_left(),
            KeyCode::Char('x') if playing => self.game.rotate_right(),
            KeyCode::Char(' ') if playing => self.game.hold(),
            KeyCode::Char('p') if !self.game.is_game_over() => self.paused = !self.paused,
            KeyCode::Char('r') => self.restart(),
            KeyCode::Char('q') | KeyCode::Esc => self.exiting = true,
            _ => {}
        }
    }

    fn update(&mut self, dt: Duration) {
        if let Some(toast) = &mut self.toast {
            toast.remaining = toast.remaining.saturating_sub(dt);
            if toast.remaining.is_zero() {
                self.toast = None;
            }
        }
        if self.is_playing() {
            let event = self.game.update(dt);
            self.consume(event);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let display = GameDisplay::new(&self.game)
            .show_ghost(self.show_ghost)
            .paused(self.paused)
            .toast(self.toast.as_ref().map(|toast| toast.text));

        let help_text = if self.game.is_game_over() {
            "Controls: R (Restart) | Q (Quit)"
        } else if self.paused {
            "Controls: P (Resume) | R (Restart) | Q (Quit)"
        } else {
            "Controls: ← → (Move) | ↓ (Soft Drop) | ↑ (Hard Drop) | Z X (Rotate) | Space (Hold) | P (Pause) | Q (Quit)"
        };
        let help_text = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        frame.render_widget(display, main_area);
        frame.render_widget(help_text, help_area);
    }
}
