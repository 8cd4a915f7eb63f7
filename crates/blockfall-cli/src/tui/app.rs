use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

/// An application driven by [`run`](super::run).
pub trait App {
    /// Returns whether the runtime should stop.
    fn should_exit(&self) -> bool;

    /// Handles a terminal event (key input, resize, ...).
    fn handle_event(&mut self, event: &Event);

    /// Advances application time by one fixed quantum.
    fn update(&mut self, dt: Duration);

    /// Draws the screen. Called whenever state may have changed.
    fn draw(&self, frame: &mut Frame);
}
