use std::time::{Duration, Instant};

use crossterm::event::{self, Event};

/// What the host loop should do next.
#[derive(Debug)]
pub(super) enum TuiEvent {
    /// One fixed time quantum has elapsed.
    Tick,
    /// State may have changed since the last draw.
    Render,
    /// A terminal event arrived.
    Input(Event),
}

/// Produces ticks at a fixed interval, renders after ticks and input, and
/// otherwise blocks on terminal events until the next tick is due.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Duration,
    last_tick: Instant,
    dirty: bool,
}

impl EventLoop {
    pub(super) fn new(tick_interval: Duration) -> Self {
        Self {
            tick_interval,
            last_tick: Instant::now(),
            // The first frame must be drawn before anything happens.
            dirty: true,
        }
    }

    pub(super) fn next(&mut self) -> anyhow::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if now.duration_since(self.last_tick) >= self.tick_interval {
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick);
            }

            if self.dirty {
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            let next_tick_at = self.last_tick + self.tick_interval;
            let timeout = next_tick_at.saturating_duration_since(now);
            if !event::poll(timeout)? {
                continue;
            }

            self.dirty = true;
            return Ok(TuiEvent::Input(event::read()?));
        }
    }
}
