use std::time::Duration;

use ratatui::DefaultTerminal;

use super::{
    App,
    event_loop::{EventLoop, TuiEvent},
};

/// Runs `app` until it asks to exit, ticking at `tick_interval`.
///
/// The terminal is restored before returning, success or not.
pub fn run<A>(app: &mut A, tick_interval: Duration) -> anyhow::Result<()>
where
    A: App,
{
    let mut terminal = ratatui::init();
    let result = run_loop(&mut terminal, app, tick_interval);
    ratatui::restore();
    result
}

fn run_loop<A>(
    terminal: &mut DefaultTerminal,
    app: &mut A,
    tick_interval: Duration,
) -> anyhow::Result<()>
where
    A: App,
{
    let mut events = EventLoop::new(tick_interval);
    while !app.should_exit() {
        match events.next()? {
            TuiEvent::Tick => app.update(tick_interval),
            TuiEvent::Render => {
                terminal.draw(|frame| app.draw(frame))?;
            }
            TuiEvent::Input(event) => app.handle_event(&event),
        }
    }
    Ok(())
}
