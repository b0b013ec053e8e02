//! Interactive terminal runner.
//!
//! Sets up the terminal, drives the [`App`] from the frame loop and the
//! input listener, and restores the terminal on the way out, including on
//! error paths.

use std::io::{self, stdout, Stdout};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use super::app::App;
use super::input::InputListener;
use crate::config::Settings;
use crate::error::Result;
use crate::frame_loop::FrameLoop;

/// Terminal type used by the runner.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize terminal for TUI mode.
///
/// Raw mode is switched back off if any later step fails.
pub fn init_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    let setup = (|| {
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        Terminal::new(CrosstermBackend::new(stdout))
    })();
    undo_on_error(setup, disable_raw_mode)
}

/// Run `undo` when `result` is an error, keeping the original error.
fn undo_on_error<T>(
    result: io::Result<T>,
    undo: impl FnOnce() -> io::Result<()>,
) -> io::Result<T> {
    if let Err(err) = &result {
        if let Err(undo_err) = undo() {
            warn!(%err, %undo_err, "failed to roll back terminal setup");
        }
    }
    result
}

/// Restore terminal from TUI mode.
pub fn restore_terminal(terminal: &mut Tui) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()
}

/// Run the interactive widget until the user quits.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up, drawn to, or restored.
pub async fn run(settings: &Settings) -> Result<()> {
    let mut terminal = init_terminal()?;
    let outcome = event_loop(&mut terminal, settings).await;
    let restored = restore_terminal(&mut terminal);

    if let Err(err) = &restored {
        warn!(%err, "failed to restore terminal");
    }
    outcome?;
    restored?;
    Ok(())
}

async fn event_loop(terminal: &mut Tui, settings: &Settings) -> Result<()> {
    let mut app = App::new(settings);
    let (mut frames, mut ticks) = FrameLoop::new(settings.display.fps);
    let (input, mut events) = InputListener::new();
    let mut listener = input.start();

    frames.start();
    info!(fps = settings.display.fps, "widget mounted");

    let mut outcome = terminal.draw(|frame| app.render(frame)).map(|_| ());
    while outcome.is_ok() {
        tokio::select! {
            tick = ticks.recv() => match tick {
                Some(tick) => {
                    app.on_frame(tick.elapsed);
                }
                None => break,
            },
            event = events.recv() => match event {
                Some(event) => app.handle_event(event),
                None => break,
            },
        }

        if !app.is_running() {
            break;
        }
        outcome = terminal.draw(|frame| app.render(frame)).map(|_| ());
    }

    // Unmount: timers first, then the loops feeding the widget.
    app.teardown();
    frames.stop();
    listener.stop();
    info!("widget unmounted");

    outcome.map_err(Into::into)
}
