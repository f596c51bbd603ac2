use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::time::{Duration, Instant};
use tracing::info;

use super::app::{Action, App};
use super::events::handle_key_event;
use super::ui;
use crate::api::RentApi;
use crate::config::Config;
use crate::tracker::RentTracker;

pub async fn run_dashboard<A: RentApi>(
    tracker: RentTracker<A>,
    config: Config,
    tick_rate: Duration,
) -> Result<()> {
    info!(server = %config.server_url, "starting dashboard");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(tracker, &config);
    let res = run_app(&mut terminal, &mut app, tick_rate).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

async fn run_app<B: Backend, A: RentApi>(
    terminal: &mut Terminal<B>,
    app: &mut App<A>,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    let mut pending = Some(Action::Reload);

    loop {
        // One request in flight at a time.
        if let Some(action) = pending.take() {
            app.busy = true;
            terminal.draw(|f| ui::draw(f, app))?;
            app.perform(action).await;
            // Drop whatever was typed while waiting on the server.
            while event::poll(Duration::ZERO)? {
                let _ = event::read()?;
            }
            app.busy = false;
        }

        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') if app.modal.is_none() => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    _ => pending = handle_key_event(key, app),
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
}
