//! ClinicDesk console entry point.

use clinicdesk_tui::config::TuiConfig;
use clinicdesk_tui::error::TuiError;
use clinicdesk_tui::events::TuiEvent;
use clinicdesk_tui::feed;
use clinicdesk_tui::logging;
use clinicdesk_tui::notifications::NotificationLevel;
use clinicdesk_tui::persistence;
use clinicdesk_tui::state::{App, Control};
use clinicdesk_tui::views::render_view;
use crossterm::{
    event::{self, Event as CrosstermEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let config = TuiConfig::load()?;
    logging::init_tracing(&config.log_path)?;

    let mut app = App::new(config.build_session()?);
    match persistence::load(&config.persistence_path) {
        Ok(Some(state)) => app = app.restore(state),
        Ok(None) => {}
        Err(err) => {
            warn!(error = %err, "ignoring unreadable preferences");
            app.notify(NotificationLevel::Warning, format!("Preferences ignored: {}", err));
        }
    }

    let (mut terminal, _guard) = setup_terminal()?;

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);

    spawn_input_reader(event_tx.clone());
    let refresh = Duration::from_millis(config.refresh_interval_ms);
    let feed_task = feed::spawn_snapshot_feed(config.snapshot_path.clone(), refresh, event_tx.clone());
    info!(snapshot = %config.snapshot_path.display(), "console started");

    let mut ticker = tokio::time::interval(refresh);

    loop {
        terminal.draw(|f| render_view(f, &app))?;

        tokio::select! {
            _ = ticker.tick() => {}
            Some(event) = event_rx.recv() => {
                if handle_event(&mut app, event, &config.snapshot_path).await {
                    break;
                }
            }
        }
    }

    feed_task.abort();
    if let Err(err) = persistence::save(&config.persistence_path, &app.persisted_state()) {
        warn!(error = %err, "failed to save preferences");
    }
    info!("console stopped");

    Ok(())
}

/// The guard exists as soon as raw mode is on, so any later setup failure
/// still restores the terminal.
fn setup_terminal() -> Result<(Terminal<CrosstermBackend<Stdout>>, TerminalGuard), TuiError> {
    enable_raw_mode()?;
    let guard = TerminalGuard;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok((Terminal::new(backend)?, guard))
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let sent = match evt {
                    CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                        sender.blocking_send(TuiEvent::Input(key))
                    }
                    CrosstermEvent::Resize(width, height) => {
                        sender.blocking_send(TuiEvent::Resize { width, height })
                    }
                    _ => Ok(()),
                };
                if sent.is_err() {
                    break;
                }
            }
        }
    });
}

/// Returns `true` when the console should exit.
async fn handle_event(app: &mut App, event: TuiEvent, snapshot_path: &Path) -> bool {
    match event {
        TuiEvent::Input(key) => match app.handle_key(key) {
            Control::Quit => return true,
            Control::Reload => reload(app, snapshot_path).await,
            Control::Continue => {}
        },
        TuiEvent::Snapshot(snapshot) => app.apply_snapshot(*snapshot),
        TuiEvent::FeedError(message) => app.feed_failed(message),
        TuiEvent::Resize { .. } => {}
    }
    false
}

async fn reload(app: &mut App, snapshot_path: &Path) {
    match feed::load_snapshot(snapshot_path).await {
        Ok(snapshot) => {
            app.apply_snapshot(snapshot);
            app.notify(NotificationLevel::Info, "Snapshot reloaded");
        }
        Err(err) => {
            warn!(error = %err, "manual reload failed");
            app.feed_failed(err.to_string());
        }
    }
}
