//! View rendering.

pub mod detail;
pub mod queue;
pub mod sidebar;

use crate::nav::Pane;
use crate::state::App;
use crate::theme::notification_color;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(28),
            Constraint::Percentage(40),
            Constraint::Percentage(32),
        ])
        .split(layout[1]);

    sidebar::render(f, app, body[0]);
    queue::render(f, app, body[1]);
    detail::render(f, app, body[2]);

    render_footer(f, app, layout[2]);
}

/// Border style for a pane, highlighted when it has focus.
pub(crate) fn pane_border(app: &App, pane: Pane) -> Style {
    if app.focus == pane {
        Style::default().fg(app.theme.border_focus)
    } else {
        Style::default().fg(app.theme.border)
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let counts = app.session.counts();
    let feed = match (&app.feed.last_refresh, app.feed.failing) {
        (_, true) => "Feed: failing".to_string(),
        (Some(at), false) => format!("Feed: {}", at.format("%H:%M:%S")),
        (None, false) => "Feed: waiting".to_string(),
    };
    let title = format!(
        "ClinicDesk | {} | {} open, {} unread, {} done | {}",
        app.session.current_path(),
        counts.active,
        counts.unread,
        counts.hidden,
        feed
    );
    let block = Block::default().borders(Borders::ALL).title(Span::styled(
        title,
        Style::default().fg(app.theme.primary),
    ));
    f.render_widget(block, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let help = match (app.search.is_some(), app.focus) {
        (true, _) => "type to filter • Enter keep • Esc clear",
        (false, Pane::Sidebar) => "j/k move • Enter open • x expand • Tab queue • / search • q quit",
        (false, Pane::Queue) => {
            "j/k select • c complete • r restore • v resolved • / search • Ctrl-r reload • q quit"
        }
    };
    let (text, style) = match app.notifications.latest() {
        Some(note) => (
            format!("{}: {}", note.level.label(), note.message),
            Style::default().fg(notification_color(note.level, &app.theme)),
        ),
        None => (help.to_string(), Style::default().fg(app.theme.text_dim)),
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}
