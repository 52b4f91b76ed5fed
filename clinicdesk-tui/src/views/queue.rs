//! Conversation queue: tabs, search bar and the item list.

use crate::nav::Pane;
use crate::state::App;
use crate::theme::triage_item_color;
use crate::views::pane_border;
use crate::widgets::{QueueTab, SearchBar};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let filtered = app.session.filtered();
    let tabs = [
        QueueTab {
            label: format!("Open ({})", filtered.active.len()),
            selected: !app.show_hidden,
        },
        QueueTab {
            label: format!("Done ({})", filtered.hidden.len()),
            selected: app.show_hidden,
        },
    ];
    let query = match &app.search {
        Some(search) => search.query.as_str(),
        None => app.session.triage().filter_text(),
    };
    SearchBar {
        tabs: &tabs,
        query,
        editing: app.search.is_some(),
        active_style: Style::default().fg(app.theme.primary).add_modifier(Modifier::BOLD),
        inactive_style: Style::default().fg(app.theme.text_dim),
    }
    .render(f, chunks[0]);

    let visible = app.visible_items();
    let items: Vec<ListItem> = visible
        .iter()
        .map(|item| {
            let style = Style::default().fg(triage_item_color(item, &app.theme));
            let marker = if item.has_unread { "● " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(item.display_name.clone(), style),
                Span::styled(
                    format!("  {}", item.last_activity.format("%d %b %H:%M")),
                    Style::default().fg(app.theme.text_muted),
                ),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    if let Some(selected) = app.session.triage().selected_id() {
        state.select(visible.iter().position(|item| item.id == selected));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .title(Pane::Queue.title())
                .borders(Borders::ALL)
                .border_style(pane_border(app, Pane::Queue)),
        )
        .highlight_style(Style::default().bg(app.theme.bg_highlight));
    f.render_stateful_widget(list, chunks[1], &mut state);
}
