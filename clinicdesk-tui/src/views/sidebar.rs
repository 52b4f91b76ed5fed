//! Navigation sidebar.

use crate::nav::Pane;
use crate::state::App;
use crate::theme::badge_color;
use crate::views::pane_border;
use crate::widgets::{SidebarStyle, SidebarTree};
use ratatui::{layout::Rect, style::Style, Frame};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let rows = app.sidebar_rows();
    let theme = &app.theme;
    let badge_style = |count: u32| Style::default().fg(badge_color(count, theme));

    let tree = SidebarTree {
        title: Pane::Sidebar.title(),
        rows: &rows,
        cursor: (app.focus == Pane::Sidebar).then_some(app.sidebar_cursor),
        style: SidebarStyle {
            normal: Style::default().fg(theme.text),
            active: Style::default().fg(theme.primary),
            cursor: Style::default().bg(theme.bg_highlight),
            border: pane_border(app, Pane::Sidebar),
        },
        badge_style: &badge_style,
    };
    tree.render(f, area);
}
