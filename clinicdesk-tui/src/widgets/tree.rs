//! Collapsible sidebar tree widget.

use clinicdesk_core::NavRow;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

#[derive(Debug, Clone)]
pub struct SidebarStyle {
    pub normal: Style,
    pub active: Style,
    pub cursor: Style,
    pub border: Style,
}

pub struct SidebarTree<'a> {
    pub title: &'a str,
    pub rows: &'a [NavRow],
    pub cursor: Option<usize>,
    pub style: SidebarStyle,
    pub badge_style: &'a dyn Fn(u32) -> Style,
}

impl<'a> SidebarTree<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self.rows.iter().map(|row| self.row_item(row)).collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(self.title)
                    .borders(Borders::ALL)
                    .border_style(self.style.border),
            )
            .highlight_style(self.style.cursor);

        let mut state = ListState::default();
        state.select(self.cursor);
        f.render_stateful_widget(list, area, &mut state);
    }

    fn row_item(&self, row: &NavRow) -> ListItem<'static> {
        let indent = "  ".repeat(row.depth);
        let marker = match (row.has_submenu, row.expanded) {
            (true, true) => "▾ ",
            (true, false) => "▸ ",
            (false, _) => "  ",
        };
        let label_style = if row.active {
            self.style.active.add_modifier(Modifier::BOLD)
        } else {
            self.style.normal
        };

        let mut spans = vec![
            Span::raw(format!("{}{}", indent, marker)),
            Span::styled(row.label.clone(), label_style),
        ];
        if row.badge > 0 {
            spans.push(Span::styled(format!(" ({})", row.badge), (self.badge_style)(row.badge)));
        }
        ListItem::new(Line::from(spans))
    }
}
