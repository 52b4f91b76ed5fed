//! Queue header: active/hidden tabs and the search bar.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

#[derive(Debug, Clone)]
pub struct QueueTab {
    pub label: String,
    pub selected: bool,
}

pub struct SearchBar<'a> {
    pub tabs: &'a [QueueTab],
    pub query: &'a str,
    /// Whether keystrokes currently go to the query.
    pub editing: bool,
    pub active_style: Style,
    pub inactive_style: Style,
}

impl<'a> SearchBar<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let mut spans: Vec<Span> = self
            .tabs
            .iter()
            .map(|tab| {
                let style = if tab.selected {
                    self.active_style
                } else {
                    self.inactive_style
                };
                Span::styled(format!(" {} ", tab.label), style)
            })
            .collect();

        spans.push(Span::raw("  "));
        if self.editing {
            spans.push(Span::styled(format!("/{}_", self.query), self.active_style));
        } else if !self.query.is_empty() {
            spans.push(Span::styled(format!("/{}", self.query), self.inactive_style));
        }

        let paragraph = Paragraph::new(Line::from(spans))
            .block(Block::default().title("Queue").borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }
}
