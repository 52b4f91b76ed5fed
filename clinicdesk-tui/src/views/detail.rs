//! Selected conversation details.

use crate::state::App;
use crate::widgets::DetailPanel;
use ratatui::{layout::Rect, style::Style, text::Span, Frame};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let triage = app.session.triage();
    let theme = &app.theme;

    let mut fields = Vec::new();
    if let Some(item) = triage.selected_item() {
        let status = if triage.is_hidden(item.id) {
            Span::styled("done", Style::default().fg(theme.success))
        } else {
            Span::styled("open", Style::default().fg(theme.primary))
        };
        let unread = if item.has_unread {
            Span::styled("yes", Style::default().fg(theme.warning))
        } else {
            Span::raw("no")
        };
        fields.push(("Name", Span::raw(item.display_name.clone())));
        fields.push(("Id", Span::raw(item.id.to_string())));
        fields.push(("Status", status));
        fields.push(("Unread", unread));
        fields.push(("Last", Span::raw(item.last_activity.to_rfc3339())));
    }

    DetailPanel {
        title: "Details",
        fields,
        label_style: Style::default().fg(theme.text_dim),
        placeholder: "No conversation selected",
    }
    .render(f, area);
}
