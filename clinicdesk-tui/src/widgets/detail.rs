//! Detail panel widget for showing field/value pairs.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct DetailPanel<'a> {
    pub title: &'a str,
    pub fields: Vec<(&'a str, Span<'a>)>,
    pub label_style: Style,
    /// Shown instead of the fields when there are none.
    pub placeholder: &'a str,
}

impl<'a> DetailPanel<'a> {
    pub fn render(self, f: &mut Frame<'_>, area: Rect) {
        let text = if self.fields.is_empty() {
            Text::from(Span::styled(self.placeholder, self.label_style))
        } else {
            let label_style = self.label_style;
            Text::from(
                self.fields
                    .into_iter()
                    .map(|(label, value)| {
                        Line::from(vec![Span::styled(format!("{:<10}", label), label_style), value])
                    })
                    .collect::<Vec<_>>(),
            )
        };

        let widget = Paragraph::new(text)
            .block(Block::default().title(self.title).borders(Borders::ALL))
            .wrap(Wrap { trim: true });

        f.render_widget(widget, area);
    }
}
