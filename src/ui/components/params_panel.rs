use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::app::ParamEditor;
use crate::session::params::ParamField;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

pub struct ParamsPanel<'a> {
    editor: &'a ParamEditor,
    theme: &'a Theme,
}

impl<'a> ParamsPanel<'a> {
    pub fn new(editor: &'a ParamEditor, theme: &'a Theme) -> Self {
        Self { editor, theme }
    }

    fn field_line(&self, field: ParamField, input: &'a LineInput) -> Line<'a> {
        let colors = &self.theme.colors;
        let focused = self.editor.focus == Some(field);
        let label_style = if focused {
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.text_dim())
        };

        let mut spans = vec![Span::styled(format!("{}: ", field.label()), label_style)];
        if focused {
            let (before, cursor, after) = input.render_parts();
            let cursor_style = Style::default().fg(colors.bg()).bg(colors.fg());
            spans.push(Span::styled(before, Style::default().fg(colors.fg())));
            match cursor {
                Some(ch) => spans.push(Span::styled(ch.to_string(), cursor_style)),
                None => spans.push(Span::styled(" ", cursor_style)),
            }
            spans.push(Span::styled(after, Style::default().fg(colors.fg())));
        } else {
            spans.push(Span::styled(input.value(), Style::default().fg(colors.fg())));
        }
        Line::from(spans)
    }
}

impl Widget for ParamsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let border = if self.editor.focus.is_some() {
            colors.border_focused()
        } else {
            colors.border()
        };

        let block = Block::bordered()
            .title(" Parameters [Tab] ")
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(16),
                Constraint::Length(16),
                Constraint::Min(0),
            ])
            .split(inner);

        Paragraph::new(self.field_line(ParamField::A, &self.editor.a)).render(columns[0], buf);
        Paragraph::new(self.field_line(ParamField::B, &self.editor.b)).render(columns[1], buf);

        if let Some(error) = &self.editor.error {
            Paragraph::new(Line::from(Span::styled(
                error.as_str(),
                Style::default().fg(colors.error()),
            )))
            .render(columns[2], buf);
        }
    }
}
