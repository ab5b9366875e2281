use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::app::{Notice, NoticeKind, WordPrompt};
use crate::session::guard::PendingConfirmation;
use crate::ui::layout::centered_rect;
use crate::ui::theme::Theme;

/// What the overlay is showing.
#[derive(Clone, Copy)]
pub enum DialogContent<'a> {
    Notice(&'a Notice),
    Confirm(&'a PendingConfirmation),
    Prompt(&'a WordPrompt),
}

/// Modal overlay drawn on top of the review screen.
pub struct Dialog<'a> {
    content: DialogContent<'a>,
    theme: &'a Theme,
}

impl<'a> Dialog<'a> {
    pub fn new(content: DialogContent<'a>, theme: &'a Theme) -> Self {
        Self { content, theme }
    }

    fn frame(&self) -> (String, Color, Vec<Line<'a>>, &'static str) {
        let colors = &self.theme.colors;
        match self.content {
            DialogContent::Notice(notice) => {
                let (title, border) = match notice.kind {
                    NoticeKind::Info => (" Notice ", colors.accent()),
                    NoticeKind::Error => (" Error ", colors.error()),
                };
                let body = vec![Line::from(Span::styled(
                    notice.message.as_str(),
                    Style::default().fg(colors.fg()),
                ))];
                (title.to_string(), border, body, "[Enter] OK")
            }
            DialogContent::Confirm(pending) => {
                let body = vec![Line::from(Span::styled(
                    pending.message.as_str(),
                    Style::default().fg(colors.warning()),
                ))];
                (
                    format!(" {} ", pending.action.title()),
                    colors.error(),
                    body,
                    "[y] Confirm  [n] Cancel",
                )
            }
            DialogContent::Prompt(prompt) => {
                let (before, cursor, after) = prompt.input.render_parts();
                let cursor_style = Style::default().fg(colors.bg()).bg(colors.fg());
                let cursor_span = match cursor {
                    Some(ch) => Span::styled(ch.to_string(), cursor_style),
                    None => Span::styled(" ", cursor_style),
                };
                let body = vec![Line::from(vec![
                    Span::styled(before, Style::default().fg(colors.fg())),
                    cursor_span,
                    Span::styled(after, Style::default().fg(colors.fg())),
                ])];
                (
                    format!(" {} ", prompt.title()),
                    colors.border_focused(),
                    body,
                    "[Enter] Continue  [Esc] Cancel",
                )
            }
        }
    }
}

impl Widget for Dialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let (title, border, mut body, hint) = self.frame();
        let dialog_area = centered_rect(60, 30, area);

        body.insert(0, Line::from(""));
        body.push(Line::from(""));
        body.push(Line::from(Span::styled(
            hint,
            Style::default()
                .fg(colors.text_dim())
                .add_modifier(Modifier::ITALIC),
        )));

        Clear.render(dialog_area, buf);
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .style(Style::default().bg(colors.bg()))
            .block(
                Block::bordered()
                    .title(title)
                    .border_style(Style::default().fg(border))
                    .style(Style::default().bg(colors.bg())),
            )
            .render(dialog_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::FileId;
    use crate::session::guard::{DestructiveAction, DestructiveActionGuard};

    fn screen_text(buf: &Buffer) -> String {
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn confirm_shows_warning_and_keys() {
        let theme = Theme::default();
        let mut guard = DestructiveActionGuard::new();
        guard.request(DestructiveAction::DeleteFile {
            file: FileId(7),
            shared: false,
        });
        let pending = guard.pending().expect("prompt open");

        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        Dialog::new(DialogContent::Confirm(pending), &theme).render(area, &mut buf);

        let text = screen_text(&buf);
        assert!(text.contains("[y] Confirm"));
        assert!(text.contains(pending.action.title()));
    }

    #[test]
    fn error_notice_is_titled_error() {
        let theme = Theme::default();
        let notice = Notice {
            kind: NoticeKind::Error,
            message: "Network error".to_string(),
        };
        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        Dialog::new(DialogContent::Notice(&notice), &theme).render(area, &mut buf);

        let text = screen_text(&buf);
        assert!(text.contains(" Error "));
        assert!(text.contains("Network error"));
    }
}
