use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::controller::ReviewSession;
use crate::ui::theme::Theme;

pub struct WordCard<'a> {
    session: &'a ReviewSession,
    theme: &'a Theme,
}

impl<'a> WordCard<'a> {
    pub fn new(session: &'a ReviewSession, theme: &'a Theme) -> Self {
        Self { session, theme }
    }
}

impl Widget for WordCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.session.state().as_str()))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(word) = self.session.word() else {
            Paragraph::new(Line::from(Span::styled(
                "Loading…",
                Style::default().fg(colors.text_dim()),
            )))
            .alignment(Alignment::Center)
            .render(inner, buf);
            return;
        };

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                word.word.as_str(),
                Style::default()
                    .fg(colors.word())
                    .add_modifier(Modifier::BOLD),
            )),
        ];

        let mut tag_spans = vec![Span::styled(
            format!("tag: {}", word.tag),
            Style::default().fg(colors.tag()),
        )];
        if word.learned {
            tag_spans.push(Span::styled(
                "  ✓ session complete",
                Style::default().fg(colors.success()),
            ));
        }
        // The trainer's own view of whether a previous word exists; the
        // "previous" control still follows the review state alone.
        if self.session.can_undo() == Some(true) {
            tag_spans.push(Span::styled(
                "  ↶ previous word kept",
                Style::default().fg(colors.text_dim()),
            ));
        }
        lines.push(Line::from(tag_spans));
        lines.push(Line::from(""));

        if self.session.definition().is_empty() {
            lines.push(Line::from(Span::styled(
                "· · ·",
                Style::default().fg(colors.text_dim()),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                self.session.definition(),
                Style::default().fg(colors.definition()),
            )));
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{Reply, Word, WordUpdate};

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

    fn render(session: &ReviewSession) -> String {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        WordCard::new(session, &theme).render(area, &mut buf);
        screen_text(&buf)
    }

    fn loaded(can_undo: Option<bool>) -> ReviewSession {
        let mut session = ReviewSession::new();
        let ticket = session.start();
        session.complete(
            &ticket,
            Ok(Reply::Ok(WordUpdate {
                word: Word {
                    word: "abate".to_string(),
                    definition: "to lessen".to_string(),
                    tag: "LM".to_string(),
                    learned: false,
                },
                status: "1/10".to_string(),
                message: None,
                can_undo,
            })),
        );
        session
    }

    #[test]
    fn fresh_card_hides_definition() {
        let text = render(&loaded(None));
        assert!(text.contains("abate"));
        assert!(text.contains("tag: LM"));
        assert!(!text.contains("to lessen"));
        assert!(!text.contains("previous word kept"));
    }

    #[test]
    fn undo_hint_follows_trainer_flag() {
        assert!(render(&loaded(Some(true))).contains("previous word kept"));
        assert!(!render(&loaded(Some(false))).contains("previous word kept"));
    }
}
