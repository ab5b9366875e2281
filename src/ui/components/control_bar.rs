use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::config::ChoiceButton;
use crate::session::review::{ButtonState, Weight};
use crate::ui::theme::Theme;

/// The review controls, each drawn full-weight or dimmed from `ButtonState`.
pub struct ControlBar<'a> {
    choices: &'a [ChoiceButton],
    buttons: ButtonState,
    theme: &'a Theme,
}

impl<'a> ControlBar<'a> {
    pub fn new(choices: &'a [ChoiceButton], buttons: ButtonState, theme: &'a Theme) -> Self {
        Self {
            choices,
            buttons,
            theme,
        }
    }

    fn button(&self, key: &str, label: &str, weight: Weight) -> Span<'static> {
        let colors = &self.theme.colors;
        let style = match weight {
            Weight::Full => Style::default()
                .fg(colors.control(weight))
                .add_modifier(Modifier::BOLD),
            Weight::Dimmed => Style::default()
                .fg(colors.control(weight))
                .add_modifier(Modifier::DIM),
        };
        Span::styled(format!(" [{key}] {label} "), style)
    }
}

impl Widget for ControlBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut spans = vec![self.button("b", "Previous", self.buttons.prev_weight())];
        for (i, choice) in self.choices.iter().enumerate() {
            spans.push(self.button(
                &(i + 1).to_string(),
                &choice.label,
                self.buttons.choices_weight(),
            ));
        }
        spans.push(self.button("m", "Mastered", self.buttons.mastered_weight()));
        spans.push(self.button("n", "Next", self.buttons.next_weight()));

        Paragraph::new(Line::from(spans)).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::review::{ReviewState, compute_button_state};

    fn rendered(state: ReviewState) -> Buffer {
        let theme = Theme::default();
        let choices = vec![ChoiceButton {
            label: "Familiar".to_string(),
            value: "H".to_string(),
        }];
        let area = Rect::new(0, 0, 80, 3);
        let mut buf = Buffer::empty(area);
        ControlBar::new(&choices, compute_button_state(state), &theme).render(area, &mut buf);
        buf
    }

    fn row_text(buf: &Buffer) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, 1)].symbol().to_string())
            .collect()
    }

    fn style_of(buf: &Buffer, needle: &str) -> Style {
        let text = row_text(buf);
        let byte = text.find(needle).expect("label rendered");
        let col = text[..byte].chars().count() as u16;
        buf[(col, 1)].style()
    }

    #[test]
    fn answered_dims_choices_and_arms_next() {
        let buf = rendered(ReviewState::Answered);
        let text = row_text(&buf);
        assert!(text.contains("[1] Familiar"));
        assert!(style_of(&buf, "[1] Familiar").add_modifier.contains(Modifier::DIM));
        assert!(style_of(&buf, "[n] Next").add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn fresh_dims_only_next() {
        let buf = rendered(ReviewState::Fresh);
        assert!(style_of(&buf, "[n] Next").add_modifier.contains(Modifier::DIM));
        assert!(style_of(&buf, "[b] Previous").add_modifier.contains(Modifier::BOLD));
        assert!(style_of(&buf, "[m] Mastered").add_modifier.contains(Modifier::BOLD));
    }
}
