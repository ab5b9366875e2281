use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct ReviewLayout {
    pub header: Rect,
    pub card: Rect,
    pub params: Rect,
    pub controls: Rect,
    pub footer: Rect,
}

impl ReviewLayout {
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(8),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(2),
            ])
            .split(area);

        Self {
            header: vertical[0],
            card: vertical[1],
            controls: vertical[2],
            params: vertical[3],
            footer: vertical[4],
        }
    }
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = "  ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

/// Popup rectangle centred in `area`, sized as a percentage of it.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 48;
    const MIN_POPUP_HEIGHT: u16 = 7;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_wrap_at_width() {
        let lines = pack_hint_lines(&["[n] Next", "[b] Back", "[m] Mastered"], 20);
        assert_eq!(lines, vec!["  [n] Next  [b] Back", "  [m] Mastered"]);
    }

    #[test]
    fn hints_empty_on_zero_width() {
        assert!(pack_hint_lines(&["[q] Quit"], 0).is_empty());
    }

    #[test]
    fn popup_is_clamped_to_area() {
        let area = Rect::new(0, 0, 30, 5);
        let popup = centered_rect(50, 50, area);
        assert_eq!(popup, Rect::new(0, 0, 30, 5));

        let wide = Rect::new(0, 0, 200, 50);
        let popup = centered_rect(50, 20, wide);
        assert_eq!(popup, Rect::new(50, 20, 100, 10));
    }

    #[test]
    fn review_layout_stacks_sections() {
        let layout = ReviewLayout::new(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.footer.y + layout.footer.height, 24);
        assert!(layout.card.height >= 8);
        assert!(layout.controls.y < layout.params.y);
    }
}
