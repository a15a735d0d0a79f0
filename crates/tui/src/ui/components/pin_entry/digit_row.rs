use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};

use super::controller::{PIN_LENGTH, PinSnapshot};
use crate::ui::theme::Theme;

pub const SLOT_WIDTH: u16 = 5;
pub const SLOT_HEIGHT: u16 = 3;
pub const SLOT_GAP: u16 = 2;
pub const DIGIT_ROW_WIDTH: u16 = SLOT_WIDTH * PIN_LENGTH as u16 + SLOT_GAP * (PIN_LENGTH as u16 - 1);

const MASK_GLYPH: &str = "•";

/// Text shown inside slot `index`.
pub fn slot_text(snapshot: &PinSnapshot, index: usize, mask: bool) -> String {
    match snapshot.slots.get(index).copied().flatten() {
        Some(_) if mask => MASK_GLYPH.to_string(),
        Some(token) => token.to_string(),
        None => String::new(),
    }
}

/// Renders the row of PIN slots from a snapshot. The next slot to fill is
/// drawn with the accent color and a thick border.
pub fn render_digit_row(frame: &mut Frame, area: Rect, theme: &dyn Theme, snapshot: &PinSnapshot, mask: bool) {
    let roles = theme.roles();
    for index in 0..PIN_LENGTH {
        let x = area.x + index as u16 * (SLOT_WIDTH + SLOT_GAP);
        let rect = Rect::new(x, area.y, SLOT_WIDTH, SLOT_HEIGHT).intersection(area);
        if rect.is_empty() {
            continue;
        }

        let is_active = snapshot.active_slot() == Some(index);
        let (border_color, border_type) = if snapshot.success {
            (roles.success, BorderType::Rounded)
        } else if is_active {
            (roles.accent_primary, BorderType::Thick)
        } else {
            (roles.text, BorderType::Rounded)
        };

        let block = Block::bordered()
            .border_type(border_type)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(roles.surface));
        let text = Paragraph::new(slot_text(snapshot, index, mask))
            .centered()
            .style(theme.text_primary_style().add_modifier(Modifier::BOLD))
            .block(block);
        frame.render_widget(text, rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::DraculaTheme;
    use ratatui::{Terminal, backend::TestBackend};

    fn snapshot(tokens: &str) -> PinSnapshot {
        let mut slots = [None; PIN_LENGTH];
        for (index, token) in tokens.chars().enumerate() {
            slots[index] = Some(token);
        }
        PinSnapshot {
            slots,
            cursor: tokens.chars().count(),
            success: false,
        }
    }

    #[test]
    fn slot_text_masks_when_requested() {
        let snapshot = snapshot("12");
        assert_eq!(slot_text(&snapshot, 0, false), "1");
        assert_eq!(slot_text(&snapshot, 1, true), MASK_GLYPH);
        assert_eq!(slot_text(&snapshot, 2, true), "");
        assert_eq!(slot_text(&snapshot, 9, false), "");
    }

    #[test]
    fn active_slot_uses_accent_border() {
        let theme = DraculaTheme::new();
        let snapshot = snapshot("1");
        let mut terminal = Terminal::new(TestBackend::new(DIGIT_ROW_WIDTH, SLOT_HEIGHT)).unwrap();
        terminal
            .draw(|frame| render_digit_row(frame, frame.area(), &theme, &snapshot, false))
            .unwrap();
        let buffer = terminal.backend().buffer();

        // slot 0 holds the digit, slot 1 is active
        assert_eq!(buffer[(SLOT_WIDTH / 2, 1)].symbol(), "1");
        let active_corner = &buffer[(SLOT_WIDTH + SLOT_GAP, 0)];
        assert_eq!(active_corner.fg, theme.roles().accent_primary);
        assert_eq!(buffer[(0, 0)].fg, theme.roles().text);
    }

    #[test]
    fn success_paints_every_slot() {
        let theme = DraculaTheme::new();
        let mut snapshot = snapshot("1234");
        snapshot.success = true;
        let mut terminal = Terminal::new(TestBackend::new(DIGIT_ROW_WIDTH, SLOT_HEIGHT)).unwrap();
        terminal
            .draw(|frame| render_digit_row(frame, frame.area(), &theme, &snapshot, true))
            .unwrap();
        let buffer = terminal.backend().buffer();
        for index in 0..PIN_LENGTH as u16 {
            let x = index * (SLOT_WIDTH + SLOT_GAP);
            assert_eq!(buffer[(x, 0)].fg, theme.roles().success);
            assert_eq!(buffer[(x + SLOT_WIDTH / 2, 1)].symbol(), MASK_GLYPH);
        }
    }
}
