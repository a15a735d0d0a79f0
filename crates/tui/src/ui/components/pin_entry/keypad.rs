//! The 4x3 on-screen keypad.
//!
//! Purely presentational: renders the fixed key faces, remembers where it
//! drew them so mouse clicks can be mapped back to keys, and nothing else.

use pinpad_types::KeypadKey;
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::widgets::Borders;

use crate::ui::theme::Theme;
use crate::ui::theme::theme_helpers::{ButtonRenderOptions, ButtonType, render_button};

pub const KEYPAD_COLUMNS: usize = 3;

pub const KEYPAD_ROWS: [[KeypadKey; KEYPAD_COLUMNS]; 4] = [
    [KeypadKey::Digit('1'), KeypadKey::Digit('2'), KeypadKey::Digit('3')],
    [KeypadKey::Digit('4'), KeypadKey::Digit('5'), KeypadKey::Digit('6')],
    [KeypadKey::Digit('7'), KeypadKey::Digit('8'), KeypadKey::Digit('9')],
    [KeypadKey::Digit('.'), KeypadKey::Digit('0'), KeypadKey::Erase],
];

pub const KEY_WIDTH: u16 = 7;
pub const KEY_HEIGHT: u16 = 3;
pub const KEY_GAP: u16 = 2;

/// Total footprint of the keypad.
pub const KEYPAD_WIDTH: u16 = KEY_WIDTH * KEYPAD_COLUMNS as u16 + KEY_GAP * (KEYPAD_COLUMNS as u16 - 1);
pub const KEYPAD_HEIGHT: u16 = KEY_HEIGHT * KEYPAD_ROWS.len() as u16;

/// Row/column of the highlighted key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeypadCursor {
    pub row: usize,
    pub column: usize,
}

impl KeypadCursor {
    pub fn key(&self) -> KeypadKey {
        KEYPAD_ROWS[self.row][self.column]
    }

    /// Position of `key` on the grid.
    pub fn of(key: KeypadKey) -> Option<Self> {
        KEYPAD_ROWS.iter().enumerate().find_map(|(row, keys)| {
            keys.iter()
                .position(|candidate| *candidate == key)
                .map(|column| KeypadCursor { row, column })
        })
    }
}

/// Maps a typed character to the keypad key carrying the same label.
pub fn key_for_char(ch: char) -> Option<KeypadKey> {
    KEYPAD_ROWS.iter().flatten().copied().find(|key| matches!(key, KeypadKey::Digit(label) if *label == ch))
}

/// Computes where each key is drawn inside `area` (keys anchored top-left).
pub fn key_areas(area: Rect) -> Vec<(Rect, KeypadKey)> {
    let mut areas = Vec::with_capacity(KEYPAD_ROWS.len() * KEYPAD_COLUMNS);
    for (row, keys) in KEYPAD_ROWS.iter().enumerate() {
        for (column, key) in keys.iter().enumerate() {
            let x = area.x + column as u16 * (KEY_WIDTH + KEY_GAP);
            let y = area.y + row as u16 * KEY_HEIGHT;
            let rect = Rect::new(x, y, KEY_WIDTH, KEY_HEIGHT).intersection(area);
            areas.push((rect, *key));
        }
    }
    areas
}

#[derive(Debug, Default, Clone)]
pub struct KeypadView {
    key_areas: Vec<(Rect, KeypadKey)>,
}

impl KeypadView {
    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &dyn Theme, highlighted: KeypadCursor, focused: bool) {
        self.key_areas = key_areas(area);
        let highlighted_key = highlighted.key();
        for (rect, key) in &self.key_areas {
            if rect.is_empty() {
                continue;
            }
            let is_highlighted = focused && *key == highlighted_key;
            render_button(
                frame,
                *rect,
                &key.label(),
                theme,
                ButtonRenderOptions::new(true, is_highlighted, is_highlighted, Borders::ALL, ButtonType::Secondary),
            );
        }
    }

    /// Key under the given screen position, based on the last render.
    pub fn hit_test(&self, position: Position) -> Option<KeypadKey> {
        self.key_areas
            .iter()
            .find(|(rect, _)| rect.contains(position))
            .map(|(_, key)| *key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_phone_layout() {
        let labels: Vec<String> = KEYPAD_ROWS.iter().flatten().map(KeypadKey::label).collect();
        assert_eq!(labels, vec!["1", "2", "3", "4", "5", "6", "7", "8", "9", ".", "0", "⌫"]);
    }

    #[test]
    fn typed_characters_map_to_keys() {
        assert_eq!(key_for_char('5'), Some(KeypadKey::Digit('5')));
        assert_eq!(key_for_char('.'), Some(KeypadKey::Digit('.')));
        assert_eq!(key_for_char('a'), None);
    }

    #[test]
    fn cursor_lookup_is_inverse_of_key() {
        for key in KEYPAD_ROWS.iter().flatten() {
            let cursor = KeypadCursor::of(*key).unwrap();
            assert_eq!(cursor.key(), *key);
        }
    }

    #[test]
    fn hit_test_resolves_rendered_keys() {
        let view = KeypadView {
            key_areas: key_areas(Rect::new(10, 5, KEYPAD_WIDTH, KEYPAD_HEIGHT)),
        };
        assert_eq!(view.hit_test(Position::new(10, 5)), Some(KeypadKey::Digit('1')));
        assert_eq!(view.hit_test(Position::new(10 + KEY_WIDTH + KEY_GAP + 1, 6)), Some(KeypadKey::Digit('2')));
        assert_eq!(view.hit_test(Position::new(10 + KEYPAD_WIDTH - 1, 5 + KEYPAD_HEIGHT - 1)), Some(KeypadKey::Erase));
        // gap between columns
        assert_eq!(view.hit_test(Position::new(10 + KEY_WIDTH, 5)), None);
        assert_eq!(view.hit_test(Position::new(0, 0)), None);
    }
}
