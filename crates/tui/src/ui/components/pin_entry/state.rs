use pinpad_types::KeypadKey;
use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;

use super::controller::{PinEntryController, PinSnapshot, ResetSettings};
use super::keypad::{KEYPAD_COLUMNS, KEYPAD_ROWS, KeypadCursor};

/// Screen-level state for PIN entry: the controller plus the focus ring and
/// keypad highlight used for keyboard navigation.
#[derive(Debug, Clone)]
pub struct PinEntryState {
    controller: PinEntryController,
    mask_digits: bool,
    highlighted: KeypadCursor,

    container_focus: FocusFlag,
    pub f_keypad: FocusFlag,
    pub f_submit: FocusFlag,
}

impl Default for PinEntryState {
    fn default() -> Self {
        Self::new(ResetSettings::default(), false)
    }
}

impl PinEntryState {
    pub fn new(settings: ResetSettings, mask_digits: bool) -> Self {
        Self {
            controller: PinEntryController::new(settings),
            mask_digits,
            highlighted: KeypadCursor::default(),
            container_focus: FocusFlag::named("pin_entry"),
            f_keypad: FocusFlag::named("pin_entry.keypad"),
            f_submit: FocusFlag::named("pin_entry.submit"),
        }
    }

    pub fn controller(&self) -> &PinEntryController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PinEntryController {
        &mut self.controller
    }

    pub fn snapshot(&self) -> PinSnapshot {
        self.controller.snapshot()
    }

    pub fn mask_digits(&self) -> bool {
        self.mask_digits
    }

    // ========================
    // Keypad highlight
    // ========================
    pub fn highlighted(&self) -> KeypadCursor {
        self.highlighted
    }

    pub fn highlighted_key(&self) -> KeypadKey {
        self.highlighted.key()
    }

    pub fn set_highlighted(&mut self, cursor: KeypadCursor) {
        self.highlighted = cursor;
    }

    pub fn move_highlight(&mut self, row_delta: isize, column_delta: isize) {
        let row = self.highlighted.row.saturating_add_signed(row_delta).min(KEYPAD_ROWS.len() - 1);
        let column = self.highlighted.column.saturating_add_signed(column_delta).min(KEYPAD_COLUMNS - 1);
        self.highlighted = KeypadCursor { row, column };
    }

    // ========================
    // Focus
    // ========================
    pub fn is_keypad_focused(&self) -> bool {
        self.f_keypad.get()
    }

    pub fn is_submit_focused(&self) -> bool {
        self.f_submit.get()
    }
}

impl HasFocus for PinEntryState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        builder.leaf_widget(&self.f_keypad);
        // The submit button only joins the focus ring once it is enabled.
        if self.controller.is_complete() {
            builder.leaf_widget(&self.f_submit);
        }
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}
