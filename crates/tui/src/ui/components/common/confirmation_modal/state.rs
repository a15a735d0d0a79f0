use rat_focus::{FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;

use crate::ui::theme::theme_helpers::ButtonType;

/// A labelled button inside the dialog.
#[derive(Debug, Clone)]
pub struct ModalButton {
    pub label: String,
    pub button_type: ButtonType,
    pub focus: FocusFlag,
}

impl ModalButton {
    pub fn new(label: impl Into<String>, button_type: ButtonType) -> Self {
        Self {
            label: label.into(),
            button_type,
            focus: FocusFlag::default(),
        }
    }
}

#[derive(Default, Clone)]
pub struct ConfirmationModalOpts {
    pub buttons: Vec<ModalButton>,
    pub title: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfirmationModalState {
    title: Option<String>,
    message: Option<String>,
    buttons: Vec<ModalButton>,

    container_focus: FocusFlag,
}

impl ConfirmationModalState {
    pub fn update_opts(&mut self, opts: ConfirmationModalOpts) {
        self.title = opts.title;
        self.message = opts.message;
        self.buttons = opts.buttons;
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn buttons(&self) -> &[ModalButton] {
        &self.buttons
    }

    pub fn is_button_focused(&self, idx: usize) -> bool {
        self.buttons.get(idx).is_some_and(|button| button.focus.get())
    }
}

impl HasFocus for ConfirmationModalState {
    fn build(&self, builder: &mut FocusBuilder) {
        let tag = builder.start(self);
        self.buttons.iter().for_each(|button| {
            builder.leaf_widget(&button.focus);
        });
        builder.end(tag);
    }

    fn focus(&self) -> FocusFlag {
        self.container_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}
