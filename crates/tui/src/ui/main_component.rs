use crossterm::event::{KeyEvent, MouseEvent};
use pinpad_types::{Effect, Modal};
use rat_focus::FocusBuilder;
use ratatui::prelude::*;
use ratatui::widgets::Block;

use super::components::{Component, ConfirmationModal, PinEntryComponent};
use super::utils::centered_fixed;
use crate::app::App;

pub struct ModalLayout(Box<dyn Fn(Rect) -> Rect>);

impl std::fmt::Debug for ModalLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ModalLayout")
    }
}

type ModalView = (Box<dyn Component>, ModalLayout);

/// Root view: the PIN entry screen plus an optional modal overlay.
#[derive(Default, Debug)]
pub struct MainView {
    /// The PIN entry screen
    pub content_view: PinEntryComponent,
    /// Currently open modal component
    pub modal_view: Option<ModalView>,
}

impl MainView {
    /// Update the open modal kind (use None to clear). Focus moves into the
    /// modal while it is open and back to the keypad when it closes.
    pub fn set_open_modal_kind(&mut self, app: &mut App, modal: Option<Modal>) {
        self.modal_view = modal.map(|kind| match kind {
            Modal::PinSetAlert => (
                Box::new(ConfirmationModal::default()) as Box<dyn Component>,
                ModalLayout(Box::new(|rect| centered_fixed(50, 10, rect))),
            ),
        });
        app.open_modal = modal;

        app.focus = FocusBuilder::build_for(app);
        let modal_button = match app.open_modal {
            Some(_) => app.confirmation_modal_state.buttons().first().map(|button| button.focus.clone()),
            None => None,
        };
        match modal_button {
            Some(flag) => app.focus.focus(&flag),
            None => self.restore_focus(app),
        }
    }

    /// Puts focus back on the keypad.
    pub fn restore_focus(&mut self, app: &mut App) {
        app.focus.focus(&app.pin_entry.f_keypad);
    }

    /// Routes key events to the modal when one is open, otherwise to the screen.
    pub fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match self.modal_view.as_mut() {
            Some((modal, _)) => modal.handle_key_events(app, key),
            None => self.content_view.handle_key_events(app, key),
        }
    }

    pub fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        match self.modal_view.as_mut() {
            Some((modal, _)) => modal.handle_mouse_events(app, mouse),
            None => self.content_view.handle_mouse_events(app, mouse),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        self.content_view.render(frame, area, app);

        if let Some((modal, layout)) = self.modal_view.as_mut() {
            let dim = Block::default().style(app.ctx.theme.modal_background_style());
            frame.render_widget(dim, area);
            let modal_area = (layout.0)(area);
            modal.render(frame, modal_area, app);
        }
    }
}
