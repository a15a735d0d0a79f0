use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use pinpad_types::{Effect, Msg};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Borders, Clear, Paragraph, Wrap};

use crate::app::App;
use crate::ui::components::Component;
use crate::ui::theme::theme_helpers::{ButtonRenderOptions, build_hint_spans, dialog_block, render_button};

const BUTTON_WIDTH: u16 = 12;
const BUTTON_SPACER: u16 = 2;

/// Acknowledgment dialog. Any button, Enter, Space or Esc dismisses it.
#[derive(Default, Debug, Clone)]
pub struct ConfirmationModal {
    button_areas: Vec<Rect>,
}

impl Component for ConfirmationModal {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Tab => {
                app.focus.next();
                Vec::new()
            }
            KeyCode::BackTab => {
                app.focus.prev();
                Vec::new()
            }
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Esc => app.update(&Msg::AlertDismissed),
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let MouseEvent { kind, column, row, .. } = mouse;
        if kind == MouseEventKind::Down(MouseButton::Left) {
            let position = Position::new(column, row);
            if self.button_areas.iter().any(|area| area.contains(position)) {
                return app.update(&Msg::AlertDismissed);
            }
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let state = &app.confirmation_modal_state;
        let block = dialog_block(theme, state.title(), theme.status_success(), true);
        let inner = block.inner(rect);

        frame.render_widget(Clear, rect);
        frame.render_widget(&block, rect);

        let [message_rect, _, button_rect, hint_rect] = self.get_preferred_layout(app, inner)[..] else {
            return;
        };

        if let Some(message) = state.message() {
            let lines = message.lines().map(|line| Line::from(line.to_string())).collect::<Vec<Line>>();
            let paragraph = Paragraph::new(lines).centered().wrap(Wrap { trim: false });
            frame.render_widget(paragraph, message_rect);
        }

        let buttons = state.buttons();
        let count = buttons.len() as u16;
        let total_width = count * BUTTON_WIDTH + count.saturating_sub(1) * BUTTON_SPACER;
        let start_x = button_rect.x + button_rect.width.saturating_sub(total_width) / 2;
        let mut button_areas = Vec::with_capacity(buttons.len());
        for (i, button) in buttons.iter().enumerate() {
            let offset = i as u16 * (BUTTON_WIDTH + BUTTON_SPACER);
            let area = Rect::new(start_x + offset, button_rect.y, BUTTON_WIDTH, button_rect.height).intersection(button_rect);
            render_button(
                frame,
                area,
                button.label.as_str(),
                theme,
                ButtonRenderOptions::new(true, state.is_button_focused(i), false, Borders::ALL, button.button_type),
            );
            button_areas.push(area);
        }
        self.button_areas = button_areas;

        frame.render_widget(Paragraph::new(Line::from(self.get_hint_spans(app))).centered(), hint_rect);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        build_hint_spans(&*app.ctx.theme, &[("Enter", " OK  "), ("Esc", " Close")])
    }

    fn get_preferred_layout(&self, app: &App, area: Rect) -> Vec<Rect> {
        let has_message = app.confirmation_modal_state.message().is_some();
        Layout::vertical([
            Constraint::Min(if has_message { 1 } else { 0 }), // Message
            Constraint::Length(1),                            // Spacer
            Constraint::Length(3),                            // Buttons
            Constraint::Length(1),                            // Hints
        ])
        .split(area)
        .to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use crossterm::event::KeyModifiers;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn keys_dismiss_the_dialog() {
        let mut app = test_app();
        let mut modal = ConfirmationModal::default();
        for code in [KeyCode::Enter, KeyCode::Esc, KeyCode::Char(' ')] {
            let effects = modal.handle_key_events(&mut app, KeyEvent::new(code, KeyModifiers::NONE));
            assert_eq!(effects, vec![Effect::CloseModal]);
        }
        let ignored = modal.handle_key_events(&mut app, KeyEvent::new(KeyCode::Char('5'), KeyModifiers::NONE));
        assert!(ignored.is_empty());
    }

    #[test]
    fn renders_message_and_ok_button() {
        let mut app = test_app();
        app.show_pin_set_alert();
        let mut modal = ConfirmationModal::default();
        let mut terminal = Terminal::new(TestBackend::new(50, 10)).unwrap();
        terminal.draw(|frame| modal.render(frame, frame.area(), &mut app)).unwrap();
        let text: String = terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("PIN Set Successfully"));
        assert!(text.contains("Your PIN has been set successfully."));
        assert!(text.contains("OK"));

        let ok = modal.button_areas[0];
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: ok.x + 1,
            row: ok.y + 1,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(modal.handle_mouse_events(&mut app, click), vec![Effect::CloseModal]);
    }
}
