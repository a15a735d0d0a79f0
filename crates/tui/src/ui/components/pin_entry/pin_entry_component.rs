use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use pinpad_types::{Effect, KeypadKey, Msg};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use super::digit_row::{DIGIT_ROW_WIDTH, SLOT_HEIGHT, render_digit_row};
use super::keypad::{KEYPAD_HEIGHT, KEYPAD_WIDTH, KeypadCursor, KeypadView, key_for_char};
use crate::app::App;
use crate::ui::components::Component;
use crate::ui::theme::theme_helpers::{ButtonRenderOptions, ButtonType, build_hint_spans, render_button};

pub const TITLE: &str = "Set PIN";
pub const SUBTITLE: &str = "Please make up a PIN to protect the chat";
pub const SUBMIT_LABEL: &str = "Add PIN";

const LOCK_GLYPH: &str = "🔒";
/// Frames of the success pulse around the lock glyph.
pub const PULSE_FRAMES: [&str; 4] = ["·", "•", "●", "•"];

const SUBMIT_HEIGHT: u16 = 3;

/// The PIN entry screen: header, digit row, keypad and the "Add PIN" button.
#[derive(Debug, Default)]
pub struct PinEntryComponent {
    keypad: KeypadView,
    submit_area: Rect,
}

impl PinEntryComponent {
    fn press(&self, app: &mut App, key: KeypadKey) -> Vec<Effect> {
        if let Some(cursor) = KeypadCursor::of(key) {
            app.pin_entry.set_highlighted(cursor);
        }
        app.update(&Msg::KeypadPressed(key))
    }

    fn lock_line(app: &App) -> Line<'static> {
        let theme = &*app.ctx.theme;
        if !app.pin_entry.snapshot().success {
            return Line::from(Span::styled(LOCK_GLYPH, theme.roles().accent_secondary)).centered();
        }
        let pulse = PULSE_FRAMES[app.pulse_idx % PULSE_FRAMES.len()];
        let style = theme.status_success().add_modifier(Modifier::BOLD);
        Line::from(vec![
            Span::styled(format!("{pulse} "), style),
            Span::styled(LOCK_GLYPH, style),
            Span::styled(format!(" {pulse}"), style),
        ])
        .centered()
    }
}

impl Component for PinEntryComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return Vec::new();
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => vec![Effect::Exit],
            KeyCode::Char(ch) if ch != ' ' => match key_for_char(ch) {
                Some(keypad_key) => self.press(app, keypad_key),
                None => Vec::new(),
            },
            KeyCode::Backspace | KeyCode::Delete => self.press(app, KeypadKey::Erase),
            KeyCode::Enter => {
                if app.pin_entry.controller().is_complete() {
                    app.update(&Msg::SubmitRequested)
                } else {
                    let highlighted = app.pin_entry.highlighted_key();
                    self.press(app, highlighted)
                }
            }
            KeyCode::Char(' ') => {
                if app.pin_entry.is_submit_focused() {
                    app.update(&Msg::SubmitRequested)
                } else {
                    let highlighted = app.pin_entry.highlighted_key();
                    self.press(app, highlighted)
                }
            }
            KeyCode::Tab => {
                app.focus.next();
                Vec::new()
            }
            KeyCode::BackTab => {
                app.focus.prev();
                Vec::new()
            }
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                let (row_delta, column_delta) = match key.code {
                    KeyCode::Up => (-1, 0),
                    KeyCode::Down => (1, 0),
                    KeyCode::Left => (0, -1),
                    _ => (0, 1),
                };
                if !app.pin_entry.is_keypad_focused() {
                    app.focus.focus(&app.pin_entry.f_keypad);
                }
                app.pin_entry.move_highlight(row_delta, column_delta);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let MouseEvent { kind, column, row, .. } = mouse;
        if kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let position = Position::new(column, row);
        if let Some(key) = self.keypad.hit_test(position) {
            app.focus.focus(&app.pin_entry.f_keypad);
            return self.press(app, key);
        }
        if self.submit_area.contains(position) {
            return app.update(&Msg::SubmitRequested);
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        frame.render_widget(Block::default().style(Style::default().bg(theme.roles().background)), rect);

        let [body, hints] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(rect);
        let layout = self.get_preferred_layout(app, body);
        let [lock, title, subtitle, digits, keypad, submit] = layout[..] else {
            return;
        };

        frame.render_widget(Paragraph::new(Self::lock_line(app)), lock);
        frame.render_widget(
            Paragraph::new(TITLE).centered().style(theme.text_primary_style().add_modifier(Modifier::BOLD)),
            title,
        );
        frame.render_widget(
            Paragraph::new(SUBTITLE)
                .centered()
                .wrap(Wrap { trim: true })
                .style(theme.text_muted_style()),
            subtitle,
        );

        let snapshot = app.pin_entry.snapshot();
        render_digit_row(frame, digits, theme, &snapshot, app.pin_entry.mask_digits());

        self.keypad.render(
            frame,
            keypad,
            theme,
            app.pin_entry.highlighted(),
            app.pin_entry.is_keypad_focused(),
        );

        let enabled = snapshot.is_complete();
        render_button(
            frame,
            submit,
            SUBMIT_LABEL,
            theme,
            ButtonRenderOptions::new(enabled, app.pin_entry.is_submit_focused(), false, Borders::ALL, ButtonType::Primary),
        );
        self.submit_area = submit;

        frame.render_widget(Paragraph::new(Line::from(self.get_hint_spans(app))).centered(), hints);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let theme = &*app.ctx.theme;
        if app.pin_entry.controller().is_complete() {
            build_hint_spans(theme, &[("Enter", " Add PIN  "), ("⌫", " Erase  "), ("q", " Quit")])
        } else {
            build_hint_spans(
                theme,
                &[("0-9 .", " Enter  "), ("⌫", " Erase  "), ("←↑↓→ Space", " Keypad  "), ("q", " Quit")],
            )
        }
    }

    /// Returns `[lock, title, subtitle, digits, keypad, submit]`, each centered
    /// horizontally in a column wide enough for the widest element.
    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        let subtitle_width = SUBTITLE.width() as u16;
        let column_width = KEYPAD_WIDTH.max(DIGIT_ROW_WIDTH).max(subtitle_width).min(area.width);
        let subtitle_height = if column_width >= subtitle_width { 1 } else { 2 };

        let rows = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1), // lock
            Constraint::Length(1),
            Constraint::Length(1), // title
            Constraint::Length(subtitle_height),
            Constraint::Length(1),
            Constraint::Length(SLOT_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(KEYPAD_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(SUBMIT_HEIGHT),
            Constraint::Fill(1),
        ])
        .split(area);

        let center = |row: Rect, width: u16| -> Rect {
            let width = width.min(row.width);
            Rect::new(row.x + (row.width - width) / 2, row.y, width, row.height)
        };

        vec![
            center(rows[1], column_width),
            center(rows[3], column_width),
            center(rows[4], column_width),
            center(rows[6], DIGIT_ROW_WIDTH),
            center(rows[8], KEYPAD_WIDTH),
            center(rows[10], KEYPAD_WIDTH),
        ]
    }
}
