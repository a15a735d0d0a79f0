use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::roles::{Theme, ThemeRoles};

/// Dialog frame whose border and title take the `accent` color.
pub fn dialog_block<'a, T: Theme + ?Sized>(theme: &'a T, title: Option<&'a str>, accent: Style, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(if focused { BorderType::Thick } else { BorderType::Rounded })
        .border_style(accent)
        .style(Style::default().bg(theme.roles().modal_bg).fg(theme.roles().text));
    if let Some(t) = title {
        block = block.title(Span::styled(t, accent.add_modifier(Modifier::BOLD)));
    }
    block
}

/// Primary button style (filled accent background).
pub fn button_primary_style<T: Theme + ?Sized>(theme: &T, enabled: bool) -> Style {
    if enabled {
        let ThemeRoles {
            accent_primary, background, ..
        } = *theme.roles();
        Style::default().bg(accent_primary).fg(background).add_modifier(Modifier::BOLD)
    } else {
        let ThemeRoles {
            surface_muted, text_muted, ..
        } = *theme.roles();
        Style::default().bg(surface_muted).fg(text_muted)
    }
}

/// Secondary button style (outline-like, rely on border color in Block).
pub fn button_secondary_style<T: Theme + ?Sized>(theme: &T, enabled: bool, selected: bool) -> Style {
    if !enabled {
        return theme.text_muted_style();
    }
    let style = Style::default().fg(theme.roles().text);
    if selected { style.patch(theme.selection_style()).add_modifier(Modifier::BOLD) } else { style }
}

/// Which visual treatment a button receives.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ButtonType {
    Primary,
    #[default]
    Secondary,
}

/// Rendering flags for [`render_button`].
#[derive(Debug, Clone, Copy)]
pub struct ButtonRenderOptions {
    pub enabled: bool,
    pub focused: bool,
    pub selected: bool,
    pub borders: Borders,
    pub button_type: ButtonType,
}

impl ButtonRenderOptions {
    pub fn new(enabled: bool, focused: bool, selected: bool, borders: Borders, button_type: ButtonType) -> Self {
        Self {
            enabled,
            focused,
            selected,
            borders,
            button_type,
        }
    }
}

/// Renders a standard button
pub fn render_button<T: Theme + ?Sized>(frame: &mut Frame, area: Rect, label: &str, theme: &T, options: ButtonRenderOptions) {
    let border_style = if options.enabled {
        theme.border_style(options.focused)
    } else {
        theme.text_muted_style()
    };

    let button_style = match options.button_type {
        ButtonType::Primary => button_primary_style(theme, options.enabled),
        ButtonType::Secondary => button_secondary_style(theme, options.enabled, options.selected),
    };

    let border_type = if options.focused { BorderType::Thick } else { BorderType::Rounded };

    frame.render_widget(
        Paragraph::new(label).centered().block(
            Block::bordered()
                .borders(options.borders)
                .border_type(border_type)
                .border_style(border_style),
        )
        .style(button_style),
        area,
    );
}

/// Builds `key description` pairs for a hint bar.
pub fn build_hint_spans<'a, T: Theme + ?Sized>(theme: &T, hints: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, description) in hints {
        spans.push(Span::styled(*key, theme.accent_emphasis_style()));
        spans.push(Span::styled(*description, theme.text_muted_style()));
    }
    spans
}
