use chromapick_types::Severity;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use super::roles::{Theme, ThemeRoles};

/// Build a standard Block with theme surfaces and borders.
pub fn block<'a, T: Theme + ?Sized>(theme: &'a T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    if let Some(t) = title {
        block = block.title(Span::styled(t, theme.text_secondary_style().add_modifier(Modifier::BOLD)));
    }
    block
}

/// Style for panel-like containers (set background on widget using `.style`).
pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { surface, text, .. } = *theme.roles();
    Style::default().bg(surface).fg(text)
}

/// Primary button style (filled accent background).
pub fn button_primary_style<T: Theme + ?Sized>(theme: &T, enabled: bool) -> Style {
    let ThemeRoles {
        accent_primary,
        background,
        surface_muted,
        text_muted,
        ..
    } = *theme.roles();
    if enabled {
        Style::default().bg(accent_primary).fg(background).add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(surface_muted).fg(text_muted)
    }
}

/// Secondary button style (outline-like, rely on border color in Block).
pub fn button_secondary_style<T: Theme + ?Sized>(theme: &T, enabled: bool, selected: bool) -> Style {
    if !enabled {
        return theme.text_muted_style();
    }
    let ThemeRoles {
        accent_secondary,
        selection_bg,
        ..
    } = *theme.roles();
    let style = Style::default().fg(accent_secondary);
    if selected { style.bg(selection_bg) } else { style }
}

/// Text style matching a notification's severity.
pub fn severity_style<T: Theme + ?Sized>(theme: &T, severity: Severity) -> Style {
    match severity {
        Severity::Info => theme.status_info(),
        Severity::Warning => theme.status_warning(),
        Severity::Error => theme.status_error(),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ButtonRenderOptions {
    pub enabled: bool,
    pub focused: bool,
    pub primary: bool,
}

impl ButtonRenderOptions {
    pub const fn new(enabled: bool, focused: bool, primary: bool) -> Self {
        Self {
            enabled,
            focused,
            primary,
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

    let button_style = if options.primary {
        button_primary_style(theme, options.enabled)
    } else {
        button_secondary_style(theme, options.enabled, options.focused)
    };

    frame.render_widget(
        Paragraph::new(label)
            .centered()
            .block(Block::bordered().border_style(border_style))
            .style(button_style),
        area,
    );
}

/// Turn `(key, description)` pairs into styled hint spans.
pub fn build_hint_spans<T: Theme + ?Sized>(theme: &T, hints: &[(&str, &str)]) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, description) in hints {
        spans.push(Span::styled(key.to_string(), theme.accent_emphasis_style()));
        spans.push(Span::styled(description.to_string(), theme.text_muted_style()));
    }
    spans
}

/// A focused block whose border and title carry the severity color.
pub fn block_with_severity<'a, T: Theme + ?Sized>(theme: &'a T, severity: Severity, title: Option<&'a str>) -> Block<'a> {
    let accent = severity_style(theme, severity);
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(accent)
        .style(theme.modal_background_style().fg(theme.roles().text));
    if let Some(t) = title {
        block = block.title(Span::styled(t, accent.add_modifier(Modifier::BOLD)));
    }
    block
}
