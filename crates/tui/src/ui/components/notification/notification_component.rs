use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::app::{App, Effect, Msg};
use crate::ui::components::Component;
use crate::ui::theme::theme_helpers::{ButtonRenderOptions, block_with_severity, build_hint_spans, render_button};

const BUTTON_WIDTH: u16 = 12;

/// Blocking modal for the open notification. It receives all input until
/// dismissed.
#[derive(Default, Debug, Clone)]
pub struct NotificationComponent {
    button_area: Rect,
}

impl Component for NotificationComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => app.update(Msg::DismissNotification),
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let MouseEvent { kind, column, row, .. } = mouse;
        if kind == MouseEventKind::Down(MouseButton::Left) && self.button_area.contains(Position::new(column, row)) {
            return app.update(Msg::DismissNotification);
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let Some(notification) = app.notification.as_ref() else {
            return;
        };
        let block = block_with_severity(theme, notification.severity, Some(notification.title.as_str()));
        let inner = block.inner(rect);
        frame.render_widget(&block, rect);

        let [message_rect, _, button_row, ..] = self.get_preferred_layout(app, inner)[..] else {
            return;
        };

        let lines = notification
            .message
            .lines()
            .map(|line| Line::from(Span::styled(line, theme.text_primary_style())))
            .collect::<Vec<Line>>();
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), message_rect);

        let [_, button_rect, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(BUTTON_WIDTH),
            Constraint::Fill(1),
        ])
        .areas(button_row);
        render_button(frame, button_rect, "OK", theme, ButtonRenderOptions::new(true, true, true));
        self.button_area = button_rect;
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        build_hint_spans(&*app.ctx.theme, &[("Enter/Esc", " dismiss")])
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        Layout::vertical([
            Constraint::Min(1),    // Message
            Constraint::Length(1), // Spacer
            Constraint::Length(3), // Button
        ])
        .split(area)
        .to_vec()
    }
}
