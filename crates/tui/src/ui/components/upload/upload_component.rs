//! Image selection row: the path field, the Generate button (a spinner while
//! uploading) and the Reset button once there is a palette to clear.

use chromapick_engine::Phase;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, Effect, Focus, Msg};
use crate::ui::components::Component;
use crate::ui::theme::Theme;
use crate::ui::theme::theme_helpers::{ButtonRenderOptions, block, build_hint_spans, render_button};

const PLACEHOLDER: &str = "Please upload an image";
const PATH_HINT: &str = "path to a .png or .jpg";
const GENERATE_LABEL: &str = "Generate";
const RESET_LABEL: &str = "Reset";

#[derive(Debug, Default)]
pub struct UploadComponent {
    input_area: Rect,
    generate_area: Rect,
    reset_area: Option<Rect>,
}

impl UploadComponent {
    fn handle_path_keys(app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.code == KeyCode::Enter {
            return app.update(Msg::SelectPath);
        }
        let input = &mut app.path_input;
        match key.code {
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => input.insert_char(c),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.move_home(),
            KeyCode::End => input.move_end(),
            _ => {}
        }
        Vec::new()
    }

    fn render_path_field(&self, frame: &mut Frame, app: &App, theme: &dyn Theme) {
        let focused = app.focus == Focus::PathInput;
        let field = block(theme, Some(" Image "), focused);
        let inner = field.inner(self.input_area);

        let content = if app.path_input.is_empty() && !focused {
            Line::from(Span::styled(PATH_HINT, theme.text_muted_style()))
        } else {
            Line::from(Span::styled(app.path_input.input(), theme.text_primary_style()))
        };
        frame.render_widget(Paragraph::new(content).block(field), self.input_area);

        if focused && app.notification.is_none() {
            let x = inner.x.saturating_add(app.path_input.cursor_columns()).min(inner.right().saturating_sub(1));
            frame.set_cursor_position(Position::new(x, inner.y));
        }
    }
}

impl Component for UploadComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match app.focus {
            Focus::PathInput => Self::handle_path_keys(app, key),
            Focus::Generate if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) => app.update(Msg::Generate),
            Focus::Reset if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) => app.update(Msg::Reset),
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let MouseEvent { kind, column, row, .. } = mouse;
        if kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let position = Position::new(column, row);
        if self.input_area.contains(position) {
            app.focus = Focus::PathInput;
            let text_start = self.input_area.x.saturating_add(1);
            app.path_input.set_cursor_column(column.saturating_sub(text_start));
            Vec::new()
        } else if self.generate_area.contains(position) {
            app.focus = Focus::Generate;
            app.update(Msg::Generate)
        } else if self.reset_area.is_some_and(|area| area.contains(position)) {
            app.update(Msg::Reset)
        } else {
            Vec::new()
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let [controls, status] = Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(rect);

        let show_reset = app.generator.can_reset();
        let reset_width = if show_reset { RESET_LABEL.len() as u16 + 6 } else { 0 };
        let [input_area, generate_area, reset_area] = Layout::horizontal([
            Constraint::Min(20),
            Constraint::Length(GENERATE_LABEL.len() as u16 + 6),
            Constraint::Length(reset_width),
        ])
        .spacing(1)
        .areas(controls);
        self.input_area = input_area;
        self.generate_area = generate_area;
        self.reset_area = show_reset.then_some(reset_area);

        self.render_path_field(frame, app, theme);

        let uploading = app.generator.is_uploading();
        let generate_label = if uploading { app.spinner_frame() } else { GENERATE_LABEL };
        render_button(
            frame,
            generate_area,
            generate_label,
            theme,
            ButtonRenderOptions::new(!uploading, app.focus == Focus::Generate, true),
        );
        if show_reset {
            render_button(
                frame,
                reset_area,
                RESET_LABEL,
                theme,
                ButtonRenderOptions::new(true, app.focus == Focus::Reset, false),
            );
        }

        let mut status_spans = match app.generator.selection() {
            Some(file) => vec![
                Span::styled("Selected: ", theme.text_secondary_style()),
                Span::styled(file.name(), theme.text_primary_style()),
            ],
            None => vec![Span::styled(PLACEHOLDER, theme.text_muted_style())],
        };
        match app.generator.phase() {
            Phase::Uploading => status_spans.push(Span::styled("  extracting colors…", theme.text_muted_style())),
            Phase::Ready => {
                let count = app.generator.palette().len();
                let noun = if count == 1 { "color" } else { "colors" };
                status_spans.push(Span::styled(format!("  {count} {noun}"), theme.text_muted_style()));
            }
            Phase::Idle | Phase::Selected => {}
        }
        let status_line = Line::from(status_spans);
        frame.render_widget(Paragraph::new(status_line), status);
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        let hints: &[(&str, &str)] = match app.focus {
            Focus::PathInput => &[("Enter", " select  ")],
            Focus::Generate => &[("Enter", " generate  ")],
            Focus::Reset => &[("Enter", " reset  ")],
            Focus::Swatches => &[],
        };
        build_hint_spans(&*app.ctx.theme, hints)
    }
}
