//! The palette grid.
//!
//! One swatch per color in server order, each painted with its own color and
//! labelled with the raw string. Clicking a swatch (or pressing Enter on the
//! keyboard cursor) copies it; the copied swatch carries a "Copied!" overlay
//! until the marker expires.
//!
//! When the palette has more rows than fit, the grid scrolls so the keyboard
//! cursor stays visible and a footer counts the swatches out of view.

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph};

use super::color::{parse_swatch_color, readable_foreground};
use crate::app::{App, Effect, Focus, Msg};
use crate::ui::components::Component;
use crate::ui::theme::theme_helpers::{block, build_hint_spans};
use crate::ui::utils::centered_fixed;

const SWATCH_WIDTH: u16 = 18;
const SWATCH_HEIGHT: u16 = 5;
const SWATCH_GAP: u16 = 1;
const COPY_ICON: &str = "⧉ copy";
const COPIED_LABEL: &str = " Copied! ";

#[derive(Debug, Default)]
pub struct SwatchesComponent {
    /// Hit areas from the last render as `(palette index, area)`.
    swatch_areas: Vec<(usize, Rect)>,
    columns: usize,
    /// First grid row drawn.
    scroll_row: usize,
}

impl SwatchesComponent {
    fn swatch_at(&self, position: Position) -> Option<usize> {
        self.swatch_areas
            .iter()
            .find(|(_, area)| area.contains(position))
            .map(|(index, _)| *index)
    }

    /// Clamp the scroll position so `cursor_row` is inside the window of
    /// `visible_rows` and no empty rows trail the last swatch.
    fn scroll_to(&mut self, cursor_row: usize, visible_rows: usize, total_rows: usize) {
        if cursor_row < self.scroll_row {
            self.scroll_row = cursor_row;
        } else if cursor_row >= self.scroll_row + visible_rows {
            self.scroll_row = cursor_row + 1 - visible_rows;
        }
        self.scroll_row = self.scroll_row.min(total_rows.saturating_sub(visible_rows));
    }
}

impl Component for SwatchesComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let row = isize::try_from(self.columns.max(1)).unwrap_or(1);
        match key.code {
            KeyCode::Left => app.update(Msg::MoveSwatch(-1)),
            KeyCode::Right => app.update(Msg::MoveSwatch(1)),
            KeyCode::Up => app.update(Msg::MoveSwatch(-row)),
            KeyCode::Down => app.update(Msg::MoveSwatch(row)),
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('c') => {
                let index = app.selected_swatch;
                app.update(Msg::CopySwatch(index))
            }
            _ => Vec::new(),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let MouseEvent { kind, column, row, .. } = mouse;
        let step = isize::try_from(self.columns.max(1)).unwrap_or(1);
        match kind {
            MouseEventKind::ScrollDown if !self.swatch_areas.is_empty() => return app.update(Msg::MoveSwatch(step)),
            MouseEventKind::ScrollUp if !self.swatch_areas.is_empty() => return app.update(Msg::MoveSwatch(-step)),
            MouseEventKind::Down(MouseButton::Left) => {}
            _ => return Vec::new(),
        }
        let Some(index) = self.swatch_at(Position::new(column, row)) else {
            return Vec::new();
        };
        app.focus = Focus::Swatches;
        app.update(Msg::CopySwatch(index))
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.ctx.theme;
        let outer = block(theme, Some(" Palette "), app.focus == Focus::Swatches);
        let inner = outer.inner(rect);
        frame.render_widget(outer, rect);

        let palette = app.generator.palette();
        let copied = app.generator.copied_color();
        let columns = usize::from(((inner.width + SWATCH_GAP) / (SWATCH_WIDTH + SWATCH_GAP)).max(1));
        self.columns = columns;
        self.swatch_areas.clear();

        let total_rows = palette.len().div_ceil(columns);
        let mut visible_rows = usize::from(inner.height / SWATCH_HEIGHT).max(1);
        if total_rows > visible_rows {
            // Leave the bottom line for the overflow footer.
            visible_rows = usize::from(inner.height.saturating_sub(1) / SWATCH_HEIGHT).max(1);
        }
        self.scroll_to(app.selected_swatch / columns, visible_rows, total_rows);

        let first = self.scroll_row * columns;
        let last = (first + visible_rows * columns).min(palette.len());
        for (index, color) in palette.iter().enumerate().take(last).skip(first) {
            let col = u16::try_from(index % columns).unwrap_or(u16::MAX);
            let row = u16::try_from(index / columns - self.scroll_row).unwrap_or(u16::MAX);
            let x = inner.x.saturating_add(col.saturating_mul(SWATCH_WIDTH + SWATCH_GAP));
            let y = inner.y.saturating_add(row.saturating_mul(SWATCH_HEIGHT));
            let area = Rect::new(x, y, SWATCH_WIDTH, SWATCH_HEIGHT).intersection(inner);
            if area.is_empty() {
                break;
            }

            let (background, foreground) = match parse_swatch_color(color) {
                Some(parsed) => (parsed, readable_foreground(parsed)),
                None => (theme.roles().surface, theme.roles().text),
            };
            let is_cursor = app.focus == Focus::Swatches && app.selected_swatch == index;
            let border_color = if is_cursor { foreground } else { background };
            let swatch = Block::bordered()
                .border_type(if is_cursor { BorderType::Thick } else { BorderType::Plain })
                .border_style(Style::default().fg(border_color).bg(background))
                .style(Style::default().bg(background).fg(foreground));

            let label = Paragraph::new(vec![
                Line::from(Span::styled(color.as_str(), Style::default().add_modifier(Modifier::BOLD))),
                Line::default(),
                Line::from(COPY_ICON),
            ])
            .centered()
            .block(swatch);
            frame.render_widget(label, area);

            if copied == Some(color.as_str()) {
                let overlay = centered_fixed(COPIED_LABEL.chars().count() as u16, 1, area);
                frame.render_widget(Clear, overlay);
                let overlay_style = Style::default().bg(Color::Black).fg(Color::White).add_modifier(Modifier::BOLD);
                frame.render_widget(Paragraph::new(COPIED_LABEL).style(overlay_style), overlay);
            }

            self.swatch_areas.push((index, area));
        }

        let above = first;
        let below = palette.len() - last;
        if above > 0 || below > 0 {
            let mut footer = Vec::new();
            if above > 0 {
                footer.push(format!("▲ {above} above"));
            }
            if below > 0 {
                footer.push(format!("▼ {below} more"));
            }
            let footer_area = Rect::new(inner.x, inner.bottom().saturating_sub(1), inner.width, 1);
            frame.render_widget(
                Paragraph::new(footer.join("  ")).style(theme.text_muted_style()).right_aligned(),
                footer_area,
            );
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'_>> {
        build_hint_spans(&*app.ctx.theme, &[("←/→/↑/↓", " move  "), ("Enter", " copy  ")])
    }
}
