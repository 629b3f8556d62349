//! Single-line strip of key hints for whatever currently has input.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::ui::theme::theme_helpers::build_hint_spans;

#[derive(Debug, Default)]
pub struct HintBarComponent;

impl HintBarComponent {
    /// Render `contextual` hints followed by the global shortcuts.
    pub fn render(&self, frame: &mut Frame, rect: Rect, app: &App, contextual: Vec<Span<'_>>) {
        let theme = &*app.ctx.theme;
        let mut spans = contextual;
        if app.notification.is_none() {
            let mut global = vec![("Tab", " focus  "), ("Ctrl+G", " generate  ")];
            if app.generator.can_reset() {
                global.push(("Ctrl+R", " reset  "));
            }
            global.push(("Ctrl+Q", " quit"));
            spans.extend(build_hint_spans(theme, &global));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)).style(theme.text_muted_style()), rect);
    }
}
