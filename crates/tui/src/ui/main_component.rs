use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Margin, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};

use super::components::{Component, HintBarComponent, NotificationComponent, SwatchesComponent, UploadComponent};
use super::theme::theme_helpers as th;
use super::utils::centered_fixed;
use crate::app::{App, Effect, Focus, Msg};

pub const TITLE: &str = "Smart Color Palette Generator";

const MODAL_WIDTH: u16 = 60;
const MODAL_HEIGHT: u16 = 9;

/// Root view: lays out the screen and routes input.
///
/// The notification modal, when open, takes every key and mouse event.
/// Otherwise global shortcuts are checked first and the rest goes to the
/// component that owns the focused control.
#[derive(Default, Debug)]
pub struct MainView {
    upload: UploadComponent,
    swatches: SwatchesComponent,
    notification: NotificationComponent,
    hint_bar: HintBarComponent,
}

impl MainView {
    pub fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        app.update(msg)
    }
}

impl Component for MainView {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if app.notification.is_some() {
            return self.notification.handle_key_events(app, key);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Tab => return app.update(Msg::FocusNext),
            KeyCode::BackTab => return app.update(Msg::FocusPrevious),
            KeyCode::Char('g') if ctrl => return app.update(Msg::Generate),
            KeyCode::Char('r') if ctrl => return app.update(Msg::Reset),
            _ => {}
        }

        match app.focus {
            Focus::Swatches => self.swatches.handle_key_events(app, key),
            Focus::PathInput | Focus::Generate | Focus::Reset => self.upload.handle_key_events(app, key),
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if app.notification.is_some() {
            return self.notification.handle_mouse_events(app, mouse);
        }
        let mut effects = self.upload.handle_mouse_events(app, mouse);
        effects.extend(self.swatches.handle_mouse_events(app, mouse));
        effects
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        {
            let theme = &*app.ctx.theme;
            frame.render_widget(Block::default().style(th::panel_style(theme)), rect);
        }

        let [title, _, upload, _, swatches, hints] = self.get_preferred_layout(app, rect)[..] else {
            return;
        };

        let title_line = Line::from(Span::styled(TITLE, app.ctx.theme.accent_emphasis_style()));
        frame.render_widget(Paragraph::new(title_line).centered(), title);

        self.upload.render(frame, upload, app);
        self.swatches.render(frame, swatches, app);

        if app.notification.is_some() {
            let modal = centered_fixed(MODAL_WIDTH, MODAL_HEIGHT, rect);
            frame.render_widget(Clear, modal);
            self.notification.render(frame, modal, app);
        }

        let contextual = if app.notification.is_some() {
            self.notification.get_hint_spans(app)
        } else if app.focus == Focus::Swatches {
            self.swatches.get_hint_spans(app)
        } else {
            self.upload.get_hint_spans(app)
        };
        self.hint_bar.render(frame, hints, app, contextual);
    }

    fn get_preferred_layout(&self, _app: &App, area: Rect) -> Vec<Rect> {
        let body = area.inner(Margin::new(1, 0));
        Layout::vertical([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Spacer
            Constraint::Length(4), // Upload row + status
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Swatches
            Constraint::Length(1), // Hints
        ])
        .split(body)
        .to_vec()
    }
}
