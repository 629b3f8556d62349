//! Application state and update logic for the Chromapick TUI.
//!
//! [`App`] owns the palette generator and the UI-only state around it (focus,
//! the path field, the open notification). Input handlers and background
//! tasks turn into [`Msg`]s; [`App::update`] applies them and returns the
//! [`Effect`]s the runtime must perform.

use std::sync::Arc;

use chromapick_api::PaletteService;
use chromapick_engine::{Clipboard, PaletteGenerator, UploadRequest};
use chromapick_types::{CopyTicket, Notification, Palette, PaletteError, UploadTicket};
use chromapick_util::load_image_file;

use crate::ui::components::common::TextInputState;
use crate::ui::theme::{self, Theme};

/// Braille frames cycled while an upload is outstanding.
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Cross-cutting shared context owned by the App.
///
/// Holds the collaborators that outlive any single interaction so components
/// do not have to thread them through.
pub struct SharedCtx {
    pub theme: Box<dyn Theme>,
    pub service: Arc<dyn PaletteService>,
    pub clipboard: Box<dyn Clipboard + Send>,
}

impl SharedCtx {
    pub fn new(service: Arc<dyn PaletteService>, clipboard: Box<dyn Clipboard + Send>) -> Self {
        Self {
            theme: theme::load(),
            service,
            clipboard,
        }
    }
}

/// Which control receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    PathInput,
    Generate,
    Reset,
    Swatches,
}

/// Messages applied by [`App::update`].
#[derive(Debug)]
pub enum Msg {
    /// Periodic tick driving the spinner.
    Tick,
    /// Load the path typed into the path field and offer it as the selection.
    SelectPath,
    /// Start uploading the current selection.
    Generate,
    /// A spawned upload finished.
    UploadCompleted {
        ticket: UploadTicket,
        result: Result<Palette, PaletteError>,
    },
    Reset,
    /// Copy the swatch at this index.
    CopySwatch(usize),
    /// The "copied" marker identified by this ticket has lived its full time.
    CopiedMarkerExpired(CopyTicket),
    /// Move the swatch cursor by this many places.
    MoveSwatch(isize),
    FocusNext,
    FocusPrevious,
    DismissNotification,
}

/// Side effects the runtime performs on behalf of [`App::update`].
#[derive(Debug)]
pub enum Effect {
    /// Run the upload in the background and report back with
    /// [`Msg::UploadCompleted`].
    StartUpload(UploadRequest),
    /// Report [`Msg::CopiedMarkerExpired`] once the marker lifetime elapses.
    ScheduleCopiedExpiry(CopyTicket),
}

pub struct App {
    pub ctx: SharedCtx,
    pub generator: PaletteGenerator,
    pub path_input: TextInputState,
    pub focus: Focus,
    /// Index of the swatch the keyboard cursor is on.
    pub selected_swatch: usize,
    /// Blocking notification; while set it receives all input.
    pub notification: Option<Notification>,
    pub throbber_idx: usize,
}

impl App {
    pub fn new(ctx: SharedCtx) -> Self {
        Self {
            ctx,
            generator: PaletteGenerator::new(),
            path_input: TextInputState::new(),
            focus: Focus::default(),
            selected_swatch: 0,
            notification: None,
            throbber_idx: 0,
        }
    }

    pub fn spinner_frame(&self) -> &'static str {
        SPINNER_FRAMES[self.throbber_idx % SPINNER_FRAMES.len()]
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                if self.generator.is_uploading() {
                    self.throbber_idx = (self.throbber_idx + 1) % SPINNER_FRAMES.len();
                }
                Vec::new()
            }
            Msg::SelectPath => {
                self.select_from_path_input();
                Vec::new()
            }
            Msg::Generate => self.start_upload(),
            Msg::UploadCompleted { ticket, result } => {
                match self.generator.complete_upload(ticket, result) {
                    Ok(()) => {
                        self.selected_swatch = 0;
                    }
                    Err(error) => self.notify(&error),
                }
                Vec::new()
            }
            Msg::Reset => {
                if self.generator.can_reset() {
                    self.generator.reset(&mut self.path_input);
                    self.selected_swatch = 0;
                    self.focus = Focus::PathInput;
                }
                Vec::new()
            }
            Msg::CopySwatch(index) => {
                let Some(color) = self.generator.palette().get(index).map(str::to_string) else {
                    return Vec::new();
                };
                self.selected_swatch = index;
                let ticket = self.generator.copy(&color, self.ctx.clipboard.as_mut());
                vec![Effect::ScheduleCopiedExpiry(ticket)]
            }
            Msg::CopiedMarkerExpired(ticket) => {
                self.generator.expire_copied(&ticket);
                Vec::new()
            }
            Msg::MoveSwatch(delta) => {
                let len = self.generator.palette().len();
                if len > 0 {
                    let next = self.selected_swatch.saturating_add_signed(delta);
                    self.selected_swatch = next.min(len - 1);
                }
                Vec::new()
            }
            Msg::FocusNext => {
                self.cycle_focus(true);
                Vec::new()
            }
            Msg::FocusPrevious => {
                self.cycle_focus(false);
                Vec::new()
            }
            Msg::DismissNotification => {
                self.notification = None;
                Vec::new()
            }
        }
    }

    /// Controls that can currently take focus, in Tab order.
    pub fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![Focus::PathInput, Focus::Generate];
        if self.generator.can_reset() {
            order.push(Focus::Reset);
        }
        if !self.generator.palette().is_empty() {
            order.push(Focus::Swatches);
        }
        order
    }

    fn cycle_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let current = order.iter().position(|focus| *focus == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else {
            (current + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    fn select_from_path_input(&mut self) {
        let candidate = match load_image_file(self.path_input.input()) {
            Ok(candidate) => candidate,
            Err(error) => {
                self.notify(&error);
                return;
            }
        };
        let picked = candidate.is_some();
        match self.generator.select(candidate, &mut self.path_input) {
            Ok(()) if picked => self.focus = Focus::Generate,
            Ok(()) => {}
            Err(error) => self.notify(&error),
        }
    }

    fn start_upload(&mut self) -> Vec<Effect> {
        match self.generator.begin_upload() {
            Ok(request) => {
                self.throbber_idx = 0;
                vec![Effect::StartUpload(request)]
            }
            Err(error) => {
                self.notify(&error);
                Vec::new()
            }
        }
    }

    /// Surface `error` as the blocking notification when it carries a user
    /// message. Busy and cancelled outcomes stay silent.
    fn notify(&mut self, error: &PaletteError) {
        if let Some(notification) = error.notification() {
            self.notification = Some(notification);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chromapick_types::{ImageFile, Severity};

    use super::*;

    pub(crate) struct StaticService(pub Result<Vec<&'static str>, PaletteError>);

    #[async_trait]
    impl PaletteService for StaticService {
        async fn extract_palette(&self, _file: &ImageFile) -> Result<Palette, PaletteError> {
            self.0.clone().map(Palette::from_iter)
        }
    }

    #[derive(Clone, Default)]
    pub(crate) struct SharedClipboard(pub Arc<Mutex<Vec<String>>>);

    impl Clipboard for SharedClipboard {
        fn set_text(&mut self, text: &str) -> anyhow::Result<()> {
            self.0.lock().expect("clipboard lock").push(text.to_string());
            Ok(())
        }
    }

    pub(crate) fn test_app(service: StaticService) -> (App, SharedClipboard) {
        let clipboard = SharedClipboard::default();
        let ctx = SharedCtx::new(Arc::new(service), Box::new(clipboard.clone()));
        (App::new(ctx), clipboard)
    }

    /// Write `name` into a temp dir and select it through the path field.
    pub(crate) fn select_file(app: &mut App, dir: &tempfile::TempDir, name: &str) {
        let path = dir.path().join(name);
        std::fs::write(&path, b"image bytes").expect("write image");
        app.path_input.set_input(path.to_string_lossy());
        app.update(Msg::SelectPath);
    }

    /// Drive a full upload through the effect the app hands out.
    pub(crate) async fn generate(app: &mut App) {
        let effects = app.update(Msg::Generate);
        let [Effect::StartUpload(request)] = <[Effect; 1]>::try_from(effects).expect("one effect") else {
            panic!("expected an upload effect");
        };
        let service = Arc::clone(&app.ctx.service);
        let (ticket, result) = request.execute(service.as_ref()).await;
        app.update(Msg::UploadCompleted { ticket, result });
    }

    #[test]
    fn selecting_an_unsupported_file_opens_a_warning_and_clears_the_field() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (mut app, _) = test_app(StaticService(Ok(vec![])));
        select_file(&mut app, &dir, "notes.gif");

        let notification = app.notification.as_ref().expect("notification");
        assert_eq!(notification.severity, Severity::Warning);
        assert_eq!(notification.message, "Please select a PNG or JPG image file only.");
        assert_eq!(app.path_input.input(), "");
        assert!(app.generator.selection().is_none());
    }

    #[test]
    fn selecting_a_png_moves_focus_to_generate() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (mut app, _) = test_app(StaticService(Ok(vec![])));
        select_file(&mut app, &dir, "photo.png");

        assert!(app.notification.is_none());
        assert_eq!(app.generator.selection().map(|file| file.name()), Some("photo.png"));
        assert_eq!(app.focus, Focus::Generate);
    }

    #[test]
    fn blank_path_is_ignored() {
        let (mut app, _) = test_app(StaticService(Ok(vec![])));
        app.update(Msg::SelectPath);
        assert!(app.notification.is_none());
        assert_eq!(app.focus, Focus::PathInput);
    }

    #[test]
    fn generating_without_a_selection_asks_for_an_image() {
        let (mut app, _) = test_app(StaticService(Ok(vec![])));
        let effects = app.update(Msg::Generate);
        assert!(effects.is_empty());
        assert_eq!(
            app.notification.as_ref().map(|n| n.message.as_str()),
            Some("Please select an image first.")
        );
        app.update(Msg::DismissNotification);
        assert!(app.notification.is_none());
    }

    #[tokio::test]
    async fn successful_upload_fills_the_palette_and_offers_reset() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (mut app, _) = test_app(StaticService(Ok(vec!["#112233", "#445566"])));
        select_file(&mut app, &dir, "photo.jpg");
        generate(&mut app).await;

        assert_eq!(app.generator.palette().colors(), ["#112233", "#445566"]);
        assert!(!app.generator.is_uploading());
        assert_eq!(
            app.focus_order(),
            [Focus::PathInput, Focus::Generate, Focus::Reset, Focus::Swatches]
        );
    }

    #[tokio::test]
    async fn failed_upload_shows_generic_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (mut app, _) = test_app(StaticService(Err(PaletteError::Transport("500".into()))));
        select_file(&mut app, &dir, "photo.png");
        generate(&mut app).await;

        let notification = app.notification.as_ref().expect("notification");
        assert_eq!(notification.severity, Severity::Error);
        assert_eq!(notification.message, "Something went wrong. Please try again.");
        assert!(app.generator.palette().is_empty());
    }

    #[test]
    fn second_generate_while_uploading_is_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (mut app, _) = test_app(StaticService(Ok(vec![])));
        select_file(&mut app, &dir, "photo.png");

        let first = app.update(Msg::Generate);
        assert_eq!(first.len(), 1);
        let second = app.update(Msg::Generate);
        assert!(second.is_empty());
        assert!(app.notification.is_none());
        assert!(app.generator.is_uploading());
    }

    #[tokio::test]
    async fn copy_writes_clipboard_and_schedules_expiry() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (mut app, clipboard) = test_app(StaticService(Ok(vec!["#112233", "#445566"])));
        select_file(&mut app, &dir, "photo.png");
        generate(&mut app).await;

        let effects = app.update(Msg::CopySwatch(1));
        assert_eq!(*clipboard.0.lock().expect("clipboard lock"), ["#445566"]);
        assert_eq!(app.generator.copied_color(), Some("#445566"));
        assert_eq!(app.selected_swatch, 1);

        let [Effect::ScheduleCopiedExpiry(first)] = <[Effect; 1]>::try_from(effects).expect("one effect") else {
            panic!("expected an expiry effect");
        };
        let effects = app.update(Msg::CopySwatch(0));
        let [Effect::ScheduleCopiedExpiry(second)] = <[Effect; 1]>::try_from(effects).expect("one effect") else {
            panic!("expected an expiry effect");
        };

        app.update(Msg::CopiedMarkerExpired(first));
        assert_eq!(app.generator.copied_color(), Some("#112233"));
        app.update(Msg::CopiedMarkerExpired(second));
        assert_eq!(app.generator.copied_color(), None);
    }

    #[test]
    fn copying_outside_the_palette_does_nothing() {
        let (mut app, clipboard) = test_app(StaticService(Ok(vec![])));
        assert!(app.update(Msg::CopySwatch(3)).is_empty());
        assert!(clipboard.0.lock().expect("clipboard lock").is_empty());
    }

    #[tokio::test]
    async fn reset_clears_palette_selection_and_field() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (mut app, _) = test_app(StaticService(Ok(vec!["red"])));
        select_file(&mut app, &dir, "photo.png");
        generate(&mut app).await;
        app.focus = Focus::Swatches;

        app.update(Msg::Reset);
        assert!(app.generator.palette().is_empty());
        assert!(app.generator.selection().is_none());
        assert_eq!(app.path_input.input(), "");
        assert_eq!(app.focus, Focus::PathInput);
    }

    #[test]
    fn focus_cycles_over_available_controls() {
        let (mut app, _) = test_app(StaticService(Ok(vec![])));
        app.update(Msg::FocusNext);
        assert_eq!(app.focus, Focus::Generate);
        app.update(Msg::FocusNext);
        assert_eq!(app.focus, Focus::PathInput);
        app.update(Msg::FocusPrevious);
        assert_eq!(app.focus, Focus::Generate);
    }

    #[tokio::test]
    async fn swatch_cursor_stays_in_bounds() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (mut app, _) = test_app(StaticService(Ok(vec!["red", "green", "blue"])));
        select_file(&mut app, &dir, "photo.png");
        generate(&mut app).await;

        app.update(Msg::MoveSwatch(-1));
        assert_eq!(app.selected_swatch, 0);
        app.update(Msg::MoveSwatch(5));
        assert_eq!(app.selected_swatch, 2);
    }
}
