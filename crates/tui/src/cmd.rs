//! Effect execution for the TUI.
//!
//! [`App::update`](crate::app::App::update) never blocks; anything that has
//! to wait (the upload, the copied-marker timer) comes back as an
//! [`Effect`]. This module turns those effects into spawned tasks whose
//! handles the runtime polls alongside terminal input. Each task resolves to
//! the [`Msg`] that reports its outcome.

use std::sync::Arc;

use chromapick_api::PaletteService;
use chromapick_engine::{Clipboard, expire_after_ttl};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::app::{Effect, Msg};

/// System clipboard backed by `arboard`.
///
/// A fresh handle is opened per write; holding one open for the whole session
/// fails on some Linux setups without a clipboard manager.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> anyhow::Result<()> {
        arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.to_string()))?;
        Ok(())
    }
}

/// Spawn one background task per effect.
///
/// Must be called from within a Tokio runtime. Timers start immediately so
/// the copied marker lasts its full lifetime from the moment of the copy.
pub fn run_effects(service: &Arc<dyn PaletteService>, effects: Vec<Effect>) -> Vec<JoinHandle<Msg>> {
    effects
        .into_iter()
        .map(|effect| match effect {
            Effect::StartUpload(request) => {
                let service = Arc::clone(service);
                debug!(ticket = request.ticket().0, name = request.file().name(), "spawning upload");
                tokio::spawn(async move {
                    let (ticket, result) = request.execute(service.as_ref()).await;
                    Msg::UploadCompleted { ticket, result }
                })
            }
            Effect::ScheduleCopiedExpiry(ticket) => {
                let expiry = expire_after_ttl(ticket);
                tokio::spawn(async move { Msg::CopiedMarkerExpired(expiry.await) })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chromapick_engine::COPIED_MARKER_TTL;
    use chromapick_types::{CopyTicket, ImageFile, Palette, PaletteError, UploadTicket};

    use super::*;
    use crate::app::tests::{StaticService, test_app};

    #[tokio::test(start_paused = true)]
    async fn expiry_task_reports_its_ticket_after_the_marker_lifetime() {
        let service: Arc<dyn PaletteService> = Arc::new(StaticService(Ok(vec![])));
        let ticket = CopyTicket {
            color: "#abcdef".into(),
            generation: 4,
        };
        let started = tokio::time::Instant::now();
        let mut handles = run_effects(&service, vec![Effect::ScheduleCopiedExpiry(ticket.clone())]);
        let msg = handles.pop().expect("one task").await.expect("task joined");

        assert!(started.elapsed() >= COPIED_MARKER_TTL);
        assert!(started.elapsed() < COPIED_MARKER_TTL + Duration::from_millis(100));
        let Msg::CopiedMarkerExpired(expired) = msg else {
            panic!("expected an expiry message, got {msg:?}");
        };
        assert_eq!(expired, ticket);
    }

    #[tokio::test]
    async fn upload_task_reports_ticket_and_palette() {
        let (mut app, _) = test_app(StaticService(Ok(vec!["#010203"])));
        app.generator
            .select(Some(ImageFile::new("a.png", "image/png", vec![1])), &mut ())
            .expect("valid selection");
        let request = app.generator.begin_upload().expect("upload starts");

        let mut handles = run_effects(&app.ctx.service, vec![Effect::StartUpload(request)]);
        let msg = handles.pop().expect("one task").await.expect("task joined");

        let Msg::UploadCompleted { ticket, result } = msg else {
            panic!("expected an upload message, got {msg:?}");
        };
        assert_eq!(ticket, UploadTicket(1));
        assert_eq!(result, Ok(Palette::from_iter(["#010203"])));
        assert!(!app.generator.is_uploading());
    }

    #[tokio::test]
    async fn upload_failure_is_carried_back_as_a_message() {
        let (mut app, _) = test_app(StaticService(Err(PaletteError::Transport("boom".into()))));
        app.generator
            .select(Some(ImageFile::new("a.jpg", "image/jpeg", vec![1])), &mut ())
            .expect("valid selection");
        let request = app.generator.begin_upload().expect("upload starts");

        let mut handles = run_effects(&app.ctx.service, vec![Effect::StartUpload(request)]);
        let msg = handles.pop().expect("one task").await.expect("task joined");
        assert!(matches!(msg, Msg::UploadCompleted { result: Err(PaletteError::Transport(_)), .. }));
    }
}
