//! The palette generator state machine.
//!
//! ```text
//! Idle --select(valid)--> Selected --upload--> Uploading --ok--> Ready
//!                                                 |                 |
//!                                                 +--err--> Selected|
//! Ready --reset--> Idle
//! ```

use chromapick_api::PaletteService;
use chromapick_types::{CopyTicket, ImageFile, Palette, PaletteError, UploadTicket};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::collaborators::{Clipboard, FileInput};
use crate::in_flight::{InFlightFlag, InFlightGuard};

/// Coarse state used for rendering decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Selected,
    Uploading,
    Ready,
}

/// Everything a spawned upload needs. Dropping it (or finishing
/// [`UploadRequest::execute`]) lowers the in-flight flag.
#[derive(Debug)]
pub struct UploadRequest {
    ticket: UploadTicket,
    file: ImageFile,
    cancel: CancellationToken,
    guard: InFlightGuard,
}

impl UploadRequest {
    pub fn ticket(&self) -> UploadTicket {
        self.ticket
    }

    pub fn file(&self) -> &ImageFile {
        &self.file
    }

    /// Run the upload against `service`, giving up early if the generator is
    /// reset. The in-flight guard is released before this returns.
    pub async fn execute<S: PaletteService + ?Sized>(self, service: &S) -> (UploadTicket, Result<Palette, PaletteError>) {
        let UploadRequest {
            ticket,
            file,
            cancel,
            guard,
        } = self;

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(PaletteError::Cancelled),
            result = service.extract_palette(&file) => result,
        };
        drop(guard);
        (ticket, result)
    }
}

/// State of one palette generator instance.
#[derive(Debug, Default)]
pub struct PaletteGenerator {
    selection: Option<ImageFile>,
    palette: Palette,
    in_flight: InFlightFlag,
    copied: Option<CopyTicket>,
    copy_generation: u64,
    upload_generation: u64,
    active_upload: Option<(UploadTicket, CancellationToken)>,
}

impl PaletteGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Option<&ImageFile> {
        self.selection.as_ref()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn is_uploading(&self) -> bool {
        self.in_flight.is_set()
    }

    /// Shared handle on the in-flight flag, for observers outside the generator.
    pub fn in_flight_flag(&self) -> InFlightFlag {
        self.in_flight.clone()
    }

    pub fn copied_color(&self) -> Option<&str> {
        self.copied.as_ref().map(|ticket| ticket.color.as_str())
    }

    /// Reset is only offered once there is something to clear.
    pub fn can_reset(&self) -> bool {
        !self.palette.is_empty()
    }

    pub fn phase(&self) -> Phase {
        if self.is_uploading() {
            Phase::Uploading
        } else if !self.palette.is_empty() {
            Phase::Ready
        } else if self.selection.is_some() {
            Phase::Selected
        } else {
            Phase::Idle
        }
    }

    /// Accept a candidate file from the picker.
    ///
    /// `None` leaves everything untouched. A file whose declared type is not
    /// PNG or JPEG is rejected: the picker is cleared, the selection is unset
    /// and [`PaletteError::InvalidType`] is returned for the host to show.
    pub fn select<I: FileInput + ?Sized>(&mut self, candidate: Option<ImageFile>, input: &mut I) -> Result<(), PaletteError> {
        let Some(file) = candidate else {
            return Ok(());
        };

        if !file.has_allowed_media_type() {
            warn!(name = file.name(), media_type = file.media_type(), "rejected image selection");
            input.clear();
            self.selection = None;
            return Err(PaletteError::InvalidType {
                media_type: file.media_type().to_string(),
            });
        }

        debug!(name = file.name(), media_type = file.media_type(), "image selected");
        self.selection = Some(file);
        Ok(())
    }

    /// Raise the in-flight flag and hand out the request to run.
    pub fn begin_upload(&mut self) -> Result<UploadRequest, PaletteError> {
        let file = self.selection.clone().ok_or(PaletteError::MissingSelection)?;

        let ticket = UploadTicket(self.upload_generation + 1);
        let guard = self.in_flight.acquire(ticket).ok_or(PaletteError::Busy)?;
        self.upload_generation = ticket.0;

        let cancel = CancellationToken::new();
        self.active_upload = Some((ticket, cancel.clone()));
        debug!(ticket = ticket.0, name = file.name(), "upload started");

        Ok(UploadRequest {
            ticket,
            file,
            cancel,
            guard,
        })
    }

    /// Apply the outcome of the upload identified by `ticket`.
    ///
    /// Outcomes for a ticket that is no longer active (the generator was reset
    /// meanwhile) are dropped and reported as [`PaletteError::Cancelled`]. On
    /// failure the palette is left as it was.
    pub fn complete_upload(&mut self, ticket: UploadTicket, result: Result<Palette, PaletteError>) -> Result<(), PaletteError> {
        match self.active_upload.as_ref() {
            Some((active, _)) if *active == ticket => {
                self.active_upload = None;
            }
            _ => {
                debug!(ticket = ticket.0, "dropping outcome of a superseded upload");
                return Err(PaletteError::Cancelled);
            }
        }

        match result {
            Ok(palette) => {
                info!(ticket = ticket.0, colors = palette.len(), "palette updated");
                self.palette = palette;
                Ok(())
            }
            Err(PaletteError::Cancelled) => Err(PaletteError::Cancelled),
            Err(failure) => {
                error!(ticket = ticket.0, error = %failure, "upload failed");
                Err(failure)
            }
        }
    }

    /// Upload the pending selection and wait for the outcome.
    pub async fn upload<S: PaletteService + ?Sized>(&mut self, service: &S) -> Result<&Palette, PaletteError> {
        let request = self.begin_upload()?;
        let (ticket, result) = request.execute(service).await;
        self.complete_upload(ticket, result)?;
        Ok(&self.palette)
    }

    /// Clear the palette, the selection and the picker, and abandon any
    /// upload that is still outstanding.
    pub fn reset<I: FileInput + ?Sized>(&mut self, input: &mut I) {
        if let Some((ticket, cancel)) = self.active_upload.take() {
            debug!(ticket = ticket.0, "cancelling upload on reset");
            cancel.cancel();
            self.in_flight.release();
        }
        self.palette.clear();
        self.selection = None;
        input.clear();
    }

    /// Copy `color` to the clipboard and mark it as the copied swatch.
    ///
    /// The returned ticket must be passed back to
    /// [`PaletteGenerator::expire_copied`] once the marker lifetime elapses.
    /// Clipboard failures are logged and otherwise ignored.
    pub fn copy<C: Clipboard + ?Sized>(&mut self, color: &str, clipboard: &mut C) -> CopyTicket {
        if let Err(error) = clipboard.set_text(color) {
            warn!(color, error = %error, "clipboard write failed");
        }
        self.copy_generation += 1;
        let ticket = CopyTicket {
            color: color.to_string(),
            generation: self.copy_generation,
        };
        self.copied = Some(ticket.clone());
        ticket
    }

    /// Clear the copied marker if `ticket` is still the latest copy.
    pub fn expire_copied(&mut self, ticket: &CopyTicket) -> bool {
        if self.copied.as_ref() == Some(ticket) {
            self.copied = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use super::*;
    use crate::copied::expire_after_ttl;

    #[derive(Default)]
    struct RecordingInput {
        clears: usize,
    }

    impl FileInput for RecordingInput {
        fn clear(&mut self) {
            self.clears += 1;
        }
    }

    #[derive(Default)]
    struct RecordingClipboard {
        writes: Vec<String>,
        fail: bool,
    }

    impl Clipboard for RecordingClipboard {
        fn set_text(&mut self, text: &str) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("clipboard unavailable");
            }
            self.writes.push(text.to_string());
            Ok(())
        }
    }

    struct FakeService {
        response: Result<Palette, PaletteError>,
        calls: AtomicUsize,
        flag: InFlightFlag,
        saw_in_flight: AtomicBool,
    }

    impl FakeService {
        fn new(flag: InFlightFlag, response: Result<Palette, PaletteError>) -> Self {
            Self {
                response,
                calls: AtomicUsize::new(0),
                flag,
                saw_in_flight: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl PaletteService for FakeService {
        async fn extract_palette(&self, _file: &ImageFile) -> Result<Palette, PaletteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.saw_in_flight.store(self.flag.is_set(), Ordering::SeqCst);
            self.response.clone()
        }
    }

    struct HangingService;

    #[async_trait]
    impl PaletteService for HangingService {
        async fn extract_palette(&self, _file: &ImageFile) -> Result<Palette, PaletteError> {
            std::future::pending::<Result<Palette, PaletteError>>().await
        }
    }

    fn jpeg(name: &str) -> ImageFile {
        ImageFile::new(name, "image/jpeg", vec![0xFF, 0xD8])
    }

    fn palette(colors: &[&str]) -> Palette {
        colors.iter().copied().collect()
    }

    async fn generator_with_palette(colors: &[&str]) -> PaletteGenerator {
        let mut generator = PaletteGenerator::new();
        generator.select(Some(jpeg("seed.jpg")), &mut ()).unwrap();
        let service = FakeService::new(generator.in_flight_flag(), Ok(palette(colors)));
        generator.upload(&service).await.unwrap();
        generator
    }

    #[tokio::test]
    async fn invalid_types_leave_selection_unset_and_palette_untouched() {
        for media_type in ["image/gif", "", "IMAGE/PNG", "text/plain", "image/svg+xml"] {
            let mut generator = generator_with_palette(&["#abc"]).await;
            let mut input = RecordingInput::default();
            generator.select(Some(jpeg("keep.jpg")), &mut input).unwrap();

            let candidate = ImageFile::new("bad", media_type, vec![1]);
            let error = generator.select(Some(candidate), &mut input).unwrap_err();

            assert_eq!(
                error,
                PaletteError::InvalidType {
                    media_type: media_type.to_string()
                }
            );
            assert!(error.notification().is_some());
            assert!(generator.selection().is_none());
            assert_eq!(generator.palette(), &palette(&["#abc"]));
            assert_eq!(input.clears, 1);
        }
    }

    #[test]
    fn valid_files_become_the_pending_selection() {
        let mut generator = PaletteGenerator::new();
        let mut input = RecordingInput::default();

        generator.select(Some(jpeg("first.jpg")), &mut input).unwrap();
        let png = ImageFile::new("second.png", "image/png", vec![0x89]);
        generator.select(Some(png.clone()), &mut input).unwrap();

        assert_eq!(generator.selection(), Some(&png));
        assert_eq!(generator.phase(), Phase::Selected);
        assert_eq!(input.clears, 0);
    }

    #[test]
    fn selecting_nothing_changes_nothing() {
        let mut generator = PaletteGenerator::new();
        let mut input = RecordingInput::default();
        generator.select(Some(jpeg("photo.jpg")), &mut input).unwrap();

        generator.select(None, &mut input).unwrap();

        assert_eq!(generator.selection().map(ImageFile::name), Some("photo.jpg"));
        assert_eq!(input.clears, 0);
    }

    #[tokio::test]
    async fn upload_without_selection_never_calls_the_service() {
        let mut generator = PaletteGenerator::new();
        let service = FakeService::new(generator.in_flight_flag(), Ok(palette(&["#fff"])));

        let error = generator.upload(&service).await.unwrap_err();

        assert_eq!(error, PaletteError::MissingSelection);
        assert_eq!(error.user_message().as_deref(), Some("Please select an image first."));
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
        assert!(!generator.is_uploading());
    }

    #[tokio::test]
    async fn in_flight_only_while_the_request_is_outstanding() {
        let outcomes = [Ok(palette(&["#fff", "#000"])), Err(PaletteError::Transport("boom".into()))];
        for response in outcomes {
            let mut generator = PaletteGenerator::new();
            generator.select(Some(jpeg("photo.jpg")), &mut ()).unwrap();
            let service = FakeService::new(generator.in_flight_flag(), response);

            assert!(!generator.is_uploading());
            let _ = generator.upload(&service).await;

            assert!(service.saw_in_flight.load(Ordering::SeqCst));
            assert!(!generator.is_uploading());
        }
    }

    #[tokio::test]
    async fn success_replaces_palette_in_server_order() {
        let mut generator = generator_with_palette(&["#abc"]).await;
        generator.select(Some(jpeg("next.jpg")), &mut ()).unwrap();
        let service = FakeService::new(generator.in_flight_flag(), Ok(palette(&["#fff", "#000"])));

        let updated = generator.upload(&service).await.unwrap();

        assert_eq!(updated.colors(), ["#fff", "#000"]);
        assert_eq!(generator.phase(), Phase::Ready);
    }

    #[tokio::test]
    async fn failure_keeps_the_previous_palette() {
        let mut generator = generator_with_palette(&["#abc"]).await;
        let service = FakeService::new(
            generator.in_flight_flag(),
            Err(PaletteError::Transport("connection reset".into())),
        );

        let error = generator.upload(&service).await.unwrap_err();

        assert!(matches!(error, PaletteError::Transport(_)));
        assert_eq!(error.user_message().as_deref(), Some("Something went wrong. Please try again."));
        assert_eq!(generator.palette(), &palette(&["#abc"]));
        assert!(generator.selection().is_some());
    }

    #[tokio::test]
    async fn reset_always_clears_selection_and_palette() {
        let mut empty = PaletteGenerator::new();
        let mut input = RecordingInput::default();
        empty.reset(&mut input);
        assert!(empty.selection().is_none());
        assert!(empty.palette().is_empty());

        let mut ready = generator_with_palette(&["#123456"]).await;
        ready.reset(&mut input);
        assert!(ready.selection().is_none());
        assert!(ready.palette().is_empty());
        assert!(!ready.can_reset());
        assert_eq!(ready.phase(), Phase::Idle);
        assert_eq!(input.clears, 2);
    }

    #[test]
    fn second_upload_is_refused_while_one_is_in_flight() {
        let mut generator = PaletteGenerator::new();
        generator.select(Some(jpeg("photo.jpg")), &mut ()).unwrap();

        let first = generator.begin_upload().unwrap();
        assert_eq!(generator.phase(), Phase::Uploading);
        assert_eq!(generator.begin_upload().unwrap_err(), PaletteError::Busy);

        drop(first);
        assert!(!generator.is_uploading());
        assert!(generator.begin_upload().is_ok());
    }

    #[tokio::test]
    async fn reset_cancels_an_outstanding_upload() {
        let mut generator = generator_with_palette(&["#abc"]).await;
        generator.select(Some(jpeg("slow.jpg")), &mut ()).unwrap();
        let request = generator.begin_upload().unwrap();

        generator.reset(&mut ());
        assert!(!generator.is_uploading());

        let (ticket, result) = request.execute(&HangingService).await;
        assert_eq!(result, Err(PaletteError::Cancelled));
        assert_eq!(generator.complete_upload(ticket, result), Err(PaletteError::Cancelled));
        assert!(generator.palette().is_empty());
    }

    #[tokio::test]
    async fn late_response_after_reset_is_ignored() {
        let mut generator = PaletteGenerator::new();
        generator.select(Some(jpeg("a.jpg")), &mut ()).unwrap();
        let stale = generator.begin_upload().unwrap();
        let stale_ticket = stale.ticket();
        generator.reset(&mut ());

        generator.select(Some(jpeg("b.jpg")), &mut ()).unwrap();
        let current = generator.begin_upload().unwrap();
        drop(stale);
        assert!(generator.is_uploading());

        let ignored = generator.complete_upload(stale_ticket, Ok(palette(&["#stale"])));
        assert_eq!(ignored, Err(PaletteError::Cancelled));
        assert!(generator.palette().is_empty());

        let current_ticket = current.ticket();
        drop(current);
        generator.complete_upload(current_ticket, Ok(palette(&["#fresh"]))).unwrap();
        assert_eq!(generator.palette().colors(), ["#fresh"]);
    }

    #[test]
    fn copy_writes_clipboard_and_sets_marker() {
        let mut generator = PaletteGenerator::new();
        let mut clipboard = RecordingClipboard::default();

        let ticket = generator.copy("#ff00ff", &mut clipboard);

        assert_eq!(clipboard.writes, ["#ff00ff"]);
        assert_eq!(generator.copied_color(), Some("#ff00ff"));
        assert_eq!(ticket.color, "#ff00ff");
    }

    #[test]
    fn clipboard_failure_still_marks_the_swatch() {
        let mut generator = PaletteGenerator::new();
        let mut clipboard = RecordingClipboard {
            fail: true,
            ..Default::default()
        };

        generator.copy("#010203", &mut clipboard);

        assert_eq!(generator.copied_color(), Some("#010203"));
    }

    #[tokio::test(start_paused = true)]
    async fn marker_clears_after_ttl_measured_from_the_latest_copy() {
        let mut generator = PaletteGenerator::new();
        let mut clipboard = RecordingClipboard::default();
        let start = Instant::now();

        let first = generator.copy("#ff00ff", &mut clipboard);
        let first_timer = tokio::spawn(expire_after_ttl(first));

        tokio::time::advance(Duration::from_millis(200)).await;
        let second = generator.copy("#000000", &mut clipboard);
        let second_timer = tokio::spawn(expire_after_ttl(second));
        assert_eq!(generator.copied_color(), Some("#000000"));

        let fired = first_timer.await.unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1500) && elapsed < Duration::from_millis(1700));
        assert!(!generator.expire_copied(&fired));
        assert_eq!(generator.copied_color(), Some("#000000"));

        let fired = second_timer.await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1700));
        assert!(generator.expire_copied(&fired));
        assert_eq!(generator.copied_color(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn single_copy_clears_after_ttl() {
        let mut generator = PaletteGenerator::new();
        let start = Instant::now();
        let ticket = generator.copy("#ff00ff", &mut RecordingClipboard::default());

        let fired = expire_after_ttl(ticket).await;

        assert!(start.elapsed() >= Duration::from_millis(1500));
        assert!(generator.expire_copied(&fired));
        assert_eq!(generator.copied_color(), None);
    }

    #[tokio::test]
    async fn select_upload_render_reset_round_trip() {
        let mut generator = PaletteGenerator::new();
        let mut input = RecordingInput::default();
        assert_eq!(generator.phase(), Phase::Idle);

        generator.select(Some(jpeg("photo.jpg")), &mut input).unwrap();
        assert_eq!(generator.selection().map(ImageFile::name), Some("photo.jpg"));

        let service = FakeService::new(generator.in_flight_flag(), Ok(palette(&["#112233", "#445566"])));
        generator.upload(&service).await.unwrap();
        assert_eq!(generator.palette().colors(), ["#112233", "#445566"]);
        assert!(generator.can_reset());

        generator.reset(&mut input);
        assert_eq!(generator.palette().len(), 0);
        assert!(generator.selection().is_none());
        assert_eq!(generator.phase(), Phase::Idle);
    }
}
