use std::future::Future;
use std::time::Duration;

use chromapick_types::CopyTicket;

/// How long a swatch shows its "Copied!" overlay.
pub const COPIED_MARKER_TTL: Duration = Duration::from_millis(1500);

/// Resolve with `ticket` once [`COPIED_MARKER_TTL`] has elapsed.
///
/// The deadline is taken when this function is called, not when the future is
/// first polled, so spawning the future late does not stretch the marker.
/// Must be called from within a Tokio runtime.
pub fn expire_after_ttl(ticket: CopyTicket) -> impl Future<Output = CopyTicket> + Send + 'static {
    let sleep = tokio::time::sleep(COPIED_MARKER_TTL);
    async move {
        sleep.await;
        ticket
    }
}
