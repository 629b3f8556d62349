//! # Chromapick TUI
//!
//! Terminal front end for the palette generator: pick a PNG or JPEG by path,
//! send it to the color extraction service, and browse the returned palette
//! as swatches that copy their color to the clipboard when clicked.
//!
//! ## Architecture
//!
//! - **`app`**: application state, the `Msg`/`Effect` vocabulary and the
//!   update function
//! - **`cmd`**: turns effects into background tasks (uploads, marker timers)
//!   and provides the system clipboard
//! - **`ui`**: the runtime loop, components and theme

mod app;
mod cmd;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use chromapick_api::PaletteService;

use crate::app::SharedCtx;
use crate::cmd::SystemClipboard;

/// Runs the interactive palette generator until the user quits.
///
/// `initial_path`, when given, is loaded and selected before the first frame.
///
/// # Errors
///
/// Terminal setup, drawing or teardown failures.
pub async fn run(service: Arc<dyn PaletteService>, initial_path: Option<String>) -> Result<()> {
    let ctx = SharedCtx::new(service, Box::new(SystemClipboard));
    ui::runtime::run_app(ctx, initial_path).await
}
