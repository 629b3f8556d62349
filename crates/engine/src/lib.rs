//! # Chromapick Engine
//!
//! The engine owns the state of one palette generator: the pending image
//! selection, the request-in-flight flag, the palette returned by the
//! extraction service, and the transient "copied" marker.
//!
//! ## Architecture
//!
//! - **`generator`**: [`PaletteGenerator`] with the `select`, `upload`,
//!   `reset` and `copy` operations
//! - **`in_flight`**: the shared flag that is raised for exactly one
//!   outstanding upload and lowered by a guard on every exit path
//! - **`collaborators`**: the host capabilities the generator drives
//!   (clearing the file input, writing the clipboard)
//! - **`copied`**: the marker lifetime and its expiry timer
//!
//! Hosts that are event driven (the TUI) split an upload into
//! [`PaletteGenerator::begin_upload`], a spawned [`UploadRequest::execute`],
//! and [`PaletteGenerator::complete_upload`]. Hosts that can simply await use
//! [`PaletteGenerator::upload`].

pub mod collaborators;
pub mod copied;
pub mod generator;
pub mod in_flight;

pub use collaborators::{Clipboard, FileInput};
pub use copied::{COPIED_MARKER_TTL, expire_after_ttl};
pub use generator::{Phase, PaletteGenerator, UploadRequest};
pub use in_flight::{InFlightFlag, InFlightGuard};
