//! Turning a typed path into a candidate [`ImageFile`].

use std::fs;

use chromapick_types::{ImageFile, PaletteError};
use tracing::debug;

use crate::{declared_media_type, display_name, expand_tilde};

/// Read the file named by `input` into an [`ImageFile`].
///
/// Returns `Ok(None)` when `input` is blank, which callers treat as "no file
/// provided". The declared media type is attached but not validated here.
pub fn load_image_file(input: &str) -> Result<Option<ImageFile>, PaletteError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let path = expand_tilde(trimmed);
    let bytes = fs::read(&path).map_err(|error| PaletteError::Unreadable {
        path: path.display().to_string(),
        reason: error.to_string(),
    })?;
    let media_type = declared_media_type(&path);
    debug!(path = %path.display(), media_type, len = bytes.len(), "loaded candidate image");

    Ok(Some(ImageFile::new(display_name(&path), media_type, bytes)))
}
