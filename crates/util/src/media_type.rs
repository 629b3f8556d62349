//! Declared media types for files chosen from disk.
//!
//! A terminal has no browser file object carrying a MIME type, so the
//! declared type is derived from the file name extension, the same way a
//! browser file input fills `File.type`. Content is never sniffed: a JPEG
//! renamed to `.gif` declares `image/gif`.

use std::path::Path;

const EXTENSION_MEDIA_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("jpe", "image/jpeg"),
    ("jfif", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("svg", "image/svg+xml"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("ico", "image/x-icon"),
    ("avif", "image/avif"),
];

/// Declared media type for `path`, or an empty string when unknown.
pub fn declared_media_type(path: &Path) -> &'static str {
    let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
        return "";
    };
    EXTENSION_MEDIA_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(extension))
        .map(|(_, media_type)| *media_type)
        .unwrap_or("")
}
