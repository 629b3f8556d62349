use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Declared media types accepted for upload.
pub const ALLOWED_MEDIA_TYPES: [&str; 2] = ["image/png", "image/jpeg"];

/// A user-chosen image waiting to be uploaded.
///
/// The media type is the *declared* type (derived from the file name), not a
/// sniffed one; validation against [`ALLOWED_MEDIA_TYPES`] happens when the
/// file is selected.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    name: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Display name shown next to the picker (final path component).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether the declared media type is exactly one of the allowed types.
    pub fn has_allowed_media_type(&self) -> bool {
        ALLOWED_MEDIA_TYPES.contains(&self.media_type.as_str())
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Ordered color values returned by the extraction service.
///
/// Order is the server's response order and is preserved for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(Vec<String>);

impl Palette {
    pub fn new(colors: Vec<String>) -> Self {
        Self(colors)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn colors(&self) -> &[String] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl From<Vec<String>> for Palette {
    fn from(colors: Vec<String>) -> Self {
        Self(colors)
    }
}

impl<S: Into<String>> FromIterator<S> for Palette {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// JSON body returned by `POST /get-colors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteResponse {
    pub palette: Palette,
}

/// Identifies one upload. Responses carrying a superseded ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct UploadTicket(pub u64);

/// Identifies one copy action so its expiry timer only clears its own marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CopyTicket {
    pub color: String,
    pub generation: u64,
}

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
}

/// A blocking, user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity,
        }
    }
}

/// Closed set of failures the palette generator can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("unsupported media type '{media_type}'; expected image/png or image/jpeg")]
    InvalidType { media_type: String },
    #[error("no image selected")]
    MissingSelection,
    #[error("could not read {path}: {reason}")]
    Unreadable { path: String, reason: String },
    #[error("an upload is already in flight")]
    Busy,
    #[error("upload cancelled")]
    Cancelled,
    #[error("color extraction request failed: {0}")]
    Transport(String),
}

impl PaletteError {
    /// Text shown to the user, or `None` for kinds that are handled silently.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::InvalidType { .. } => Some("Please select a PNG or JPG image file only.".to_string()),
            Self::MissingSelection => Some("Please select an image first.".to_string()),
            Self::Unreadable { path, reason } => Some(format!("Could not read {path}: {reason}")),
            Self::Transport(_) => Some("Something went wrong. Please try again.".to_string()),
            Self::Busy | Self::Cancelled => None,
        }
    }

    /// Blocking notification for this error, if the user should see one.
    pub fn notification(&self) -> Option<Notification> {
        let message = self.user_message()?;
        let (title, severity) = match self {
            Self::InvalidType { .. } => ("Unsupported file", Severity::Warning),
            Self::Unreadable { .. } => ("Cannot read file", Severity::Warning),
            Self::MissingSelection => ("No image", Severity::Info),
            _ => ("Upload failed", Severity::Error),
        };
        Some(Notification::new(title, message, severity))
    }
}
