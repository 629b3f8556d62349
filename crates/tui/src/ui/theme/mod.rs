//! Theme styling for the TUI.
//!
//! Components style themselves through the semantic roles in [`roles`] and
//! the builders in [`theme_helpers`] rather than hard-coding colors. Swatch
//! backgrounds are the one exception: they paint the palette colors verbatim.

pub mod dracula;
pub mod roles;
pub mod theme_helpers;

pub use dracula::DraculaTheme;
pub use roles::Theme;

/// The theme the application starts with.
pub fn load() -> Box<dyn Theme> {
    Box::new(DraculaTheme::new())
}
