//! Host capabilities driven by the generator.

/// The surface the user picks files with.
pub trait FileInput {
    /// Clear the displayed value so the same file can be chosen again.
    fn clear(&mut self);
}

/// Headless hosts have nothing to clear.
impl FileInput for () {
    fn clear(&mut self) {}
}

/// Write-only access to the system clipboard.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> anyhow::Result<()>;
}
