use std::env;
use std::path::{Path, PathBuf};

use dirs_next::{config_dir, home_dir};

/// Environment variable used to override the TUI log file path.
pub const LOG_PATH_ENV: &str = "CHROMAPICK_LOG_PATH";

pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    if let Some(rest) = p.strip_prefix("~\\") {
        // Windows-style
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

/// Final path component rendered as a display name.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Resolve where the TUI writes its diagnostics.
///
/// `CHROMAPICK_LOG_PATH` wins when set and non-empty; otherwise the file lives
/// under the platform config directory (`~/.config/chromapick/logs/tui.log`
/// on most Linux setups).
pub fn default_log_path() -> PathBuf {
    if let Some(path) = env::var_os(LOG_PATH_ENV)
        && !path.is_empty()
    {
        return expand_tilde(&path.to_string_lossy());
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("chromapick")
        .join("logs")
        .join("tui.log")
}
