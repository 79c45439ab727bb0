use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/sfx-memory/config.toml` or `~/.config/sfx-memory/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SFX_MEMORY__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Where the SQLite library lives. Defaults to the XDG data dir.
    pub database_path: Option<PathBuf>,
    /// File extensions picked up when importing a directory
    /// (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks while walking import directories.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
    /// Upper bound for reading the duration of a single file (milliseconds).
    pub probe_timeout_ms: u64,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            database_path: None,
            extensions: ["wav", "mp3", "flac", "ogg", "aif", "aiff", "m4a"]
                .into_iter()
                .map(String::from)
                .collect(),
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
            probe_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Render each sound's notes under its title.
    pub show_notes: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ SFX Memory ~ ".to_string(),
            show_notes: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset, e.g. `info` or `sfx_memory=debug`.
    pub level: String,
    /// Log file. Defaults to the XDG state dir; the terminal belongs to the UI.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
