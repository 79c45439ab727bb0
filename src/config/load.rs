use std::{env, path::PathBuf};

use super::schema::Settings;

const APP_DIR: &str = "sfx-memory";

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then lets environment
/// variables (prefix `SFX_MEMORY__`) override it, falling back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("SFX_MEMORY")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.library.probe_timeout_ms == 0 {
            return Err("library.probe_timeout_ms must be >= 1".to_string());
        }
        if self
            .library
            .extensions
            .iter()
            .all(|e| e.trim().trim_start_matches('.').is_empty())
        {
            return Err("library.extensions must name at least one extension".to_string());
        }
        Ok(())
    }

    /// The library database path, explicit or derived from XDG defaults.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.library
            .database_path
            .clone()
            .or_else(|| xdg_dir("XDG_DATA_HOME", &[".local", "share"]).map(|d| d.join("library.db")))
    }

    /// The log file path, explicit or derived from XDG defaults.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.logging
            .file
            .clone()
            .or_else(|| xdg_dir("XDG_STATE_HOME", &[".local", "state"]).map(|d| d.join("sfx-memory.log")))
    }
}

/// Resolve the config path from `SFX_MEMORY_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("SFX_MEMORY_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/sfx-memory/config.toml`
/// or `~/.config/sfx-memory/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", &[".config"]).map(|d| d.join("config.toml"))
}

/// `$<var>/sfx-memory`, or `$HOME/<fallback..>/sfx-memory`.
fn xdg_dir(var: &str, home_fallback: &[&str]) -> Option<PathBuf> {
    let base = if let Some(dir) = env::var_os(var).filter(|v| !v.is_empty()) {
        Some(PathBuf::from(dir))
    } else {
        env::var_os("HOME").map(|home| {
            home_fallback
                .iter()
                .fold(PathBuf::from(home), |acc, part| acc.join(part))
        })
    };

    base.map(|d| d.join(APP_DIR))
}
