use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::options::ParseOptions;

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub sources: SourcesConfig,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub all_files_required: bool,
    #[serde(default)]
    pub log_level: String,
}

/// Files and search paths the command reads when no flags override them.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct SourcesConfig {
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub paths: Vec<String>,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    sources: SourcesOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    all_files_required: Option<bool>,
    log_level: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct SourcesOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    files: Vec<String>,
    #[serde(default)]
    paths: Vec<String>,
    #[serde(default)]
    remove_files: Vec<String>,
    #[serde(default)]
    remove_paths: Vec<String>,
}

/// User overlay location; `~` is expanded against the home directory.
const OVERLAY_PATH: &str = "~/.config/dotload/config.toml";

// ── Merge logic ──

/// Fold an overlay list into `base`.
///
/// `replace` empties `base` first, otherwise `remove` entries are dropped.
/// Additions are appended in order and never duplicated.
fn merge_list(base: &mut Vec<String>, add: Vec<String>, remove: &[String], replace: bool) {
    if replace {
        base.clear();
    } else {
        base.retain(|item| !remove.contains(item));
    }
    for item in add {
        if !base.contains(&item) {
            base.push(item);
        }
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Embedded defaults with the user overlay folded in, when there is one.
    pub fn load() -> Self {
        let path = PathBuf::from(shellexpand::tilde(OVERLAY_PATH).as_ref());
        Self::load_from(&path)
    }

    /// Embedded defaults with the overlay at `path` folded in.
    ///
    /// A missing overlay is silently ignored. One that fails to parse is
    /// reported on stderr and ignored, since the logger is not up yet.
    pub fn load_from(path: &Path) -> Self {
        let mut config = Self::default_config();
        let Ok(content) = std::fs::read_to_string(path) else {
            return config;
        };
        match toml::from_str::<ConfigOverlay>(&content) {
            Ok(overlay) => config.apply_overlay(overlay),
            Err(e) => eprintln!("dotload: ignoring {}: {e}", path.display()),
        }
        config
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let s = overlay.settings;
        if let Some(v) = s.all_files_required {
            self.settings.all_files_required = v;
        }
        if let Some(v) = s.log_level {
            self.settings.log_level = v;
        }

        let src = overlay.sources;
        merge_list(
            &mut self.sources.files,
            src.files,
            &src.remove_files,
            src.replace,
        );
        merge_list(
            &mut self.sources.paths,
            src.paths,
            &src.remove_paths,
            src.replace,
        );
    }

    /// Configured log level; anything unparseable falls back to `warn`.
    pub fn log_level(&self) -> LevelFilter {
        self.settings.log_level.parse().unwrap_or(LevelFilter::Warn)
    }

    /// Parse options seeded from this configuration.
    pub fn parse_options(&self) -> ParseOptions {
        let options = ParseOptions::new()
            .files(&self.sources.files)
            .paths(&self.sources.paths);
        if self.settings.all_files_required {
            options.all_files_required()
        } else {
            options
        }
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_parses() {
        let config = Config::default_config();
        assert_eq!(config.sources.files, vec![".env"]);
        assert_eq!(config.sources.paths, vec!["."]);
        assert!(!config.settings.all_files_required);
        assert_eq!(config.log_level(), LevelFilter::Warn);
    }

    #[test]
    fn default_options_match_library_defaults() {
        let config = Config::default_config();
        assert_eq!(config.parse_options(), ParseOptions::default());
    }

    // ── Merge semantics ──

    #[test]
    fn overlay_extends_files() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [sources]
            files = [".env.shared"]
        "#,
        );
        assert_eq!(config.sources.files, vec![".env", ".env.shared"]);
    }

    #[test]
    fn overlay_removes_and_adds() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [sources]
            remove_files = [".env"]
            files = [".env.local"]
        "#,
        );
        assert_eq!(config.sources.files, vec![".env.local"]);
    }

    #[test]
    fn overlay_replace_sources() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [sources]
            replace = true
            paths = ["~/devcfg"]
        "#,
        );
        assert_eq!(config.sources.paths, vec!["~/devcfg"]);
        assert!(config.sources.files.is_empty());
    }

    #[test]
    fn overlay_no_duplicates() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [sources]
            paths = ["."]
        "#,
        );
        assert_eq!(config.sources.paths, vec!["."]);
    }

    #[test]
    fn overlay_settings() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [settings]
            all_files_required = true
            log_level = "debug"
        "#,
        );
        assert_eq!(config.log_level(), LevelFilter::Debug);
        let options = config.parse_options();
        assert!(options.sources.all_files_required);
        assert_eq!(options.sources.paths, vec![PathBuf::from(".")]);
    }

    #[test]
    fn bad_log_level_falls_back_to_warn() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [settings]
            log_level = "loud"
        "#,
        );
        assert_eq!(config.log_level(), LevelFilter::Warn);
    }

    #[test]
    fn empty_overlay_changes_nothing() {
        let mut config = Config::default_config();
        config.apply_overlay_str("");
        assert_eq!(config.parse_options(), ParseOptions::default());
    }

    #[test]
    fn overlay_replace_dedups_additions() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [sources]
            replace = true
            files = [".env.a", ".env.b", ".env.a"]
        "#,
        );
        assert_eq!(config.sources.files, vec![".env.a", ".env.b"]);
    }

    // ── Overlay file ──

    #[test]
    fn missing_overlay_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml"));
        assert_eq!(config.parse_options(), ParseOptions::default());
    }

    #[test]
    fn overlay_file_is_applied() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[settings]\nlog_level = \"trace\"\n").unwrap();
        assert_eq!(Config::load_from(&path).log_level(), LevelFilter::Trace);
    }

    #[test]
    fn malformed_overlay_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[settings\nlog_level = ").unwrap();
        let config = Config::load_from(&path);
        assert_eq!(config.log_level(), LevelFilter::Warn);
        assert_eq!(config.parse_options(), ParseOptions::default());
    }
}
