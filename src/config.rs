use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Empty means the profile's data directory
    #[serde(default)]
    pub storage_path: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default = "default_current_theme")]
    pub current_theme: String,
    #[serde(default)]
    pub themes: HashMap<String, Theme>,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_new_entry")]
    pub new_entry: String,
    #[serde(default = "default_save")]
    pub save: String,
    #[serde(default = "default_cancel")]
    pub cancel: String,
    #[serde(default = "default_help")]
    pub help: String,
    #[serde(default = "default_next_field")]
    pub next_field: String,
    #[serde(default = "default_previous_field")]
    pub previous_field: String,
    #[serde(default = "default_list_up")]
    pub list_up: String,
    #[serde(default = "default_list_down")]
    pub list_down: String,
    #[serde(default = "default_remove_goal")]
    pub remove_goal: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    #[serde(default = "default_highlight_fg")]
    pub highlight_fg: String,
    #[serde(default = "default_accent")]
    pub accent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            log_level: default_log_level(),
            key_bindings: KeyBindings::default(),
            current_theme: default_current_theme(),
            themes: HashMap::new(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            new_entry: default_new_entry(),
            save: default_save(),
            cancel: default_cancel(),
            help: default_help(),
            next_field: default_next_field(),
            previous_field: default_previous_field(),
            list_up: default_list_up(),
            list_down: default_list_down(),
            remove_goal: default_remove_goal(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            highlight_fg: default_highlight_fg(),
            accent: default_accent(),
        }
    }
}

impl Theme {
    fn preset(fg: &str, bg: &str, highlight_bg: &str, highlight_fg: &str, accent: &str) -> Self {
        Self {
            fg: fg.to_string(),
            bg: bg.to_string(),
            highlight_bg: highlight_bg.to_string(),
            highlight_fg: highlight_fg.to_string(),
            accent: accent.to_string(),
        }
    }

    /// Preset themes that are always available
    pub fn get_preset_themes() -> HashMap<String, Theme> {
        let mut themes = HashMap::new();
        themes.insert("default".to_string(), Theme::default());
        themes.insert("dark".to_string(), Theme::preset("white", "black", "cyan", "black", "lightblue"));
        themes.insert("light".to_string(), Theme::preset("black", "white", "blue", "white", "blue"));
        themes.insert("green".to_string(), Theme::preset("green", "black", "yellow", "black", "lightgreen"));
        themes.insert("monochrome".to_string(), Theme::preset("white", "black", "white", "black", "white"));
        themes
    }
}

// Default value functions
fn default_storage_path() -> String {
    // Fallback only: the profile's real path is applied at load time
    if let Some(data_dir) = utils::get_data_dir(utils::Profile::Prod) {
        data_dir.join("journal.db").to_string_lossy().to_string()
    } else {
        "~/.local/share/rtrack/journal.db".to_string()
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_new_entry() -> String {
    "n".to_string()
}

fn default_save() -> String {
    "Ctrl+s".to_string()
}

fn default_cancel() -> String {
    "Esc".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_next_field() -> String {
    "Tab".to_string()
}

fn default_previous_field() -> String {
    "BackTab".to_string()
}

fn default_list_up() -> String {
    "k".to_string()
}

fn default_list_down() -> String {
    "j".to_string()
}

fn default_remove_goal() -> String {
    "Delete".to_string()
}

fn default_current_theme() -> String {
    "default".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "blue".to_string()
}

fn default_highlight_fg() -> String {
    "white".to_string()
}

fn default_accent() -> String {
    "cyan".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
    #[error("Theme not found: {0}")]
    ThemeNotFound(String),
}

impl Config {
    /// Load configuration from an explicit file, writing defaults if it is missing.
    /// The storage path falls back to the profile's data directory when unset.
    pub fn load_from_path(config_path: &Path, profile: utils::Profile) -> Result<Self, ConfigError> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)
                .map_err(|e| ConfigError::ReadError(e.to_string()))?;
            let mut config: Config = toml::from_str(&contents)?;

            if config.storage_path.trim().is_empty() {
                config.storage_path = Self::default_storage_path_for_profile(profile);
            }

            Ok(config)
        } else {
            let mut config = Config::default();
            config.storage_path = Self::default_storage_path_for_profile(profile);
            config.save_to_path(config_path)?;
            tracing::info!(path = %config_path.display(), "wrote default config");
            Ok(config)
        }
    }

    pub fn save_to_path(&mut self, config_path: &Path) -> Result<(), ConfigError> {
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, toml_string)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile)
            .ok_or_else(|| ConfigError::ConfigDirError("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("config.toml"))
    }

    fn default_storage_path_for_profile(profile: utils::Profile) -> String {
        if let Some(data_dir) = utils::get_data_dir(profile) {
            data_dir.join("journal.db").to_string_lossy().to_string()
        } else {
            match profile {
                utils::Profile::Dev => "~/.local/share/rtrack-dev/journal.db".to_string(),
                utils::Profile::Prod => "~/.local/share/rtrack/journal.db".to_string(),
            }
        }
    }

    /// Get the expanded storage path (with ~ expansion)
    pub fn get_storage_path(&self) -> PathBuf {
        utils::expand_path(&self.storage_path)
    }

    /// Get the currently active theme, falling back to the default preset
    pub fn get_active_theme(&self) -> Theme {
        if let Some(theme) = self.themes.get(&self.current_theme) {
            theme.clone()
        } else if let Some(theme) = Theme::get_preset_themes().get(&self.current_theme) {
            theme.clone()
        } else {
            Theme::default()
        }
    }

    /// Set the active theme by name
    pub fn set_theme(&mut self, name: &str) -> Result<(), ConfigError> {
        if !self.themes.contains_key(name) && !Theme::get_preset_themes().contains_key(name) {
            return Err(ConfigError::ThemeNotFound(name.to_string()));
        }
        self.current_theme = name.to_string();
        Ok(())
    }

    /// All theme names (presets + user-defined), sorted
    pub fn get_available_themes(&self) -> Vec<String> {
        let mut themes: Vec<String> = Theme::get_preset_themes().keys().cloned().collect();
        for theme_name in self.themes.keys() {
            if !themes.contains(theme_name) {
                themes.push(theme_name.clone());
            }
        }
        themes.sort();
        themes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from_path(&path, utils::Profile::Dev).unwrap();

        assert!(path.exists());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.key_bindings.save, "Ctrl+s");
        assert_eq!(config.config_version, Some(CURRENT_CONFIG_VERSION));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "storage_path = \"/tmp/rtrack-test.db\"\ncurrent_theme = \"green\"\n\n[key_bindings]\nquit = \"x\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&path, utils::Profile::Dev).unwrap();

        assert_eq!(config.storage_path, "/tmp/rtrack-test.db");
        assert_eq!(config.key_bindings.quit, "x");
        assert_eq!(config.key_bindings.new_entry, "n");
        assert_eq!(config.get_active_theme().fg, "green");
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "storage_path = [").unwrap();
        assert!(matches!(
            Config::load_from_path(&path, utils::Profile::Dev),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn user_themes_shadow_presets_and_unknown_falls_back() {
        let mut config = Config::default();
        config.themes.insert("mine".to_string(), Theme::preset("red", "black", "red", "white", "red"));

        config.set_theme("mine").unwrap();
        assert_eq!(config.get_active_theme().fg, "red");

        assert!(matches!(config.set_theme("nope"), Err(ConfigError::ThemeNotFound(_))));

        config.current_theme = "removed".to_string();
        assert_eq!(config.get_active_theme(), Theme::default());
    }

    #[test]
    fn available_themes_are_sorted_and_unique() {
        let mut config = Config::default();
        config.themes.insert("dark".to_string(), Theme::default());
        config.themes.insert("aurora".to_string(), Theme::default());
        let names = config.get_available_themes();
        assert_eq!(names.first().map(String::as_str), Some("aurora"));
        assert_eq!(names.iter().filter(|n| n.as_str() == "dark").count(), 1);
    }
}
