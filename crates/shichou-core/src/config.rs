use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use shichou_detect::SelectorDatabase;

use crate::error::ShichouError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub extraction: ExtractionConfig,
    pub watcher: WatcherConfig,
    #[serde(default)]
    pub selectors: SelectorsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub bridge_timeout_ms: u64,
    pub placeholder_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatcherConfig {
    pub poll_interval_ms: u64,
    pub threshold: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load config: the user file if it exists, built-in defaults otherwise.
    pub fn load() -> Result<Self, ShichouError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            Self::load_from(&user_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load and validate an explicit config file.
    pub fn load_from(path: &Path) -> Result<Self, ShichouError> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Save current config to the user config file.
    pub fn save(&self) -> Result<(), ShichouError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ShichouError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ShichouError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ShichouError> {
        let threshold = self.watcher.threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ShichouError::Config(format!(
                "watcher.threshold must be in (0, 1], got {threshold}"
            )));
        }
        if self.watcher.poll_interval_ms == 0 {
            return Err(ShichouError::Config(
                "watcher.poll_interval_ms must be non-zero".into(),
            ));
        }
        if self.extraction.bridge_timeout_ms == 0 {
            return Err(ShichouError::Config(
                "extraction.bridge_timeout_ms must be non-zero".into(),
            ));
        }
        Ok(())
    }

    pub fn bridge_timeout(&self) -> Duration {
        Duration::from_millis(self.extraction.bridge_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.watcher.poll_interval_ms)
    }

    /// Embedded selector database with the user selector file merged over it.
    pub fn selector_database(&self) -> Result<SelectorDatabase, ShichouError> {
        let mut db = SelectorDatabase::embedded();
        if let Some(path) = &self.selectors.user_file {
            let user = SelectorDatabase::from_file(path)?;
            db.merge_user(&user);
            tracing::debug!(path = %path.display(), "Merged user selectors");
        }
        Ok(db)
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "shichou")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}
