use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Marker substrings used to classify recognized lines.
///
/// Matching is case-sensitive substring containment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Present somewhere on screen when a random/ranked match is being set up
    pub match_start: String,

    /// Marks the line that directly follows the deck name
    pub battle: String,

    /// Lines containing this are never treated as the battle marker line
    pub stance_qualifier: String,

    pub victory: String,
    pub defeat: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            match_start: "Random Match".to_string(),
            battle: "Battle".to_string(),
            stance_qualifier: "Battle stance".to_string(),
            victory: "Victory".to_string(),
            defeat: "Defeat".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Serve the live stats page
    pub enabled: bool,

    /// Address the status server listens on
    pub bind: String,

    /// Browser reload interval for the HTML page
    pub refresh_secs: u32,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind: "127.0.0.1:5000".to_string(),
            refresh_secs: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract language code
    pub language: String,

    /// Contrast multiplier applied to the grayscale capture
    pub contrast: f32,

    /// Brightness offset applied after the contrast multiplier
    pub brightness: f32,

    /// Directory containing `*.traineddata`; `None` uses the system install
    pub tessdata_dir: Option<PathBuf>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            contrast: 1.95,
            brightness: -200.0,
            tessdata_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Exact title of the window to observe
    pub window_title: String,

    pub markers: MarkerConfig,

    /// Fixed delay between capture cycles in milliseconds
    pub cycle_delay_ms: u64,

    /// Path of the persisted counter file
    pub data_file: PathBuf,

    pub status: StatusConfig,

    /// Consecutive empty acquisitions before a warning is logged (0 = never)
    pub skip_warning_threshold: u32,

    pub ocr: OcrConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_title: "MuMu Player 12".to_string(),
            markers: MarkerConfig::default(),
            cycle_delay_ms: 500,
            data_file: PathBuf::from("deck_stats.csv"),
            status: StatusConfig::default(),
            skip_warning_threshold: 120,
            ocr: OcrConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from `path`.
    /// Creates a default config file if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })?;
            let config: Config =
                serde_json::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.display().to_string(),
                    source: Box::new(e),
                })?;
            config.validate()?;

            tracing::info!("Loaded config from: {}", path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            tracing::info!("Created default config at: {}", path.display());
            Ok(config)
        }
    }

    /// Save configuration to disk
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_err = |source: Box<dyn std::error::Error + Send + Sync>| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source,
        };

        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| save_err(Box::new(e)))?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| save_err(Box::new(e)))?;
        fs::write(path, json).map_err(|e| save_err(Box::new(e)))?;

        Ok(())
    }

    /// Default config file location in the user config directory
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        app_dir()
            .map(|dir| dir.join("config.json"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Reject values the capture loop cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_title.trim().is_empty() {
            return Err(ConfigError::Invalid("window_title is empty".to_string()));
        }
        if self.cycle_delay_ms == 0 {
            return Err(ConfigError::Invalid("cycle_delay_ms must be > 0".to_string()));
        }

        let markers = [
            ("match_start", &self.markers.match_start),
            ("battle", &self.markers.battle),
            ("stance_qualifier", &self.markers.stance_qualifier),
            ("victory", &self.markers.victory),
            ("defeat", &self.markers.defeat),
        ];
        for (name, value) in markers {
            if value.is_empty() {
                return Err(ConfigError::Invalid(format!("marker '{}' is empty", name)));
            }
        }

        Ok(())
    }

    pub fn cycle_delay(&self) -> Duration {
        Duration::from_millis(self.cycle_delay_ms)
    }
}

/// Per-user application directory (config + logs)
pub fn app_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("DeckTally"))
}
