use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use kulturcal_core::source::{SourceConfig, SourceStore};
use kulturcal_core::state::CalendarState;
use kulturcal_core::{KulturError, KulturResult};

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Gemini API settings
    pub gemini: GeminiConfig,
}

#[derive(Debug, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

/// Get the config directory path (~/.config/kulturcal)
pub fn config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Could not determine config directory")?
        .join("kulturcal");
    Ok(config_dir)
}

/// Get the config file path (~/.config/kulturcal/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Get the sources file path (~/.config/kulturcal/sources.json)
pub fn sources_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("sources.json"))
}

/// Get the cached-state file path (~/.config/kulturcal/state.json)
pub fn state_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("state.json"))
}

/// Load config from ~/.config/kulturcal/config.toml
pub fn load_config() -> Result<Config> {
    let path = config_path()?;

    if !path.exists() {
        anyhow::bail!(
            "Config file not found at {}\n\n\
            Create it with your Gemini API key:\n\n\
            [gemini]\n\
            api_key = \"your-api-key\"\n\
            # model = \"gemini-3-flash-preview\"",
            path.display()
        );
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

    Ok(config)
}

/// JSON-file persistence for the source registry.
pub struct FileSourceStore {
    path: PathBuf,
}

impl FileSourceStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn at_default_location() -> Result<Self> {
        Ok(Self::new(sources_path()?))
    }
}

impl SourceStore for FileSourceStore {
    fn load(&self) -> KulturResult<Option<Vec<SourceConfig>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let sources = serde_json::from_str(&contents)
            .map_err(|e| KulturError::Serialization(e.to_string()))?;
        Ok(Some(sources))
    }

    fn save(&self, sources: &[SourceConfig]) -> KulturResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(sources)
            .map_err(|e| KulturError::Serialization(e.to_string()))?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

/// Load the cached canonical state. The cache is disposable: absence or a
/// parse failure just means starting from an empty calendar.
pub fn load_state(path: &Path) -> CalendarState {
    if !path.exists() {
        return CalendarState::default();
    }
    std::fs::read_to_string(path)
        .ok()
        .and_then(|contents| serde_json::from_str(&contents).ok())
        .unwrap_or_default()
}

/// Save the canonical state cache.
pub fn save_state(path: &Path, state: &CalendarState) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory at {}", parent.display()))?;
    }
    let contents = serde_json::to_string_pretty(state).context("Failed to serialize state")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write state file at {}", path.display()))?;
    Ok(())
}
