use crate::classify::UnrecognizedKeyPolicy;
use crate::error::{KeyphraseError, Result};
use crate::keyboard::TriggerKey;
use crate::matcher::AmbiguityPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DB_FILENAME: &str = "phrases.json";
pub const CONFIG_FILENAME: &str = "config.json";
pub const DEFAULT_BUFFER_SIZE: usize = 32;
pub const DEFAULT_ERASE_DELAY_MS: u64 = 2;
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 40;
pub const LOG_ENV: &str = "KEYPHRASE_LOG";

/// Get the keyphrase configuration directory
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".keyphrase"))
        .unwrap_or_else(|| PathBuf::from(".keyphrase"))
}

/// Ensure the configuration directory and an empty database exist
pub fn ensure_config_dir() -> Result<PathBuf> {
    let config_dir = get_config_dir();
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    let db_path = get_db_file_path();
    if !db_path.exists() {
        info!(path = %db_path.display(), "Creating empty phrase database");
        fs::write(&db_path, "")?;
    }

    Ok(config_dir)
}

/// Get the path to the database file
pub fn get_db_file_path() -> PathBuf {
    get_config_dir().join(DB_FILENAME)
}

/// Get the path to the config file
pub fn get_config_file_path() -> PathBuf {
    get_config_dir().join(CONFIG_FILENAME)
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

fn default_trigger_keys() -> Vec<String> {
    TriggerKey::default_set()
        .iter()
        .map(|key| key.to_string())
        .collect()
}

fn default_erase_delay_ms() -> u64 {
    DEFAULT_ERASE_DELAY_MS
}

fn default_settle_delay_ms() -> u64 {
    DEFAULT_SETTLE_DELAY_MS
}

/// Engine settings, read from `config.json` and overridable on the command line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    #[serde(default = "default_trigger_keys")]
    pub trigger_keys: Vec<String>,
    pub unrecognized_keys: UnrecognizedKeyPolicy,
    pub ambiguity: AmbiguityPolicy,
    #[serde(default = "default_erase_delay_ms")]
    pub erase_delay_ms: u64,
    /// How long the guard stays held after the last synthetic keystroke, so
    /// the hook's echo of our own output is still dropped
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Phrase database location; defaults to `~/.keyphrase/phrases.json`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            trigger_keys: default_trigger_keys(),
            unrecognized_keys: UnrecognizedKeyPolicy::default(),
            ambiguity: AmbiguityPolicy::default(),
            erase_delay_ms: DEFAULT_ERASE_DELAY_MS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            database: None,
        }
    }
}

impl EngineConfig {
    /// Read the config at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(KeyphraseError::InvalidConfig(
                "buffer_size must be at least 1".to_string(),
            ));
        }
        self.trigger_set().map(|_| ())
    }

    /// Parsed trigger keys. Fails on an empty set or a blank name.
    pub fn trigger_set(&self) -> Result<Vec<TriggerKey>> {
        if self.trigger_keys.is_empty() {
            return Err(KeyphraseError::InvalidConfig(
                "at least one trigger key is required".to_string(),
            ));
        }
        self.trigger_keys
            .iter()
            .map(|name| name.parse::<TriggerKey>().map_err(KeyphraseError::InvalidConfig))
            .collect()
    }

    pub fn database_path(&self) -> PathBuf {
        self.database.clone().unwrap_or_else(get_db_file_path)
    }
}
