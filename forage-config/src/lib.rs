use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

// --- Error Type ---
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to write TOML config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("config validation failed: {0}")]
    Validation(String),
}

// --- Enums for Choices ---
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SerializerKind {
    Json,
    Binary,
    #[default]
    Null,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SenderKind {
    Stdio,
    File,
    #[default]
    Null,
}

// --- Configuration Sections ---

/// State export settings. Export is off unless both halves are configured.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TransportSettings {
    #[serde(default)]
    pub serializer: SerializerKind,
    #[serde(default)]
    pub sender: SenderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    /// Send every N-th tick.
    #[serde(default = "default_output_frequency")]
    pub output_frequency: u32,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            serializer: SerializerKind::default(),
            sender: SenderKind::default(),
            output_path: None,
            output_frequency: default_output_frequency(),
        }
    }
}

impl TransportSettings {
    pub fn is_enabled(&self) -> bool {
        self.serializer != SerializerKind::Null && self.sender != SenderKind::Null
    }
}

fn default_output_frequency() -> u32 { 1 }

// --- Top-Level Config Struct ---

/// On-disk configuration. The first five keys are required; everything else
/// falls back to defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub window_width: f32,
    pub window_height: f32,
    pub num_goats: usize,
    pub num_cabbages: usize,
    pub cabbage_generation_choices: Vec<i64>,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_spawn_interval_ms")]
    pub spawn_interval_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default = "default_cabbage_margin")]
    pub cabbage_margin: f32,
    #[serde(default = "default_cabbage_size_range")]
    pub cabbage_size_range: [f32; 2],
    #[serde(default)]
    pub transport: TransportSettings,
}

fn default_tick_interval_ms() -> u64 { 60 }
fn default_spawn_interval_ms() -> u64 { 3000 }
fn default_cabbage_margin() -> f32 { 50.0 }
fn default_cabbage_size_range() -> [f32; 2] { [10.0, 30.0] }

impl Default for Config {
    fn default() -> Self {
        Self {
            window_width: 1500.0,
            window_height: 800.0,
            num_goats: 10,
            num_cabbages: 20,
            cabbage_generation_choices: vec![1, 2, 3, 4],
            tick_interval_ms: default_tick_interval_ms(),
            spawn_interval_ms: default_spawn_interval_ms(),
            seed: None,
            cabbage_margin: default_cabbage_margin(),
            cabbage_size_range: default_cabbage_size_range(),
            transport: TransportSettings::default(),
        }
    }
}

impl Config {
    /// Spawn batch sizes, already checked positive by [`validate`].
    pub fn spawn_choices(&self) -> Vec<u32> {
        self.cabbage_generation_choices
            .iter()
            .filter_map(|&choice| u32::try_from(choice).ok())
            .collect()
    }
}

// --- Loading Functions ---

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("toml")
}

/// Reads, parses and validates a config file. `.toml` files are parsed as TOML,
/// anything else as JSON.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: Config = if is_toml(path) {
        toml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };
    validate(&config)?;
    Ok(config)
}

/// Loads `path`, first writing the default config there if the file is missing.
pub fn load_or_create(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        return load_config(path);
    }

    let config = Config::default();
    let content = if is_toml(path) {
        toml::to_string_pretty(&config)?
    } else {
        serde_json::to_string_pretty(&config)?
    };
    fs::write(path, content)?;
    info!("Config file not found, created default config at {}", path.display());
    Ok(config)
}

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.window_width <= 0.0 || config.window_height <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "World dimensions must be positive, got {}x{}.",
            config.window_width, config.window_height
        )));
    }

    if config.cabbage_generation_choices.is_empty() {
        return Err(ConfigError::Validation("cabbage_generation_choices cannot be empty.".to_string()));
    }
    if let Some(bad) = config
        .cabbage_generation_choices
        .iter()
        .find(|&&choice| choice <= 0 || u32::try_from(choice).is_err())
    {
        return Err(ConfigError::Validation(format!(
            "cabbage_generation_choices must hold positive integers, found {}.",
            bad
        )));
    }

    if config.tick_interval_ms == 0 || config.spawn_interval_ms == 0 {
        return Err(ConfigError::Validation("Tick and spawn intervals cannot be zero.".to_string()));
    }

    let [min_size, max_size] = config.cabbage_size_range;
    if !(min_size > 0.0 && min_size <= max_size) {
        return Err(ConfigError::Validation(format!(
            "cabbage_size_range must satisfy 0 < min <= max, got [{}, {}].",
            min_size, max_size
        )));
    }

    let margin = config.cabbage_margin;
    if margin < 0.0 || 2.0 * margin >= config.window_width || 2.0 * margin >= config.window_height {
        return Err(ConfigError::Validation(format!(
            "cabbage_margin {} leaves no room to spawn in a {}x{} world.",
            margin, config.window_width, config.window_height
        )));
    }

    if config.transport.output_frequency == 0 {
        return Err(ConfigError::Validation("transport.output_frequency cannot be zero.".to_string()));
    }
    if config.transport.sender == SenderKind::File && config.transport.output_path.is_none() {
        return Err(ConfigError::Validation("The 'file' sender needs transport.output_path.".to_string()));
    }

    Ok(())
}
