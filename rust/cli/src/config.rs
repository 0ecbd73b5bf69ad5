//! Layered configuration: defaults, then an optional TOML file named by
//! `TRIVIUM_CONFIG`, then `TRIVIUM_*` environment variables. Command-line
//! flags are applied on top by the command that takes them.

use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;
use trivium_bank::opentdb::{ClientSettings, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use trivium_engine::config::{
    validate_amount, ConfigUpdate, Difficulty, QuizConfiguration, DEFAULT_AMOUNT,
};

pub const CONFIG_ENV: &str = "TRIVIUM_CONFIG";
pub const AMOUNT_ENV: &str = "TRIVIUM_AMOUNT";
pub const DIFFICULTY_ENV: &str = "TRIVIUM_DIFFICULTY";
pub const CATEGORY_ENV: &str = "TRIVIUM_CATEGORY";
pub const API_URL_ENV: &str = "TRIVIUM_API_URL";
pub const TIMEOUT_ENV: &str = "TRIVIUM_TIMEOUT_SECS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub amount: u32,
    pub difficulty: Option<Difficulty>,
    pub category: Option<u32>,
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            amount: DEFAULT_AMOUNT,
            difficulty: None,
            category: None,
            api_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    pub fn quiz_configuration(&self) -> QuizConfiguration {
        QuizConfiguration {
            amount: self.amount,
            category: self.category,
            difficulty: self.difficulty,
            ..QuizConfiguration::default()
        }
    }

    /// The quiz settings as an update, for re-applying after a new quiz.
    pub fn as_update(&self) -> ConfigUpdate {
        ConfigUpdate::default()
            .amount(self.amount)
            .category(self.category)
            .difficulty(self.difficulty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub amount: ValueSource,
    pub difficulty: ValueSource,
    pub category: ValueSource,
    pub api_url: ValueSource,
    pub timeout_secs: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            amount: ValueSource::Default,
            difficulty: ValueSource::Default,
            category: ValueSource::Default,
            api_url: ValueSource::Default,
            timeout_secs: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.amount {
            cfg.amount = v;
            sources.amount = ValueSource::File;
        }
        if let Some(v) = f.difficulty {
            cfg.difficulty = Some(v);
            sources.difficulty = ValueSource::File;
        }
        if let Some(v) = f.category {
            cfg.category = Some(v);
            sources.category = ValueSource::File;
        }
        if let Some(v) = f.api_url {
            cfg.api_url = v;
            sources.api_url = ValueSource::File;
        }
        if let Some(v) = f.timeout_secs {
            cfg.timeout_secs = v;
            sources.timeout_secs = ValueSource::File;
        }
    }

    if let Some(amount) = env_value(AMOUNT_ENV) {
        cfg.amount = amount
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", AMOUNT_ENV, amount)))?;
        sources.amount = ValueSource::Env;
    }
    if let Some(difficulty) = env_value(DIFFICULTY_ENV) {
        cfg.difficulty = parse_difficulty(&difficulty)
            .map_err(|e| ConfigError::Invalid(format!("Invalid {}: {}", DIFFICULTY_ENV, e)))?;
        sources.difficulty = ValueSource::Env;
    }
    if let Some(category) = env_value(CATEGORY_ENV) {
        cfg.category = parse_category(&category)
            .map_err(|e| ConfigError::Invalid(format!("Invalid {}: {}", CATEGORY_ENV, e)))?;
        sources.category = ValueSource::Env;
    }
    if let Some(url) = env_value(API_URL_ENV) {
        cfg.api_url = url;
        sources.api_url = ValueSource::Env;
    }
    if let Some(timeout) = env_value(TIMEOUT_ENV) {
        cfg.timeout_secs = timeout
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", TIMEOUT_ENV, timeout)))?;
        sources.timeout_secs = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    amount: Option<u32>,
    #[serde(default)]
    difficulty: Option<Difficulty>,
    #[serde(default)]
    category: Option<u32>,
    #[serde(default)]
    api_url: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    validate_amount(cfg.amount).map_err(|e| ConfigError::Invalid(e.to_string()))?;
    if cfg.timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: timeout_secs must be >0".into(),
        ));
    }
    if cfg.api_url.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "Invalid configuration: api_url must not be empty".into(),
        ));
    }
    Ok(())
}

/// `any` (or empty) clears the filter.
pub fn parse_difficulty(value: &str) -> Result<Option<Difficulty>, String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("any") {
        return Ok(None);
    }
    value.parse().map(Some)
}

/// `any` (or empty) clears the filter.
pub fn parse_category(value: &str) -> Result<Option<u32>, String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("any") {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| format!("'{}' is not a category id", value))
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
