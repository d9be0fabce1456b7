use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use callme_core::page::{PageSettings, DEFAULT_ACKNOWLEDGEMENT};
use callme_core::rules::Messages;
use callme_core::ModalSupport;
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "callme";
const CONFIG_FILENAME: &str = "config.toml";

/// How the dialog should be presented. `auto` picks the native modal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfacePreference {
    #[default]
    Auto,
    Native,
    Fallback,
}

impl SurfacePreference {
    pub fn resolve(self) -> ModalSupport {
        match self {
            SurfacePreference::Auto | SurfacePreference::Native => ModalSupport::Native,
            SurfacePreference::Fallback => ModalSupport::Fallback,
        }
    }
}

impl fmt::Display for SurfacePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfacePreference::Auto => f.write_str("auto"),
            SurfacePreference::Native => f.write_str("native"),
            SurfacePreference::Fallback => f.write_str("fallback"),
        }
    }
}

impl FromStr for SurfacePreference {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(SurfacePreference::Auto),
            "native" => Ok(SurfacePreference::Native),
            "fallback" => Ok(SurfacePreference::Fallback),
            _ => Err(ConfigError::InvalidSurface(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub surface: SurfacePreference,
    pub messages: Messages,
    pub acknowledgement: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            surface: SurfacePreference::Auto,
            messages: Messages::default(),
            acknowledgement: DEFAULT_ACKNOWLEDGEMENT.to_string(),
        }
    }
}

impl AppConfig {
    /// Page settings, with `surface` taking precedence over the file.
    pub fn page_settings(&self, surface: Option<SurfacePreference>) -> PageSettings {
        PageSettings {
            support: surface.unwrap_or(self.surface).resolve(),
            messages: self.messages.clone(),
            acknowledgement: self.acknowledgement.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("invalid surface: {0} (expected auto, native or fallback)")]
    InvalidSurface(String),
    #[error("config value cannot be empty: {0}")]
    EmptyValue(&'static str),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    surface: Option<SurfacePreference>,
    acknowledgement: Option<String>,
    messages: Option<MessagesFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MessagesFile {
    required: Option<String>,
    email: Option<String>,
    pattern: Option<String>,
    invalid: Option<String>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(surface) = parsed.surface {
        config.surface = surface;
    }

    if let Some(acknowledgement) = parsed.acknowledgement {
        config.acknowledgement = non_empty("acknowledgement", acknowledgement)?;
    }

    if let Some(messages) = parsed.messages {
        let target = &mut config.messages;
        if let Some(value) = messages.required {
            target.required = non_empty("messages.required", value)?;
        }
        if let Some(value) = messages.email {
            target.email = non_empty("messages.email", value)?;
        }
        if let Some(value) = messages.pattern {
            target.pattern = non_empty("messages.pattern", value)?;
        }
        if let Some(value) = messages.invalid {
            target.invalid = non_empty("messages.invalid", value)?;
        }
    }

    Ok(config)
}

fn non_empty(key: &'static str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(ConfigError::EmptyValue(key));
    }
    Ok(value)
}
