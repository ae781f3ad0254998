use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{env, fmt, fs, io, time::Duration};
use url::Url;

// Runtime settings, resolved as defaults -> config file -> environment.

pub const DEFAULT_API_URL: &str = "https://email-toner-backend.onrender.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_SUGGEST_DEBOUNCE: Duration = Duration::from_millis(300);

const CONFIG_FILE: &str = "config.toml";
const STATE_FILE: &str = "state.json";
const APP_DIR: &str = "email-toner";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: Url,
    pub timeout: Duration,
    pub suggest_debounce: Duration,
    // Directory holding config.toml and the persisted token.
    pub home: PathBuf,
    // Command the copy action pipes into; platform default when unset.
    pub clipboard: Option<String>,
}

// Optional overrides read from config.toml.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_url: Option<String>,
    timeout_ms: Option<u64>,
    suggest_debounce_ms: Option<u64>,
    clipboard: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    NoHome,
    Read { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
    InvalidUrl { value: String, source: url::ParseError },
    InvalidNumber { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoHome => write!(f, "could not determine a data directory; set EMAIL_TONER_HOME"),
            ConfigError::Read { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "invalid config file {}: {source}", path.display())
            }
            ConfigError::InvalidUrl { value, source } => {
                write!(f, "invalid api url {value:?}: {source}")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a whole number of milliseconds, got {value:?}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::InvalidUrl { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(|key| env::var(key).ok())
    }

    /// Resolves the configuration with `lookup` standing in for the process
    /// environment.
    pub fn load(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let home = match var("EMAIL_TONER_HOME") {
            Some(path) => PathBuf::from(path),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(ConfigError::NoHome)?,
        };

        // An explicitly named file must exist; the default one is optional.
        let file = match var("EMAIL_TONER_CONFIG") {
            Some(path) => read_file_config(Path::new(&path), true)?,
            None => read_file_config(&home.join(CONFIG_FILE), false)?,
        };

        let api_url = var("EMAIL_TONER_API_URL")
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let timeout = match var("EMAIL_TONER_TIMEOUT_MS") {
            Some(raw) => parse_millis("EMAIL_TONER_TIMEOUT_MS", &raw)?,
            None => file
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_TIMEOUT),
        };
        let suggest_debounce = match var("EMAIL_TONER_SUGGEST_DEBOUNCE_MS") {
            Some(raw) => parse_millis("EMAIL_TONER_SUGGEST_DEBOUNCE_MS", &raw)?,
            None => file
                .suggest_debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_SUGGEST_DEBOUNCE),
        };

        Ok(Self {
            api_url: parse_url(&api_url)?,
            timeout,
            suggest_debounce,
            home,
            clipboard: var("EMAIL_TONER_CLIPBOARD").or(file.clipboard),
        })
    }

    /// Where the bearer token is persisted.
    pub fn state_path(&self) -> PathBuf {
        self.home.join(STATE_FILE)
    }
}

fn read_file_config(path: &Path, required: bool) -> Result<FileConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
            return Ok(FileConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_millis(key: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidNumber {
            key,
            value: raw.to_string(),
        })
}

fn parse_url(value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl {
        value: value.to_string(),
        source,
    })
}
