//! # Configuration
//!
//! Settings for a codec session, loaded from TOML or the environment.
//!
//! ```toml
//! [wire]
//! versions = [66, 67, 68]
//! max_message_size = 10485760
//!
//! [session]
//! response_timeout_ms = 30000
//! pipe_capacity = 64
//!
//! [logging]
//! app_name = "eth-wire"
//! log_level = "info"
//! log_to_console = true
//! json_format = false
//! ```
//!
//! Every table is optional; missing tables take their defaults. The size
//! limit is applied by the session before any payload reaches the decoder.

use crate::error::{ProtocolError, Result};
use crate::protocol::version::ProtocolVersion;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::Path;
use std::time::Duration;
use tracing::Level;

/// Default cap on a single message payload (10 MiB)
pub const MAX_MESSAGE_SIZE: usize = 10 * 1024 * 1024;

const MIN_MESSAGE_SIZE: usize = 1024;
const MAX_MESSAGE_SIZE_CEILING: usize = 100 * 1024 * 1024;

const ENV_MAX_MESSAGE_SIZE: &str = "ETH_WIRE_MAX_MESSAGE_SIZE";
const ENV_VERSIONS: &str = "ETH_WIRE_VERSIONS";
const ENV_LOG_LEVEL: &str = "ETH_WIRE_LOG_LEVEL";

fn config_error(context: &str, cause: impl Display) -> ProtocolError {
    ProtocolError::ConfigError(format!("{context}: {cause}"))
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProtocolConfig {
    pub wire: WireConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

impl ProtocolConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| config_error(&format!("cannot read {}", path.display()), e))?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| config_error("invalid TOML", e))
    }

    /// Defaults overridden by `ETH_WIRE_MAX_MESSAGE_SIZE`, `ETH_WIRE_VERSIONS`
    /// (comma separated, e.g. `66,68`) and `ETH_WIRE_LOG_LEVEL`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(size) = env_var(ENV_MAX_MESSAGE_SIZE) {
            config.wire.max_message_size = size
                .parse()
                .map_err(|e| config_error(ENV_MAX_MESSAGE_SIZE, e))?;
        }
        if let Some(list) = env_var(ENV_VERSIONS) {
            config.wire.versions = parse_versions(&list)?;
        }
        if let Some(level) = env_var(ENV_LOG_LEVEL) {
            config.logging.log_level = level
                .parse()
                .map_err(|e| config_error(ENV_LOG_LEVEL, e))?;
        }

        Ok(config)
    }

    pub fn default_with_overrides<F>(apply: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        apply(&mut config);
        config
    }

    /// The default configuration rendered as a commented TOML document
    pub fn example_config() -> String {
        match toml::to_string_pretty(&Self::default()) {
            Ok(body) => format!("# eth-wire configuration\n\n{body}"),
            Err(e) => format!("# example unavailable: {e}\n"),
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = toml::to_string_pretty(self).map_err(|e| config_error("cannot serialize", e))?;
        std::fs::write(path.as_ref(), text)
            .map_err(|e| config_error(&format!("cannot write {}", path.as_ref().display()), e))
    }

    /// Every problem found, one message each. Empty means valid.
    pub fn validate(&self) -> Vec<String> {
        self.wire
            .validate()
            .into_iter()
            .chain(self.session.validate())
            .chain(self.logging.validate())
            .collect()
    }

    pub fn validate_strict(&self) -> Result<()> {
        let problems = self.validate();
        if problems.is_empty() {
            return Ok(());
        }
        Err(ProtocolError::ConfigError(format!(
            "{} problem(s): {}",
            problems.len(),
            problems.join("; ")
        )))
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_versions(list: &str) -> Result<Vec<ProtocolVersion>> {
    list.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u32>()
                .map_err(|e| config_error(&format!("version '{part}'"), e))
                .and_then(|number| {
                    ProtocolVersion::try_from(number)
                        .map_err(|e| config_error(&format!("version '{part}'"), e))
                })
        })
        .collect()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WireConfig {
    /// Versions this node is willing to speak
    pub versions: Vec<ProtocolVersion>,
    /// Largest payload accepted or sent, in bytes
    pub max_message_size: usize,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            versions: ProtocolVersion::ALL.to_vec(),
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }
}

impl WireConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.versions.is_empty() {
            problems.push("At least one protocol version must be enabled".to_string());
        }
        let mut unique = self.versions.clone();
        unique.sort();
        unique.dedup();
        if unique.len() < self.versions.len() {
            problems.push("Protocol version list contains duplicates".to_string());
        }

        match self.max_message_size {
            0 => problems.push("Max message size cannot be 0".to_string()),
            size if size < MIN_MESSAGE_SIZE => {
                problems.push(format!("Max message size {size} is too small (minimum {MIN_MESSAGE_SIZE})"))
            }
            size if size > MAX_MESSAGE_SIZE_CEILING => problems.push(format!(
                "Max message size {size} is too large (maximum {MAX_MESSAGE_SIZE_CEILING})"
            )),
            _ => {}
        }

        problems
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How long `exchange` waits for the matching response
    #[serde(rename = "response_timeout_ms", with = "millis")]
    pub response_timeout: Duration,
    /// Per-direction buffer of in-memory pipes
    pub pipe_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            response_timeout: Duration::from_secs(30),
            pipe_capacity: 64,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.response_timeout < Duration::from_millis(100) {
            problems.push(format!(
                "Response timeout {:?} is too short (minimum 100ms)",
                self.response_timeout
            ));
        } else if self.response_timeout > Duration::from_secs(300) {
            problems.push(format!(
                "Response timeout {:?} is too long (maximum 300s)",
                self.response_timeout
            ));
        }
        if self.pipe_capacity == 0 {
            problems.push("Pipe capacity must be greater than 0".to_string());
        }

        problems
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Reported once when logging starts
    pub app_name: String,
    /// Default filter level for this crate; `RUST_LOG` wins when set
    #[serde(with = "level")]
    pub log_level: Level,
    pub log_to_console: bool,
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: "eth-wire".to_string(),
            log_level: Level::INFO,
            log_to_console: true,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Vec<String> {
        match self.app_name.len() {
            0 => vec!["Application name cannot be empty".to_string()],
            len if len > 64 => vec![format!("Application name is too long ({len} > 64 characters)")],
            _ => Vec::new(),
        }
    }
}

/// `Duration` as whole milliseconds.
mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// `tracing::Level` as its lowercase name.
mod level {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::Level;

    pub fn serialize<S: Serializer>(value: &Level, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.as_str().to_ascii_lowercase())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Level, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse()
            .map_err(|_| D::Error::custom(format!("unknown log level '{name}'")))
    }
}
