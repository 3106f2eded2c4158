//! Tessera configuration file handling
//!
//! Configuration is TOML. Every section is optional; a missing file section
//! falls back to its defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TesseraConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// UI presentation settings
    #[serde(default)]
    pub ui: UiConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

/// UI presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Show desktop notifications
    #[serde(default = "default_notifications")]
    pub notifications: bool,

    /// Message key to template overrides, e.g.
    /// `GETTING_ACCESS_FROM = "Browsing via {name}"`
    #[serde(default)]
    pub messages: HashMap<String, String>,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_notifications() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notifications: default_notifications(),
            messages: HashMap::new(),
        }
    }
}

impl TesseraConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: TesseraConfig = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Load `path` if given, otherwise the default location if it exists
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let path = default_config_path();
                if path.exists() {
                    Self::load(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Generate default configuration content as a string with comments
    pub fn generate_default_toml() -> String {
        format!(
            r#"# Tessera Configuration
#
# Default location: {path}

[logging]
# Log level: trace, debug, info, warn, error
# RUST_LOG takes precedence when set
level = "{level}"

# Log file path (optional, logs to stderr if not specified)
# file = "/var/log/tessera/tessera.log"

[ui]
# Show desktop notifications when a contact stops proxying through you
# or a connection you are using drops
notifications = true

# Override built-in message templates. Placeholders: {{name}}, {{numOthers}}
[ui.messages]
# SHARING_ACCESS_WITH_ONE = "Sharing access with {{name}}"
# SHARING_ACCESS_WITH_MANY = "Sharing access with {{name}} and {{numOthers}} others"
# GETTING_ACCESS_FROM = "Getting access from {{name}}"
"#,
            path = default_config_path().display(),
            level = DEFAULT_LOG_LEVEL,
        )
    }
}

/// Get the default config file path
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tessera")
        .join("config.toml")
}

/// Print the commented default configuration
pub fn execute() {
    print!("{}", TesseraConfig::generate_default_toml());
}
