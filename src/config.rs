use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Represents the complete configuration for auto-changelog.
///
/// Contains repository settings, ticket reference settings and output options.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub repository: RepositoryConfig,

    #[serde(default)]
    pub tickets: TicketConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Repository settings.
///
/// `default_branch` bounds the unreleased range. When unset, the branch HEAD
/// points to is used.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct RepositoryConfig {
    #[serde(default)]
    pub default_branch: Option<String>,
}

/// Returns the default ticket project keys.
fn default_ticket_prefixes() -> Vec<String> {
    vec!["TPD".to_string(), "TIM".to_string()]
}

/// Ticket reference extraction settings.
///
/// Prefixes are project keys such as `TPD` in `ref: TPD-123`. They are matched
/// case-insensitively.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TicketConfig {
    #[serde(default = "default_ticket_prefixes")]
    pub prefixes: Vec<String>,
}

impl Default for TicketConfig {
    fn default() -> Self {
        TicketConfig {
            prefixes: default_ticket_prefixes(),
        }
    }
}

fn default_unreleased_title() -> String {
    "Unreleased".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "default_unreleased_title")]
    pub unreleased_title: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            unreleased_title: default_unreleased_title(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `changelog.toml` in current directory
/// 3. `.changelog.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./changelog.toml").exists() {
        fs::read_to_string("./changelog.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".changelog.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}
