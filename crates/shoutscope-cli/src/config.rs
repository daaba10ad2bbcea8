//! shoutscope CLI Configuration Management
//!
//! Configuration is read from a TOML file (`--config`) on top of built-in
//! defaults; every section and key is optional. Command line flags are
//! applied afterwards by `main`.
//!
//! ```toml
//! [node]
//! name = "shoutscope"
//!
//! [cli]
//! prompt = "shoutscope> "
//! show_sender = false
//! startup_delay_ms = 250
//!
//! [channels]
//! command_buffer_size = 32
//! app_event_buffer_size = 64
//!
//! [simulation]
//! shout_interval_ms = 2000
//! peers = [{ name = "alice", groups = ["GLOBAL"], messages = ["hello"] }]
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shoutscope_core::ChannelConfig;
use shoutscope_harness::SimulationConfig;

// ----------------------------------------------------------------------------
// CLI Application Configuration
// ----------------------------------------------------------------------------

/// Complete configuration for the shoutscope CLI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub node: NodeConfig,
    pub cli: CliConfig,
    /// Buffer sizes between the REPL and the watch task
    pub channels: ChannelConfig,
    /// Scripted peers sharing the in-memory overlay
    pub simulation: SimulationConfig,
}

/// Identity of the inspector node on the overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Display name announced to other peers
    pub name: String,
}

/// Interactive interface options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub prompt: String,
    /// Prefix observed shouts with their group and sender
    pub show_sender: bool,
    /// Time given to the overlay to discover peers before the first prompt
    pub startup_delay_ms: u64,
}

// ----------------------------------------------------------------------------
// Default Implementations
// ----------------------------------------------------------------------------

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            name: "shoutscope".to_string(),
        }
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            prompt: "shoutscope> ".to_string(),
            show_sender: false,
            startup_delay_ms: 250,
        }
    }
}

impl CliConfig {
    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }
}

impl AppConfig {
    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)
            .map_err(|e| ConfigError::Loading(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::FileSystem(format!("Failed to read {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Validate the configuration for consistency and correctness
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.node.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "node.name must not be empty".to_string(),
            ));
        }
        if self.cli.prompt.is_empty() {
            return Err(ConfigError::Validation("cli.prompt must not be empty".to_string()));
        }
        self.channels
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        self.simulation
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        Ok(())
    }

    /// Default configuration rendered as TOML, for `--print-config`
    pub fn example_config() -> String {
        toml::to_string_pretty(&AppConfig::default())
            .unwrap_or_else(|_| "# failed to render default configuration\n".to_string())
    }
}

// ----------------------------------------------------------------------------
// Configuration Errors
// ----------------------------------------------------------------------------

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {0}")]
    Loading(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("File system error: {0}")]
    FileSystem(String),
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_creation() {
        let config = AppConfig::default();
        assert_eq!(config.node.name, "shoutscope");
        assert_eq!(config.cli.prompt, "shoutscope> ");
        assert!(!config.cli.show_sender);
        assert_eq!(config.cli.startup_delay(), Duration::from_millis(250));
        assert_eq!(config.channels.command_buffer_size, 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [node]
            name = "inspector-1"

            [cli]
            show_sender = true

            [simulation]
            shout_interval_ms = 500
            peers = [{ name = "dave", groups = ["lab"], messages = ["ping"] }]
            "#,
        )
        .unwrap();

        assert_eq!(config.node.name, "inspector-1");
        assert!(config.cli.show_sender);
        assert_eq!(config.cli.prompt, "shoutscope> ");
        assert_eq!(config.channels, ChannelConfig::default());
        assert_eq!(config.simulation.shout_interval_ms, 500);
        assert_eq!(config.simulation.peers.len(), 1);
        assert_eq!(config.simulation.peers[0].groups, vec!["lab".to_string()]);
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        config.node.name = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = AppConfig::default();
        config.channels.app_event_buffer_size = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.simulation.shout_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_a_loading_error() {
        let result = AppConfig::from_toml_str("[node\nname = 1");
        assert!(matches!(result, Err(ConfigError::Loading(_))));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("shoutscope-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[node]\nname = \"from-file\"\n").unwrap();

        let loaded = AppConfig::load_from_file(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.unwrap().node.name, "from-file");
        assert!(matches!(
            AppConfig::load_from_file(&path),
            Err(ConfigError::FileSystem(_))
        ));
    }

    #[test]
    fn test_example_config_parses_back() {
        let example = AppConfig::example_config();
        assert!(example.contains("[node]"));
        assert!(example.contains("[cli]"));

        let parsed = AppConfig::from_toml_str(&example).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }
}
