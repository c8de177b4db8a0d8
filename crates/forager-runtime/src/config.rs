//! Agent configuration loading and management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use forager_core::{DispatchParams, EncoderConfig};
use forager_utility::{SelectionConfig, SelectionConfigError};
use serde::{Deserialize, Serialize};

/// Main agent configuration, loaded from .forager/config.yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Config version
    pub version: Option<String>,

    /// Identity of the controlled creature
    pub agent: AgentIdentity,

    /// Loop pacing and termination
    pub cycle: CycleConfig,

    /// Feature encoding
    pub encoder: EncoderConfig,

    /// Action selection policy
    pub selection: SelectionConfig,

    /// Motor parameters for dispatched commands
    pub dispatch: DispatchParams,

    /// Cycle event log
    pub events: EventsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentIdentity {
    /// Identifier used for commands
    #[serde(default = "default_agent_id")]
    pub id: String,

    /// Name used to query the creature state
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Container queried for inventory each cycle; `None` disables the query
    #[serde(default = "default_inventory_container")]
    pub inventory_container: Option<String>,
}

impl Default for AgentIdentity {
    fn default() -> Self {
        Self {
            id: default_agent_id(),
            name: default_agent_name(),
            inventory_container: default_inventory_container(),
        }
    }
}

fn default_agent_id() -> String {
    "0".to_string()
}
fn default_agent_name() -> String {
    "Creature_0".to_string()
}
fn default_inventory_container() -> Option<String> {
    Some("0".to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Maximum number of cycles; negative runs forever
    #[serde(default = "default_max_cycles")]
    pub max_cycles: i64,

    /// Pause between cycles in milliseconds
    #[serde(default)]
    pub delay_ms: u64,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            max_cycles: default_max_cycles(),
            delay_ms: 0,
        }
    }
}

fn default_max_cycles() -> i64 {
    -1
}

impl CycleConfig {
    pub fn max_cycles(&self) -> Option<u64> {
        u64::try_from(self.max_cycles).ok()
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// JSON-lines file (relative to project root)
    #[serde(default = "default_events_path")]
    pub path: PathBuf,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_events_path(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_events_path() -> PathBuf {
    PathBuf::from(".forager/events.jsonl")
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("agent id must not be empty")]
    EmptyAgentId,
    #[error("agent name must not be empty")]
    EmptyAgentName,
    #[error("proximity threshold must be positive, got {0}")]
    InvalidProximity(f64),
    #[error(transparent)]
    Selection(#[from] SelectionConfigError),
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            version: None,
            agent: AgentIdentity::default(),
            cycle: CycleConfig::default(),
            encoder: EncoderConfig::default(),
            selection: SelectionConfig::default(),
            dispatch: DispatchParams::default(),
            events: EventsConfig::default(),
        }
    }
}

impl AgentConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Load from project root (looks for .forager/config.yaml)
    pub fn load_from_project(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(".forager/config.yaml");
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve paths relative to project root
    pub fn resolve_paths(&mut self, project_root: &Path) {
        self.events.path = project_root.join(&self.events.path);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent.id.is_empty() {
            return Err(ConfigError::EmptyAgentId);
        }
        if self.agent.name.is_empty() {
            return Err(ConfigError::EmptyAgentName);
        }
        if !(self.encoder.proximity_threshold > 0.0) {
            return Err(ConfigError::InvalidProximity(
                self.encoder.proximity_threshold,
            ));
        }
        self.selection.validate()?;
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config")
    }
}
