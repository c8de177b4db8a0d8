//! In-process gateway that replays recorded snapshots.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use async_trait::async_trait;
use forager_core::{Command, Inventory, WorldSnapshot};
use serde::{Deserialize, Serialize};

use super::{GatewayError, WorldGateway};

/// Snapshot script, loadable from YAML.
///
/// A `null` frame is replayed as "no data this tick".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub looping: bool,
    #[serde(default)]
    pub inventory: Inventory,
    pub frames: Vec<Option<WorldSnapshot>>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario from {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse scenario from {}", path.display()))
    }
}

/// A call observed by the scripted gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Command { agent_id: String, command: Command },
    DestroyAgent { agent_id: String },
}

#[derive(Debug, Default)]
struct Script {
    frames: Vec<Option<WorldSnapshot>>,
    cursor: usize,
    looping: bool,
}

impl Script {
    fn next(&mut self) -> Option<WorldSnapshot> {
        if self.frames.is_empty() {
            return None;
        }
        if self.cursor >= self.frames.len() {
            if !self.looping {
                return None;
            }
            self.cursor = 0;
        }
        let frame = self.frames[self.cursor].clone();
        self.cursor += 1;
        frame
    }
}

#[derive(Debug)]
pub struct ScriptedGateway {
    script: Mutex<Script>,
    inventory: Mutex<Inventory>,
    connected: AtomicBool,
    calls: Mutex<Vec<RecordedCall>>,
    queries: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    pub fn new(frames: Vec<Option<WorldSnapshot>>, looping: bool) -> Self {
        Self {
            script: Mutex::new(Script {
                frames,
                cursor: 0,
                looping,
            }),
            inventory: Mutex::new(Inventory::default()),
            connected: AtomicBool::new(true),
            calls: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Replay the same snapshot forever.
    pub fn repeating(snapshot: WorldSnapshot) -> Self {
        Self::new(vec![Some(snapshot)], true)
    }

    pub fn from_scenario(scenario: Scenario) -> Self {
        let gateway = Self::new(scenario.frames, scenario.looping);
        *lock(&gateway.inventory) = scenario.inventory;
        gateway
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn commands(&self) -> Vec<Command> {
        lock(&self.calls)
            .iter()
            .filter_map(|c| match c {
                RecordedCall::Command { command, .. } => Some(command.clone()),
                RecordedCall::DestroyAgent { .. } => None,
            })
            .collect()
    }

    pub fn destroy_count(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| matches!(c, RecordedCall::DestroyAgent { .. }))
            .count()
    }

    /// Creature names queried so far.
    pub fn queries(&self) -> Vec<String> {
        lock(&self.queries).clone()
    }

    fn record(&self, agent_id: &str, command: Command) -> Result<(), GatewayError> {
        if !self.is_connected() {
            return Err(GatewayError::Disconnected);
        }
        lock(&self.calls).push(RecordedCall::Command {
            agent_id: agent_id.to_string(),
            command,
        });
        Ok(())
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl WorldGateway for ScriptedGateway {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn creature_state(&self, agent_name: &str) -> Result<Option<WorldSnapshot>, GatewayError> {
        if !self.is_connected() {
            return Err(GatewayError::Disconnected);
        }
        lock(&self.queries).push(agent_name.to_string());
        Ok(lock(&self.script).next())
    }

    async fn inventory(&self, _container_id: &str) -> Result<Inventory, GatewayError> {
        if !self.is_connected() {
            return Err(GatewayError::Disconnected);
        }
        Ok(lock(&self.inventory).clone())
    }

    async fn set_heading(
        &self,
        agent_id: &str,
        right_wheel: f64,
        left_wheel: f64,
        speed: f64,
    ) -> Result<(), GatewayError> {
        self.record(
            agent_id,
            Command::SetHeading {
                right_wheel,
                left_wheel,
                speed,
            },
        )
    }

    async fn set_destination(
        &self,
        agent_id: &str,
        right_wheel: f64,
        left_wheel: f64,
        x: f64,
        y: f64,
    ) -> Result<(), GatewayError> {
        self.record(
            agent_id,
            Command::SetDestination {
                right_wheel,
                left_wheel,
                x,
                y,
            },
        )
    }

    async fn pick_up(&self, agent_id: &str, object: &str) -> Result<(), GatewayError> {
        self.record(
            agent_id,
            Command::PickUp {
                object: object.to_string(),
            },
        )
    }

    async fn consume(&self, agent_id: &str, object: &str) -> Result<(), GatewayError> {
        self.record(
            agent_id,
            Command::Consume {
                object: object.to_string(),
            },
        )
    }

    async fn conceal(&self, agent_id: &str, object: &str) -> Result<(), GatewayError> {
        self.record(
            agent_id,
            Command::Conceal {
                object: object.to_string(),
            },
        )
    }

    async fn halt(&self, agent_id: &str) -> Result<(), GatewayError> {
        self.record(agent_id, Command::Halt)
    }

    async fn destroy_agent(&self, agent_id: &str) -> Result<(), GatewayError> {
        lock(&self.calls).push(RecordedCall::DestroyAgent {
            agent_id: agent_id.to_string(),
        });
        Ok(())
    }
}
