//! Observability - cycle events and the JSON-lines event log.

use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use forager_core::{ActionId, Command, Inventory, SensorDimension};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why a tick produced no decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Disconnected,
    NoSnapshot,
    GatewayError,
    MalformedSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    CycleLimit,
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CycleEventKind {
    Started {
        max_cycles: Option<u64>,
    },
    Decided {
        active: Vec<SensorDimension>,
        target: Option<String>,
        eligible: Vec<ActionId>,
        action: Option<ActionId>,
        command: Option<Command>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        inventory: Option<Inventory>,
    },
    Skipped {
        reason: SkipReason,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
    DispatchFailed {
        action: ActionId,
        error: String,
    },
    Stopped {
        reason: StopReason,
        cycles: u64,
        agent_destroyed: bool,
    },
}

/// One observable step of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleEvent {
    pub timestamp: DateTime<Utc>,
    pub run_id: Uuid,
    pub cycle: u64,
    #[serde(flatten)]
    pub kind: CycleEventKind,
}

impl CycleEvent {
    pub fn new(run_id: Uuid, cycle: u64, kind: CycleEventKind) -> Self {
        Self {
            timestamp: Utc::now(),
            run_id,
            cycle,
            kind,
        }
    }

    /// Chosen action with a command actually sent to the world.
    pub fn dispatched(&self) -> Option<(ActionId, &Command)> {
        match &self.kind {
            CycleEventKind::Decided {
                action: Some(action),
                command: Some(command),
                ..
            } => Some((*action, command)),
            _ => None,
        }
    }

    pub fn summary(&self) -> String {
        match &self.kind {
            CycleEventKind::Started { max_cycles } => match max_cycles {
                Some(max) => format!("started (max {} cycles)", max),
                None => "started".to_string(),
            },
            CycleEventKind::Decided {
                action, command, target, ..
            } => match (action, command) {
                (Some(a), Some(c)) => format!(
                    "{} -> {}{}",
                    a,
                    c.name(),
                    target
                        .as_ref()
                        .map(|t| format!(" ({})", t))
                        .unwrap_or_default()
                ),
                (Some(a), None) => format!("{} without target", a),
                (None, _) => "no action".to_string(),
            },
            CycleEventKind::Skipped { reason, detail } => match detail {
                Some(d) => format!("skipped: {:?} ({})", reason, d),
                None => format!("skipped: {:?}", reason),
            },
            CycleEventKind::DispatchFailed { action, error } => {
                format!("dispatch of {} failed: {}", action, error)
            }
            CycleEventKind::Stopped {
                reason,
                cycles,
                agent_destroyed,
            } => format!(
                "stopped after {} cycles: {:?}{}",
                cycles,
                reason,
                if *agent_destroyed { ", agent destroyed" } else { "" }
            ),
        }
    }
}

/// Appends cycle events to a JSON-lines file.
pub struct EventEmitter {
    events_path: PathBuf,
}

impl EventEmitter {
    pub fn new(events_path: impl Into<PathBuf>) -> Self {
        Self {
            events_path: events_path.into(),
        }
    }

    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(".forager/events.jsonl"))
    }

    pub fn path(&self) -> &Path {
        &self.events_path
    }

    /// Emit an event.
    pub fn emit(&self, event: &CycleEvent) -> Result<()> {
        if let Some(parent) = self.events_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.events_path)?;

        let line = serde_json::to_string(event)?;
        writeln!(file, "{}", line)?;

        Ok(())
    }

    /// Last `limit` events, oldest first. Unparseable lines are skipped.
    pub fn read_recent(&self, limit: usize) -> Vec<CycleEvent> {
        let file = match std::fs::File::open(&self.events_path) {
            Ok(f) => f,
            Err(_) => return Vec::new(),
        };

        if limit == 0 {
            return Vec::new();
        }
        let mut tail = VecDeque::with_capacity(limit.min(1024));
        for event in BufReader::new(file)
            .lines()
            .map_while(|line| line.ok())
            .filter_map(|line| serde_json::from_str::<CycleEvent>(&line).ok())
        {
            if tail.len() == limit {
                tail.pop_front();
            }
            tail.push_back(event);
        }

        tail.into()
    }
}
