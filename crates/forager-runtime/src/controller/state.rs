//! Lifecycle state published by the cycle loop.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Running,
    /// Abort observed; the loop is releasing the agent before stopping.
    Aborting,
    Stopped,
}

/// Snapshot of the loop's state. Written only by the loop task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleStatus {
    /// Incremented on every `run()` that starts a loop.
    pub generation: u64,
    pub phase: Phase,
    /// Completed cycles in the current run.
    pub cycle: u64,
}

/// Caller-facing view combining the published status with pending requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleState {
    pub phase: Phase,
    pub cycle: u64,
    pub max_cycles: Option<u64>,
    pub running: bool,
    pub abort_requested: bool,
}
