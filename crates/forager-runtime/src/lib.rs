//! Forager Runtime - the agent's perceive/decide/act cycle
//!
//! This crate runs the cycle loop on a tokio task: it fetches a snapshot
//! of the creature's surroundings through a `WorldGateway`, encodes it,
//! selects an action from the standing rule table, dispatches the matching
//! command and reports every step as a `CycleEvent`.

pub mod config;
pub mod controller;
pub mod gateway;
pub mod observability;

pub use config::{AgentConfig, ConfigError};
pub use controller::{CycleController, CycleState, CycleStatus, Decider, Decision, LoopSettings, Phase};
pub use gateway::{GatewayError, RecordedCall, Scenario, ScriptedGateway, WorldGateway};
pub use observability::{CycleEvent, CycleEventKind, EventEmitter, SkipReason, StopReason};
