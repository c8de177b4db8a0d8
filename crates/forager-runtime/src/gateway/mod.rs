//! Gateway - the world service seen from the agent.

mod scripted;

use async_trait::async_trait;
use forager_core::{Command, Inventory, WorldSnapshot};

pub use scripted::{RecordedCall, Scenario, ScriptedGateway};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("world service is not connected")]
    Disconnected,
    #[error("world service rejected {command}: {reason}")]
    Rejected {
        command: &'static str,
        reason: String,
    },
    #[error("transport error: {0}")]
    Transport(String),
}

/// Client side of the world service.
///
/// Deadlines and retries for individual calls are the implementation's business; the cycle
/// controller awaits each call to completion.
#[async_trait]
pub trait WorldGateway: Send + Sync {
    fn is_connected(&self) -> bool;

    /// Current view of the named creature. `Ok(None)` means no data this tick.
    async fn creature_state(&self, agent_name: &str) -> Result<Option<WorldSnapshot>, GatewayError>;

    async fn inventory(&self, container_id: &str) -> Result<Inventory, GatewayError>;

    async fn set_heading(
        &self,
        agent_id: &str,
        right_wheel: f64,
        left_wheel: f64,
        speed: f64,
    ) -> Result<(), GatewayError>;

    async fn set_destination(
        &self,
        agent_id: &str,
        right_wheel: f64,
        left_wheel: f64,
        x: f64,
        y: f64,
    ) -> Result<(), GatewayError>;

    async fn pick_up(&self, agent_id: &str, object: &str) -> Result<(), GatewayError>;

    async fn consume(&self, agent_id: &str, object: &str) -> Result<(), GatewayError>;

    async fn conceal(&self, agent_id: &str, object: &str) -> Result<(), GatewayError>;

    async fn halt(&self, agent_id: &str) -> Result<(), GatewayError>;

    /// Release the agent's identity with the world service.
    async fn destroy_agent(&self, agent_id: &str) -> Result<(), GatewayError>;
}

/// Route a command to the matching gateway call.
pub async fn dispatch(
    gateway: &dyn WorldGateway,
    agent_id: &str,
    command: &Command,
) -> Result<(), GatewayError> {
    match command {
        Command::SetHeading {
            right_wheel,
            left_wheel,
            speed,
        } => {
            gateway
                .set_heading(agent_id, *right_wheel, *left_wheel, *speed)
                .await
        }
        Command::SetDestination {
            right_wheel,
            left_wheel,
            x,
            y,
        } => {
            gateway
                .set_destination(agent_id, *right_wheel, *left_wheel, *x, *y)
                .await
        }
        Command::PickUp { object } => gateway.pick_up(agent_id, object).await,
        Command::Consume { object } => gateway.consume(agent_id, object).await,
        Command::Conceal { object } => gateway.conceal(agent_id, object).await,
        Command::Halt => gateway.halt(agent_id).await,
    }
}
