//! Cycle controller - drives the perceive/decide/act loop on a dedicated task.
//!
//! Only the loop task writes the published `CycleStatus`. `run()` and `abort()` are safe to call
//! from any thread; they spawn the task or raise flags that the loop reads at tick boundaries.
//! An in-flight gateway call is never interrupted.

mod decider;
mod state;

pub use decider::{Decider, Decision};
pub use state::{CycleState, CycleStatus, Phase};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use forager_core::{CycleContext, DispatchParams, SensorDimension};
use tokio::sync::{broadcast, watch, Notify};
use uuid::Uuid;

use crate::config::{AgentConfig, ConfigError};
use crate::gateway::{self, WorldGateway};
use crate::observability::{CycleEvent, CycleEventKind, SkipReason, StopReason};

const EVENT_CAPACITY: usize = 1024;

/// Minimum pause after a skipped tick.
const IDLE_BACKOFF: Duration = Duration::from_millis(10);

/// Loop parameters resolved from `AgentConfig`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopSettings {
    pub agent_id: String,
    pub agent_name: String,
    pub inventory_container: Option<String>,
    /// `None` runs until aborted.
    pub max_cycles: Option<u64>,
    pub delay: Duration,
    pub dispatch: DispatchParams,
    pub seed: u64,
}

impl LoopSettings {
    pub fn from_config(config: &AgentConfig) -> Self {
        Self {
            agent_id: config.agent.id.clone(),
            agent_name: config.agent.name.clone(),
            inventory_container: config.agent.inventory_container.clone(),
            max_cycles: config.cycle.max_cycles(),
            delay: config.cycle.delay(),
            dispatch: config.dispatch,
            seed: config.selection.seed,
        }
    }
}

/// Lifecycle bookkeeping shared by the handle and the loop task.
#[derive(Debug, Default)]
struct Control {
    /// Incremented by every `run()` that starts a loop.
    generation: u64,
    /// Set by `run()`, cleared by the loop together with publishing `Stopped`.
    running: bool,
    /// The loop has left its tick loop; abort requests are no longer accepted.
    closing: bool,
    destroy: bool,
}

struct Shared {
    gateway: Arc<dyn WorldGateway>,
    decider: Decider,
    settings: LoopSettings,
    control: Mutex<Control>,
    abort: AtomicBool,
    wake: Notify,
    status: watch::Sender<CycleStatus>,
    events: broadcast::Sender<CycleEvent>,
}

pub struct CycleController {
    shared: Arc<Shared>,
}

impl CycleController {
    pub fn new(gateway: Arc<dyn WorldGateway>, config: &AgentConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_decider(
            gateway,
            Decider::from_config(config),
            LoopSettings::from_config(config),
        ))
    }

    pub fn with_decider(
        gateway: Arc<dyn WorldGateway>,
        decider: Decider,
        settings: LoopSettings,
    ) -> Self {
        let (status, _) = watch::channel(CycleStatus::default());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                gateway,
                decider,
                settings,
                control: Mutex::new(Control::default()),
                abort: AtomicBool::new(false),
                wake: Notify::new(),
                status,
                events,
            }),
        }
    }

    /// Start the loop on a new tokio task. No-op (returns `false`) while a loop is live.
    ///
    /// Must be called from within a tokio runtime. A stopped controller starts a fresh run with
    /// the cycle count reset.
    pub fn run(&self) -> bool {
        let mut control = self.shared.control();
        if control.running {
            tracing::debug!("Cycle loop already running");
            return false;
        }

        control.running = true;
        control.closing = false;
        control.destroy = false;
        control.generation += 1;
        self.shared.abort.store(false, Ordering::SeqCst);

        tokio::spawn(run_loop(Arc::clone(&self.shared), control.generation));
        true
    }

    /// Ask the loop to stop at the next tick boundary.
    ///
    /// Returns `false` when no loop is live or the loop is already shutting down. With
    /// `destroy_agent`, an accepted request makes the loop release the agent once, after stopping.
    pub fn abort(&self, destroy_agent: bool) -> bool {
        let mut control = self.shared.control();
        if !control.running || control.closing {
            tracing::debug!("Abort requested while not running");
            return false;
        }

        if destroy_agent {
            control.destroy = true;
        }
        self.shared.request_abort();
        true
    }

    pub fn is_running(&self) -> bool {
        self.shared.control().running
    }

    pub fn status(&self) -> CycleStatus {
        *self.shared.status.borrow()
    }

    pub fn state(&self) -> CycleState {
        let running = self.is_running();
        let status = self.status();
        let abort_requested = self.shared.abort.load(Ordering::SeqCst);
        let phase = if status.phase == Phase::Running && abort_requested {
            Phase::Aborting
        } else {
            status.phase
        };
        CycleState {
            phase,
            cycle: status.cycle,
            max_cycles: self.shared.settings.max_cycles,
            running,
            abort_requested,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CycleStatus> {
        self.shared.status.subscribe()
    }

    /// Stream of cycle events. Slow receivers lose the oldest events.
    pub fn events(&self) -> broadcast::Receiver<CycleEvent> {
        self.shared.events.subscribe()
    }

    /// Wait until the most recently started run has stopped.
    ///
    /// Returns immediately if `run()` was never called. Once this returns, `run()` starts a
    /// new loop.
    pub async fn wait_stopped(&self) -> CycleStatus {
        let generation = self.shared.control().generation;
        let mut rx = self.shared.status.subscribe();
        if generation == 0 {
            return *rx.borrow();
        }

        let result = rx
            .wait_for(|s| {
                s.generation > generation
                    || (s.generation == generation && s.phase == Phase::Stopped)
            })
            .await
            .map(|s| *s);
        result.unwrap_or_else(|_| *self.shared.status.borrow())
    }
}

impl Drop for CycleController {
    fn drop(&mut self) {
        self.shared.request_abort();
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn run_loop(shared: Arc<Shared>, generation: u64) {
    let run_id = Uuid::new_v4();
    let settings = &shared.settings;
    let mut cycle: u64 = 0;

    shared.publish(generation, Phase::Running, cycle);
    shared.emit(
        run_id,
        cycle,
        CycleEventKind::Started {
            max_cycles: settings.max_cycles,
        },
    );
    tracing::info!(
        run_id = %run_id,
        agent = %settings.agent_name,
        max_cycles = ?settings.max_cycles,
        "Cycle loop started"
    );

    let reason = loop {
        if shared.abort.load(Ordering::SeqCst) {
            break StopReason::Aborted;
        }
        if reached(settings.max_cycles, cycle) {
            break StopReason::CycleLimit;
        }

        let completed = shared.tick(run_id, cycle).await;
        if completed {
            cycle += 1;
            shared.publish(generation, Phase::Running, cycle);
            if reached(settings.max_cycles, cycle) {
                break StopReason::CycleLimit;
            }
        }

        shared.pace(!completed).await;
    };

    let destroy = {
        let mut control = shared.control();
        control.closing = true;
        std::mem::take(&mut control.destroy)
    };

    let mut agent_destroyed = false;
    if destroy {
        shared.publish(generation, Phase::Aborting, cycle);
        match shared.gateway.destroy_agent(&settings.agent_id).await {
            Ok(()) => agent_destroyed = true,
            Err(err) => tracing::warn!(error = %err, "Failed to destroy agent"),
        }
    }

    shared.emit(
        run_id,
        cycle,
        CycleEventKind::Stopped {
            reason,
            cycles: cycle,
            agent_destroyed,
        },
    );
    tracing::info!(
        run_id = %run_id,
        cycles = cycle,
        reason = ?reason,
        agent_destroyed,
        "Cycle loop stopped"
    );

    // `run()` takes the same lock, so it never sees `Stopped` with the loop still marked running.
    let mut control = shared.control();
    shared.abort.store(false, Ordering::SeqCst);
    shared.publish(generation, Phase::Stopped, cycle);
    control.running = false;
}

fn reached(max_cycles: Option<u64>, cycle: u64) -> bool {
    max_cycles.is_some_and(|max| cycle >= max)
}

impl Shared {
    fn control(&self) -> MutexGuard<'_, Control> {
        lock(&self.control)
    }

    fn request_abort(&self) {
        self.abort.store(true, Ordering::SeqCst);
        self.wake.notify_waiters();
    }

    fn publish(&self, generation: u64, phase: Phase, cycle: u64) {
        self.status.send_replace(CycleStatus {
            generation,
            phase,
            cycle,
        });
    }

    fn emit(&self, run_id: Uuid, cycle: u64, kind: CycleEventKind) {
        // No subscribers is fine.
        let _ = self.events.send(CycleEvent::new(run_id, cycle, kind));
    }

    fn skip(&self, run_id: Uuid, cycle: u64, reason: SkipReason, detail: Option<String>) -> bool {
        self.emit(run_id, cycle, CycleEventKind::Skipped { reason, detail });
        false
    }

    /// Pause between ticks. Skipped ticks wait at least `IDLE_BACKOFF`; an abort request cuts
    /// the wait short.
    async fn pace(&self, skipped: bool) {
        let delay = if skipped {
            self.settings.delay.max(IDLE_BACKOFF)
        } else {
            self.settings.delay
        };
        if delay.is_zero() {
            tokio::task::yield_now().await;
            return;
        }

        let notified = self.wake.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.abort.load(Ordering::SeqCst) {
            return;
        }
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = &mut notified => {}
        }
    }

    /// One perceive/decide/act pass. Returns `false` when the tick was skipped.
    async fn tick(&self, run_id: Uuid, cycle: u64) -> bool {
        let settings = &self.settings;

        if !self.gateway.is_connected() {
            tracing::debug!(cycle, "World service disconnected, skipping tick");
            return self.skip(run_id, cycle, SkipReason::Disconnected, None);
        }

        let snapshot = match self.gateway.creature_state(&settings.agent_name).await {
            Ok(Some(snapshot)) if !snapshot.is_empty() => snapshot,
            Ok(_) => {
                tracing::debug!(cycle, "No snapshot this tick");
                return self.skip(run_id, cycle, SkipReason::NoSnapshot, None);
            }
            Err(err) => {
                tracing::warn!(cycle, error = %err, "Snapshot query failed");
                return self.skip(run_id, cycle, SkipReason::GatewayError, Some(err.to_string()));
            }
        };

        let inventory = match &settings.inventory_container {
            Some(container) => match self.gateway.inventory(container).await {
                Ok(inventory) => Some(inventory),
                Err(err) => {
                    tracing::warn!(cycle, container = %container, error = %err, "Inventory query failed");
                    None
                }
            },
            None => None,
        };

        let ctx = CycleContext::new(cycle, settings.seed);
        let decision = match self.decider.decide(&snapshot, &ctx) {
            Ok(decision) => decision,
            Err(err) => {
                tracing::warn!(cycle, error = %err, "Malformed snapshot, skipping tick");
                return self.skip(
                    run_id,
                    cycle,
                    SkipReason::MalformedSnapshot,
                    Some(err.to_string()),
                );
            }
        };
        debug_assert_eq!(
            decision.perception.vector.iter().count(),
            SensorDimension::COUNT
        );

        let perception = &decision.perception;
        let action = decision.selection.as_ref().map(|s| s.action);
        let command = action.and_then(|a| a.command(perception.target.as_ref(), &settings.dispatch));
        let target = perception.target.as_ref().map(|t| t.name.clone());

        self.emit(
            run_id,
            cycle,
            CycleEventKind::Decided {
                active: perception.vector.active(),
                target: target.clone(),
                eligible: decision
                    .selection
                    .as_ref()
                    .map(|s| s.eligible.clone())
                    .unwrap_or_default(),
                action,
                command: command.clone(),
                inventory,
            },
        );

        match (action, command) {
            (Some(action), Some(command)) => {
                tracing::debug!(
                    cycle,
                    action = %action,
                    command = command.name(),
                    target = ?target,
                    "Dispatching action"
                );
                let sent =
                    gateway::dispatch(self.gateway.as_ref(), &settings.agent_id, &command).await;
                if let Err(err) = sent {
                    tracing::warn!(cycle, action = %action, error = %err, "Dispatch failed");
                    self.emit(
                        run_id,
                        cycle,
                        CycleEventKind::DispatchFailed {
                            action,
                            error: err.to_string(),
                        },
                    );
                }
            }
            (Some(action), None) => {
                tracing::debug!(cycle, action = %action, "No target for action, nothing dispatched");
            }
            (None, _) => {
                tracing::debug!(cycle, "No eligible action");
            }
        }

        true
    }
}
