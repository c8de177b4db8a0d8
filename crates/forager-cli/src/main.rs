//! Forager CLI - drive the perceive/decide/act cycle.
//!
//! Single binary that provides:
//! - `forager run` - run the cycle loop against a recorded scenario
//! - `forager init` - write a default config and sample scenario
//! - `forager events` - show recent cycle events

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use forager_core::{Category, Inventory, Leaflet, Thing, WorldSnapshot};
use forager_runtime::{
    AgentConfig, CycleController, CycleEvent, EventEmitter, Scenario, ScriptedGateway,
    WorldGateway,
};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "forager")]
#[command(about = "Rule-driven foraging agent", version)]
struct Cli {
    /// Project root directory
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the cycle loop
    Run {
        /// Scenario file to replay (defaults to .forager/scenario.yaml)
        #[arg(long)]
        scenario: Option<PathBuf>,

        /// Stop after this many cycles; negative runs until interrupted
        #[arg(long, allow_hyphen_values = true)]
        max_cycles: Option<i64>,

        /// Pause between cycles in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Run a single cycle and exit
        #[arg(long)]
        once: bool,
    },

    /// Initialize a new project
    Init,

    /// Show recent cycle events
    Events {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let project_root = match cli.project {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match cli.command {
        Some(Commands::Run {
            scenario,
            max_cycles,
            delay_ms,
            once,
        }) => {
            let max_cycles = if once { Some(1) } else { max_cycles };
            run_agent(&project_root, scenario, max_cycles, delay_ms).await
        }
        Some(Commands::Init) => init_project(&project_root),
        Some(Commands::Events { limit }) => show_events(&project_root, limit),
        None => {
            println!("Forager - rule-driven foraging agent");
            println!();
            println!("Usage: forager <COMMAND>");
            println!();
            println!("Commands:");
            println!("  run     Run the cycle loop");
            println!("  init    Initialize a new project");
            println!("  events  Show recent cycle events");
            println!();
            println!("Run 'forager --help' for more information.");
            Ok(())
        }
    }
}

async fn run_agent(
    project_root: &Path,
    scenario: Option<PathBuf>,
    max_cycles: Option<i64>,
    delay_ms: Option<u64>,
) -> Result<()> {
    let mut config = AgentConfig::load_from_project(project_root)?;
    config.resolve_paths(project_root);
    if let Some(max) = max_cycles {
        config.cycle.max_cycles = max;
    }
    if let Some(delay) = delay_ms {
        config.cycle.delay_ms = delay;
    }

    let scenario_path = scenario.unwrap_or_else(|| project_root.join(".forager/scenario.yaml"));
    let scenario = Scenario::load(&scenario_path)
        .context("No scenario to replay; run 'forager init' or pass --scenario")?;
    tracing::info!(
        project = %project_root.display(),
        scenario = %scenario_path.display(),
        frames = scenario.frames.len(),
        "Starting agent"
    );

    let gateway: Arc<dyn WorldGateway> = Arc::new(ScriptedGateway::from_scenario(scenario));
    let controller = CycleController::new(gateway, &config)?;

    let emitter = config
        .events
        .enabled
        .then(|| EventEmitter::new(config.events.path.clone()));
    let recorder = spawn_recorder(controller.events(), emitter);

    controller.run();
    let status = tokio::select! {
        status = controller.wait_stopped() => status,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, stopping agent");
            controller.abort(false);
            controller.wait_stopped().await
        }
    };

    // Closes the event stream once the loop task has released it.
    drop(controller);
    if let Err(err) = recorder.await {
        tracing::warn!(error = %err, "Event recorder failed");
    }

    tracing::info!(cycles = status.cycle, "Agent stopped");
    Ok(())
}

/// Log every event and append it to the event log.
fn spawn_recorder(
    mut rx: broadcast::Receiver<CycleEvent>,
    emitter: Option<EventEmitter>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    tracing::info!(cycle = event.cycle, "{}", event.summary());
                    if let Some(emitter) = &emitter {
                        if let Err(err) = emitter.emit(&event) {
                            tracing::warn!(error = %err, "Failed to write event");
                        }
                    }
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Event recorder fell behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

fn show_events(project_root: &Path, limit: usize) -> Result<()> {
    let mut config = AgentConfig::load_from_project(project_root)?;
    config.resolve_paths(project_root);

    let emitter = EventEmitter::new(config.events.path);
    let events = emitter.read_recent(limit);
    if events.is_empty() {
        println!("No events in {}", emitter.path().display());
        return Ok(());
    }

    for event in &events {
        let run = event.run_id.to_string();
        println!(
            "[{}] {} #{:<4} {}",
            event.timestamp.format("%H:%M:%S%.3f"),
            &run[..8],
            event.cycle,
            event.summary()
        );
    }

    Ok(())
}

fn init_project(project_root: &Path) -> Result<()> {
    let forager_dir = project_root.join(".forager");
    std::fs::create_dir_all(&forager_dir)?;

    let config_path = forager_dir.join("config.yaml");
    if !config_path.exists() {
        let config = AgentConfig {
            version: Some("1".to_string()),
            ..AgentConfig::default()
        };
        let content = format!("# Forager agent configuration\n\n{}", config.to_yaml()?);
        std::fs::write(&config_path, content)?;
    }

    let scenario_path = forager_dir.join("scenario.yaml");
    if !scenario_path.exists() {
        let content = serde_yaml::to_string(&sample_scenario())
            .context("Failed to serialize sample scenario")?;
        std::fs::write(&scenario_path, content)?;
    }

    println!("Initialized forager project at {}", project_root.display());
    println!();
    println!("Created:");
    println!("  .forager/config.yaml   - agent configuration");
    println!("  .forager/scenario.yaml - recorded world snapshots");
    println!();
    println!("Next steps:");
    println!("  1. Edit the scenario or point --scenario at a recording");
    println!("  2. Run: forager run --max-cycles 10");

    Ok(())
}

/// Nothing in view, then a wanted jewel far away, then the same jewel in reach.
fn sample_scenario() -> Scenario {
    let me = Thing::new("Creature_0", Category::Creature)
        .at(100.0, 100.0)
        .with_leaflet(
            Leaflet::new(1)
                .with_item("Red", 2, 0)
                .with_item("Green", 1, 0),
        );
    let jewel = |distance: f64| {
        Thing::new("Jewel_1", Category::Jewel)
            .at(100.0, 100.0 - distance)
            .with_color("Red")
            .with_distance(distance)
    };

    Scenario {
        looping: true,
        inventory: Inventory::default(),
        frames: vec![
            Some(WorldSnapshot::default().with(me.clone())),
            Some(WorldSnapshot::default().with(me.clone()).with(jewel(120.0))),
            Some(WorldSnapshot::default().with(me).with(jewel(20.0))),
        ],
    }
}
