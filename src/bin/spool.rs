//! spool CLI: inspect trigger definitions and replay recorded events.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use trigger_spool::collab::Collaborators;
use trigger_spool::collab::logging::{LoggingBroadcaster, LoggingChat, LoggingOverlay};
use trigger_spool::config::{Config, InMemoryStore, TriggerRegistry};
use trigger_spool::engine::Engine;
use trigger_spool::event::Event;
use trigger_spool::telemetry::{TelemetryConfig, init_telemetry};

#[derive(Parser)]
#[command(name = "spool", about = "Stream event trigger engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List configured triggers
    Triggers {
        /// Directory containing trigger TOML files (defaults to SPOOL_TRIGGERS_DIR)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Replay JSON-lines events through the engine with logging collaborators
    Replay {
        /// File with one event per line
        events: PathBuf,
        /// Directory containing trigger TOML files (defaults to SPOOL_TRIGGERS_DIR)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Run each event as a preview: no queue, no gating, no emergency mode
        #[arg(long)]
        preview: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Triggers { dir } => cmd_triggers(dir),
        Command::Replay {
            events,
            dir,
            preview,
        } => cmd_replay(events, dir, preview).await,
    }
}

fn cmd_triggers(dir: Option<PathBuf>) -> anyhow::Result<()> {
    let config = Config::from_env_with_triggers_dir(dir)?;
    let registry = TriggerRegistry::load_from_dir(&config.triggers_dir)?;

    if registry.is_empty() {
        println!("No triggers in {}.", config.triggers_dir.display());
        return Ok(());
    }

    println!("{:<40}  {:<8}  {:<7}  COOLDOWN", "KEY", "ENABLED", "ACTIONS");
    println!("{}", "-".repeat(72));
    for trigger in registry.definitions() {
        let cooldown = trigger
            .cooldown
            .map(|c| format!("{}s / {}s user", c.global, c.user))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<40}  {:<8}  {:<7}  {}",
            trigger.key.to_string(),
            trigger.enabled,
            trigger.actions.len(),
            cooldown
        );
    }

    println!("\n{} trigger(s)", registry.len());
    Ok(())
}

async fn cmd_replay(events: PathBuf, dir: Option<PathBuf>, preview: bool) -> anyhow::Result<()> {
    let config = Config::from_env_with_triggers_dir(dir)?;

    let _guard = init_telemetry(TelemetryConfig::new(
        config.otel_endpoint.clone(),
        config.log_level.clone(),
    ))?;

    let registry = TriggerRegistry::load_from_dir(&config.triggers_dir)?;
    tracing::info!(triggers = registry.len(), "triggers loaded");

    let engine = Engine::new(
        Arc::new(InMemoryStore::new(registry)),
        Collaborators::new(
            Arc::new(LoggingOverlay),
            Arc::new(LoggingChat),
            Arc::new(LoggingBroadcaster),
        ),
        config.engine(),
    );

    let file = std::fs::File::open(&events)
        .map_err(|e| anyhow::anyhow!("cannot open {}: {e}", events.display()))?;

    let mut count = 0usize;
    for (index, line) in std::io::BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event: Event = serde_json::from_str(&line)
            .map_err(|e| anyhow::anyhow!("{}:{}: bad event: {e}", events.display(), index + 1))?;
        count += 1;

        if preview {
            let outcome = engine.preview(event).await;
            println!("line {}: {outcome}", index + 1);
        } else {
            engine.submit(event);
        }
    }

    engine.wait_idle().await;
    println!("Replayed {count} event(s).");
    Ok(())
}
