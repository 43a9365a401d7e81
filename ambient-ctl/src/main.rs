//! Ambient zone controller (ambient-ctl) - scenario replay entry point
//!
//! Loads the ambient configuration, builds a session on two virtual
//! channels, replays a scenario file against it and prints the final state.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use ambient_common::{AmbientEvent, AmbientSettings, EventBus};
use ambient_ctl::audio::VirtualChannel;
use ambient_ctl::scenario::{self, Scenario};
use ambient_ctl::{AmbientService, AmbientSession};
use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for ambient-ctl
#[derive(Parser, Debug)]
#[command(name = "ambient-ctl")]
#[command(about = "Ambient zone audio cross-fade controller")]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, env = "AMBIENT_CONFIG")]
    config: Option<PathBuf>,

    /// Scenario file with timed enter/exit/spawn events
    #[arg(short, long, env = "AMBIENT_SCENARIO")]
    scenario: Option<PathBuf>,

    /// Replay through the service on the wall clock instead of simulating
    #[arg(long)]
    realtime: bool,

    /// Print controller events as JSON lines on stdout
    #[arg(long)]
    json: bool,

    /// Seed for random clip selection (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings =
        AmbientSettings::load_or_default(args.config.as_deref()).context("Failed to load configuration")?;
    if args.seed.is_some() {
        settings.random_seed = args.seed;
    }

    init_tracing(&settings)?;
    info!("Starting ambient-ctl");
    info!(
        "{} outside clip(s), {} inside clip(s), {:?} order",
        settings.outside_clips.len(),
        settings.inside_clips.len(),
        settings.play_order
    );

    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path).with_context(|| format!("Failed to load scenario {:?}", path))?,
        None => {
            warn!("No scenario given, running the intro and outside ambience only");
            Scenario::default()
        }
    };

    let bus = EventBus::new(1024);
    let printer = args.json.then(|| tokio::spawn(print_events(bus.subscribe())));

    let session = AmbientSession::new(&settings, VirtualChannel::new("A"), VirtualChannel::new("B"))
        .context("Failed to create ambient session")?
        .with_event_bus(bus.clone());

    let session = if args.realtime {
        info!("Replaying {} event(s) in real time", scenario.events.len());
        let (handle, task) = AmbientService::spawn(session);
        scenario::replay_realtime(&handle, &scenario)
            .await
            .context("Scenario replay failed")?;
        handle.shutdown().context("Failed to stop ambient service")?;
        task.await.context("Ambient service task failed")?
    } else {
        info!("Simulating {} event(s)", scenario.events.len());
        let mut session = session;
        session.start();
        scenario::replay_simulated(&mut session, &scenario);
        session
    };

    // Closing the bus ends the printer once it has drained
    drop(bus);
    let snapshot = session.snapshot();
    drop(session);
    if let Some(printer) = printer {
        printer.await.context("Event printer failed")?;
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")?
    );
    info!("Done at t={:.3}s", snapshot.now);
    Ok(())
}

/// Set up the tracing subscriber
///
/// `RUST_LOG` wins over the configured level. With a log file configured,
/// output goes there without ANSI colors.
fn init_tracing(settings: &AmbientSettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ambient_ctl={0},ambient_common={0}", settings.logging.level)));

    match &settings.logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}

/// Print events as JSON lines until every sender is gone
async fn print_events(mut rx: broadcast::Receiver<AmbientEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(line) => println!("{}", line),
                Err(e) => warn!("Failed to serialize {} event: {}", event.event_type(), e),
            },
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Event printer lagged, {} event(s) skipped", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
