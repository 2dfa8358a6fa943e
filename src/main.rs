//! GaganNav - Mission controller for autonomous drone flight
//!
//! Plans a collision-free route through a 2.5D obstacle field and flies
//! it: connects to the vehicle link, arms the vehicle, builds a
//! safety-margined occupancy grid from obstacle data, searches it with
//! A*, prunes the path to its turn points, and sequences takeoff,
//! waypoint following, landing, and disarming from live telemetry.
//!
//! Telemetry frames are decoded on a reader thread and handed to the
//! main thread over a bounded channel, so the state machine sees one
//! event at a time and never needs internal locking.

mod client;
mod colliders;
mod config;
mod error;
mod frame;
mod link;
mod mission;
mod planning;
mod wire;

use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use tracing::{error, info};

use client::VehicleClient;
use config::NavConfig;
use error::{GaganError, Result};
use mission::MissionController;
use wire::TelemetryEvent;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gagan_nav=info".parse().unwrap()),
        )
        .init();

    let config = load_config()?;

    info!("GaganNav v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Connecting to {}:{}",
        config.connection.host, config.connection.port
    );
    info!(
        "Flight altitude {:.1}m, safety distance {:.1}m",
        config.planning.target_altitude, config.planning.safety_distance
    );

    let client = VehicleClient::connect_timeout(
        &config.address(),
        Duration::from_millis(config.connection.timeout_ms),
    )?;
    let mut reader = client.telemetry_reader()?;

    // Reader thread decodes frames; the bounded channel keeps dispatch
    // serialized on this thread
    let (event_tx, event_rx) = mpsc::sync_channel::<TelemetryEvent>(64);
    // The handle is not joined: the reader blocks on the socket and only
    // exits when the connection closes
    let _reader_handle = std::thread::Builder::new()
        .name("telemetry".into())
        .spawn(move || {
            loop {
                match reader.read_event() {
                    Ok(event) => {
                        if event_tx.send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        error!("Telemetry reader stopped: {}", e);
                        break;
                    }
                }
            }
        })
        .map_err(|e| GaganError::Config(format!("Failed to spawn telemetry thread: {}", e)))?;

    let mut controller = MissionController::new(client, config);

    info!("Starting mission");
    while controller.in_mission() {
        match event_rx.recv() {
            Ok(event) => controller.handle_event(event)?,
            Err(_) => {
                error!("Vehicle link closed before mission completed");
                break;
            }
        }
    }

    // Dropping the receiver makes the reader exit on its next event
    drop(event_rx);

    info!("Mission complete in state {}", controller.state());
    Ok(())
}

/// Load configuration from an optional positional TOML path, with
/// `--host` and `--port` overrides.
fn load_config() -> Result<NavConfig> {
    let args: Vec<String> = std::env::args().collect();

    let mut config = if args.len() > 1 && !args[1].starts_with("--") {
        let config_path = Path::new(&args[1]);
        info!("Loading configuration from {:?}", config_path);
        NavConfig::load(config_path)?
    } else if Path::new("gagan.toml").exists() {
        info!("Loading configuration from gagan.toml");
        NavConfig::load(Path::new("gagan.toml"))?
    } else {
        NavConfig::default()
    };

    if let Some(host) = flag_value(&args, "--host") {
        config.connection.host = host;
    }
    if let Some(port) = flag_value(&args, "--port") {
        config.connection.port = port
            .parse()
            .map_err(|e| GaganError::Config(format!("Invalid --port value {:?}: {}", port, e)))?;
    }

    Ok(config)
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
