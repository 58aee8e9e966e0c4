use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info, LevelFilter};
use nearscan::ble;
use nearscan::config::Config;
use nearscan::distance::{distance_category, format_distance};
use nearscan::permissions::SystemGate;
use nearscan::scanner::{ScanEngine, ScanEvent};
use nearscan::tui;
use nearscan::window::{DeviceObservation, ObservationWindow};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "nearscan")]
#[command(version = "0.1.0")]
#[command(about = "Terminal scanner for nearby Wi-Fi networks and Bluetooth LE devices")]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Bluetooth adapter (overrides config)
    #[arg(short, long)]
    adapter: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start interactive TUI dashboard with live scanning
    Tui,

    /// Scan continuously, logging each sighting to the terminal
    Watch,

    /// List Bluetooth adapters on this host
    Adapters,

    /// Initialize configuration
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_secs()
        .init();

    // Handle init command before loading config
    if matches!(cli.command, Commands::Init) {
        return handle_init();
    }

    // Load configuration
    let mut config = if cli.config.exists() {
        Config::load(&cli.config).context("Failed to load config")?
    } else {
        info!("Config file not found, using defaults");
        Config::default()
    };

    // Override config with CLI args
    if let Some(adapter) = cli.adapter {
        config.scan.adapter = Some(adapter);
    }

    // Execute command
    match cli.command {
        Commands::Tui => tui::run_tui(config).await,
        Commands::Watch => handle_watch(config).await,
        Commands::Adapters => handle_adapters().await,
        Commands::Init => unreachable!(),
    }
}

async fn handle_adapters() -> Result<()> {
    println!("Scanning for Bluetooth adapters...\n");

    let adapters = ble::list_adapters().await?;

    if adapters.is_empty() {
        println!("No Bluetooth adapters found.");
        println!("\nMake sure a Bluetooth adapter is connected and powered on.");
        return Ok(());
    }

    for adapter in &adapters {
        println!("\x1b[32m[ADAPTER]\x1b[0m {}", adapter);
    }

    println!();
    println!("Start scanning with:");
    println!("  nearscan tui");
    println!("  nearscan watch");

    Ok(())
}

async fn handle_watch(config: Config) -> Result<()> {
    // Set up shared running flag for signal handling
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    // Set up Ctrl+C handler
    ctrlc::set_handler(move || {
        eprintln!("\nReceived Ctrl+C, stopping scan...");
        r.store(false, Ordering::SeqCst);
    })?;

    let (event_tx, mut event_rx) = mpsc::channel::<ScanEvent>(1000);

    let gate = SystemGate::probe().await;
    let mut engine = ScanEngine::new(config.clone(), gate, running.clone());
    let engine_handle = tokio::spawn(async move { engine.run(event_tx).await });

    let mut window = ObservationWindow::new(Duration::from_millis(config.scan.retention_ms));

    while let Some(event) = event_rx.recv().await {
        match event {
            ScanEvent::Advertisement(adv) => {
                let observation = DeviceObservation::from_advertisement(&adv, &config.distance);
                let visible = window.observe(observation.clone(), Instant::now());

                info!(
                    "Sighting: {} name={:?} {}dBm ~{} ({}) [{} visible]",
                    observation.address,
                    observation.name.as_deref().unwrap_or("?"),
                    observation.rssi_dbm,
                    format_distance(observation.distance_m),
                    distance_category(observation.distance_m),
                    visible.len()
                );
            }
            ScanEvent::WifiResults(networks) => {
                info!("Wi-Fi scan: {} networks visible", networks.len());
                for network in &networks {
                    let ssid = if network.ssid.is_empty() {
                        "<hidden>"
                    } else {
                        network.ssid.as_str()
                    };
                    info!("  {} ({}dBm)", ssid, network.signal_dbm);
                }
            }
            ScanEvent::ScanStarted => info!("Scan started"),
            ScanEvent::ScanStopped => info!("Scan stopped"),
            ScanEvent::PermissionDenied(denied) => {
                let denied: Vec<String> = denied.iter().map(|c| c.to_string()).collect();
                error!(
                    "Permissions required to scan networks (denied: {})",
                    denied.join(", ")
                );
                break;
            }
            ScanEvent::ScanFailed(code) => {
                error!("Bluetooth scan failed: {}", code);
                break;
            }
        }
    }

    // Make sure the engine releases the radio before exit
    running.store(false, Ordering::SeqCst);
    let _ = tokio::time::timeout(Duration::from_secs(2), engine_handle).await;

    info!("Exiting...");
    Ok(())
}

fn handle_init() -> Result<()> {
    info!("Initializing nearscan configuration...");

    let config = Config::default();
    config.save("config.json")?;
    info!("Created config.json");

    info!("Initialization complete!");
    info!("Edit config.json to customize settings.");
    info!("Run 'nearscan tui' to start scanning.");

    Ok(())
}
