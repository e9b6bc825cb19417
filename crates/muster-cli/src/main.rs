use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use muster_core::{FirstMatch, Identifier, IdentityName, Ledger, Registry, TIMESTAMP_FORMAT};
use muster_hw::Camera;
use muster_verify::OnnxVerifier;

mod capture;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "muster", about = "Face-verified attendance tracking")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enroll a person: capture one frame and store it as their reference
    Register {
        /// Identity name (letters, digits, '-' and '_')
        name: String,
    },
    /// Capture one frame, identify it, and record attendance on a match
    #[command(alias = "verify")]
    Checkin,
    /// Show recorded attendance
    Log {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List available capture devices
    Devices,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Register { name } => register(&config, &name),
        Commands::Checkin => checkin(&config),
        Commands::Log { json } => show_log(&config, json),
        Commands::Devices => {
            devices();
            Ok(())
        }
    }
}

fn register(config: &Config, raw_name: &str) -> Result<()> {
    let name = IdentityName::parse(raw_name)?;

    let camera = Camera::open(&config.camera_device)?;
    println!("Position yourself in front of the camera.");
    let Some(frame) = capture::acquire(&camera)? else {
        println!("Registration cancelled.");
        return Ok(());
    };
    let reference = frame
        .to_image()
        .context("camera produced a malformed frame buffer")?;

    let registry = Registry::new(&config.faces_dir);
    let path = registry.add(&name, &reference)?;
    println!("Registered {name} ({}).", path.display());
    Ok(())
}

fn checkin(config: &Config) -> Result<()> {
    let registry = Registry::new(&config.faces_dir);
    let candidates = registry.list()?;
    if candidates.is_empty() {
        println!("No identities registered yet; run `muster register <name>` first.");
        return Ok(());
    }

    let camera = Camera::open(&config.camera_device)?;
    println!("Position yourself in front of the camera.");
    let Some(frame) = capture::acquire(&camera)? else {
        println!("Check-in cancelled.");
        return Ok(());
    };
    let probe = frame
        .to_image()
        .context("camera produced a malformed frame buffer")?;

    let mut verifier = OnnxVerifier::load(&config.model_path, config.match_threshold)?;

    match FirstMatch.identify(&mut verifier, &probe, &candidates) {
        Some(found) => {
            let now = chrono::Local::now().naive_local();
            let ledger = Ledger::new(&config.ledger_path);
            ledger.append(&found.name, now)?;
            println!(
                "{} checked in at {} (similarity {:.2}).",
                found.name,
                now.format(TIMESTAMP_FORMAT),
                found.similarity
            );
        }
        None => println!("Not recognized. Register first if you haven't."),
    }
    Ok(())
}

fn show_log(config: &Config, json: bool) -> Result<()> {
    let ledger = Ledger::new(&config.ledger_path);
    let events = ledger.read_all()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("No attendance recorded yet.");
        return Ok(());
    }

    let name_width = events
        .iter()
        .map(|e| e.name.len())
        .max()
        .unwrap_or(0)
        .max("Name".len());
    println!("{:<name_width$}  Timestamp", "Name");
    for event in &events {
        println!(
            "{:<name_width$}  {}",
            event.name,
            event.timestamp.format(TIMESTAMP_FORMAT)
        );
    }
    Ok(())
}

fn devices() {
    let found = Camera::list_devices();
    if found.is_empty() {
        println!("No capture devices found.");
        return;
    }
    for dev in found {
        println!("{}  {} ({})", dev.path, dev.name, dev.driver);
    }
}
