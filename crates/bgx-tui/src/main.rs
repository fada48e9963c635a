//! BGX device-detail TUI entry point.

use std::{fs::File, io, path::PathBuf, sync::Mutex};

use bgx_app::{App, EventChannel, Runtime, ScreenConfig};
use bgx_core::PartId;
use bgx_harness::PeripheralConfig;
use bgx_tui::{TerminalDriver, spawn_peripheral};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{
    EnvFilter, fmt, fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// BGX device details
#[derive(Parser, Debug)]
#[command(name = "bgx-tui")]
#[command(about = "Device-detail screen for a BGX serial bridge")]
#[command(version)]
struct Args {
    /// Advertised device name shown as the title
    #[arg(short = 'n', long)]
    device_name: Option<String>,

    /// Module part reported by the emulated device
    #[arg(short, long, value_enum, default_value_t = Part::Bgx13p)]
    part: Part,

    /// Device UUID reported by the emulated device
    #[arg(short = 'u', long, default_value = "0d8a3f5e-6c1b-4a2e-9f7d-5b3c8e1a2f40")]
    device_uuid: String,

    /// Make the emulated device refuse bus mode changes
    #[arg(long)]
    reject_mode_changes: bool,

    /// Log level (overridden by RUST_LOG)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Write logs to this file. Without it, logs are discarded.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Module part as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Part {
    Invalid,
    Bgx13s,
    Bgx13p,
    Bgxv3s,
    Bgxv3p,
}

impl From<Part> for PartId {
    fn from(part: Part) -> Self {
        match part {
            Part::Invalid => PartId::Invalid,
            Part::Bgx13s => PartId::Bgx13S,
            Part::Bgx13p => PartId::Bgx13P,
            Part::Bgxv3s => PartId::BgxV3S,
            Part::Bgxv3p => PartId::BgxV3P,
        }
    }
}

/// The terminal belongs to the UI, so logs go to a file or nowhere.
fn init_tracing(args: &Args) -> io::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let writer = match &args.log_file {
        Some(path) => BoxMakeWriter::new(Mutex::new(File::create(path)?)),
        None => BoxMakeWriter::new(io::sink),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(&args)?;

    let screen = ScreenConfig { device_name: args.device_name, ..Default::default() };
    let peripheral = PeripheralConfig {
        device_uuid: args.device_uuid,
        part_id: args.part.into(),
        accept_mode_changes: !args.reject_mode_changes,
        ..Default::default()
    };

    tracing::info!(?peripheral, "BGX device details starting");

    let channel = EventChannel::new(screen.event_capacity);
    let subscription = channel.subscribe();
    let peripheral = spawn_peripheral(peripheral, channel.publisher());

    let driver = TerminalDriver::new(peripheral)?;
    let runtime = Runtime::new(driver, App::new(screen.device_name), subscription);

    Ok(runtime.run().await?)
}
