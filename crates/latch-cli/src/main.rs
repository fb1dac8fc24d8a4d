// ============================================================================
// latch: offline RFID door controller
// ============================================================================
// Usage:
//   latch --port /dev/ttyUSB0               Read a serial RFID reader
//   latch --input capture.bin               Replay a captured byte stream
//   latch                                   Read frames from stdin
//   latch --config tags.json --unlock-ms 5000
//
// The diagnostic transcript goes to stdout; tracing output goes to stderr
// and is filtered with RUST_LOG (default: info).
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use latch_controller::{AccessController, ActuationDriver, AuthorizationTable, DiagnosticLog};
use latch_core::ControllerConfig;
use latch_core::constants::DEFAULT_BAUD_RATE;
use latch_hardware::devices::{AnyByteSource, AnyOutputPin};
use latch_hardware::{LogPin, SerialConfig, SerialSource};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Offline RFID access controller for a single door
#[derive(Parser, Debug)]
#[command(name = "latch", version, about = "Offline RFID access controller")]
struct Cli {
    /// Serial device the reader is attached to
    #[arg(long, conflicts_with = "input")]
    port: Option<String>,

    /// Serial baud rate
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE, requires = "port")]
    baud: u32,

    /// Read reader bytes from a file instead ("-" for stdin)
    #[arg(long)]
    input: Option<PathBuf>,

    /// JSON file replacing the built-in authorization table
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override how long the lock stays released, in milliseconds
    #[arg(long)]
    unlock_ms: Option<u64>,
}

impl Cli {
    fn controller_config(&self) -> Result<ControllerConfig> {
        let mut config = match &self.config {
            Some(path) => ControllerConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => ControllerConfig::default(),
        };

        if let Some(ms) = self.unlock_ms {
            config = config.with_unlock_duration(Duration::from_millis(ms));
            config.validate().context("Invalid --unlock-ms")?;
        }

        Ok(config)
    }

    async fn byte_source(&self) -> Result<AnyByteSource> {
        if let Some(port) = &self.port {
            let serial = SerialConfig::new(port).with_baud_rate(self.baud);
            let source = SerialSource::open(&serial)
                .with_context(|| format!("Failed to open serial port {port}"))?;
            info!("Reading from {} at {} baud", port, self.baud);
            return Ok(AnyByteSource::Serial(source));
        }

        match &self.input {
            Some(path) if path.as_os_str() != "-" => {
                let file = tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("Failed to open {}", path.display()))?;
                info!("Reading from {}", path.display());
                Ok(AnyByteSource::stream(file))
            }
            _ => {
                info!("Reading from stdin");
                Ok(AnyByteSource::stream(tokio::io::stdin()))
            }
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = cli.controller_config()?;
    let table = AuthorizationTable::from_config(&config);
    let source = cli.byte_source().await?;

    let actuator = ActuationDriver::new(
        AnyOutputPin::Log(LogPin::new("lock")),
        AnyOutputPin::Log(LogPin::new("status")),
        config.unlock_duration(),
    );
    let log = DiagnosticLog::new(std::io::stdout());

    let mut controller = AccessController::new(&table, source, actuator, log);
    controller.run().await.context("Controller stopped")?;

    Ok(())
}
