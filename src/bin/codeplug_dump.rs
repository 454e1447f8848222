//! Codeplug download utility
//! Reads the full configuration memory from an AnyTone AT-D878UV and
//! saves it to a flat binary file

use anytone_rs::drivers::at878uv::At878Uv;
use anytone_rs::drivers::{get_driver, CloneModeRadio, Radio, Status};
use anytone_rs::formats::save_codeplug;
use anytone_rs::serial::{SerialConfig, SerialPort};
use std::env;
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter};

/// Report progress roughly every 256 blocks
const PROGRESS_STRIDE: usize = 255 * 256;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    let format_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(format_layer)
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <port> [output]", args[0]);
        eprintln!("Example: {} /dev/ttyACM0 codeplug.bin", args[0]);
        std::process::exit(1);
    }

    let port_name = &args[1];
    let output = args.get(2).map(String::as_str).unwrap_or("codeplug.bin");

    anytone_rs::drivers::init_drivers();

    let driver_info = get_driver("AnyTone", "AT-D878UV")
        .ok_or_else(|| anyhow::anyhow!("Driver not found for AnyTone AT-D878UV"))?;

    tracing::info!("Codeplug Download Utility");
    tracing::info!("Port: {}", port_name);
    tracing::info!("Radio: {}", driver_info.full_name());

    // Open serial port at the radio's native rate
    tracing::info!("Opening serial port...");
    let mut port = SerialPort::open(port_name, SerialConfig::default())?;
    port.clear_all()?;

    let mut radio = At878Uv::new();

    tracing::info!(
        "Downloading {} bytes from radio. This takes several minutes...",
        radio.codeplug_size()
    );

    let progress = |current: usize, total: usize, message: &str| {
        if current % PROGRESS_STRIDE < 255 || current == total {
            tracing::info!("{}", Status::new(current, total, message));
        }
    };

    let image = radio.download(&mut port, Some(Box::new(progress))).await?;

    save_codeplug(output, &image)?;
    tracing::info!("Saved codeplug to: {}", output);

    port.close()?;

    println!("\n=== Download Complete ===");
    println!("Codeplug: {} ({} bytes)", output, image.len());
    println!("\nYou can now inspect it with: hexdump -C {}", output);

    Ok(())
}
