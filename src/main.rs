/*************** Program Entry Point *******************/

// Parses arguments, installs the tracing subscriber, and hands control to
// the egui panel; the device task is spawned during UI wiring.

// module declaration
mod config;
mod controllers;
mod drivers;
mod sequence;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::config::{DEFAULT_RIG_URL, MAX_SEQUENCE_ROWS, STATUS_POLL_INTERVAL};
use crate::sequence::load_sequence_from_csv_path;
use crate::ui::app::AppUI;

#[derive(Parser, Debug)]
#[command(name = "camslider", about = "Control panel for an ESP32 camera slider rig")]
struct Args {
    /// Base URL of the rig's web interface.
    #[arg(long, default_value = DEFAULT_RIG_URL)]
    url: String,

    /// Seconds between connectivity polls.
    #[arg(long, default_value_t = STATUS_POLL_INTERVAL.as_secs())]
    poll_interval: u64,

    /// CSV file of movements to preload into the sequence builder.
    #[arg(long)]
    load: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let preloaded = match &args.load {
        Some(path) => load_sequence_from_csv_path(path, MAX_SEQUENCE_ROWS)?,
        None => Vec::new(),
    };
    let poll_interval = Duration::from_secs(args.poll_interval.max(1));

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Camera Slider Control Panel",
        options,
        Box::new(move |_cc| Ok(Box::new(AppUI::new(&args.url, poll_interval, preloaded)))),
    )?;
    Ok(())
}
