//! Batch converter: every argument is a GPX file, converted to a `.json`
//! GeoJSON file next to it.
//!
//! ```bash
//! gpx2geojson dinosaur.gpx hellscanyon.gpx rogue.gpx
//! RUST_LOG=debug gpx2geojson selway.gpx
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gpx2geojson_markers::convert_batch;
use gpx2geojson_markers::options::ConvertOptions;

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let inputs: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if inputs.is_empty() {
        warn!("no GPX files given");
        return ExitCode::FAILURE;
    }

    let outcomes = convert_batch(&inputs, &ConvertOptions::default());
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!(
        converted = outcomes.len() - failed,
        failed, "batch finished"
    );

    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
