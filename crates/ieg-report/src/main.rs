mod bootstrap;
mod render;

use anyhow::Result;
use clap::Parser;
use report_core::settings::Settings;
use report_data::analysis::run_analysis;
use report_data::reader;

fn main() -> Result<()> {
    let settings = Settings::parse();

    bootstrap::setup_logging(&settings.log_level)?;
    tracing::info!("ieg-report v{} starting", env!("CARGO_PKG_VERSION"));

    // The only fatal condition: no dataset at any candidate location.
    let data_path = match reader::locate_dataset(settings.data.as_deref()) {
        Ok(path) => path,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
    };
    tracing::info!("Using dataset at {}", data_path.display());

    // One read feeds both the integrity hash and the parser.
    let load_start = std::time::Instant::now();
    let bytes = reader::read_dataset_bytes(&data_path)?;
    let verification = reader::verify_dataset(&data_path, &bytes);
    let records = reader::load_records(&bytes)?;
    let load_time_seconds = load_start.elapsed().as_secs_f64();

    let report = run_analysis(verification, &records, load_time_seconds);

    match settings.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print!("{}", render::render_text(&report)),
    }

    Ok(())
}
