use clap::Parser;
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Replication statistics for the IEG project performance ratings dataset
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ieg-report",
    about = "Replication statistics for the IEG project performance ratings dataset",
    version
)]
pub struct Settings {
    /// Dataset CSV path (tried before the built-in candidate locations)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Report output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,
}
