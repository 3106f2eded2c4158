mod cli;

use clap::Parser;
use cli::config::{LoggingConfig, TesseraConfig};
use cli::Cli;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG wins; otherwise the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| format!("Failed to open log file '{}': {}", path.display(), e))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let logging = TesseraConfig::load_or_default(cli.command.config_path().map(Path::new))
        .map(|c| c.logging)
        .unwrap_or_default();
    if let Err(e) = init_logging(&logging) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = cli::execute(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
