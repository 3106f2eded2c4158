use clap::{Parser, Subcommand};

pub mod config;
pub mod replay;
pub mod version;

#[derive(Parser)]
#[command(name = "tessera")]
#[command(author = "Tessera Project")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Operator CLI for the Tessera proxy-sharing state engine", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a JSON-lines update log and print the resulting UI effects
    Replay {
        /// Path to the update log
        events: String,

        /// Path to config file (default: ~/.config/tessera/config.toml)
        #[arg(long)]
        config: Option<String>,
    },

    /// Print the default configuration file
    Config,

    /// Display version information
    Version,
}

impl Commands {
    /// Config file named on the command line, if any
    pub fn config_path(&self) -> Option<&str> {
        match self {
            Commands::Replay { config, .. } => config.as_deref(),
            _ => None,
        }
    }
}

pub async fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Replay { events, config } => replay::execute(events, config).await,
        Commands::Config => {
            config::execute();
            Ok(())
        }
        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}
