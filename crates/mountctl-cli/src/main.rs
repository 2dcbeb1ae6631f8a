use clap::Parser;
use mountctl_core::storage::config::{Config, Overrides};
use mountctl_core::utils::input::EnvConfigReader;
use mountctl_core::utils::logging::default_filter;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::dispatcher::Dispatcher;
use cli::main_types::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Diagnostics go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(cli.verbose))),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load Config
    let config_path = cli
        .config_dir
        .as_ref()
        .map(|dir| PathBuf::from(dir).join("config.toml"));

    let config = match Config::load(config_path.clone()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading config: {}", err);
            std::process::exit(1);
        }
    };

    if cli.verbose {
        println!("Verbose mode is enabled");

        if let Some(config_dir) = &cli.config_dir {
            println!("Using config directory: {}", config_dir);
        }
    }

    let overrides = Overrides {
        database_path: cli.db,
        table: cli.table,
        api_url: cli.url,
    };
    let use_colors = !cli.no_color && !EnvConfigReader::read_no_color();

    let dispatcher = Dispatcher::new(config, config_path, overrides, cli.verbose, use_colors);

    if let Err(e) = dispatcher.dispatch(cli.command).await {
        eprintln!("Error: {}", e.display_friendly());
        if let Some(hint) = e.troubleshooting_hint() {
            eprintln!("{} Hint: {}", e.severity().emoji(), hint);
        }
        std::process::exit(1);
    }

    Ok(())
}
