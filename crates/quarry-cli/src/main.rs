//! Quarry CLI - load Contentful entries and search OpenSearch from the command line.

use clap::Parser;
use quarry_cli::commands;
use quarry_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> quarry_cli::Result<()> {
    let path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let mut config = Config::load(&path)?;

    // Override profile if specified
    if let Some(profile_name) = cli.profile {
        config.switch_profile(profile_name)?;
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Describe(args) => commands::execute_describe(args),
        Command::Profile(args) => commands::execute_profile(args, &mut config, &path, &formatter),
        Command::Load(args) => {
            let profile = config.get_active_profile()?;
            commands::execute_load(args, profile, &formatter).await
        }
        Command::Search(args) => {
            let profile = config.get_active_profile()?;
            commands::execute_search(args, profile, &formatter).await
        }
    }
}
