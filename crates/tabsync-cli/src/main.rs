use clap::Parser;
use tabsync_cli::config::{Cli, Command};
use tabsync_cli::{factory, scenario};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!("Starting tabsync");

    match &cli.command {
        Command::HousepointsSetup { only } => {
            let target = factory::build_target(&cli)?;
            scenario::housepoints_setup(target.document()?, only.as_deref())?;
        }
        Command::HousepointsTransform => {
            let source = factory::build_source(&cli)?;
            let target = factory::build_target(&cli)?;
            scenario::housepoints_transform(source.document()?, target.document()?)?;
        }
        Command::SeedLocal { count } => {
            let target = factory::build_target(&cli)?;
            scenario::seed_local(target.document()?, *count)?;
        }
    }

    info!("Done");
    Ok(())
}
