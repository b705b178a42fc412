use anyhow::Result;
use briefly::{
    app,
    cli::{Cli, CliCommand},
    config::Config,
    relay::RelayServer,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(CliCommand::Version) => {
            println!("Briefly {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(CliCommand::Relay(args)) => {
            let config = Config::load()?;
            RelayServer::from_config(&config.relay, args.port)?
                .start()
                .await
        }
        None => app::run_service().await,
    }
}
