use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "briefly")]
#[command(about = "Meeting recorder with transcription and summarization", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Run the summarization relay (holds the provider credential)
    Relay(RelayCliArgs),
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug)]
pub struct RelayCliArgs {
    /// Override the listening port from the config file
    #[arg(long)]
    pub port: Option<u16>,
}
