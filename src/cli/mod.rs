mod args;

pub use args::{Cli, CliCommand, RelayCliArgs};
