mod commands;
mod http;
mod terminal;

use commands::{CommandLine, Commands, check, serve};
use mcstat_common::config::Config;
use terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands: CommandLine = CommandLine::parse_args();

    logging::init_logging()?;

    let cfg: Config = commands.config();

    match commands.command {
        Commands::Serve { bind } => serve::serve(bind, cfg).await,
        Commands::Check { addresses, json } => check::check(&addresses, json, cfg).await,
    }
}
