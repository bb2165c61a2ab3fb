use std::process::ExitCode;

use calc_mcp_gateway::{cli, infra};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    infra::logging::init();

    let args = cli::Cli::parse();
    match args.command {
        // No subcommand: run the MCP server, HTTP or stdio per MODE.
        None | Some(cli::Commands::Serve) => {
            infra::boot::run_server().await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(command) => Ok(cli::run_commands(command).await),
    }
}
