//! Soko CLI - Command line tool for Kenyan agricultural market prices.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "soko-cli",
    version,
    about = "Kenyan agricultural market price toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: soko_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let result = soko_cmd::run(cli.command).await;
    if let Err(e) = &result {
        log::debug!("[Soko] cli: command failed: {:?}", e);
    }
    result
}
