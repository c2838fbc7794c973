use clap::Parser;
use slackboard::cli::{Cli, execute_command};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = execute_command(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
