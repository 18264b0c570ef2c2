//! Seeker provisioning step for Node.js application staging

use clap::Parser;

use seeker_provision::cli::Cli;
use seeker_provision::logging;

#[tokio::main]
async fn main() {
    logging::init();
    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
