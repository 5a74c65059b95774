use clap::Parser;

use chatvote::cli::{self, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli::run(cli).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
