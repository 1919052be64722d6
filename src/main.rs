use clap::Parser;
use stash::cli::handlers;

fn main() {
    let cli = stash::cli::commands::Cli::parse();
    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
