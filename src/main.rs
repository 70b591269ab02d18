use clap::Parser;
use market_oracle::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
