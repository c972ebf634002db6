use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    cli::Cli::parse().run()
}
