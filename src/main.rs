use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = hearth_auth::cli::Cli::parse();
    cli.run()
}
