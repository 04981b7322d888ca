mod cli;

use clap::Parser;
use cli::Cli;
use gsi::config::{default_author, load_user_config};

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    let user = load_user_config()?.unwrap_or_default();
    let config = cli.into_config(user, default_author)?;
    gsi::scaffold(config)?;
    Ok(())
}
