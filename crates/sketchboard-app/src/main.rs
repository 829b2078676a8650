//! Command line entry point.

use clap::Parser;
use sketchboard_app::Cli;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("Running {:?}", cli.command);
    sketchboard_app::cli::run(cli, &mut std::io::stdout().lock())
}
