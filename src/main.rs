use anyhow::Result;
use clap::Parser;
use md_schnet_workflow::{cli::Cli, infra::logging};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level)?;
    cli.run()
}
