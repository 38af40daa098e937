//! CSG CLI - Command line tool for generating climate scenario series.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "csg-cli",
    version,
    about = "Climate scenario generation toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: csg_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    csg_cmd::run(cli.command)
}
