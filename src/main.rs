mod app;
mod cli;
mod config;
mod db;
mod guide;
mod http;
mod logging;
mod paths;
mod source;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    logging::init_tracing(&paths::log_file_path()?)?;
    app::run(cli)
}
