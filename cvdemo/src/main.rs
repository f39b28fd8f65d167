use anyhow::Result;
use clap::Parser;
use cvdemo::config::{Cli, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    cvdemo::init_logger();

    let config = Config::from_cli(Cli::parse())?;
    log::debug!("{config:?}");

    cvdemo::run(config).await
}
