use std::process::ExitCode;

use clap::Parser;
use movie_catalog::config::{Cli, Config};

mod logging;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    logging::setup_logging();

    let config = Config::from_env(Cli::parse());

    match movie_catalog::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
