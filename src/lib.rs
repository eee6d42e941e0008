pub mod app;
pub mod clients;
pub mod config;
pub mod console;
pub mod error;
pub mod model;
pub mod persisters;
pub mod search;
pub mod similarity;
pub mod stats;
pub mod website;

use app::{AppSettings, MovieApp};
use clients::omdb_client::OmdbClient;
use config::{Config, StorageKind};
use console::Console;
use error::AppError;
use persisters::{CsvStorage, JsonStorage};

pub async fn run(config: Config) -> Result<(), AppError> {
    let lookup = OmdbClient::with_base_url(config.omdb_api_key.clone(), config.omdb_url.clone())?;
    let settings = AppSettings::from(&config);
    let mut console = Console::stdio();

    log::info!(
        "Using {:?} catalog at {}",
        config.storage_kind(),
        config.storage_path.display()
    );

    match config.storage_kind() {
        StorageKind::Json => {
            let storage = JsonStorage::new(&config.storage_path);
            MovieApp::new(storage, lookup, settings)
                .run(&mut console)
                .await?
        }
        StorageKind::Csv => {
            let storage = CsvStorage::new(&config.storage_path);
            MovieApp::new(storage, lookup, settings)
                .run(&mut console)
                .await?
        }
    }

    Ok(())
}
