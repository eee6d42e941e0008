use std::path::{Path, PathBuf};

use clap::Parser;

use crate::clients::omdb_client::OMDB_BASE_URL;

pub const API_KEY_VAR: &str = "OMDB_API_KEY";

#[derive(Debug, Clone, Parser)]
#[command(name = "movie-catalog", version, about = "Keep track of the movies you have seen")]
pub struct Cli {
    /// Catalog file; a `.csv` extension selects CSV storage, anything else JSON
    #[arg(long, default_value = "data/movies.json")]
    pub storage: PathBuf,

    /// HTML template used by "Generate website"
    #[arg(long, default_value = "static/index_template.html")]
    pub template: PathBuf,

    /// Where the generated page is written
    #[arg(long, default_value = "static/index.html")]
    pub output: PathBuf,

    /// Page title of the generated website
    #[arg(long, default_value = "My Movie App")]
    pub title: String,

    #[arg(long, default_value = OMDB_BASE_URL)]
    pub omdb_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Json,
    Csv,
}

impl StorageKind {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => StorageKind::Csv,
            _ => StorageKind::Json,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage_path: PathBuf,
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    pub page_title: String,
    pub omdb_url: String,
    pub omdb_api_key: Option<String>,
}

impl Config {
    pub fn new(cli: Cli, omdb_api_key: Option<String>) -> Self {
        Config {
            storage_path: cli.storage,
            template_path: cli.template,
            output_path: cli.output,
            page_title: cli.title,
            omdb_url: cli.omdb_url,
            omdb_api_key,
        }
    }

    /// Reads the API key from the environment. `.env` has to be loaded
    /// before this is called.
    pub fn from_env(cli: Cli) -> Self {
        let api_key = std::env::var(API_KEY_VAR).ok();
        if api_key.is_none() {
            log::warn!("{} is not set, adding movies will not work", API_KEY_VAR);
        }
        Config::new(cli, api_key)
    }

    pub fn storage_kind(&self) -> StorageKind {
        StorageKind::for_path(&self.storage_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_usual_layout() {
        let cli = Cli::parse_from(["movie-catalog"]);
        let config = Config::new(cli, None);
        assert_eq!(config.storage_path, PathBuf::from("data/movies.json"));
        assert_eq!(config.template_path, PathBuf::from("static/index_template.html"));
        assert_eq!(config.output_path, PathBuf::from("static/index.html"));
        assert_eq!(config.page_title, "My Movie App");
        assert_eq!(config.omdb_url, OMDB_BASE_URL);
        assert_eq!(config.storage_kind(), StorageKind::Json);
    }

    #[test]
    fn csv_extension_selects_csv_storage() {
        let cli = Cli::parse_from(["movie-catalog", "--storage", "movies.CSV"]);
        assert_eq!(Config::new(cli, None).storage_kind(), StorageKind::Csv);
        assert_eq!(StorageKind::for_path(Path::new("movies")), StorageKind::Json);
    }
}
