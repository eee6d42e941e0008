use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StorageError;
use crate::model::movie::{default_poster, deserialize_year, Catalog, Movie, Rating};
use crate::persisters::{read_catalog_file, write_catalog_file, MovieStorage};

/// One JSON object keyed by title:
///
/// ```json
/// {
///     "The Matrix": {
///         "rating": 8.7,
///         "year": "1999",
///         "poster": "https://..."
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

#[derive(Serialize)]
struct EntryRef<'a> {
    rating: &'a Rating,
    year: &'a str,
    poster: &'a str,
}

#[derive(Deserialize)]
struct Entry {
    #[serde(default)]
    rating: Rating,
    #[serde(default, deserialize_with = "deserialize_year")]
    year: String,
    #[serde(default = "default_poster")]
    poster: String,
}

impl JsonStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

// serde_json is built with `preserve_order`, so maps keep file order.
fn decode(content: &str) -> Result<Catalog, StorageError> {
    let entries: Map<String, Value> = serde_json::from_str(content)?;
    let mut catalog = Catalog::new();
    for (title, value) in entries {
        let entry: Entry = serde_json::from_value(value)?;
        catalog.upsert(Movie {
            title,
            year: entry.year,
            rating: entry.rating,
            poster: entry.poster,
        });
    }
    Ok(catalog)
}

fn encode(catalog: &Catalog) -> Result<Vec<u8>, StorageError> {
    let mut entries = Map::new();
    for movie in catalog {
        let entry = EntryRef {
            rating: &movie.rating,
            year: &movie.year,
            poster: &movie.poster,
        };
        entries.insert(movie.title.clone(), serde_json::to_value(entry)?);
    }

    let mut bytes = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
    entries.serialize(&mut serializer)?;
    bytes.push(b'\n');
    Ok(bytes)
}

impl MovieStorage for JsonStorage {
    fn list_movies(&self) -> Catalog {
        let Some(content) = read_catalog_file(&self.path) else {
            return Catalog::new();
        };
        match decode(&content) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::warn!("Ignoring unreadable JSON file {}: {}", self.path.display(), e);
                Catalog::new()
            }
        }
    }

    fn save_movies(&self, catalog: &Catalog) -> Result<(), StorageError> {
        write_catalog_file(&self.path, encode(catalog)?, catalog.len())
    }
}
