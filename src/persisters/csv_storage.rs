use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::model::movie::{default_poster, deserialize_year, Catalog, Movie, Rating};
use crate::persisters::{read_catalog_file, write_catalog_file, MovieStorage};

/// A header row followed by one `title,year,rating,poster` row per movie.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    path: PathBuf,
}

#[derive(Serialize)]
struct RowRef<'a> {
    title: &'a str,
    year: &'a str,
    rating: &'a Rating,
    poster: &'a str,
}

impl RowRef<'_> {
    fn csv_titles() -> Vec<&'static str> {
        vec!["title", "year", "rating", "poster"]
    }
}

#[derive(Deserialize)]
struct Row {
    title: String,
    #[serde(default, deserialize_with = "deserialize_year")]
    year: String,
    #[serde(default)]
    rating: Rating,
    #[serde(default = "default_poster")]
    poster: String,
}

impl CsvStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn decode(content: &str) -> Result<Catalog, StorageError> {
    let mut rdr = ReaderBuilder::new().from_reader(content.as_bytes());
    let mut catalog = Catalog::new();
    for row in rdr.deserialize::<Row>() {
        let row = row?;
        catalog.upsert(Movie {
            title: row.title,
            year: row.year,
            rating: row.rating,
            poster: row.poster,
        });
    }
    Ok(catalog)
}

fn encode(catalog: &Catalog) -> Result<Vec<u8>, StorageError> {
    let mut wrt = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wrt.write_record(RowRef::csv_titles())?;
    for movie in catalog {
        wrt.serialize(RowRef {
            title: &movie.title,
            year: &movie.year,
            rating: &movie.rating,
            poster: &movie.poster,
        })?;
    }
    wrt.into_inner()
        .map_err(|e| StorageError::Csv(csv::Error::from(e.into_error())))
}

impl MovieStorage for CsvStorage {
    fn list_movies(&self) -> Catalog {
        let Some(content) = read_catalog_file(&self.path) else {
            return Catalog::new();
        };
        match decode(&content) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::warn!("Ignoring unreadable CSV file {}: {}", self.path.display(), e);
                Catalog::new()
            }
        }
    }

    fn save_movies(&self, catalog: &Catalog) -> Result<(), StorageError> {
        write_catalog_file(&self.path, encode(catalog)?, catalog.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_even_for_empty_catalog() {
        let bytes = encode(&Catalog::new()).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "title,year,rating,poster\n");
    }

    #[test]
    fn reads_rows_with_quoted_titles_and_sentinels() {
        let content = "title,year,rating,poster\n\
                       \"Crouching Tiger, Hidden Dragon\",2000,7.9,tiger.jpg\n\
                       Unrated,2021,N/A,N/A\n\
                       Blank,2022,,\n";

        let catalog = decode(content).unwrap();
        assert_eq!(catalog.len(), 3);

        let tiger = catalog.get("Crouching Tiger, Hidden Dragon").unwrap();
        assert_eq!(tiger.year, "2000");
        assert_eq!(tiger.rating, Rating::Known(7.9));

        assert_eq!(catalog.get("Unrated").unwrap().rating, Rating::Unknown);
        assert_eq!(catalog.get("Blank").unwrap().rating, Rating::Unknown);
    }

    #[test]
    fn encoded_rows_read_back_in_order() {
        let catalog: Catalog = vec![
            Movie {
                title: "B, the sequel".to_string(),
                year: "2011–2019".to_string(),
                rating: Rating::Known(6.0),
                poster: "b.jpg".to_string(),
            },
            Movie {
                title: "A".to_string(),
                year: "1990".to_string(),
                rating: Rating::Unparsed("good".to_string()),
                poster: "N/A".to_string(),
            },
        ]
        .into_iter()
        .collect();

        let bytes = encode(&catalog).unwrap();
        let decoded = decode(std::str::from_utf8(&bytes).unwrap()).unwrap();
        assert_eq!(decoded, catalog);
    }
}
