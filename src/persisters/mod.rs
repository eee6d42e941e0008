use std::io::ErrorKind;
use std::path::Path;

use crate::error::StorageError;
use crate::model::movie::{Catalog, Movie, Rating};

pub mod csv_storage;
pub mod json_storage;

pub use csv_storage::CsvStorage;
pub use json_storage::JsonStorage;

/// A backing store for the movie catalog. The whole catalog is read on every
/// call and written back in full on every change.
pub trait MovieStorage {
    /// Never fails: a missing or unreadable file is an empty catalog.
    fn list_movies(&self) -> Catalog;

    fn save_movies(&self, catalog: &Catalog) -> Result<(), StorageError>;

    fn add_movie(&self, movie: Movie) -> Result<(), StorageError> {
        let mut catalog = self.list_movies();
        catalog.upsert(movie);
        self.save_movies(&catalog)
    }

    /// Returns `Ok(false)` when the title is not in the catalog.
    fn delete_movie(&self, title: &str) -> Result<bool, StorageError> {
        let mut catalog = self.list_movies();
        if catalog.remove(title).is_none() {
            return Ok(false);
        }
        self.save_movies(&catalog)?;
        Ok(true)
    }

    fn update_movie(&self, title: &str, rating: Rating) -> Result<bool, StorageError> {
        let mut catalog = self.list_movies();
        match catalog.get_mut(title) {
            Some(movie) => movie.rating = rating,
            None => return Ok(false),
        }
        self.save_movies(&catalog)?;
        Ok(true)
    }
}

/// File content, or `None` when there is nothing usable to parse.
fn read_catalog_file(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => None,
        Ok(content) => Some(content),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("No catalog at {}, starting empty", path.display());
            None
        }
        Err(e) => {
            log::warn!("Could not read {}: {}", path.display(), e);
            None
        }
    }
}

fn write_catalog_file(path: &Path, bytes: Vec<u8>, count: usize) -> Result<(), StorageError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;
        }
    }
    std::fs::write(path, bytes).map_err(|e| StorageError::io(path, e))?;
    log::info!("Saved {} movies to {}", count, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::movie::default_poster;

    fn movie(title: &str, rating: Rating) -> Movie {
        Movie {
            title: title.to_string(),
            year: "1999".to_string(),
            rating,
            poster: default_poster(),
        }
    }

    fn storages(dir: &Path) -> (JsonStorage, CsvStorage) {
        (
            JsonStorage::new(dir.join("movies.json")),
            CsvStorage::new(dir.join("movies.csv")),
        )
    }

    fn check_round_trip<S: MovieStorage>(storage: &S) {
        assert!(storage.list_movies().is_empty());

        let matrix = movie("The Matrix", Rating::Known(8.7));
        storage.add_movie(matrix.clone()).unwrap();
        assert_eq!(storage.list_movies().get("The Matrix"), Some(&matrix));

        assert!(storage.delete_movie("The Matrix").unwrap());
        assert!(storage.list_movies().get("The Matrix").is_none());
    }

    #[test]
    fn add_then_delete_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let (json, csv) = storages(dir.path());
        check_round_trip(&json);
        check_round_trip(&csv);
    }

    #[test]
    fn list_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let (json, _) = storages(dir.path());
        json.add_movie(movie("A", Rating::Known(1.0))).unwrap();
        json.add_movie(movie("B", Rating::Unknown)).unwrap();

        assert_eq!(json.list_movies(), json.list_movies());
    }

    #[test]
    fn update_on_missing_title_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (json, _) = storages(dir.path());
        json.add_movie(movie("A", Rating::Known(5.0))).unwrap();
        let before = std::fs::read(json.path()).unwrap();

        assert!(!json.update_movie("Missing", Rating::Known(9.0)).unwrap());
        assert!(!json.delete_movie("Missing").unwrap());

        assert_eq!(std::fs::read(json.path()).unwrap(), before);
    }

    #[test]
    fn update_replaces_only_the_rating() {
        let dir = tempfile::tempdir().unwrap();
        let (_, csv) = storages(dir.path());
        csv.add_movie(movie("A", Rating::Known(5.0))).unwrap();

        assert!(csv.update_movie("A", Rating::parse("not sure")).unwrap());

        let stored = csv.list_movies();
        let a = stored.get("A").unwrap();
        assert_eq!(a.rating, Rating::Unparsed("not sure".to_string()));
        assert_eq!(a.year, "1999");
    }

    #[test]
    fn missing_empty_or_corrupt_files_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let (json, _) = storages(dir.path());
        assert!(json.list_movies().is_empty());

        std::fs::write(json.path(), "").unwrap();
        assert!(json.list_movies().is_empty());

        std::fs::write(json.path(), "{ not json").unwrap();
        assert!(json.list_movies().is_empty());
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path().join("data").join("movies.json"));
        storage.add_movie(movie("A", Rating::Unknown)).unwrap();
        assert!(storage.path().exists());
    }

    #[test]
    fn reports_write_failures() {
        let dir = tempfile::tempdir().unwrap();
        // A directory standing where the file should be makes the write fail.
        let path = dir.path().join("movies.json");
        std::fs::create_dir(&path).unwrap();
        let storage = JsonStorage::new(&path);

        let result = storage.add_movie(movie("A", Rating::Unknown));
        assert!(matches!(result, Err(StorageError::Io { .. })));
    }
}
