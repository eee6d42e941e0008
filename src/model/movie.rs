use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const UNKNOWN_SENTINEL: &str = "N/A";

/// Text that is neither a number nor `N/A` is kept as [`Rating::Unparsed`].
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "Option<RawValue>")]
pub enum Rating {
    Known(f64),
    #[default]
    Unknown,
    Unparsed(String),
}

impl Rating {
    pub fn parse(raw: &str) -> Rating {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == UNKNOWN_SENTINEL {
            return Rating::Unknown;
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Rating::Known(value),
            _ => Rating::Unparsed(raw.to_string()),
        }
    }

    /// Value used when ordering movies. Anything without a number sorts as zero.
    pub fn sort_value(&self) -> f64 {
        match self {
            Rating::Known(value) => *value,
            _ => 0.0,
        }
    }

    pub fn stat_value(&self) -> Option<f64> {
        match self {
            Rating::Known(value) => Some(*value),
            _ => None,
        }
    }
}

pub fn format_rating_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::Known(value) => f.write_str(&format_rating_value(*value)),
            Rating::Unknown => f.write_str(UNKNOWN_SENTINEL),
            Rating::Unparsed(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Rating::Known(value) => serializer.serialize_f64(*value),
            Rating::Unknown => serializer.serialize_str(UNKNOWN_SENTINEL),
            Rating::Unparsed(raw) => serializer.serialize_str(raw),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Text(String),
}

impl From<Option<RawValue>> for Rating {
    fn from(raw: Option<RawValue>) -> Self {
        match raw {
            Some(RawValue::Number(value)) if value.is_finite() => Rating::Known(value),
            Some(RawValue::Text(text)) => Rating::parse(&text),
            _ => Rating::Unknown,
        }
    }
}

/// Years come back from the lookup as text ("1999", "2011–2019") but older
/// files may carry plain numbers.
pub fn deserialize_year<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<RawValue>::deserialize(deserializer)? {
        Some(RawValue::Text(year)) => year,
        Some(RawValue::Number(year)) => year.to_string(),
        None => String::new(),
    })
}

pub fn default_poster() -> String {
    UNKNOWN_SENTINEL.to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub title: String,
    pub year: String,
    pub rating: Rating,
    pub poster: String,
}

/// All movies of a collection, in file order, titles unique.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    movies: Vec<Movie>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog { movies: vec![] }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Movie> {
        self.movies.iter()
    }

    pub fn get(&self, title: &str) -> Option<&Movie> {
        self.movies.iter().find(|m| m.title == title)
    }

    pub fn get_mut(&mut self, title: &str) -> Option<&mut Movie> {
        self.movies.iter_mut().find(|m| m.title == title)
    }

    /// Inserts `movie`, replacing an existing entry with the same title in place.
    pub fn upsert(&mut self, movie: Movie) {
        match self.get_mut(&movie.title) {
            Some(existing) => *existing = movie,
            None => self.movies.push(movie),
        }
    }

    pub fn remove(&mut self, title: &str) -> Option<Movie> {
        let position = self.movies.iter().position(|m| m.title == title)?;
        Some(self.movies.remove(position))
    }
}

impl FromIterator<Movie> for Catalog {
    fn from_iter<I: IntoIterator<Item = Movie>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for movie in iter {
            catalog.upsert(movie);
        }
        catalog
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Movie;
    type IntoIter = std::slice::Iter<'a, Movie>;

    fn into_iter(self) -> Self::IntoIter {
        self.movies.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str, rating: Rating) -> Movie {
        Movie {
            title: title.to_string(),
            year: "2000".to_string(),
            rating,
            poster: default_poster(),
        }
    }

    #[test]
    fn parses_rating_variants() {
        assert_eq!(Rating::parse("7.5"), Rating::Known(7.5));
        assert_eq!(Rating::parse(" 8 "), Rating::Known(8.0));
        assert_eq!(Rating::parse("N/A"), Rating::Unknown);
        assert_eq!(Rating::parse(""), Rating::Unknown);
        assert_eq!(
            Rating::parse("great"),
            Rating::Unparsed("great".to_string())
        );
        assert_eq!(Rating::parse("NaN"), Rating::Unparsed("NaN".to_string()));
    }

    #[test]
    fn sort_and_stat_values_follow_conversion_rules() {
        assert_eq!(Rating::Known(6.5).sort_value(), 6.5);
        assert_eq!(Rating::Unknown.sort_value(), 0.0);
        assert_eq!(Rating::Unparsed("x".into()).sort_value(), 0.0);

        assert_eq!(Rating::Known(6.5).stat_value(), Some(6.5));
        assert_eq!(Rating::Unknown.stat_value(), None);
        assert_eq!(Rating::Unparsed("x".into()).stat_value(), None);
    }

    #[test]
    fn displays_known_ratings_with_a_decimal_point() {
        assert_eq!(Rating::Known(8.0).to_string(), "8.0");
        assert_eq!(Rating::Known(7.25).to_string(), "7.25");
        assert_eq!(Rating::Unknown.to_string(), "N/A");
        assert_eq!(Rating::Unparsed("meh".into()).to_string(), "meh");
    }

    #[test]
    fn rating_reads_numbers_and_strings_from_json() {
        let ratings: Vec<Rating> =
            serde_json::from_str(r#"[8.1, 9, "7.3", "N/A", null, "bad"]"#).unwrap();
        assert_eq!(
            ratings,
            vec![
                Rating::Known(8.1),
                Rating::Known(9.0),
                Rating::Known(7.3),
                Rating::Unknown,
                Rating::Unknown,
                Rating::Unparsed("bad".to_string()),
            ]
        );
    }

    #[test]
    fn year_reads_text_numbers_or_null() {
        #[derive(Deserialize)]
        struct Dated {
            #[serde(deserialize_with = "deserialize_year")]
            year: String,
        }

        let dated: Vec<Dated> =
            serde_json::from_str(r#"[{"year": "2011–2019"}, {"year": 1999}, {"year": null}]"#)
                .unwrap();
        let years: Vec<&str> = dated.iter().map(|d| d.year.as_str()).collect();
        assert_eq!(years, vec!["2011–2019", "1999", ""]);
    }

    #[test]
    fn upsert_keeps_position_of_existing_title() {
        let mut catalog = Catalog::new();
        catalog.upsert(movie("A", Rating::Known(1.0)));
        catalog.upsert(movie("B", Rating::Known(2.0)));
        catalog.upsert(movie("A", Rating::Known(3.0)));

        let titles: Vec<&str> = catalog.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(catalog.get("A").unwrap().rating, Rating::Known(3.0));
    }

    #[test]
    fn remove_reports_missing_titles() {
        let mut catalog: Catalog = vec![movie("A", Rating::Unknown)].into_iter().collect();
        assert!(catalog.remove("Z").is_none());
        assert!(catalog.remove("A").is_some());
        assert!(catalog.is_empty());
    }
}
