use crate::model::movie::{Catalog, Movie};
use crate::similarity;

pub const MAX_SUGGESTIONS: usize = 3;
pub const SUGGESTION_CUTOFF: f64 = 0.6;

#[derive(Debug, PartialEq)]
pub enum SearchOutcome<'a> {
    Matches(Vec<&'a Movie>),
    Suggestions(Vec<&'a Movie>),
    NoMatch,
}

/// Case-insensitive substring search with a fuzzy fallback.
pub fn search<'a>(catalog: &'a Catalog, query: &str) -> SearchOutcome<'a> {
    let query = query.to_lowercase();

    let matches: Vec<&Movie> = catalog
        .iter()
        .filter(|m| m.title.to_lowercase().contains(&query))
        .collect();
    if !matches.is_empty() {
        return SearchOutcome::Matches(matches);
    }

    let movies: Vec<&Movie> = catalog.iter().collect();
    let lowered: Vec<String> = movies.iter().map(|m| m.title.to_lowercase()).collect();
    let close = similarity::close_matches(
        &query,
        lowered.iter().map(String::as_str),
        MAX_SUGGESTIONS,
        SUGGESTION_CUTOFF,
    );
    if close.is_empty() {
        return SearchOutcome::NoMatch;
    }

    let suggestions = close.into_iter().map(|idx| movies[idx]).collect();
    SearchOutcome::Suggestions(suggestions)
}
