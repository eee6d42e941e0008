use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio_retry::{
    strategy::{jitter, ExponentialBackoff},
    RetryIf,
};

use crate::clients::MovieLookup;
use crate::error::LookupError;
use crate::model::movie::{default_poster, deserialize_year, Movie, Rating};

pub const OMDB_BASE_URL: &str = "https://www.omdbapi.com/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RETRIES: usize = 3;

#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year", default, deserialize_with = "deserialize_year")]
    year: String,
    #[serde(rename = "imdbRating", default)]
    rating: Rating,
    #[serde(rename = "Poster", default = "default_poster")]
    poster: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl OmdbClient {
    pub fn new(api_key: Option<String>) -> Result<Self, LookupError> {
        Self::with_base_url(api_key, OMDB_BASE_URL)
    }

    pub fn with_base_url(
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, LookupError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    async fn lookup_no_retry(&self, api_key: &str, title: &str) -> Result<Movie, LookupError> {
        log::debug!("Looking up {:?} at {}", title, self.base_url);
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", api_key), ("t", title)])
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        parse_lookup_response(&body, title)
    }
}

impl MovieLookup for OmdbClient {
    async fn lookup(&self, title: &str) -> Result<Movie, LookupError> {
        let api_key = self.api_key.as_deref().ok_or(LookupError::MissingApiKey)?;
        let retry_strategy = ExponentialBackoff::from_millis(10)
            .map(jitter)
            .take(MAX_RETRIES);

        RetryIf::start(
            retry_strategy,
            || async move { self.lookup_no_retry(api_key, title).await },
            |e: &LookupError| {
                if e.is_transport() {
                    log::warn!("Lookup for {:?} failed, retrying: {}", title, e);
                    return true;
                }
                false
            },
        )
        .await
    }
}

/// Turns an OMDb response body into a movie, or `NotFound` when the API
/// answered `"Response": "False"`.
pub fn parse_lookup_response(body: &str, query: &str) -> Result<Movie, LookupError> {
    let resp: OmdbResponse = serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        LookupError::Malformed(format!("{e}. Response: {preview}"))
    })?;

    if !resp.response.eq_ignore_ascii_case("true") {
        log::info!(
            "OMDb has no match for {:?}: {}",
            query,
            resp.error.as_deref().unwrap_or("no error message")
        );
        return Err(LookupError::NotFound(query.to_string()));
    }

    let title = resp
        .title
        .ok_or_else(|| LookupError::Malformed("response has no Title".to_string()))?;

    Ok(Movie {
        title,
        year: resp.year,
        rating: resp.rating,
        poster: resp.poster,
    })
}
