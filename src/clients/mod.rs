use crate::error::LookupError;
use crate::model::movie::Movie;

pub mod omdb_client;

#[allow(async_fn_in_trait)]
pub trait MovieLookup {
    async fn lookup(&self, title: &str) -> Result<Movie, LookupError>;
}
