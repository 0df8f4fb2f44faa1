use async_trait::async_trait;
use popcorn_models::{MovieDetail, SearchResultItem};
use crate::error::FetchError;

/// A remote movie database the controllers fetch from
#[async_trait]
pub trait MovieDatabase: Send + Sync {
    fn source_name(&self) -> &str;

    /// Free-text title search
    async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>, FetchError>;

    /// Full record for one external identifier
    async fn get_details(&self, imdb_id: &str) -> Result<MovieDetail, FetchError>;
}

