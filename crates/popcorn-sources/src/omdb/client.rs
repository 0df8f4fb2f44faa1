use async_trait::async_trait;
use popcorn_models::{MovieDetail, SearchResultItem};
use reqwest::Client;
use std::sync::Arc;
use tracing::debug;
use crate::error::FetchError;
use crate::omdb::api;
use crate::traits::MovieDatabase;

const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// Create the shared reqwest client used for every OMDb request
pub fn create_omdb_client() -> Client {
    Client::builder()
        .user_agent(concat!("popcorn/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Clone)]
pub struct OmdbClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Arc::new(create_omdb_client()),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MovieDatabase for OmdbClient {
    fn source_name(&self) -> &str {
        "omdb"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>, FetchError> {
        debug!("OMDb search: {:?}", query);
        api::search(&self.client, &self.base_url, &self.api_key, query).await
    }

    async fn get_details(&self, imdb_id: &str) -> Result<MovieDetail, FetchError> {
        debug!("OMDb details: {}", imdb_id);
        api::get_details(&self.client, &self.base_url, &self.api_key, imdb_id).await
    }
}
