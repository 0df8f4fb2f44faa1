use async_trait::async_trait;
use popcorn_models::{MovieDetail, SearchResultItem};
use popcorn_sources::{FetchError, MovieDatabase};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Clone)]
enum Canned<T> {
    Ok(T),
    NotFound,
    Status(u16),
}

impl<T: Clone> Canned<T> {
    fn to_result(&self) -> Result<T, FetchError> {
        match self {
            Canned::Ok(value) => Ok(value.clone()),
            Canned::NotFound => Err(FetchError::NotFound),
            Canned::Status(status) => Err(FetchError::Status(*status)),
        }
    }
}

/// Scripted movie database
///
/// Requests are recorded as `s=<query>` / `i=<id>`. A gated request waits
/// until its `Notify` is signalled, which lets tests choose completion order.
#[derive(Default)]
pub struct FakeDatabase {
    searches: Mutex<HashMap<String, Canned<Vec<SearchResultItem>>>>,
    details: Mutex<HashMap<String, Canned<MovieDetail>>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: Mutex<Vec<String>>,
}

pub fn item(imdb_id: &str, title: &str) -> SearchResultItem {
    SearchResultItem::new(imdb_id, title, "1972")
}

pub fn detail(imdb_id: &str, title: &str, runtime: &str, rating: &str) -> MovieDetail {
    MovieDetail {
        imdb_id: imdb_id.to_string(),
        title: title.to_string(),
        year: "1972".to_string(),
        runtime: runtime.to_string(),
        imdb_rating: rating.to_string(),
        ..MovieDetail::default()
    }
}

impl FakeDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(self, query: &str, items: Vec<SearchResultItem>) -> Self {
        self.searches.lock().unwrap().insert(query.to_string(), Canned::Ok(items));
        self
    }

    pub fn with_status(self, query: &str, status: u16) -> Self {
        self.searches.lock().unwrap().insert(query.to_string(), Canned::Status(status));
        self
    }

    pub fn with_detail(self, detail: MovieDetail) -> Self {
        self.details.lock().unwrap().insert(detail.imdb_id.clone(), Canned::Ok(detail));
        self
    }

    pub fn with_detail_status(self, imdb_id: &str, status: u16) -> Self {
        self.details.lock().unwrap().insert(imdb_id.to_string(), Canned::Status(status));
        self
    }

    /// Hold the request recorded as `call` until the returned handle is notified
    pub fn gate(&self, call: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(call.to_string(), notify.clone());
        notify
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn enter(&self, call: String) {
        let gate = self.gates.lock().unwrap().get(&call).cloned();
        self.calls.lock().unwrap().push(call);
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl MovieDatabase for FakeDatabase {
    fn source_name(&self) -> &str {
        "fake"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>, FetchError> {
        self.enter(format!("s={}", query)).await;
        let canned = self.searches.lock().unwrap().get(query).cloned();
        canned.unwrap_or(Canned::NotFound).to_result()
    }

    async fn get_details(&self, imdb_id: &str) -> Result<MovieDetail, FetchError> {
        self.enter(format!("i={}", imdb_id)).await;
        let canned = self.details.lock().unwrap().get(imdb_id).cloned();
        canned.unwrap_or(Canned::Status(404)).to_result()
    }
}
