use popcorn_models::SearchResultItem;
use popcorn_sources::MovieDatabase;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use crate::effect::{Effect, Teardown};
use crate::observe::{lock, Observable, SubscriptionId};

/// What the result list renders from
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<SearchResultItem>,
    pub is_loading: bool,
    /// Empty when there is nothing to report
    pub error: String,
}

impl SearchState {
    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }
}

type QueryChangeCallback = Box<dyn Fn() + Send + Sync>;

/// Search-as-you-type against a [`MovieDatabase`]
///
/// Every query change tears down the previous request before anything else
/// happens, and a finished request only publishes its outcome while its
/// token is still live. A superseded response therefore never reaches the
/// state, whichever order the responses arrive in.
pub struct SearchController {
    db: Arc<dyn MovieDatabase>,
    min_query_length: usize,
    state: Arc<Observable<SearchState>>,
    effect: Mutex<Effect>,
    on_query_change: Option<QueryChangeCallback>,
}

impl SearchController {
    pub const DEFAULT_MIN_QUERY_LENGTH: usize = 3;

    pub fn new(db: Arc<dyn MovieDatabase>) -> Self {
        Self {
            db,
            min_query_length: Self::DEFAULT_MIN_QUERY_LENGTH,
            state: Arc::new(Observable::default()),
            effect: Mutex::new(Effect::new()),
            on_query_change: None,
        }
    }

    pub fn with_min_query_length(mut self, min_query_length: usize) -> Self {
        self.min_query_length = min_query_length;
        self
    }

    /// Called once per query change, before any fetch starts
    ///
    /// The callback runs while the controller is switching queries and must
    /// not call back into this controller.
    pub fn on_query_change<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_query_change = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> SearchState {
        self.state.get()
    }

    pub fn query(&self) -> String {
        self.state.read(|s| s.query.clone())
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&SearchState) + Send + Sync + 'static,
    {
        self.state.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    /// Replace the query
    ///
    /// Returns the handle of the spawned fetch, or `None` when no request was
    /// issued (unchanged query, or one too short to search).
    pub fn set_query(&self, query: impl Into<String>) -> Option<JoinHandle<()>> {
        let query = query.into();
        let mut effect = lock(&self.effect);

        if self.state.read(|s| s.query == query) {
            return None;
        }

        let mut handle = None;
        effect.run(|| {
            if let Some(callback) = &self.on_query_change {
                callback();
            }

            let trimmed = query.trim().to_string();
            if trimmed.chars().count() < self.min_query_length {
                self.state.update(|s| {
                    s.query = query.clone();
                    s.results.clear();
                    s.error.clear();
                    s.is_loading = false;
                });
                return None;
            }

            let token = CancellationToken::new();
            self.state.update(|s| {
                s.query = query.clone();
                s.results.clear();
                s.error.clear();
                s.is_loading = true;
            });

            handle = Some(tokio::spawn(fetch_results(
                Arc::clone(&self.db),
                trimmed,
                token.clone(),
                Arc::clone(&self.state),
            )));

            let teardown: Teardown = Box::new(move || token.cancel());
            Some(teardown)
        });

        handle
    }
}

async fn fetch_results(
    db: Arc<dyn MovieDatabase>,
    query: String,
    token: CancellationToken,
    state: Arc<Observable<SearchState>>,
) {
    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!("Search for {:?} cancelled", query);
            return;
        }
        result = db.search(&query) => result,
    };

    let applied = state.update_if(|s| {
        // Checked under the state lock: a newer query cancels before it writes
        if token.is_cancelled() {
            return false;
        }
        s.is_loading = false;
        match outcome {
            Ok(items) => {
                debug!("Search for {:?} returned {} results", query, items.len());
                s.results = items;
                s.error.clear();
            }
            Err(e) => {
                if e.is_not_found() {
                    debug!("Search for {:?}: {}", query, e);
                } else {
                    warn!("Search for {:?} failed: {}", query, e.detail());
                }
                s.results.clear();
                s.error = e.to_string();
            }
        }
        true
    });

    if !applied {
        debug!("Discarding stale search response for {:?}", query);
    }
}
