use popcorn_config::Config;
use popcorn_models::{UserRating, WatchedRecord};
use popcorn_sources::MovieDatabase;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::info;
use crate::detail::DetailController;
use crate::observe::{Observable, SubscriptionId};
use crate::search::SearchController;
use crate::selection::Selection;
use crate::storage::KeyValueStore;
use crate::watchlist::{WatchlistError, WatchlistManager};

/// Window title when nothing is open
pub const APP_TITLE: &str = "usePopcorn";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no movie is selected")]
    NothingSelected,

    #[error("movie details are still loading")]
    DetailNotLoaded,

    #[error("{0} is already in your watched list")]
    AlreadyWatched(String),

    #[error(transparent)]
    Watchlist(#[from] WatchlistError),
}

/// Query, selection, detail and watched list wired together
pub struct Session {
    selection: Arc<Observable<Selection>>,
    detail: Arc<DetailController>,
    search: SearchController,
    watchlist: WatchlistManager,
}

impl Session {
    pub fn new(db: Arc<dyn MovieDatabase>, watchlist: WatchlistManager, min_query_length: usize) -> Self {
        let selection = Arc::new(Observable::new(Selection::Browsing));
        let detail = Arc::new(DetailController::new(Arc::clone(&db)));

        // A new query closes whatever is open
        let search = SearchController::new(db)
            .with_min_query_length(min_query_length)
            .on_query_change({
                let selection = Arc::clone(&selection);
                let detail = Arc::clone(&detail);
                move || {
                    selection.update_if(|s| {
                        let was_viewing = s.is_viewing();
                        s.close();
                        was_viewing
                    });
                    detail.load(None);
                }
            });

        Self {
            selection,
            detail,
            search,
            watchlist,
        }
    }

    /// Build a session from config, restoring the watched list from `store`
    pub fn from_config(db: Arc<dyn MovieDatabase>, config: &Config, store: Arc<dyn KeyValueStore>) -> Self {
        info!("Starting session against {}", db.source_name());
        let watchlist = WatchlistManager::restore(store, config.storage.watched_key.clone());
        Self::new(db, watchlist, config.search.min_query_length)
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn detail(&self) -> &DetailController {
        &self.detail
    }

    pub fn watchlist(&self) -> &WatchlistManager {
        &self.watchlist
    }

    pub fn selection(&self) -> Selection {
        self.selection.get()
    }

    pub fn subscribe_selection<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Selection) + Send + Sync + 'static,
    {
        self.selection.subscribe(listener)
    }

    pub fn set_query(&self, query: impl Into<String>) -> Option<JoinHandle<()>> {
        self.search.set_query(query)
    }

    /// Toggle `imdb_id` open or closed and load its detail
    pub fn select(&self, imdb_id: &str) -> Option<JoinHandle<()>> {
        let selected = self.selection.update(|s| {
            s.select(imdb_id);
            s.selected_id().map(str::to_string)
        });
        self.detail.load(selected.as_deref())
    }

    pub fn close(&self) {
        self.selection.update_if(|s| {
            let was_viewing = s.is_viewing();
            s.close();
            was_viewing
        });
        self.detail.load(None);
    }

    /// The open movie's rating, if it is already in the watched list
    pub fn current_user_rating(&self) -> Option<UserRating> {
        let selection = self.selection.get();
        self.watchlist.user_rating_for(selection.selected_id()?)
    }

    /// Rate the open movie, add it to the watched list and close it
    pub fn add_current(&self, rating: UserRating) -> Result<WatchedRecord, SessionError> {
        let selection = self.selection.get();
        let imdb_id = selection.selected_id().ok_or(SessionError::NothingSelected)?;

        if self.watchlist.contains(imdb_id) {
            return Err(SessionError::AlreadyWatched(imdb_id.to_string()));
        }

        let state = self.detail.state();
        let detail = match (state.imdb_id.as_deref(), state.loaded()) {
            (Some(loaded_id), Some(detail)) if loaded_id == imdb_id => detail,
            _ => return Err(SessionError::DetailNotLoaded),
        };

        let record = WatchedRecord::from_detail(imdb_id, detail, rating);
        if !self.watchlist.add(record.clone())? {
            return Err(SessionError::AlreadyWatched(imdb_id.to_string()));
        }

        info!("Rated {} ({}) {}/10", record.title, record.imdb_id, rating);
        self.close();
        Ok(record)
    }

    pub fn delete_watched(&self, imdb_id: &str) -> Result<bool, SessionError> {
        Ok(self.watchlist.remove(imdb_id)?)
    }

    pub fn document_title(&self) -> String {
        self.detail.document_title()
    }
}
