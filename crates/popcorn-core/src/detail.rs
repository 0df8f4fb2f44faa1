use popcorn_models::MovieDetail;
use popcorn_sources::MovieDatabase;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use crate::effect::{Effect, Teardown};
use crate::observe::{lock, Observable, SubscriptionId};
use crate::session::APP_TITLE;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetailState {
    /// Identifier currently asked for
    pub imdb_id: Option<String>,
    /// Record for `imdb_id`, once it has arrived
    pub detail: Option<MovieDetail>,
    pub is_loading: bool,
}

impl DetailState {
    /// The loaded record, only if it belongs to the requested identifier
    pub fn loaded(&self) -> Option<&MovieDetail> {
        if self.is_loading {
            return None;
        }
        self.detail.as_ref()
    }
}

/// Fetches the full record for the selected title
pub struct DetailController {
    db: Arc<dyn MovieDatabase>,
    state: Arc<Observable<DetailState>>,
    effect: Mutex<Effect>,
}

impl DetailController {
    pub fn new(db: Arc<dyn MovieDatabase>) -> Self {
        Self {
            db,
            state: Arc::new(Observable::default()),
            effect: Mutex::new(Effect::new()),
        }
    }

    pub fn state(&self) -> DetailState {
        self.state.get()
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&DetailState) + Send + Sync + 'static,
    {
        self.state.subscribe(listener)
    }

    /// Point the controller at a new identifier, or at nothing
    ///
    /// An unchanged identifier is a no-op. Any fetch still running for the
    /// previous identifier is cancelled and its response dropped.
    pub fn load(&self, imdb_id: Option<&str>) -> Option<JoinHandle<()>> {
        let mut effect = lock(&self.effect);

        if self.state.read(|s| s.imdb_id.as_deref() == imdb_id) {
            return None;
        }

        let mut handle = None;
        effect.run(|| {
            let Some(imdb_id) = imdb_id else {
                self.state.update(|s| *s = DetailState::default());
                return None;
            };

            let token = CancellationToken::new();
            self.state.update(|s| {
                s.imdb_id = Some(imdb_id.to_string());
                s.detail = None;
                s.is_loading = true;
            });

            handle = Some(tokio::spawn(fetch_detail(
                Arc::clone(&self.db),
                imdb_id.to_string(),
                token.clone(),
                Arc::clone(&self.state),
            )));

            let teardown: Teardown = Box::new(move || token.cancel());
            Some(teardown)
        });

        handle
    }

    /// Window title: the open movie's title, or the application name
    pub fn document_title(&self) -> String {
        self.state.read(|s| {
            s.loaded()
                .filter(|d| !d.title.is_empty())
                .map(|d| format!("Movie | {}", d.title))
                .unwrap_or_else(|| APP_TITLE.to_string())
        })
    }
}

async fn fetch_detail(
    db: Arc<dyn MovieDatabase>,
    imdb_id: String,
    token: CancellationToken,
    state: Arc<Observable<DetailState>>,
) {
    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!("Detail fetch for {} cancelled", imdb_id);
            return;
        }
        result = db.get_details(&imdb_id) => result,
    };

    let applied = state.update_if(|s| {
        if token.is_cancelled() {
            return false;
        }
        s.is_loading = false;
        match outcome {
            Ok(detail) => s.detail = Some(detail),
            Err(e) => {
                warn!("Detail fetch for {} failed: {}", imdb_id, e.detail());
                s.detail = None;
            }
        }
        true
    });

    if !applied {
        debug!("Discarding stale detail response for {}", imdb_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{detail, FakeDatabase};

    #[tokio::test]
    async fn test_load_replaces_detail() {
        let db = Arc::new(
            FakeDatabase::new()
                .with_detail(detail("tt1", "First", "100 min", "7.0"))
                .with_detail(detail("tt2", "Second", "90 min", "6.0")),
        );
        let controller = DetailController::new(db.clone());

        controller.load(Some("tt1")).unwrap().await.unwrap();
        assert_eq!(controller.state().detail.unwrap().title, "First");

        controller.load(Some("tt2")).unwrap().await.unwrap();
        let state = controller.state();
        assert_eq!(state.imdb_id.as_deref(), Some("tt2"));
        assert_eq!(state.detail.unwrap().title, "Second");
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_loading_flag_and_stale_discard() {
        let db = Arc::new(
            FakeDatabase::new()
                .with_detail(detail("tt1", "Old", "100 min", "7.0"))
                .with_detail(detail("tt2", "New", "90 min", "6.0")),
        );
        let gate_old = db.gate("i=tt1");
        let controller = DetailController::new(db.clone());

        let old = controller.load(Some("tt1")).unwrap();
        tokio::task::yield_now().await;
        assert!(controller.state().is_loading);
        assert!(controller.state().loaded().is_none());

        let new = controller.load(Some("tt2")).unwrap();
        new.await.unwrap();
        gate_old.notify_one();
        old.await.unwrap();

        let state = controller.state();
        assert_eq!(state.imdb_id.as_deref(), Some("tt2"));
        assert_eq!(state.loaded().unwrap().title, "New");
    }

    #[tokio::test]
    async fn test_same_id_is_noop() {
        let db = Arc::new(FakeDatabase::new().with_detail(detail("tt1", "Only", "100 min", "7.0")));
        let controller = DetailController::new(db.clone());

        controller.load(Some("tt1")).unwrap().await.unwrap();
        assert!(controller.load(Some("tt1")).is_none());
        assert_eq!(db.calls(), vec!["i=tt1"]);
    }

    #[tokio::test]
    async fn test_clear_cancels_and_resets() {
        let db = Arc::new(FakeDatabase::new().with_detail(detail("tt1", "Only", "100 min", "7.0")));
        let gate = db.gate("i=tt1");
        let controller = DetailController::new(db.clone());

        let handle = controller.load(Some("tt1")).unwrap();
        assert!(controller.load(None).is_none());
        gate.notify_one();
        handle.await.unwrap();

        assert_eq!(controller.state(), DetailState::default());
    }

    #[tokio::test]
    async fn test_failure_clears_loading() {
        let db = Arc::new(FakeDatabase::new().with_detail_status("tt404", 500));
        let controller = DetailController::new(db.clone());

        controller.load(Some("tt404")).unwrap().await.unwrap();

        let state = controller.state();
        assert!(!state.is_loading);
        assert!(state.detail.is_none());
        assert_eq!(controller.document_title(), APP_TITLE);
    }

    #[tokio::test]
    async fn test_document_title() {
        let db = Arc::new(FakeDatabase::new().with_detail(detail("tt0068646", "The Godfather", "175 min", "9.2")));
        let controller = DetailController::new(db.clone());
        assert_eq!(controller.document_title(), "usePopcorn");

        controller.load(Some("tt0068646")).unwrap().await.unwrap();
        assert_eq!(controller.document_title(), "Movie | The Godfather");

        controller.load(None);
        assert_eq!(controller.document_title(), "usePopcorn");
    }
}
