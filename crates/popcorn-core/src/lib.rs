pub mod detail;
pub mod effect;
pub mod observe;
pub mod search;
pub mod selection;
pub mod session;
pub mod storage;
pub mod watchlist;

#[cfg(test)]
pub(crate) mod testing;

pub use detail::{DetailController, DetailState};
pub use effect::{Effect, Teardown};
pub use observe::{Observable, SubscriptionId};
pub use search::{SearchController, SearchState};
pub use selection::Selection;
pub use session::{Session, SessionError, APP_TITLE};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, StorageError, StorageSlot};
pub use watchlist::{WatchlistError, WatchlistManager};
