pub mod movie_detail;
pub mod rating;
pub mod search_result;
pub mod summary;
pub mod watched;

pub use movie_detail::{parse_runtime_minutes, MovieDetail};
pub use rating::{RatingError, UserRating};
pub use search_result::SearchResultItem;
pub use summary::{mean, WatchedSummary};
pub use watched::WatchedRecord;
