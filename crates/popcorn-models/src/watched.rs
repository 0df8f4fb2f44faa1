use serde::{Deserialize, Serialize};
use crate::movie_detail::MovieDetail;
use crate::rating::UserRating;

/// A movie the user has watched and rated
///
/// Serialized with the field names of the stored `watched` snapshot, so
/// snapshots written by earlier sessions restore unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedRecord {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub poster: String,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: Option<f64>,
    #[serde(default)]
    pub runtime: Option<u32>, // Minutes
    #[serde(rename = "userRating")]
    pub user_rating: UserRating,
}

impl WatchedRecord {
    /// Build the record for the title currently being viewed
    pub fn from_detail(imdb_id: impl Into<String>, detail: &MovieDetail, user_rating: UserRating) -> Self {
        Self {
            imdb_id: imdb_id.into(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            poster: detail.poster.clone(),
            imdb_rating: detail.external_rating(),
            runtime: detail.runtime_minutes(),
            user_rating,
        }
    }
}
