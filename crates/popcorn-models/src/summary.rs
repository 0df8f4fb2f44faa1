use serde::Serialize;
use crate::watched::WatchedRecord;

/// Aggregates shown above the watched list
///
/// Means over an empty input are NaN; callers format them as-is.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WatchedSummary {
    pub count: usize,
    pub avg_imdb_rating: f64,
    pub avg_user_rating: f64,
    pub avg_runtime: f64,
}

impl WatchedSummary {
    pub fn from_records(records: &[WatchedRecord]) -> Self {
        Self {
            count: records.len(),
            avg_imdb_rating: mean(records.iter().filter_map(|r| r.imdb_rating)),
            avg_user_rating: mean(records.iter().map(|r| r.user_rating.value() as f64)),
            avg_runtime: mean(records.iter().filter_map(|r| r.runtime.map(f64::from))),
        }
    }
}

/// Arithmetic mean; NaN for an empty sequence
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, len) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, len), v| (sum + v, len + 1));
    sum / len as f64
}
