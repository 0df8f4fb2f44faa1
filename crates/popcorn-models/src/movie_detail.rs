use serde::{Deserialize, Serialize};

/// Full record for one title, as returned by the detail endpoint
///
/// Every field defaults to an empty string so a partial record still
/// deserializes. The record is replaced wholesale on each new selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieDetail {
    #[serde(rename = "imdbID", default)]
    pub imdb_id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
    #[serde(rename = "Runtime", default)]
    pub runtime: String, // Free text, e.g. "142 min"
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: String, // Numeric string, or "N/A"
    #[serde(rename = "Plot", default)]
    pub plot: String,
    #[serde(rename = "Released", default)]
    pub released: String,
    #[serde(rename = "Actors", default)]
    pub actors: String,
    #[serde(rename = "Director", default)]
    pub director: String,
    #[serde(rename = "Genre", default)]
    pub genre: String,
}

impl MovieDetail {
    /// External rating as a number, `None` when OMDb has no rating
    pub fn external_rating(&self) -> Option<f64> {
        self.imdb_rating.trim().parse::<f64>().ok().filter(|r| r.is_finite())
    }

    pub fn runtime_minutes(&self) -> Option<u32> {
        parse_runtime_minutes(&self.runtime)
    }

    /// Titles rated above 8 get highlighted
    pub fn is_top(&self) -> bool {
        self.external_rating().map(|r| r > 8.0).unwrap_or(false)
    }
}

/// Leading numeric token of a free-text runtime ("142 min" -> 142)
pub fn parse_runtime_minutes(runtime: &str) -> Option<u32> {
    runtime.split_whitespace().next()?.parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(runtime: &str, rating: &str) -> MovieDetail {
        MovieDetail {
            imdb_id: "tt0068646".to_string(),
            title: "The Godfather".to_string(),
            runtime: runtime.to_string(),
            imdb_rating: rating.to_string(),
            ..MovieDetail::default()
        }
    }

    #[test]
    fn test_parse_runtime_minutes() {
        assert_eq!(parse_runtime_minutes("142 min"), Some(142));
        assert_eq!(parse_runtime_minutes("  95 min"), Some(95));
        assert_eq!(parse_runtime_minutes("N/A"), None);
        assert_eq!(parse_runtime_minutes(""), None);
    }

    #[test]
    fn test_external_rating_and_top_flag() {
        assert_eq!(detail("175 min", "9.2").external_rating(), Some(9.2));
        assert!(detail("175 min", "9.2").is_top());
        assert!(!detail("175 min", "8.0").is_top());
        assert_eq!(detail("175 min", "N/A").external_rating(), None);
        assert!(!detail("175 min", "N/A").is_top());
    }

    #[test]
    fn test_deserialize_partial_record() {
        let json = r#"{
            "Title": "The Godfather",
            "Year": "1972",
            "Runtime": "175 min",
            "Genre": "Crime, Drama",
            "imdbRating": "9.2",
            "imdbID": "tt0068646",
            "Response": "True"
        }"#;

        let detail: MovieDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.title, "The Godfather");
        assert_eq!(detail.runtime_minutes(), Some(175));
        assert_eq!(detail.plot, "");
        assert_eq!(detail.director, "");
    }
}
