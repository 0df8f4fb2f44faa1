use popcorn_models::{MovieDetail, SearchResultItem};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use crate::error::FetchError;

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Search", default)]
    search: Vec<SearchResultItem>,
    #[serde(rename = "totalResults")]
    total_results: Option<String>,
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// Turn a search body into results, mapping `"Response": "False"` to not-found
///
/// OMDb answers "no matches" (and "too many results") with a 200 and a
/// `Response` flag, so the flag is checked before the list.
pub fn parse_search_response(body: &str) -> Result<Vec<SearchResultItem>, FetchError> {
    let data: OmdbSearchResponse = serde_json::from_str(body)?;

    if data.response.eq_ignore_ascii_case("false") {
        debug!("OMDb search returned no matches: {}", data.error.as_deref().unwrap_or("no error text"));
        return Err(FetchError::NotFound);
    }

    debug!(
        "OMDb search returned {} items ({} total)",
        data.search.len(),
        data.total_results.as_deref().unwrap_or("?")
    );
    Ok(data.search)
}

/// Detail bodies are taken as-is; a `"Response": "False"` body yields an
/// empty record rather than an error
pub fn parse_detail_response(body: &str) -> Result<MovieDetail, FetchError> {
    Ok(serde_json::from_str(body)?)
}

/// Search titles with `?apikey=..&s=..`
pub async fn search(
    client: &Client,
    base_url: &str,
    api_key: &str,
    query: &str,
) -> Result<Vec<SearchResultItem>, FetchError> {
    let response = client
        .get(base_url)
        .query(&[("apikey", api_key), ("s", query)])
        .header("Accept", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status().as_u16()));
    }

    let body = response.text().await?;
    parse_search_response(&body)
}

/// Fetch one title with `?apikey=..&i=..`
pub async fn get_details(
    client: &Client,
    base_url: &str,
    api_key: &str,
    imdb_id: &str,
) -> Result<MovieDetail, FetchError> {
    let response = client
        .get(base_url)
        .query(&[("apikey", api_key), ("i", imdb_id)])
        .header("Accept", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(FetchError::Status(response.status().as_u16()));
    }

    let body = response.text().await?;
    parse_detail_response(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_success() {
        let body = r#"{
            "Search": [
                {"Title": "The Godfather", "Year": "1972", "imdbID": "tt0068646", "Type": "movie", "Poster": "N/A"},
                {"Title": "The Godfather Part II", "Year": "1974", "imdbID": "tt0071562", "Type": "movie", "Poster": "N/A"}
            ],
            "totalResults": "2",
            "Response": "True"
        }"#;

        let results = parse_search_response(body).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].imdb_id, "tt0071562");
    }

    #[test]
    fn test_parse_search_not_found() {
        let body = r#"{"Response": "False", "Error": "Movie not found!"}"#;
        let err = parse_search_response(body).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Movie not found");
    }

    #[test]
    fn test_parse_search_too_many_results_is_not_found() {
        let body = r#"{"Response": "False", "Error": "Too many results."}"#;
        assert!(parse_search_response(body).unwrap_err().is_not_found());
    }

    #[test]
    fn test_parse_search_garbage_is_transport_error() {
        let err = parse_search_response("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        assert_eq!(err.to_string(), "Unable to get movies");
    }

    #[test]
    fn test_parse_detail() {
        let body = r#"{
            "Title": "The Godfather",
            "Year": "1972",
            "Released": "24 Mar 1972",
            "Runtime": "175 min",
            "Genre": "Crime, Drama",
            "Director": "Francis Ford Coppola",
            "Actors": "Marlon Brando, Al Pacino, James Caan",
            "Plot": "The aging patriarch of an organized crime dynasty transfers control to his reluctant son.",
            "Poster": "https://example.com/godfather.jpg",
            "imdbRating": "9.2",
            "imdbID": "tt0068646",
            "Response": "True"
        }"#;

        let detail = parse_detail_response(body).unwrap();
        assert_eq!(detail.director, "Francis Ford Coppola");
        assert_eq!(detail.runtime_minutes(), Some(175));
        assert!(detail.is_top());
    }

    #[test]
    fn test_parse_detail_error_body_is_empty_record() {
        let detail = parse_detail_response(r#"{"Response": "False", "Error": "Incorrect IMDb ID."}"#).unwrap();
        assert_eq!(detail, MovieDetail::default());
    }
}
