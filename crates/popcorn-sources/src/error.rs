use thiserror::Error;

/// Why a fetch produced no data
///
/// The `Display` text is the message shown to the user; the underlying cause
/// is kept as the error source for the logs.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API answered but had no matching titles
    #[error("Movie not found")]
    NotFound,

    #[error("Unable to get movies")]
    Status(u16),

    #[error("Unable to get movies")]
    Transport(#[from] reqwest::Error),

    #[error("Unable to get movies")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound)
    }

    /// One-line description including the cause, for diagnostics
    pub fn detail(&self) -> String {
        match self {
            FetchError::NotFound => self.to_string(),
            FetchError::Status(status) => format!("{} (HTTP {})", self, status),
            FetchError::Transport(e) => format!("{} ({})", self, e),
            FetchError::Decode(e) => format!("{} (invalid response: {})", self, e),
        }
    }
}
