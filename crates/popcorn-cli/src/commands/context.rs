use color_eyre::eyre::eyre;
use color_eyre::Result;
use popcorn_config::{Config, CredentialStore, PathManager};
use popcorn_core::{JsonFileStore, KeyValueStore, Session, WatchlistManager};
use popcorn_sources::OmdbClient;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Paths and config resolved once per invocation
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        Ok(Self { paths, config })
    }

    /// `--log-file`, then `[logging] file`. Browse falls back to the log
    /// directory so tracing output stays off the prompt.
    pub fn log_file(&self, flag: Option<PathBuf>, interactive: bool) -> Option<PathBuf> {
        flag.or_else(|| self.config.logging.file.clone())
            .or_else(|| interactive.then(|| self.paths.log_file()))
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.config.storage.dir.clone().unwrap_or_else(|| self.paths.storage_dir())
    }

    pub fn credentials(&self) -> Result<CredentialStore> {
        let mut store = CredentialStore::new(self.paths.credentials_file());
        store
            .load()
            .map_err(|e| eyre!("Failed to load credentials: {}", e))?;
        Ok(store)
    }

    /// `--api-key` first, then the stored key
    pub fn resolve_api_key(&self, flag: Option<String>) -> Result<String> {
        if let Some(key) = flag.filter(|k| !k.trim().is_empty()) {
            debug!("Using API key from command line");
            return Ok(key);
        }

        self.credentials()?
            .get_omdb_api_key()
            .cloned()
            .ok_or_else(|| eyre!("No OMDb API key configured. Run 'popcorn config --api-key <KEY>' or pass --api-key."))
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::new(JsonFileStore::new(self.storage_dir()))
    }

    /// Watched list only; no network access needed
    pub fn watchlist(&self) -> WatchlistManager {
        WatchlistManager::restore(self.store(), self.config.storage.watched_key.clone())
    }

    pub fn open_session(&self, api_key: Option<String>) -> Result<Session> {
        let api_key = self.resolve_api_key(api_key)?;
        let client = OmdbClient::new(api_key).with_base_url(self.config.omdb.base_url.clone());
        Ok(Session::from_config(Arc::new(client), &self.config, self.store()))
    }
}
