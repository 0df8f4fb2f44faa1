pub mod api;
pub mod client;

pub use client::{create_omdb_client, OmdbClient};
