use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use super::{CatalogApi, CatalogRequest};
use crate::models::GenreRef;

// The genre reference list barely ever changes; refresh it at most daily.
pub const GENRE_TTL_SECONDS: u64 = 86_400;

// Genre browsing is an enhancement. When the list cannot be fetched the
// caller renders nothing in its place, not a placeholder and not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("genre catalog absent")]
pub struct FeatureAbsent;

#[derive(Clone)]
pub struct GenreCatalog {
    api: Arc<dyn CatalogApi>,
}

impl GenreCatalog {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self { api }
    }

    pub async fn list_genres(&self) -> Result<Vec<GenreRef>, FeatureAbsent> {
        let request = CatalogRequest::new("genre/movie/list")
            .param("language", "en")
            .ttl_seconds(GENRE_TTL_SECONDS);
        match self.api.genre_list(&request).await {
            Ok(genres) => Ok(genres),
            Err(_) => {
                debug!("Genre list unavailable, omitting the feature");
                Err(FeatureAbsent)
            }
        }
    }
}
