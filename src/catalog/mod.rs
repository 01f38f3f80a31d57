use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

use crate::models::{GenreRef, MovieSummary};

mod cache;
mod categories;
mod client;
mod genres;

pub use categories::{Category, CategoryAggregator};
pub use client::CatalogClient;
pub use genres::{FeatureAbsent, GenreCatalog, GENRE_TTL_SECONDS};

// The catalog's default revalidation window: one day.
pub const DEFAULT_TTL_SECONDS: u64 = 86_400;

// The one failure callers ever see from the catalog. Transport faults,
// bad statuses, and unparseable bodies all collapse into it behind the
// client boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("catalog unavailable")]
pub struct Unavailable;

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn movie_list(&self, request: &CatalogRequest)
        -> Result<Vec<MovieSummary>, Unavailable>;
    async fn genre_list(&self, request: &CatalogRequest) -> Result<Vec<GenreRef>, Unavailable>;
}

// One outgoing catalog call: endpoint, query parameters, and how long a
// successful response may be served from cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRequest {
    endpoint: String,
    params: BTreeMap<String, String>,
    ttl: Duration,
}

impl CatalogRequest {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            params: BTreeMap::new(),
            ttl: Duration::from_secs(DEFAULT_TTL_SECONDS),
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    // An absent value leaves the key out of the query entirely; no
    // placeholder text ever stands in for it.
    pub fn maybe_param(mut self, key: &str, value: Option<impl Into<String>>) -> Self {
        if let Some(value) = value {
            self.params.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn ttl_seconds(mut self, secs: u64) -> Self {
        self.ttl = Duration::from_secs(secs);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // Params iterate in key order with names and values escaped, so one
    // logical request always maps to the same slot and two different
    // requests never serialize to the same key.
    pub fn cache_key(&self) -> String {
        let mut key = self.endpoint.clone();
        for (i, (name, value)) in self.params.iter().enumerate() {
            key.push(if i == 0 { '?' } else { '&' });
            key.push_str(&urlencoding::encode(name));
            key.push('=');
            key.push_str(&urlencoding::encode(value));
        }
        key
    }
}
