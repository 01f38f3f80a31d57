use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::cache::ResponseCache;
use super::{CatalogApi, CatalogRequest, Unavailable};
use crate::config::CatalogConfig;
use crate::models::{GenreRef, MovieSummary};

#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    config: CatalogConfig,
    cache: ResponseCache<Value>,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let user_agent = format!("marquee/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .context("Failed to build catalog HTTP client")?;
        Ok(Self {
            client,
            config,
            cache: ResponseCache::new(),
        })
    }

    // The single recovery boundary for catalog access. Whatever goes wrong
    // past this point is logged and handed back as Unavailable; callers
    // render empty instead of failing.
    async fn fetch_category<T: DeserializeOwned>(
        &self,
        request: &CatalogRequest,
    ) -> Result<T, Unavailable> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            debug!(
                "No catalog credential configured, skipping {}",
                request.endpoint()
            );
            return Err(Unavailable);
        };

        let key = request.cache_key();
        if let Some(cached) = self.cache.get(&key) {
            debug!("Serving {} from cache", key);
            return decode(request.endpoint(), cached);
        }

        let url = format!("{}/{}", self.config.base_url, request.endpoint());
        let response = match self
            .client
            .get(&url)
            .query(request.params())
            .header(header::AUTHORIZATION, format!("Bearer {api_key}"))
            .header(header::ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Catalog request to {} failed: {}", request.endpoint(), e);
                return Err(Unavailable);
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(
                    "Reading catalog response from {} failed: {}",
                    request.endpoint(),
                    e
                );
                return Err(Unavailable);
            }
        };
        if !status.is_success() {
            warn!(
                "Catalog returned {} for {}: {}",
                status,
                request.endpoint(),
                body
            );
            return Err(Unavailable);
        }

        let value: Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(e) => {
                warn!(
                    "Catalog response from {} is not valid JSON: {}",
                    request.endpoint(),
                    e
                );
                return Err(Unavailable);
            }
        };

        self.cache.insert(key, value.clone(), request.ttl());
        decode(request.endpoint(), value)
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, value: Value) -> Result<T, Unavailable> {
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            warn!("Catalog response from {} has unexpected shape: {}", endpoint, e);
            Err(Unavailable)
        }
    }
}

#[derive(Debug, Deserialize)]
struct MovieListResponse {
    results: Vec<MovieSummary>,
}

#[derive(Debug, Deserialize)]
struct GenreListResponse {
    genres: Vec<GenreRef>,
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn movie_list(
        &self,
        request: &CatalogRequest,
    ) -> Result<Vec<MovieSummary>, Unavailable> {
        let page: MovieListResponse = self.fetch_category(request).await?;
        Ok(page.results)
    }

    async fn genre_list(&self, request: &CatalogRequest) -> Result<Vec<GenreRef>, Unavailable> {
        let list: GenreListResponse = self.fetch_category(request).await?;
        Ok(list.genres)
    }
}
