use futures::future::join_all;
use std::sync::Arc;
use tracing::debug;

use super::{CatalogApi, CatalogRequest};
use crate::models::CategoryBundle;

// One named row of the browse page and the request that fills it.
#[derive(Debug, Clone)]
pub struct Category {
    label: String,
    request: CatalogRequest,
}

impl Category {
    pub fn new(label: impl Into<String>, request: CatalogRequest) -> Self {
        Self {
            label: label.into(),
            request,
        }
    }

    pub fn upcoming() -> Self {
        Self::new("Upcoming", movie_list_request("movie/upcoming"))
    }

    pub fn top_rated() -> Self {
        Self::new("Top Rated", movie_list_request("movie/top_rated"))
    }

    pub fn popular() -> Self {
        Self::new("Popular", movie_list_request("movie/popular"))
    }

    pub fn discover(genre_id: Option<&str>, keywords: Option<&str>) -> Self {
        Self::new(
            "Discover",
            movie_list_request("discover/movie")
                .maybe_param("with_genres", genre_id)
                .maybe_param("with_keywords", keywords),
        )
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn request(&self) -> &CatalogRequest {
        &self.request
    }
}

// The standard list parameters every category carries.
fn movie_list_request(endpoint: &str) -> CatalogRequest {
    CatalogRequest::new(endpoint)
        .param("include_adult", "false")
        .param("include_video", "false")
        .param("sort_by", "popularity.desc")
        .param("language", "en-US")
        .param("page", "1")
}

#[derive(Clone)]
pub struct CategoryAggregator {
    api: Arc<dyn CatalogApi>,
}

impl CategoryAggregator {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self { api }
    }

    // Fires every category fetch concurrently and joins them all. Output
    // order is the input order, never completion order, and a category that
    // comes back unavailable still produces its bundle with no movies, so
    // the page shape does not depend on upstream health. No retries: one
    // miss is final for this render.
    pub async fn load_page(&self, categories: Vec<Category>) -> Vec<CategoryBundle> {
        let fetches = categories.into_iter().map(|category| {
            let api = Arc::clone(&self.api);
            async move {
                let movies = match api.movie_list(category.request()).await {
                    Ok(movies) => movies,
                    Err(_) => {
                        debug!("Category '{}' unavailable, rendering empty", category.label());
                        Vec::new()
                    }
                };
                CategoryBundle {
                    label: category.label,
                    movies,
                }
            }
        });
        join_all(fetches).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Unavailable;
    use crate::models::{GenreRef, MovieSummary};
    use async_trait::async_trait;
    use std::time::Duration;

    fn movie(id: i64, title: &str) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            overview: "A test movie.".to_string(),
            backdrop_path: None,
            poster_path: None,
            popularity: 1.0,
            release_date: "2024-01-01".to_string(),
            vote_average: 7.0,
            vote_count: 100,
            genre_ids: vec![28],
            adult: false,
            original_language: "en".to_string(),
            original_title: title.to_string(),
            video: false,
        }
    }

    // Succeeds or fails per endpoint, and stalls the endpoints listed in
    // `slow` so completion order differs from input order.
    struct StaggeredCatalog {
        failing: Vec<&'static str>,
        slow: Vec<&'static str>,
    }

    #[async_trait]
    impl CatalogApi for StaggeredCatalog {
        async fn movie_list(
            &self,
            request: &CatalogRequest,
        ) -> Result<Vec<MovieSummary>, Unavailable> {
            if self.slow.contains(&request.endpoint()) {
                tokio::time::sleep(Duration::from_millis(40)).await;
            }
            if self.failing.contains(&request.endpoint()) {
                return Err(Unavailable);
            }
            Ok(vec![movie(1, request.endpoint())])
        }

        async fn genre_list(
            &self,
            _request: &CatalogRequest,
        ) -> Result<Vec<GenreRef>, Unavailable> {
            Err(Unavailable)
        }
    }

    #[tokio::test]
    async fn preserves_input_order_regardless_of_completion_order() {
        let aggregator = CategoryAggregator::new(Arc::new(StaggeredCatalog {
            failing: vec![],
            slow: vec!["movie/upcoming", "movie/top_rated"],
        }));

        let bundles = aggregator
            .load_page(vec![
                Category::upcoming(),
                Category::top_rated(),
                Category::popular(),
            ])
            .await;

        let labels: Vec<&str> = bundles.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Upcoming", "Top Rated", "Popular"]);
    }

    #[tokio::test]
    async fn unavailable_category_yields_empty_bundle_not_a_gap() {
        let aggregator = CategoryAggregator::new(Arc::new(StaggeredCatalog {
            failing: vec!["movie/top_rated"],
            slow: vec![],
        }));

        let bundles = aggregator
            .load_page(vec![
                Category::upcoming(),
                Category::top_rated(),
                Category::popular(),
            ])
            .await;

        assert_eq!(bundles.len(), 3);
        assert_eq!(bundles[1].label, "Top Rated");
        assert!(bundles[1].movies.is_empty());
        assert!(!bundles[0].movies.is_empty());
        assert!(!bundles[2].movies.is_empty());
    }

    #[tokio::test]
    async fn all_categories_down_still_keeps_the_page_shape() {
        let aggregator = CategoryAggregator::new(Arc::new(StaggeredCatalog {
            failing: vec!["discover/movie", "movie/upcoming", "movie/top_rated", "movie/popular"],
            slow: vec![],
        }));

        let bundles = aggregator
            .load_page(vec![
                Category::discover(None, None),
                Category::upcoming(),
                Category::top_rated(),
                Category::popular(),
            ])
            .await;

        assert_eq!(bundles.len(), 4);
        assert!(bundles.iter().all(|b| b.movies.is_empty()));
    }

    #[test]
    fn categories_carry_the_standard_list_params() {
        let upcoming = Category::upcoming();
        let params = upcoming.request().params();
        assert_eq!(params.get("include_adult").map(String::as_str), Some("false"));
        assert_eq!(params.get("include_video").map(String::as_str), Some("false"));
        assert_eq!(params.get("sort_by").map(String::as_str), Some("popularity.desc"));
        assert_eq!(params.get("language").map(String::as_str), Some("en-US"));
        assert_eq!(params.get("page").map(String::as_str), Some("1"));
        assert_eq!(upcoming.label(), "Upcoming");
    }

    #[test]
    fn discover_omits_filters_that_are_not_set() {
        let genre_only = Category::discover(Some("28"), None);
        let params = genre_only.request().params();
        assert_eq!(params.get("with_genres").map(String::as_str), Some("28"));
        assert!(!params.contains_key("with_keywords"));

        let bare = Category::discover(None, None);
        assert!(!bare.request().params().contains_key("with_genres"));
        assert!(!bare.request().params().contains_key("with_keywords"));
        assert!(!bare.request().cache_key().contains("undefined"));
    }
}
