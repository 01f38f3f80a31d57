use crate::catalog::{CatalogApi, CatalogClient, Category, CategoryAggregator, GenreCatalog};
use crate::config::CatalogConfig;
use crate::models::{CategoryBundle, GenreLink, MovieSummary};
use crate::search::{Navigator, Rejected, SearchController, TracingNavigator};
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: CategoryAggregator,
    pub genres: GenreCatalog,
    pub navigator: Arc<dyn Navigator>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogApi>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            aggregator: CategoryAggregator::new(Arc::clone(&catalog)),
            genres: GenreCatalog::new(catalog),
            navigator,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub banner: Vec<MovieSummary>,
    pub carousels: Vec<CategoryBundle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<GenreLink>>,
}

#[derive(Debug, Serialize)]
pub struct GenrePage {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SearchPage {
    pub term: String,
}

pub async fn run_server(config: CatalogConfig) -> Result<()> {
    let catalog: Arc<dyn CatalogApi> = Arc::new(CatalogClient::new(config)?);
    let state = AppState::new(catalog, Arc::new(TracingNavigator));
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 3170));
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_page))
        .route("/genre/:id", get(genre_page))
        .route("/search", get(submit_search))
        .route("/search/:term", get(search_page))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

// The one full page: a discover banner, the three standard carousels, and
// the genre menu when the reference list is available. Categories that
// fail render as empty rows; the route itself never errors.
async fn home_page(State(state): State<AppState>) -> Json<HomePage> {
    let categories = vec![
        Category::discover(None, None),
        Category::upcoming(),
        Category::top_rated(),
        Category::popular(),
    ];
    let mut bundles = state.aggregator.load_page(categories).await.into_iter();
    let banner = bundles.next().map(|b| b.movies).unwrap_or_default();
    let carousels = bundles.collect();

    let genres = match state.genres.list_genres().await {
        Ok(list) => Some(list.iter().map(GenreLink::from).collect()),
        Err(_) => None,
    };

    Json(HomePage {
        banner,
        carousels,
        genres,
    })
}

#[derive(Debug, Deserialize)]
struct GenreParams {
    #[serde(default)]
    genre: String,
}

// Both route params are display-only strings and come back verbatim.
async fn genre_page(
    Path(id): Path<String>,
    Query(params): Query<GenreParams>,
) -> Json<GenrePage> {
    Json(GenrePage {
        id,
        name: params.genre,
    })
}

// The router has already percent-decoded the segment exactly once; it is
// displayed as received. An empty term is the one user-visible not-found
// in this app.
async fn search_page(Path(term): Path<String>) -> Result<Json<SearchPage>, StatusCode> {
    if term.is_empty() {
        return Err(StatusCode::NOT_FOUND);
    }
    info!("Showing results page for '{}'", term);
    Ok(Json(SearchPage { term }))
}

#[derive(Debug, Deserialize)]
struct SearchQueryParams {
    #[serde(default)]
    q: String,
}

// Server-side rendition of the search box submit: a valid term redirects
// to its results page, an invalid one does nothing at all.
async fn submit_search(
    State(state): State<AppState>,
    Query(params): Query<SearchQueryParams>,
) -> Response {
    let mut controller = SearchController::new(Arc::clone(&state.navigator));
    controller.on_change(params.q);
    match controller.on_submit() {
        Ok(intent) => Redirect::to(&intent.path).into_response(),
        Err(Rejected) => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
