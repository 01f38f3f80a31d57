use std::env;

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

// All catalog access flows through this value; nothing else reads the
// environment at call time. A missing credential is a supported degraded
// mode, not a configuration error.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl CatalogConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
        }
    }

    pub fn from_env() -> Self {
        let api_key = env::var("TMDB_API_KEY").ok().filter(|s| !s.is_empty());
        Self::new(api_key)
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}
