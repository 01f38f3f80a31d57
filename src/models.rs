use serde::{Deserialize, Serialize};

const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/original";

// One movie row as the catalog returns it in list responses. Field names
// mirror the upstream JSON; art paths are frequently null and the overview
// is occasionally missing altogether.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    pub backdrop_path: Option<String>,
    pub poster_path: Option<String>,
    pub popularity: f64,
    #[serde(default)]
    pub release_date: String,
    pub vote_average: f64,
    pub vote_count: i64,
    pub genre_ids: Vec<i64>,
    pub adult: bool,
    pub original_language: String,
    pub original_title: String,
    pub video: bool,
}

impl MovieSummary {
    pub fn backdrop_url(&self) -> Option<String> {
        self.backdrop_path
            .as_ref()
            .map(|p| format!("{IMAGE_BASE}{p}"))
    }

    pub fn poster_url(&self) -> Option<String> {
        self.poster_path.as_ref().map(|p| format!("{IMAGE_BASE}{p}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreRef {
    pub id: i64,
    pub name: String,
}

impl GenreRef {
    // Drill-down link for one genre; the name rides along for display.
    pub fn browse_path(&self) -> String {
        format!("/genre/{}?genre={}", self.id, urlencoding::encode(&self.name))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBundle {
    pub label: String,
    pub movies: Vec<MovieSummary>,
}

// Page-model projection of a genre: what a menu needs to render one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreLink {
    pub id: i64,
    pub name: String,
    pub path: String,
}

impl From<&GenreRef> for GenreLink {
    fn from(genre: &GenreRef) -> Self {
        Self {
            id: genre.id,
            name: genre.name.clone(),
            path: genre.browse_path(),
        }
    }
}
