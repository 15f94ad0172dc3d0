//! Listing categories and the fetch mode built from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the fixed upstream listing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Trending,
    Popular,
    TopRated,
    NowPlaying,
    Upcoming,
}

impl Category {
    /// Every category, in the order the filter tabs list them.
    pub const ALL: [Category; 5] = [
        Category::Trending,
        Category::Popular,
        Category::TopRated,
        Category::NowPlaying,
        Category::Upcoming,
    ];

    /// Wire name used in query strings and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Trending => "trending",
            Category::Popular => "popular",
            Category::TopRated => "top_rated",
            Category::NowPlaying => "now_playing",
            Category::Upcoming => "upcoming",
        }
    }

    /// Path of the TMDB v3 endpoint serving this listing.
    pub fn upstream_path(&self) -> &'static str {
        match self {
            Category::Trending => "/trending/movie/day",
            Category::Popular => "/movie/popular",
            Category::TopRated => "/movie/top_rated",
            Category::NowPlaying => "/movie/now_playing",
            Category::Upcoming => "/movie/upcoming",
        }
    }

    /// Heading shown above the listing.
    pub fn title(&self) -> &'static str {
        match self {
            Category::Trending => "Trending Today",
            Category::Popular => "Popular Movies",
            Category::TopRated => "Top Rated Movies",
            Category::NowPlaying => "Now Playing",
            Category::Upcoming => "Coming Soon",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known category names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// What a single upstream request asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogMode {
    Category { value: Category },
    Search { query: String },
}

impl CatalogMode {
    pub fn category(category: Category) -> Self {
        CatalogMode::Category { value: category }
    }

    pub fn search(query: impl Into<String>) -> Self {
        CatalogMode::Search {
            query: query.into(),
        }
    }

    pub fn is_search(&self) -> bool {
        matches!(self, CatalogMode::Search { .. })
    }
}

impl fmt::Display for CatalogMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogMode::Category { value } => write!(f, "category:{value}"),
            CatalogMode::Search { query } => write!(f, "search:{query:?}"),
        }
    }
}
