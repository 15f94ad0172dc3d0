use chrono::{DateTime, Utc};
use movieskyy_common::{CatalogMode, Category, DisplayRecord};
use serde::Serialize;

/// The (category, search text) pair a request was issued for.
///
/// A completion is only applied while this still equals the active pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ViewKey {
    pub category: Category,
    pub search_text: String,
}

impl ViewKey {
    /// Upstream request this pair maps to: a search when the text is
    /// non-empty, the category listing otherwise.
    pub fn mode(&self) -> CatalogMode {
        if self.search_text.is_empty() {
            CatalogMode::category(self.category)
        } else {
            CatalogMode::search(self.search_text.clone())
        }
    }
}

/// Everything a listing view needs to render.
///
/// Only the orchestrator mutates this; renderers get snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub category: Category,
    /// Trimmed search text; empty when browsing a category.
    pub search_text: String,
    /// Upstream page order.
    pub results: Vec<DisplayRecord>,
    pub loading: bool,
    pub searching: bool,
    pub auto_updating: bool,
    pub error: Option<String>,
    /// Sticky until a fetch succeeds.
    pub setup_required: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub featured: Option<DisplayRecord>,
}

impl ViewState {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            search_text: String::new(),
            results: Vec::new(),
            loading: false,
            searching: false,
            auto_updating: false,
            error: None,
            setup_required: false,
            last_updated: None,
            featured: None,
        }
    }

    pub fn active_key(&self) -> ViewKey {
        ViewKey {
            category: self.category,
            search_text: self.search_text.clone(),
        }
    }

    /// Heading for the current listing.
    pub fn title(&self) -> String {
        if self.searching {
            format!("Search results for \"{}\"", self.search_text)
        } else {
            self.category.title().to_string()
        }
    }

    /// Featured banner is only shown on the unsearched trending listing.
    pub fn shows_featured(&self) -> bool {
        !self.searching && self.category == Category::Trending && self.featured.is_some()
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Category::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_search_maps_to_category_listing() {
        let key = ViewKey {
            category: Category::Upcoming,
            search_text: String::new(),
        };
        assert_eq!(key.mode(), CatalogMode::category(Category::Upcoming));
    }

    #[test]
    fn search_text_maps_to_search() {
        let key = ViewKey {
            category: Category::Popular,
            search_text: "batman".into(),
        };
        assert_eq!(key.mode(), CatalogMode::search("batman"));
    }

    #[test]
    fn title_follows_mode() {
        let mut state = ViewState::new(Category::NowPlaying);
        assert_eq!(state.title(), "Now Playing");

        state.searching = true;
        state.search_text = "dune".into();
        assert_eq!(state.title(), "Search results for \"dune\"");
    }
}
