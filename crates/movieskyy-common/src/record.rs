//! Catalog records as received from upstream, and their display form.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A movie entry exactly as the upstream catalog returned it.
///
/// Fields the catalog sends that are not modelled here are kept in `extra`
/// and written back out untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    /// Relative image path such as `/abc123.jpg`.
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Average rating on a 0-10 scale.
    #[serde(default)]
    pub vote_average: f64,
    /// ISO `YYYY-MM-DD`. TMDB sends an empty string for unknown dates.
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub adult: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of a catalog listing or search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<CatalogRecord>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn first_page() -> u32 {
    1
}

/// A [`CatalogRecord`] prepared for display.
///
/// The absolute image URLs are serialized under the upstream field names
/// (`poster_path`, `backdrop_path`), which is the shape browser clients of
/// the proxy routes expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRecord {
    pub id: u64,
    pub title: String,
    pub overview: String,
    #[serde(rename = "poster_path")]
    pub poster_url: Option<String>,
    #[serde(rename = "backdrop_path")]
    pub backdrop_url: Option<String>,
    pub vote_average: f64,
    pub release_date: Option<String>,
    pub release_date_formatted: String,
    pub adult: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_keeps_unknown_fields() {
        let raw = json!({
            "id": 42,
            "title": "Dune",
            "overview": "Spice.",
            "poster_path": "/p.jpg",
            "backdrop_path": null,
            "vote_average": 8.1,
            "release_date": "2021-09-15",
            "adult": false,
            "genre_ids": [878, 12],
            "popularity": 120.5
        });

        let record: CatalogRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.id, 42);
        assert_eq!(record.backdrop_path, None);
        assert_eq!(record.extra["genre_ids"], json!([878, 12]));

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["popularity"], json!(120.5));
    }

    #[test]
    fn record_tolerates_missing_optionals() {
        let record: CatalogRecord = serde_json::from_value(json!({"id": 7})).unwrap();
        assert_eq!(record.title, "");
        assert_eq!(record.poster_path, None);
        assert_eq!(record.release_date, None);
        assert!(!record.adult);
    }

    #[test]
    fn page_defaults_when_fields_absent() {
        let page: CatalogPage = serde_json::from_value(json!({"results": []})).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn display_record_uses_upstream_image_keys() {
        let record = DisplayRecord {
            id: 1,
            title: "Heat".into(),
            overview: String::new(),
            poster_url: Some("https://image.tmdb.org/t/p/w500/h.jpg".into()),
            backdrop_url: None,
            vote_average: 7.9,
            release_date: Some("1995-12-15".into()),
            release_date_formatted: "15 Desember 1995".into(),
            adult: false,
            extra: Map::new(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["poster_path"], "https://image.tmdb.org/t/p/w500/h.jpg");
        assert!(json["backdrop_path"].is_null());
        assert!(json.get("poster_url").is_none());
    }
}
