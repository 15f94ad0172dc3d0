//! Turns raw catalog records into display records.
//!
//! Pure and infallible: a record missing optional fields still produces a
//! display record, with `None` image URLs and a fallback date text. Output
//! order and length always equal the input page.

use chrono::{Datelike, NaiveDate};
use movieskyy_common::{CatalogPage, CatalogRecord, DisplayRecord};

/// TMDB image CDN root.
pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
/// Medium size used for posters.
pub const POSTER_SIZE: &str = "w500";
/// Large size used for backdrops.
pub const BACKDROP_SIZE: &str = "w1280";

const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Locale used for the long release date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateLocale {
    /// `15 Maret 2024`
    Indonesian,
    /// `March 15, 2024`
    English,
}

impl DateLocale {
    /// Pick a locale from a TMDB language tag such as `id-ID` or `en-US`.
    pub fn from_language(language: &str) -> Self {
        let primary = language.split(['-', '_']).next().unwrap_or_default();
        if primary.eq_ignore_ascii_case("id") {
            DateLocale::Indonesian
        } else {
            DateLocale::English
        }
    }

    /// Text shown when a record has no usable release date.
    pub fn unavailable(&self) -> &'static str {
        match self {
            DateLocale::Indonesian => "Tanggal tidak tersedia",
            DateLocale::English => "Date unavailable",
        }
    }

    fn format(&self, date: NaiveDate) -> String {
        let month = date.month0() as usize;
        match self {
            DateLocale::Indonesian => {
                format!("{} {} {}", date.day(), MONTHS_ID[month], date.year())
            }
            DateLocale::English => {
                format!("{} {}, {}", MONTHS_EN[month], date.day(), date.year())
            }
        }
    }
}

/// Format an ISO `YYYY-MM-DD` date the way the listing shows it.
///
/// Absent, empty and unparseable dates all yield [`DateLocale::unavailable`].
pub fn format_release_date(date: Option<&str>, locale: DateLocale) -> String {
    date.map(str::trim)
        .filter(|d| !d.is_empty())
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .map(|d| locale.format(d))
        .unwrap_or_else(|| locale.unavailable().to_string())
}

/// Builds display records with fixed image bases and a date locale.
#[derive(Debug, Clone)]
pub struct Normalizer {
    poster_base: String,
    backdrop_base: String,
    locale: DateLocale,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(TMDB_IMAGE_BASE, "id-ID")
    }
}

impl Normalizer {
    pub fn new(image_base_url: &str, language: &str) -> Self {
        let root = image_base_url.trim_end_matches('/');
        Self {
            poster_base: format!("{root}/{POSTER_SIZE}"),
            backdrop_base: format!("{root}/{BACKDROP_SIZE}"),
            locale: DateLocale::from_language(language),
        }
    }

    pub fn poster_base(&self) -> &str {
        &self.poster_base
    }

    pub fn backdrop_base(&self) -> &str {
        &self.backdrop_base
    }

    pub fn locale(&self) -> DateLocale {
        self.locale
    }

    /// Normalize every record of a page, preserving upstream order.
    pub fn normalize(&self, page: CatalogPage) -> Vec<DisplayRecord> {
        page.results
            .into_iter()
            .map(|record| self.normalize_record(record))
            .collect()
    }

    pub fn normalize_record(&self, record: CatalogRecord) -> DisplayRecord {
        let release_date_formatted =
            format_release_date(record.release_date.as_deref(), self.locale);

        DisplayRecord {
            id: record.id,
            title: record.title,
            overview: record.overview,
            poster_url: image_url(&self.poster_base, record.poster_path.as_deref()),
            backdrop_url: image_url(&self.backdrop_base, record.backdrop_path.as_deref()),
            vote_average: record.vote_average,
            release_date: record.release_date,
            release_date_formatted,
            adult: record.adult,
            extra: record.extra,
        }
    }
}

fn image_url(base: &str, path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty()).map(|p| format!("{base}{p}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn record(id: u64, poster: Option<&str>, date: Option<&str>) -> CatalogRecord {
        CatalogRecord {
            id,
            title: format!("Movie {id}"),
            overview: String::new(),
            poster_path: poster.map(String::from),
            backdrop_path: Some("/back.jpg".into()),
            vote_average: 7.5,
            release_date: date.map(String::from),
            adult: false,
            extra: Map::new(),
        }
    }

    fn page(results: Vec<CatalogRecord>) -> CatalogPage {
        CatalogPage {
            page: 1,
            total_pages: 1,
            total_results: results.len() as u64,
            results,
            extra: Map::new(),
        }
    }

    #[test]
    fn null_poster_yields_no_url() {
        let display = Normalizer::default().normalize_record(record(1, None, None));
        assert_eq!(display.poster_url, None);
    }

    #[test]
    fn poster_url_is_medium_base_plus_path() {
        let normalizer = Normalizer::default();
        let display = normalizer.normalize_record(record(1, Some("/abc123.jpg"), None));
        assert_eq!(
            display.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/abc123.jpg")
        );
        assert_eq!(
            display.poster_url.unwrap(),
            format!("{}{}", normalizer.poster_base(), "/abc123.jpg")
        );
    }

    #[test]
    fn backdrop_uses_large_base() {
        let display = Normalizer::default().normalize_record(record(1, None, None));
        assert_eq!(
            display.backdrop_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w1280/back.jpg")
        );
    }

    #[test]
    fn missing_date_falls_back() {
        let display = Normalizer::default().normalize_record(record(1, None, None));
        assert_eq!(display.release_date_formatted, "Tanggal tidak tersedia");

        let english = Normalizer::new(TMDB_IMAGE_BASE, "en-US");
        let display = english.normalize_record(record(1, None, Some("")));
        assert_eq!(display.release_date_formatted, "Date unavailable");
    }

    #[test]
    fn unparseable_date_falls_back() {
        assert_eq!(
            format_release_date(Some("soon"), DateLocale::Indonesian),
            "Tanggal tidak tersedia"
        );
    }

    #[test]
    fn dates_format_per_locale() {
        assert_eq!(
            format_release_date(Some("2024-03-15"), DateLocale::Indonesian),
            "15 Maret 2024"
        );
        assert_eq!(
            format_release_date(Some("2024-03-05"), DateLocale::English),
            "March 5, 2024"
        );
    }

    #[test]
    fn locale_from_language_tag() {
        assert_eq!(DateLocale::from_language("id-ID"), DateLocale::Indonesian);
        assert_eq!(DateLocale::from_language("ID"), DateLocale::Indonesian);
        assert_eq!(DateLocale::from_language("en-US"), DateLocale::English);
        assert_eq!(DateLocale::from_language(""), DateLocale::English);
    }

    #[test]
    fn order_and_size_are_preserved() {
        let input = page(vec![
            record(3, None, None),
            record(1, None, None),
            record(3, None, None),
        ]);
        let ids: Vec<u64> = Normalizer::default()
            .normalize(input)
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![3, 1, 3]);
    }

    #[test]
    fn unknown_fields_pass_through() {
        let mut raw = record(9, None, None);
        raw.extra.insert("genre_ids".into(), json!([18]));
        let display = Normalizer::default().normalize_record(raw);
        assert_eq!(display.extra["genre_ids"], json!([18]));
    }

    #[test]
    fn custom_image_root_trailing_slash() {
        let normalizer = Normalizer::new("http://cdn.local/t/p/", "id-ID");
        assert_eq!(normalizer.poster_base(), "http://cdn.local/t/p/w500");
    }
}
