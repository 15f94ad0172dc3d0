//! TMDB proxy routes.
//!
//! `GET /api/movies?type=&page=` and `GET /api/movies/search?q=&page=`
//! forward to the catalog client, normalize the results and attach
//! shared-cache headers.

use axum::{
    extract::{Query, State},
    http::{header, HeaderName},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use movieskyy_common::{CatalogMode, CatalogPage, Category, DisplayRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::ProxyError;
use super::AppContext;
use crate::catalog::FetchError;

const CDN_CACHE_CONTROL: &str = "cdn-cache-control";

pub fn movie_routes() -> Router<AppContext> {
    Router::new()
        .route("/movies", get(list_movies))
        .route("/movies/search", get(search_movies))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<String>,
}

/// Upstream page with normalized results.
///
/// Fields the upstream sent that are not modelled here are passed through.
#[derive(Debug, Serialize)]
pub struct MoviesResponse {
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub page: u32,
    pub results: Vec<DisplayRecord>,
    pub total_pages: u32,
    pub total_results: u64,
    pub last_updated: DateTime<Utc>,
}

/// Unknown or missing listing types fall back to `popular`.
fn resolve_category(kind: Option<&str>) -> Category {
    kind.and_then(|k| k.parse().ok()).unwrap_or(Category::Popular)
}

/// Pages are 1-based; anything unparseable becomes page 1.
fn resolve_page(page: Option<&str>) -> u32 {
    page.and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

fn cache_headers(max_age: u32) -> [(HeaderName, String); 2] {
    [
        (
            header::CACHE_CONTROL,
            format!("public, max-age={max_age}, s-maxage={max_age}"),
        ),
        (HeaderName::from_static(CDN_CACHE_CONTROL), format!("public, max-age={max_age}")),
    ]
}

fn into_response(ctx: &AppContext, page: CatalogPage, max_age: u32) -> Response {
    let CatalogPage {
        page: page_number,
        results,
        total_pages,
        total_results,
        extra,
    } = page;

    let body = MoviesResponse {
        extra,
        page: page_number,
        results: results
            .into_iter()
            .map(|record| ctx.normalizer.normalize_record(record))
            .collect(),
        total_pages,
        total_results,
        last_updated: Utc::now(),
    };

    (cache_headers(max_age), Json(body)).into_response()
}

async fn list_movies(
    State(ctx): State<AppContext>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ProxyError> {
    let category = resolve_category(query.kind.as_deref());
    let page = resolve_page(query.page.as_deref());

    tracing::debug!(%category, page, "Proxying listing request");

    let result = ctx
        .client
        .fetch_catalog(&CatalogMode::category(category), page)
        .await
        .map_err(|e| ProxyError::new(e, "Failed to fetch movies"))?;

    Ok(into_response(&ctx, result, ctx.config.cache.listing_max_age_secs))
}

async fn search_movies(
    State(ctx): State<AppContext>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, ProxyError> {
    if !ctx.client.has_credential() {
        return Err(ProxyError::new(FetchError::MissingCredential, "Failed to search movies"));
    }

    let text = query.q.as_deref().map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(ProxyError::missing_query());
    }
    let page = resolve_page(query.page.as_deref());

    tracing::debug!(query = text, page, "Proxying search request");

    let result = ctx
        .client
        .fetch_catalog(&CatalogMode::search(text), page)
        .await
        .map_err(|e| ProxyError::new(e, "Failed to search movies"))?;

    Ok(into_response(&ctx, result, ctx.config.cache.search_max_age_secs))
}
