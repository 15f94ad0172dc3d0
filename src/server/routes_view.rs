//! Server-side view session routes.
//!
//! These drive the shared [`OrchestratorHandle`](crate::orchestrator::OrchestratorHandle):
//! commands return `202 Accepted` and the resulting state is read back from
//! `GET /api/view`.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use movieskyy_common::Category;
use serde::{Deserialize, Serialize};

use super::AppContext;
use crate::orchestrator::{OrchestratorHandle, ServiceClosed, ViewState};

pub fn view_routes() -> Router<AppContext> {
    Router::new()
        .route("/view", get(get_view))
        .route("/view/category", post(select_category))
        .route("/view/search", post(type_search).delete(clear_search))
        .route("/view/retry", post(retry))
}

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    #[serde(flatten)]
    pub state: ViewState,
    pub title: String,
    pub show_featured: bool,
}

impl From<ViewState> for ViewResponse {
    fn from(state: ViewState) -> Self {
        Self {
            title: state.title(),
            show_featured: state.shows_featured(),
            state,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectCategoryRequest {
    pub category: Category,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

type ViewResult = Result<StatusCode, (StatusCode, String)>;

fn view_handle(ctx: &AppContext) -> Result<&OrchestratorHandle, (StatusCode, String)> {
    ctx.view.as_ref().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "View session not enabled".to_string(),
    ))
}

fn closed(e: ServiceClosed) -> (StatusCode, String) {
    (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
}

async fn get_view(
    State(ctx): State<AppContext>,
) -> Result<Json<ViewResponse>, (StatusCode, String)> {
    let view = view_handle(&ctx)?;
    Ok(Json(ViewResponse::from(view.snapshot())))
}

async fn select_category(
    State(ctx): State<AppContext>,
    Json(request): Json<SelectCategoryRequest>,
) -> ViewResult {
    view_handle(&ctx)?
        .select_category(request.category)
        .await
        .map_err(closed)?;
    Ok(StatusCode::ACCEPTED)
}

/// Debounced: only the last text typed within the quiet period is fetched.
async fn type_search(
    State(ctx): State<AppContext>,
    Json(request): Json<SearchRequest>,
) -> ViewResult {
    view_handle(&ctx)?
        .type_search(request.query)
        .await
        .map_err(closed)?;
    Ok(StatusCode::ACCEPTED)
}

async fn clear_search(State(ctx): State<AppContext>) -> ViewResult {
    view_handle(&ctx)?.clear_search().await.map_err(closed)?;
    Ok(StatusCode::ACCEPTED)
}

async fn retry(State(ctx): State<AppContext>) -> ViewResult {
    view_handle(&ctx)?.retry().await.map_err(closed)?;
    Ok(StatusCode::ACCEPTED)
}
