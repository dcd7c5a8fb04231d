//! HTTP route handlers: the HTML page plus a small JSON API.

use crate::error::{RecommenderError, Result};
use crate::recommend::RecommendedBook;
use crate::server::page::{IndexPage, TRAINING_DONE};
use crate::server::AppState;
use crate::training::{self, TrainingSummary};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

// --- Request/Response types ---

#[derive(Deserialize)]
pub struct RecommendPageQuery {
    pub book: Option<String>,
}

#[derive(Deserialize)]
pub struct RecommendRequest {
    pub title: String,
}

#[derive(Serialize)]
pub struct RecommendResponse {
    pub query: String,
    pub titles: Vec<String>,
    pub poster_urls: Vec<String>,
    pub books: Vec<RecommendedBook>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub artifacts_ready: bool,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

// --- Router ---

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/train", post(train_page))
        .route("/recommend", get(recommend_page))
        .route("/api/books", get(list_books))
        .route("/api/recommend", get(recommend_books))
        .route("/api/train", post(train_books))
        .route("/health", get(health))
        .with_state(state)
}

// --- Page handlers ---

async fn index_page(State(state): State<Arc<AppState>>) -> IndexPage {
    load_page(&state).await
}

async fn train_page(State(state): State<Arc<AppState>>) -> IndexPage {
    let config = state.config.clone();
    let trained = run_blocking(move || training::train_engine(&config)).await;

    let page = load_page(&state).await;
    match trained {
        Ok(_) => page.with_notice(TRAINING_DONE),
        Err(e) => {
            error!(error = %e, "training failed");
            page.with_error(&e)
        }
    }
}

async fn recommend_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecommendPageQuery>,
) -> IndexPage {
    let page = load_page(&state).await;
    if !page.is_interactive() {
        return page;
    }

    let book = query.book.unwrap_or_default();
    let recommendation = state.recommendation.clone();
    let title = book.clone();
    let result = run_blocking(move || recommendation.recommend(&title)).await;

    let page = page.with_selected(book);
    match result {
        Ok(recs) => page.with_recommendations(&recs),
        Err(e) => {
            error!(error = %e, "recommendation failed");
            page.with_error(&e)
        }
    }
}

async fn load_page(state: &AppState) -> IndexPage {
    let recommendation = state.recommendation.clone();
    IndexPage::new(run_blocking(move || recommendation.book_names()).await)
}

// --- API handlers ---

async fn list_books(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<Vec<String>>, ApiError> {
    let recommendation = state.recommendation.clone();
    let names = run_blocking(move || recommendation.book_names())
        .await
        .map_err(error_response)?;
    Ok(Json(names))
}

async fn recommend_books(
    State(state): State<Arc<AppState>>,
    Query(req): Query<RecommendRequest>,
) -> std::result::Result<Json<RecommendResponse>, ApiError> {
    let recommendation = state.recommendation.clone();
    let title = req.title.clone();
    let recs = run_blocking(move || recommendation.recommend(&title))
        .await
        .map_err(error_response)?;

    Ok(Json(RecommendResponse {
        query: req.title,
        titles: recs.titles().into_iter().map(str::to_string).collect(),
        poster_urls: recs.poster_urls().into_iter().map(str::to_string).collect(),
        books: recs.books().to_vec(),
    }))
}

async fn train_books(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<TrainingSummary>, ApiError> {
    let config = state.config.clone();
    let summary = run_blocking(move || training::train_engine(&config))
        .await
        .map_err(error_response)?;
    info!(books = summary.books, "training triggered over API");
    Ok(Json(summary))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let config = state.recommendation.store().config();
    let artifacts_ready = [
        &config.trained_model_path,
        &config.book_pivot_path,
        &config.final_rating_path,
        &config.book_names_path,
    ]
    .iter()
    .all(|p| p.exists());

    Json(HealthResponse {
        status: "ok".to_string(),
        artifacts_ready,
    })
}

// --- Helpers ---

/// Artifact reads and training block, so they run off the async workers.
async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| RecommenderError::Unknown {
            context: "blocking task".to_string(),
            source: Box::new(e),
        })?
}

fn error_response(e: RecommenderError) -> ApiError {
    let status = match &e {
        RecommenderError::NotFound { .. } => StatusCode::NOT_FOUND,
        RecommenderError::ArtifactIncompatible { .. } => StatusCode::CONFLICT,
        RecommenderError::InvalidData(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error!(status = status.as_u16(), error = %e, "request failed");
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}
