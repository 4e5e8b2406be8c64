//! Web search endpoints backed by the time-windowed result cache.
//!
//! A lookup returns the cached rows for the same owner and query while they
//! are fresh, otherwise it asks the search provider and stores what comes
//! back. The `search-results` endpoints only read what is stored.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{validate_id, validate_limit, validate_search_query};
use super::{ApiError, ApiResponse, AppState, SearchResultsDto};
use crate::services::ScopeKind;

#[derive(Debug, Default, Deserialize)]
pub struct ExerciseSearchRequest {
    pub query: Option<String>,
    /// Extra terms appended to an explicit query, such as a language name.
    pub context: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LectureSearchRequest {
    pub lecture_id: i32,
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecentResultsQuery {
    pub limit: Option<u64>,
}

/// Searches the web for material related to a code exercise.
///
/// # Endpoint
/// `POST /api/exercises/{id}/search`
///
/// Without a query, the search uses the exercise description up to its
/// first colon.
pub async fn search_exercise(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(request): Json<ExerciseSearchRequest>,
) -> Result<Json<ApiResponse<SearchResultsDto>>, ApiError> {
    let id = validate_id("exercise", id)?;
    let query = validate_search_query(request.query.as_deref())?;

    let results = state
        .study_search
        .search_exercise(id, query, request.context.as_deref())
        .await?;

    Ok(Json(ApiResponse::success(SearchResultsDto { results })))
}

/// Searches the web for material related to a lecture.
///
/// # Endpoint
/// `POST /api/lectures/search`
pub async fn search_lecture(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LectureSearchRequest>,
) -> Result<Json<ApiResponse<SearchResultsDto>>, ApiError> {
    let id = validate_id("lecture", request.lecture_id)?;
    let query = validate_search_query(request.query.as_deref())?;

    let results = state.study_search.search_lecture(id, query).await?;

    Ok(Json(ApiResponse::success(SearchResultsDto { results })))
}

/// Most recently stored results for an exercise, newest first.
///
/// # Endpoint
/// `GET /api/exercises/{id}/search-results?limit=`
pub async fn exercise_results(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(params): Query<RecentResultsQuery>,
) -> Result<Json<ApiResponse<SearchResultsDto>>, ApiError> {
    recent_results(&state, ScopeKind::Exercise, id, params.limit).await
}

/// Most recently stored results for a lecture, newest first.
///
/// # Endpoint
/// `GET /api/lectures/{id}/search-results?limit=`
pub async fn lecture_results(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Query(params): Query<RecentResultsQuery>,
) -> Result<Json<ApiResponse<SearchResultsDto>>, ApiError> {
    recent_results(&state, ScopeKind::Lecture, id, params.limit).await
}

async fn recent_results(
    state: &AppState,
    kind: ScopeKind,
    id: i32,
    limit: Option<u64>,
) -> Result<Json<ApiResponse<SearchResultsDto>>, ApiError> {
    let id = validate_id(kind.as_str(), id)?;
    let limit = limit.map(validate_limit).transpose()?;

    let results = state.study_search.recent(kind, id, limit).await?;

    Ok(Json(ApiResponse::success(SearchResultsDto { results })))
}
