//! Course content endpoints: subjects, weeks, lectures and code exercises.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{validate_id, validate_lecture_kind, validate_name};
use super::{ApiError, ApiResponse, AppState, ExerciseDto, LectureDto, SubjectDto, WeekDto};
use crate::models::course::{NewExercise, NewLecture, NewSubject, NewWeek};

#[derive(Debug, Deserialize)]
pub struct WeekFilter {
    pub subject_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct LectureFilter {
    pub week_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ExerciseFilter {
    pub lecture_id: Option<i32>,
}

/// # Endpoint
/// `GET /api/subjects`
pub async fn list_subjects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<SubjectDto>>>, ApiError> {
    let subjects = state.store.list_subjects().await?;
    Ok(Json(ApiResponse::success(
        subjects.into_iter().map(SubjectDto::from).collect(),
    )))
}

/// # Endpoint
/// `POST /api/subjects`
pub async fn create_subject(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewSubject>,
) -> Result<Json<ApiResponse<SubjectDto>>, ApiError> {
    validate_name("Subject name", &payload.name)?;

    let subject = state.store.create_subject(payload).await?;
    Ok(Json(ApiResponse::success(subject.into())))
}

/// # Endpoint
/// `GET /api/weeks?subject_id=`
pub async fn list_weeks(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<WeekFilter>,
) -> Result<Json<ApiResponse<Vec<WeekDto>>>, ApiError> {
    let weeks = state.store.list_weeks(filter.subject_id).await?;
    Ok(Json(ApiResponse::success(
        weeks.into_iter().map(WeekDto::from).collect(),
    )))
}

/// # Endpoint
/// `POST /api/weeks`
pub async fn create_week(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewWeek>,
) -> Result<Json<ApiResponse<WeekDto>>, ApiError> {
    let subject_id = validate_id("subject", payload.subject_id)?;
    if state.store.get_subject(subject_id).await?.is_none() {
        return Err(ApiError::not_found("Subject", subject_id));
    }

    let week = state.store.create_week(payload).await?;
    Ok(Json(ApiResponse::success(week.into())))
}

/// # Endpoint
/// `GET /api/lectures?week_id=`
pub async fn list_lectures(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<LectureFilter>,
) -> Result<Json<ApiResponse<Vec<LectureDto>>>, ApiError> {
    let lectures = state.store.list_lectures(filter.week_id).await?;
    Ok(Json(ApiResponse::success(
        lectures.into_iter().map(LectureDto::from).collect(),
    )))
}

/// # Endpoint
/// `POST /api/lectures`
pub async fn create_lecture(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewLecture>,
) -> Result<Json<ApiResponse<LectureDto>>, ApiError> {
    validate_name("Lecture name", &payload.name)?;
    validate_lecture_kind(&payload.kind)?;
    let week_id = validate_id("week", payload.week_id)?;
    if state.store.get_week(week_id).await?.is_none() {
        return Err(ApiError::not_found("Week", week_id));
    }

    let lecture = state.store.create_lecture(payload).await?;
    Ok(Json(ApiResponse::success(lecture.into())))
}

/// # Endpoint
/// `GET /api/lectures/{id}`
pub async fn get_lecture(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<LectureDto>>, ApiError> {
    let id = validate_id("lecture", id)?;
    let lecture = state
        .store
        .get_lecture(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Lecture", id))?;

    Ok(Json(ApiResponse::success(lecture.into())))
}

/// Deletes a lecture along with its weekly content and cached search results.
///
/// # Endpoint
/// `DELETE /api/lectures/{id}`
pub async fn delete_lecture(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_id("lecture", id)?;
    if !state.store.delete_lecture(id).await? {
        return Err(ApiError::not_found("Lecture", id));
    }

    tracing::info!("Deleted lecture {}", id);
    Ok(Json(ApiResponse::success(())))
}

/// # Endpoint
/// `GET /api/exercises?lecture_id=`
pub async fn list_exercises(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ExerciseFilter>,
) -> Result<Json<ApiResponse<Vec<ExerciseDto>>>, ApiError> {
    let exercises = state.store.list_exercises(filter.lecture_id).await?;
    Ok(Json(ApiResponse::success(
        exercises.into_iter().map(ExerciseDto::from).collect(),
    )))
}

/// # Endpoint
/// `POST /api/exercises`
pub async fn create_exercise(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewExercise>,
) -> Result<Json<ApiResponse<ExerciseDto>>, ApiError> {
    validate_name("Exercise title", &payload.title)?;
    if let Some(lecture_id) = payload.lecture_id {
        let lecture_id = validate_id("lecture", lecture_id)?;
        if state.store.get_lecture(lecture_id).await?.is_none() {
            return Err(ApiError::not_found("Lecture", lecture_id));
        }
    }

    let exercise = state.store.create_exercise(payload).await?;
    Ok(Json(ApiResponse::success(exercise.into())))
}

/// # Endpoint
/// `GET /api/exercises/{id}`
pub async fn get_exercise(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ExerciseDto>>, ApiError> {
    let id = validate_id("exercise", id)?;
    let exercise = state
        .store
        .get_exercise(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Code exercise", id))?;

    Ok(Json(ApiResponse::success(exercise.into())))
}

/// # Endpoint
/// `DELETE /api/exercises/{id}`
pub async fn delete_exercise(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_id("exercise", id)?;
    if !state.store.delete_exercise(id).await? {
        return Err(ApiError::not_found("Code exercise", id));
    }

    tracing::info!("Deleted code exercise {}", id);
    Ok(Json(ApiResponse::success(())))
}
