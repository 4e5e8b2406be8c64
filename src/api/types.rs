use serde::Serialize;

use crate::entities::{code_exercises, lectures, subjects, weeks};
use crate::services::search_cache::CachedResult;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubjectDto {
    pub id: i32,
    pub name: String,
    pub created_at: String,
}

impl From<subjects::Model> for SubjectDto {
    fn from(m: subjects::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WeekDto {
    pub id: i32,
    pub subject_id: i32,
    pub name: Option<String>,
    pub created_at: String,
}

impl From<weeks::Model> for WeekDto {
    fn from(m: weeks::Model) -> Self {
        Self {
            id: m.id,
            subject_id: m.subject_id,
            name: m.name,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LectureDto {
    pub id: i32,
    pub week_id: i32,
    pub sequence_no: Option<i32>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: Option<String>,
    pub created_at: String,
}

impl From<lectures::Model> for LectureDto {
    fn from(m: lectures::Model) -> Self {
        Self {
            id: m.id,
            week_id: m.week_id,
            sequence_no: m.sequence_no,
            name: m.name,
            kind: m.kind,
            url: m.url,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExerciseDto {
    pub id: i32,
    pub lecture_id: Option<i32>,
    pub title: String,
    pub description: String,
    pub difficulty: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub created_at: String,
}

impl From<code_exercises::Model> for ExerciseDto {
    fn from(m: code_exercises::Model) -> Self {
        Self {
            id: m.id,
            lecture_id: m.lecture_id,
            title: m.title,
            description: m.description,
            difficulty: m.difficulty,
            category: m.category,
            language: m.language,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResultsDto {
    pub results: Vec<CachedResult>,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime: u64,
    pub database: bool,
    pub search_configured: bool,
    pub freshness_hours: u32,
    pub result_limit: u32,
}
