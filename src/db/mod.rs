use crate::entities::{code_exercises, lectures, subjects, weeks};
use crate::models::course::{NewExercise, NewLecture, NewSubject, NewWeek};
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::course::CourseRepository;
pub use repositories::search_results::SearchResultRepository;

/// Formats a timestamp the way every `*_at` column stores it.
///
/// Fixed width with a `Z` suffix, so comparing the strings compares the times.
#[must_use]
pub fn to_db_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn from_db_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|t| t.with_timezone(&Utc))
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");
        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Every pooled connection to sqlite::memory: is a separate database.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn course_repo(&self) -> CourseRepository {
        CourseRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn search_results(&self) -> SearchResultRepository {
        SearchResultRepository::new(self.conn.clone())
    }

    pub async fn create_subject(&self, subject: NewSubject) -> Result<subjects::Model> {
        self.course_repo().create_subject(subject).await
    }

    pub async fn list_subjects(&self) -> Result<Vec<subjects::Model>> {
        self.course_repo().list_subjects().await
    }

    pub async fn get_subject(&self, id: i32) -> Result<Option<subjects::Model>> {
        self.course_repo().get_subject(id).await
    }

    pub async fn create_week(&self, week: NewWeek) -> Result<weeks::Model> {
        self.course_repo().create_week(week).await
    }

    pub async fn list_weeks(&self, subject_id: Option<i32>) -> Result<Vec<weeks::Model>> {
        self.course_repo().list_weeks(subject_id).await
    }

    pub async fn get_week(&self, id: i32) -> Result<Option<weeks::Model>> {
        self.course_repo().get_week(id).await
    }

    pub async fn create_lecture(&self, lecture: NewLecture) -> Result<lectures::Model> {
        self.course_repo().create_lecture(lecture).await
    }

    pub async fn list_lectures(&self, week_id: Option<i32>) -> Result<Vec<lectures::Model>> {
        self.course_repo().list_lectures(week_id).await
    }

    pub async fn get_lecture(&self, id: i32) -> Result<Option<lectures::Model>> {
        self.course_repo().get_lecture(id).await
    }

    pub async fn delete_lecture(&self, id: i32) -> Result<bool> {
        self.course_repo().delete_lecture(id).await
    }

    pub async fn create_exercise(&self, exercise: NewExercise) -> Result<code_exercises::Model> {
        self.course_repo().create_exercise(exercise).await
    }

    pub async fn list_exercises(
        &self,
        lecture_id: Option<i32>,
    ) -> Result<Vec<code_exercises::Model>> {
        self.course_repo().list_exercises(lecture_id).await
    }

    pub async fn get_exercise(&self, id: i32) -> Result<Option<code_exercises::Model>> {
        self.course_repo().get_exercise(id).await
    }

    pub async fn delete_exercise(&self, id: i32) -> Result<bool> {
        self.course_repo().delete_exercise(id).await
    }
}
