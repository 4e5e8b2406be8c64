use crate::db::to_db_timestamp;
use crate::entities::{code_exercises, lectures, prelude::*, subjects, weeks};
use crate::models::course::{NewExercise, NewLecture, NewSubject, NewWeek};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

pub struct CourseRepository {
    conn: DatabaseConnection,
}

impl CourseRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn now() -> String {
        to_db_timestamp(&chrono::Utc::now())
    }

    pub async fn create_subject(&self, subject: NewSubject) -> Result<subjects::Model> {
        let model = subjects::ActiveModel {
            name: Set(subject.name),
            created_at: Set(Self::now()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        Ok(model)
    }

    pub async fn list_subjects(&self) -> Result<Vec<subjects::Model>> {
        Ok(Subjects::find()
            .order_by_asc(subjects::Column::Id)
            .all(&self.conn)
            .await?)
    }

    pub async fn get_subject(&self, id: i32) -> Result<Option<subjects::Model>> {
        Ok(Subjects::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn create_week(&self, week: NewWeek) -> Result<weeks::Model> {
        let model = weeks::ActiveModel {
            subject_id: Set(week.subject_id),
            name: Set(week.name),
            created_at: Set(Self::now()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        Ok(model)
    }

    pub async fn list_weeks(&self, subject_id: Option<i32>) -> Result<Vec<weeks::Model>> {
        let mut query = Weeks::find();
        if let Some(subject_id) = subject_id {
            query = query.filter(weeks::Column::SubjectId.eq(subject_id));
        }

        Ok(query
            .order_by_asc(weeks::Column::Id)
            .all(&self.conn)
            .await?)
    }

    pub async fn get_week(&self, id: i32) -> Result<Option<weeks::Model>> {
        Ok(Weeks::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn create_lecture(&self, lecture: NewLecture) -> Result<lectures::Model> {
        let model = lectures::ActiveModel {
            week_id: Set(lecture.week_id),
            sequence_no: Set(lecture.sequence_no),
            name: Set(lecture.name),
            kind: Set(lecture.kind),
            url: Set(lecture.url),
            created_at: Set(Self::now()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        info!("Created lecture {} ({})", model.id, model.name);
        Ok(model)
    }

    pub async fn list_lectures(&self, week_id: Option<i32>) -> Result<Vec<lectures::Model>> {
        let mut query = Lectures::find();
        if let Some(week_id) = week_id {
            query = query.filter(lectures::Column::WeekId.eq(week_id));
        }

        Ok(query
            .order_by_asc(lectures::Column::WeekId)
            .order_by_asc(lectures::Column::SequenceNo)
            .order_by_asc(lectures::Column::Id)
            .all(&self.conn)
            .await?)
    }

    pub async fn get_lecture(&self, id: i32) -> Result<Option<lectures::Model>> {
        Ok(Lectures::find_by_id(id).one(&self.conn).await?)
    }

    /// Removes a lecture. Its cached search results go with it.
    pub async fn delete_lecture(&self, id: i32) -> Result<bool> {
        let result = Lectures::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn create_exercise(&self, exercise: NewExercise) -> Result<code_exercises::Model> {
        let model = code_exercises::ActiveModel {
            lecture_id: Set(exercise.lecture_id),
            title: Set(exercise.title),
            description: Set(exercise.description),
            difficulty: Set(exercise.difficulty),
            category: Set(exercise.category),
            language: Set(exercise.language),
            created_at: Set(Self::now()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await?;

        info!("Created code exercise {} ({})", model.id, model.title);
        Ok(model)
    }

    pub async fn list_exercises(
        &self,
        lecture_id: Option<i32>,
    ) -> Result<Vec<code_exercises::Model>> {
        let mut query = CodeExercises::find();
        if let Some(lecture_id) = lecture_id {
            query = query.filter(code_exercises::Column::LectureId.eq(lecture_id));
        }

        Ok(query
            .order_by_asc(code_exercises::Column::Id)
            .all(&self.conn)
            .await?)
    }

    pub async fn get_exercise(&self, id: i32) -> Result<Option<code_exercises::Model>> {
        Ok(CodeExercises::find_by_id(id).one(&self.conn).await?)
    }

    /// Removes an exercise. Its cached search results go with it.
    pub async fn delete_exercise(&self, id: i32) -> Result<bool> {
        let result = CodeExercises::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
