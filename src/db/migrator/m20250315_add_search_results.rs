use crate::entities::prelude::*;
use crate::entities::{exercise_search_results, lecture_search_results};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(ExerciseSearchResults)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(LectureSearchResults)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Fresh-window lookups filter on (owner, query) and sort by created_at.
        manager
            .create_index(
                Index::create()
                    .name("idx_exercise_search_results_scope")
                    .table(ExerciseSearchResults)
                    .col(exercise_search_results::Column::CodeExerciseId)
                    .col(exercise_search_results::Column::Query)
                    .col(exercise_search_results::Column::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_lecture_search_results_scope")
                    .table(LectureSearchResults)
                    .col(lecture_search_results::Column::LectureId)
                    .col(lecture_search_results::Column::Query)
                    .col(lecture_search_results::Column::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LectureSearchResults).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExerciseSearchResults).to_owned())
            .await?;

        Ok(())
    }
}
