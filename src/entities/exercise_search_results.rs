use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "exercise_search_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub code_exercise_id: i32,
    /// Query as sent by the caller (may be empty).
    pub query: String,
    /// Query actually sent to the provider.
    pub effective_query: String,
    pub title: String,
    pub link: String,
    #[sea_orm(column_type = "Text")]
    pub snippet: String,
    pub source: String,
    pub date: Option<String>,
    pub created_at: String,
    pub last_accessed: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::code_exercises::Entity",
        from = "Column::CodeExerciseId",
        to = "super::code_exercises::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    CodeExercises,
}

impl Related<super::code_exercises::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CodeExercises.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
