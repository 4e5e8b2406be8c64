use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "code_exercises")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub lecture_id: Option<i32>,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub difficulty: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lectures::Entity",
        from = "Column::LectureId",
        to = "super::lectures::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Lectures,
    #[sea_orm(has_many = "super::exercise_search_results::Entity")]
    ExerciseSearchResults,
}

impl Related<super::lectures::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lectures.def()
    }
}

impl Related<super::exercise_search_results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExerciseSearchResults.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
