use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "lectures")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub week_id: i32,
    pub sequence_no: Option<i32>,
    /// Display name, e.g. "Week 2: Sorting Algorithms".
    pub name: String,
    /// "Video" or "Assignment"
    pub kind: String,
    pub url: Option<String>,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::weeks::Entity",
        from = "Column::WeekId",
        to = "super::weeks::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Weeks,
    #[sea_orm(has_many = "super::code_exercises::Entity")]
    CodeExercises,
    #[sea_orm(has_many = "super::lecture_search_results::Entity")]
    LectureSearchResults,
}

impl Related<super::weeks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Weeks.def()
    }
}

impl Related<super::code_exercises::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CodeExercises.def()
    }
}

impl Related<super::lecture_search_results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LectureSearchResults.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
