use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "lecture_search_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub lecture_id: i32,
    pub query: String,
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
        belongs_to = "super::lectures::Entity",
        from = "Column::LectureId",
        to = "super::lectures::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Lectures,
}

impl Related<super::lectures::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lectures.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
