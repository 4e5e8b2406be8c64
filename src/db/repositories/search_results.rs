use crate::db::{from_db_timestamp, to_db_timestamp};
use crate::entities::{exercise_search_results, lecture_search_results, prelude::*};
use crate::services::search_cache::{
    CacheScope, CachedResult, PersistenceError, ScopeKind, SearchHit, SearchResultStore,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

fn parse_timestamp(id: i32, value: &str) -> Result<DateTime<Utc>, PersistenceError> {
    from_db_timestamp(value).map_err(|e| PersistenceError::Corrupt {
        id,
        message: format!("bad timestamp '{value}': {e}"),
    })
}

impl TryFrom<exercise_search_results::Model> for CachedResult {
    type Error = PersistenceError;

    fn try_from(m: exercise_search_results::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            created_at: parse_timestamp(m.id, &m.created_at)?,
            last_accessed: parse_timestamp(m.id, &m.last_accessed)?,
            id: m.id,
            title: m.title,
            link: m.link,
            snippet: m.snippet,
            source: m.source,
            date: m.date,
        })
    }
}

impl TryFrom<lecture_search_results::Model> for CachedResult {
    type Error = PersistenceError;

    fn try_from(m: lecture_search_results::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            created_at: parse_timestamp(m.id, &m.created_at)?,
            last_accessed: parse_timestamp(m.id, &m.last_accessed)?,
            id: m.id,
            title: m.title,
            link: m.link,
            snippet: m.snippet,
            source: m.source,
            date: m.date,
        })
    }
}

fn convert_all<M>(models: Vec<M>) -> Result<Vec<CachedResult>, PersistenceError>
where
    CachedResult: TryFrom<M, Error = PersistenceError>,
{
    models.into_iter().map(CachedResult::try_from).collect()
}

/// Cached search rows, one table per [`ScopeKind`].
///
/// Rows within a batch share `created_at`; ties are broken by id so the
/// provider's ranking survives the round trip.
#[derive(Clone)]
pub struct SearchResultRepository {
    conn: DatabaseConnection,
}

impl SearchResultRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl SearchResultStore for SearchResultRepository {
    async fn owner_text(
        &self,
        kind: ScopeKind,
        owner_id: i32,
    ) -> Result<Option<String>, PersistenceError> {
        let text = match kind {
            ScopeKind::Exercise => CodeExercises::find_by_id(owner_id)
                .one(&self.conn)
                .await?
                .map(|e| e.description),
            ScopeKind::Lecture => Lectures::find_by_id(owner_id)
                .one(&self.conn)
                .await?
                .map(|l| l.name),
        };

        Ok(text)
    }

    async fn find_fresh(
        &self,
        scope: &CacheScope,
        not_before: DateTime<Utc>,
    ) -> Result<Vec<CachedResult>, PersistenceError> {
        let threshold = to_db_timestamp(&not_before);

        match scope.kind {
            ScopeKind::Exercise => {
                use exercise_search_results::Column;
                let rows = ExerciseSearchResults::find()
                    .filter(Column::CodeExerciseId.eq(scope.owner_id))
                    .filter(Column::Query.eq(scope.query.as_str()))
                    .filter(Column::CreatedAt.gt(threshold))
                    .order_by_desc(Column::CreatedAt)
                    .order_by_asc(Column::Id)
                    .all(&self.conn)
                    .await?;
                convert_all(rows)
            }
            ScopeKind::Lecture => {
                use lecture_search_results::Column;
                let rows = LectureSearchResults::find()
                    .filter(Column::LectureId.eq(scope.owner_id))
                    .filter(Column::Query.eq(scope.query.as_str()))
                    .filter(Column::CreatedAt.gt(threshold))
                    .order_by_desc(Column::CreatedAt)
                    .order_by_asc(Column::Id)
                    .all(&self.conn)
                    .await?;
                convert_all(rows)
            }
        }
    }

    async fn touch(
        &self,
        kind: ScopeKind,
        ids: &[i32],
        now: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        if ids.is_empty() {
            return Ok(());
        }

        let accessed = to_db_timestamp(&now);

        match kind {
            ScopeKind::Exercise => {
                use exercise_search_results::Column;
                ExerciseSearchResults::update_many()
                    .col_expr(Column::LastAccessed, Expr::value(accessed))
                    .filter(Column::Id.is_in(ids.iter().copied()))
                    .exec(&self.conn)
                    .await?;
            }
            ScopeKind::Lecture => {
                use lecture_search_results::Column;
                LectureSearchResults::update_many()
                    .col_expr(Column::LastAccessed, Expr::value(accessed))
                    .filter(Column::Id.is_in(ids.iter().copied()))
                    .exec(&self.conn)
                    .await?;
            }
        }

        Ok(())
    }

    async fn insert_many(
        &self,
        scope: &CacheScope,
        effective_query: &str,
        hits: &[SearchHit],
        now: DateTime<Utc>,
    ) -> Result<Vec<CachedResult>, PersistenceError> {
        let stamp = to_db_timestamp(&now);
        let txn = self.conn.begin().await?;
        let mut inserted = Vec::with_capacity(hits.len());

        for hit in hits {
            let result = match scope.kind {
                ScopeKind::Exercise => exercise_search_results::ActiveModel {
                    code_exercise_id: Set(scope.owner_id),
                    query: Set(scope.query.clone()),
                    effective_query: Set(effective_query.to_string()),
                    title: Set(hit.title.clone()),
                    link: Set(hit.link.clone()),
                    snippet: Set(hit.snippet.clone()),
                    source: Set(hit.source.clone()),
                    date: Set(hit.date.clone()),
                    created_at: Set(stamp.clone()),
                    last_accessed: Set(stamp.clone()),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(PersistenceError::from)
                .and_then(CachedResult::try_from)?,
                ScopeKind::Lecture => lecture_search_results::ActiveModel {
                    lecture_id: Set(scope.owner_id),
                    query: Set(scope.query.clone()),
                    effective_query: Set(effective_query.to_string()),
                    title: Set(hit.title.clone()),
                    link: Set(hit.link.clone()),
                    snippet: Set(hit.snippet.clone()),
                    source: Set(hit.source.clone()),
                    date: Set(hit.date.clone()),
                    created_at: Set(stamp.clone()),
                    last_accessed: Set(stamp.clone()),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(PersistenceError::from)
                .and_then(CachedResult::try_from)?,
            };
            inserted.push(result);
        }

        txn.commit().await?;

        Ok(inserted)
    }

    async fn recent(
        &self,
        kind: ScopeKind,
        owner_id: i32,
        limit: u64,
    ) -> Result<Vec<CachedResult>, PersistenceError> {
        match kind {
            ScopeKind::Exercise => {
                use exercise_search_results::Column;
                let rows = ExerciseSearchResults::find()
                    .filter(Column::CodeExerciseId.eq(owner_id))
                    .order_by_desc(Column::CreatedAt)
                    .order_by_asc(Column::Id)
                    .limit(limit)
                    .all(&self.conn)
                    .await?;
                convert_all(rows)
            }
            ScopeKind::Lecture => {
                use lecture_search_results::Column;
                let rows = LectureSearchResults::find()
                    .filter(Column::LectureId.eq(owner_id))
                    .order_by_desc(Column::CreatedAt)
                    .order_by_asc(Column::Id)
                    .limit(limit)
                    .all(&self.conn)
                    .await?;
                convert_all(rows)
            }
        }
    }
}
