//! Search entry points for code exercises and lectures.
//!
//! Each call site maps its request onto a [`CacheScope`] and defers to the
//! shared [`TimedExternalQueryCache`].

use chrono::Duration;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::SearchConfig;
use crate::services::search_cache::{
    CacheError, CacheScope, CachedResult, ScopeKind, SearchProvider, SearchResultStore,
    TimedExternalQueryCache,
};

/// Default size of the "most recent results" report.
pub const RECENT_RESULTS_LIMIT: u64 = 5;

/// Builds the scope query for an exercise search.
///
/// `context` is appended to an explicit query and dropped when the query is
/// empty, so the cache derives the query from the exercise instead.
#[must_use]
pub fn exercise_query(query: Option<&str>, context: Option<&str>) -> String {
    let query = query.unwrap_or_default();
    match context.map(str::trim) {
        Some(ctx) if !ctx.is_empty() && !query.trim().is_empty() => format!("{query} {ctx}"),
        _ => query.to_string(),
    }
}

pub struct StudySearchService {
    cache: TimedExternalQueryCache,
    freshness: Duration,
}

impl StudySearchService {
    #[must_use]
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        store: Arc<dyn SearchResultStore>,
        config: &SearchConfig,
    ) -> Self {
        let result_limit = usize::try_from(config.result_limit).unwrap_or(usize::MAX);
        Self {
            cache: TimedExternalQueryCache::new(provider, store, result_limit),
            freshness: config.freshness(),
        }
    }

    #[must_use]
    pub const fn freshness(&self) -> Duration {
        self.freshness
    }

    pub async fn search_exercise(
        &self,
        exercise_id: i32,
        query: Option<&str>,
        context: Option<&str>,
    ) -> Result<Vec<CachedResult>, CacheError> {
        let scope = CacheScope::exercise(exercise_id, exercise_query(query, context));
        self.search(&scope).await
    }

    pub async fn search_lecture(
        &self,
        lecture_id: i32,
        query: Option<&str>,
    ) -> Result<Vec<CachedResult>, CacheError> {
        let scope = CacheScope::lecture(lecture_id, query.unwrap_or_default());
        self.search(&scope).await
    }

    async fn search(&self, scope: &CacheScope) -> Result<Vec<CachedResult>, CacheError> {
        match self.cache.lookup(scope, self.freshness).await {
            Ok(results) => {
                info!(
                    scope = %scope.kind,
                    owner_id = scope.owner_id,
                    query = %scope.query,
                    results = results.len(),
                    "Search lookup finished"
                );
                Ok(results)
            }
            Err(e @ CacheError::NotFound { .. }) => Err(e),
            Err(e) => {
                warn!(
                    scope = %scope.kind,
                    owner_id = scope.owner_id,
                    query = %scope.query,
                    error = %e,
                    "Search lookup failed"
                );
                Err(e)
            }
        }
    }

    pub async fn recent(
        &self,
        kind: ScopeKind,
        owner_id: i32,
        limit: Option<u64>,
    ) -> Result<Vec<CachedResult>, CacheError> {
        self.cache
            .recent(kind, owner_id, limit.unwrap_or(RECENT_RESULTS_LIMIT))
            .await
    }
}
