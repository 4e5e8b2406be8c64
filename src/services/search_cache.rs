//! Time-windowed cache in front of an external search provider.
//!
//! A lookup for a [`CacheScope`] returns the stored results fetched within the
//! freshness window, or calls the provider, persists the new batch and returns
//! it. Older batches stay in storage and are simply no longer selected.
//!
//! The cache does not log. Callers decide what to report.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Freshness window used when callers do not pass one.
pub const DEFAULT_FRESHNESS_HOURS: i64 = 24;

/// Number of provider results requested on a miss when not configured.
pub const DEFAULT_RESULT_LIMIT: usize = 5;

#[must_use]
pub fn default_freshness() -> Duration {
    Duration::hours(DEFAULT_FRESHNESS_HOURS)
}

/// Which kind of entity owns a cached search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    Exercise,
    Lecture,
}

impl ScopeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exercise => "exercise",
            Self::Lecture => "lecture",
        }
    }

    #[must_use]
    pub const fn owner_label(self) -> &'static str {
        match self {
            Self::Exercise => "Code exercise",
            Self::Lecture => "Lecture",
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What was searched: an owning entity plus the caller's query text.
///
/// Two scopes are equal only when kind, owner and query bytes match. The query
/// is not normalised; an empty query is its own scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheScope {
    pub kind: ScopeKind,
    pub owner_id: i32,
    pub query: String,
}

impl CacheScope {
    pub fn new(kind: ScopeKind, owner_id: i32, query: impl Into<String>) -> Self {
        Self {
            kind,
            owner_id,
            query: query.into(),
        }
    }

    #[must_use]
    pub fn exercise(owner_id: i32, query: impl Into<String>) -> Self {
        Self::new(ScopeKind::Exercise, owner_id, query)
    }

    #[must_use]
    pub fn lecture(owner_id: i32, query: impl Into<String>) -> Self {
        Self::new(ScopeKind::Lecture, owner_id, query)
    }
}

/// One hit as returned by a [`SearchProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    pub snippet: String,
    /// Display domain of the result.
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// A persisted search hit.
///
/// Rows are immutable apart from `last_accessed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResult {
    pub id: i32,
    pub title: String,
    pub link: String,
    pub snippet: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("search provider is not configured: {0}")]
    NotConfigured(&'static str),

    #[error("search request timed out")]
    Timeout,

    #[error("search request failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("search provider returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed search response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("stored search result {id} is corrupt: {message}")]
    Corrupt { id: i32, message: String },
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("{} {owner_id} not found", .kind.owner_label())]
    NotFound { kind: ScopeKind, owner_id: i32 },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// External search API used on a cache miss.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns at most `limit` hits for `query`. No hits is not an error.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, ProviderError>;
}

/// Storage for cached search rows and the owners they belong to.
#[async_trait]
pub trait SearchResultStore: Send + Sync {
    /// Descriptive text of the owning entity, or `None` when it does not exist.
    async fn owner_text(
        &self,
        kind: ScopeKind,
        owner_id: i32,
    ) -> Result<Option<String>, PersistenceError>;

    /// Rows for `scope` created strictly after `not_before`, newest first.
    async fn find_fresh(
        &self,
        scope: &CacheScope,
        not_before: DateTime<Utc>,
    ) -> Result<Vec<CachedResult>, PersistenceError>;

    /// Sets `last_accessed` on the given rows in a single write.
    async fn touch(
        &self,
        kind: ScopeKind,
        ids: &[i32],
        now: DateTime<Utc>,
    ) -> Result<(), PersistenceError>;

    /// Persists one batch atomically: either every hit is stored or none is.
    async fn insert_many(
        &self,
        scope: &CacheScope,
        effective_query: &str,
        hits: &[SearchHit],
        now: DateTime<Utc>,
    ) -> Result<Vec<CachedResult>, PersistenceError>;

    /// The `limit` most recently created rows for an owner, any query, any age.
    async fn recent(
        &self,
        kind: ScopeKind,
        owner_id: i32,
        limit: u64,
    ) -> Result<Vec<CachedResult>, PersistenceError>;
}

/// Derives a provider query from an owner's descriptive text.
///
/// Keeps the text before the first `:` ("Two Sum: find indices" becomes
/// "Two Sum"). Falls back to the whole trimmed text when nothing precedes the
/// colon.
#[must_use]
pub fn derive_default_query(text: &str) -> String {
    let head = text.split(':').next().unwrap_or_default().trim();
    if head.is_empty() {
        text.trim().to_string()
    } else {
        head.to_string()
    }
}

pub struct TimedExternalQueryCache {
    provider: Arc<dyn SearchProvider>,
    store: Arc<dyn SearchResultStore>,
    result_limit: usize,
}

impl TimedExternalQueryCache {
    #[must_use]
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        store: Arc<dyn SearchResultStore>,
        result_limit: usize,
    ) -> Self {
        Self {
            provider,
            store,
            result_limit,
        }
    }

    #[must_use]
    pub const fn result_limit(&self) -> usize {
        self.result_limit
    }

    pub async fn lookup(
        &self,
        scope: &CacheScope,
        freshness: Duration,
    ) -> Result<Vec<CachedResult>, CacheError> {
        self.lookup_at(scope, freshness, Utc::now()).await
    }

    /// [`lookup`](Self::lookup) with an explicit clock reading.
    ///
    /// A touch failure on the hit path is returned as
    /// [`CacheError::Persistence`]; the rows are not handed out without it.
    pub async fn lookup_at(
        &self,
        scope: &CacheScope,
        freshness: Duration,
        now: DateTime<Utc>,
    ) -> Result<Vec<CachedResult>, CacheError> {
        // A window reaching past the representable range covers every row.
        let not_before = now
            .checked_sub_signed(freshness)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let fresh = self.store.find_fresh(scope, not_before).await?;

        if !fresh.is_empty() {
            metrics::counter!("search_cache_hits_total", "scope" => scope.kind.as_str())
                .increment(1);

            let ids: Vec<i32> = fresh.iter().map(|r| r.id).collect();
            self.store.touch(scope.kind, &ids, now).await?;

            return Ok(fresh
                .into_iter()
                .map(|r| CachedResult {
                    last_accessed: now,
                    ..r
                })
                .collect());
        }

        metrics::counter!("search_cache_misses_total", "scope" => scope.kind.as_str())
            .increment(1);

        let owner_text = self
            .store
            .owner_text(scope.kind, scope.owner_id)
            .await?
            .ok_or(CacheError::NotFound {
                kind: scope.kind,
                owner_id: scope.owner_id,
            })?;

        let effective_query = if scope.query.trim().is_empty() {
            derive_default_query(&owner_text)
        } else {
            scope.query.clone()
        };

        let hits = self
            .provider
            .search(&effective_query, self.result_limit)
            .await?;

        if hits.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self
            .store
            .insert_many(scope, &effective_query, &hits, now)
            .await?;

        Ok(rows)
    }

    pub async fn recent(
        &self,
        kind: ScopeKind,
        owner_id: i32,
        limit: u64,
    ) -> Result<Vec<CachedResult>, CacheError> {
        Ok(self.store.recent(kind, owner_id, limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeProvider {
        hits: Vec<SearchHit>,
        fail: bool,
        calls: Mutex<Vec<(String, usize)>>,
    }

    impl FakeProvider {
        fn returning(hits: Vec<SearchHit>) -> Self {
            Self {
                hits,
                ..Default::default()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<(String, usize)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchProvider for FakeProvider {
        async fn search(
            &self,
            query: &str,
            limit: usize,
        ) -> Result<Vec<SearchHit>, ProviderError> {
            self.calls.lock().unwrap().push((query.to_string(), limit));
            if self.fail {
                return Err(ProviderError::Status {
                    status: 503,
                    message: "unavailable".to_string(),
                });
            }
            Ok(self.hits.iter().take(limit).cloned().collect())
        }
    }

    struct StoredRow {
        scope: CacheScope,
        result: CachedResult,
    }

    #[derive(Default)]
    struct FakeStore {
        owners: HashMap<(ScopeKind, i32), String>,
        rows: Mutex<Vec<StoredRow>>,
        touches: Mutex<usize>,
        inserts: Mutex<usize>,
        fail_touch: bool,
    }

    impl FakeStore {
        fn with_owner(kind: ScopeKind, id: i32, text: &str) -> Self {
            let mut store = Self::default();
            store.owners.insert((kind, id), text.to_string());
            store
        }

        fn seed(&self, scope: &CacheScope, title: &str, created_at: DateTime<Utc>) -> i32 {
            let mut rows = self.rows.lock().unwrap();
            let id = i32::try_from(rows.len()).unwrap() + 1;
            rows.push(StoredRow {
                scope: scope.clone(),
                result: CachedResult {
                    id,
                    title: title.to_string(),
                    link: format!("https://{title}.example"),
                    snippet: String::new(),
                    source: format!("{title}.example"),
                    date: None,
                    created_at,
                    last_accessed: created_at,
                },
            });
            id
        }

        fn row_count(&self) -> usize {
            self.rows.lock().unwrap().len()
        }

        fn last_accessed(&self, id: i32) -> DateTime<Utc> {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.result.id == id)
                .map(|r| r.result.last_accessed)
                .unwrap()
        }
    }

    #[async_trait]
    impl SearchResultStore for FakeStore {
        async fn owner_text(
            &self,
            kind: ScopeKind,
            owner_id: i32,
        ) -> Result<Option<String>, PersistenceError> {
            Ok(self.owners.get(&(kind, owner_id)).cloned())
        }

        async fn find_fresh(
            &self,
            scope: &CacheScope,
            not_before: DateTime<Utc>,
        ) -> Result<Vec<CachedResult>, PersistenceError> {
            let rows = self.rows.lock().unwrap();
            let mut fresh: Vec<CachedResult> = rows
                .iter()
                .filter(|r| &r.scope == scope && r.result.created_at > not_before)
                .map(|r| r.result.clone())
                .collect();
            fresh.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
            Ok(fresh)
        }

        async fn touch(
            &self,
            _kind: ScopeKind,
            ids: &[i32],
            now: DateTime<Utc>,
        ) -> Result<(), PersistenceError> {
            if self.fail_touch {
                return Err(PersistenceError::Database(sea_orm::DbErr::Custom(
                    "database is locked".to_string(),
                )));
            }
            *self.touches.lock().unwrap() += 1;
            for row in self.rows.lock().unwrap().iter_mut() {
                if ids.contains(&row.result.id) {
                    row.result.last_accessed = now;
                }
            }
            Ok(())
        }

        async fn insert_many(
            &self,
            scope: &CacheScope,
            _effective_query: &str,
            hits: &[SearchHit],
            now: DateTime<Utc>,
        ) -> Result<Vec<CachedResult>, PersistenceError> {
            *self.inserts.lock().unwrap() += 1;
            let mut rows = self.rows.lock().unwrap();
            let mut inserted = Vec::new();
            for hit in hits {
                let id = i32::try_from(rows.len()).unwrap() + 1;
                let result = CachedResult {
                    id,
                    title: hit.title.clone(),
                    link: hit.link.clone(),
                    snippet: hit.snippet.clone(),
                    source: hit.source.clone(),
                    date: hit.date.clone(),
                    created_at: now,
                    last_accessed: now,
                };
                rows.push(StoredRow {
                    scope: scope.clone(),
                    result: result.clone(),
                });
                inserted.push(result);
            }
            Ok(inserted)
        }

        async fn recent(
            &self,
            kind: ScopeKind,
            owner_id: i32,
            limit: u64,
        ) -> Result<Vec<CachedResult>, PersistenceError> {
            let rows = self.rows.lock().unwrap();
            let mut matching: Vec<CachedResult> = rows
                .iter()
                .filter(|r| r.scope.kind == kind && r.scope.owner_id == owner_id)
                .map(|r| r.result.clone())
                .collect();
            matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            matching.truncate(usize::try_from(limit).unwrap());
            Ok(matching)
        }
    }

    fn hit(title: &str) -> SearchHit {
        SearchHit {
            title: title.to_string(),
            link: format!("{}.com", title.to_lowercase()),
            snippet: "...".to_string(),
            source: format!("{}.com", title.to_lowercase()),
            date: None,
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-10T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn cache(provider: &Arc<FakeProvider>, store: &Arc<FakeStore>) -> TimedExternalQueryCache {
        TimedExternalQueryCache::new(provider.clone(), store.clone(), DEFAULT_RESULT_LIMIT)
    }

    #[test]
    fn test_derive_default_query() {
        assert_eq!(derive_default_query("Two Sum: find indices"), "Two Sum");
        assert_eq!(derive_default_query("  Binary Search  "), "Binary Search");
        assert_eq!(derive_default_query("Week 2: Sorting: part 1"), "Week 2");
        assert_eq!(derive_default_query(": only tail"), ": only tail");
        assert_eq!(derive_default_query(""), "");
    }

    #[test]
    fn test_scope_equality_is_exact() {
        assert_eq!(CacheScope::exercise(1, "sort"), CacheScope::exercise(1, "sort"));
        assert_ne!(CacheScope::exercise(1, "sort"), CacheScope::exercise(1, "Sort"));
        assert_ne!(CacheScope::exercise(1, "sort"), CacheScope::exercise(1, "sort "));
        assert_ne!(CacheScope::exercise(1, "sort"), CacheScope::lecture(1, "sort"));
    }

    #[tokio::test]
    async fn test_miss_fetches_and_persists_with_derived_query() {
        let provider = Arc::new(FakeProvider::returning(vec![hit("A"), hit("B")]));
        let store = Arc::new(FakeStore::with_owner(
            ScopeKind::Exercise,
            42,
            "Two Sum: find indices",
        ));
        let now = fixed_now();

        let results = cache(&provider, &store)
            .lookup_at(&CacheScope::exercise(42, ""), default_freshness(), now)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "A");
        assert_eq!(results[1].title, "B");
        assert!(results.iter().all(|r| r.created_at == now));
        assert_eq!(provider.calls(), vec![("Two Sum".to_string(), 5)]);
        assert_eq!(store.row_count(), 2);
    }

    #[tokio::test]
    async fn test_explicit_query_is_sent_verbatim() {
        let provider = Arc::new(FakeProvider::returning(vec![hit("A")]));
        let store = Arc::new(FakeStore::with_owner(ScopeKind::Lecture, 7, "Week 1: Intro"));

        cache(&provider, &store)
            .lookup_at(
                &CacheScope::lecture(7, "rust ownership"),
                default_freshness(),
                fixed_now(),
            )
            .await
            .unwrap();

        assert_eq!(provider.calls()[0].0, "rust ownership");
    }

    #[tokio::test]
    async fn test_fresh_hit_skips_provider_and_touches() {
        let provider = Arc::new(FakeProvider::returning(vec![hit("Z")]));
        let store = Arc::new(FakeStore::with_owner(ScopeKind::Exercise, 42, "Two Sum"));
        let now = fixed_now();
        let scope = CacheScope::exercise(42, "x");
        let older = store.seed(&scope, "older", now - Duration::hours(3));
        let newer = store.seed(&scope, "newer", now - Duration::hours(1));

        let results = cache(&provider, &store)
            .lookup_at(&scope, default_freshness(), now)
            .await
            .unwrap();

        let ids: Vec<i32> = results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![newer, older]);
        assert!(provider.calls().is_empty());
        assert_eq!(*store.touches.lock().unwrap(), 1);
        assert_eq!(store.last_accessed(older), now);
        assert_eq!(store.last_accessed(newer), now);
        assert_eq!(store.row_count(), 2);
    }

    #[tokio::test]
    async fn test_stale_rows_trigger_refetch_and_remain_stored() {
        let provider = Arc::new(FakeProvider::returning(vec![hit("Fresh")]));
        let store = Arc::new(FakeStore::with_owner(ScopeKind::Exercise, 42, "Two Sum"));
        let now = fixed_now();
        let scope = CacheScope::exercise(42, "x");
        let stale = store.seed(&scope, "stale", now - Duration::hours(25));

        let results = cache(&provider, &store)
            .lookup_at(&scope, default_freshness(), now)
            .await
            .unwrap();

        assert_eq!(provider.calls(), vec![("x".to_string(), 5)]);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Fresh");
        assert!(results.iter().all(|r| r.id != stale));
        assert_eq!(store.row_count(), 2);
    }

    #[tokio::test]
    async fn test_row_exactly_at_window_edge_is_stale() {
        let provider = Arc::new(FakeProvider::returning(vec![hit("A")]));
        let store = Arc::new(FakeStore::with_owner(ScopeKind::Exercise, 1, "Sorting"));
        let now = fixed_now();
        let scope = CacheScope::exercise(1, "");
        store.seed(&scope, "edge", now - default_freshness());

        cache(&provider, &store)
            .lookup_at(&scope, default_freshness(), now)
            .await
            .unwrap();

        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unbounded_window_treats_every_row_as_fresh() {
        let provider = Arc::new(FakeProvider::returning(vec![hit("A")]));
        let store = Arc::new(FakeStore::with_owner(ScopeKind::Exercise, 1, "Sorting"));
        let now = fixed_now();
        let scope = CacheScope::exercise(1, "q");
        let id = store.seed(&scope, "ancient", now - Duration::days(3650));

        let results = cache(&provider, &store)
            .lookup_at(&scope, Duration::MAX, now)
            .await
            .unwrap();

        assert!(provider.calls().is_empty());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, id);
    }

    #[tokio::test]
    async fn test_hot_but_old_entry_still_expires() {
        let provider = Arc::new(FakeProvider::returning(vec![hit("A")]));
        let store = Arc::new(FakeStore::with_owner(ScopeKind::Lecture, 3, "Graphs"));
        let now = fixed_now();
        let scope = CacheScope::lecture(3, "");
        let id = store.seed(&scope, "old", now - Duration::hours(30));
        store.rows.lock().unwrap()[0].result.last_accessed = now - Duration::minutes(1);

        cache(&provider, &store)
            .lookup_at(&scope, default_freshness(), now)
            .await
            .unwrap();

        assert_eq!(provider.calls().len(), 1);
        assert_eq!(store.last_accessed(id), now - Duration::minutes(1));
    }

    #[tokio::test]
    async fn test_repeated_lookup_is_idempotent_within_window() {
        let provider = Arc::new(FakeProvider::returning(vec![hit("A"), hit("B")]));
        let store = Arc::new(FakeStore::with_owner(ScopeKind::Exercise, 42, "Two Sum"));
        let now = fixed_now();
        let scope = CacheScope::exercise(42, "");
        let cache = cache(&provider, &store);

        let first = cache.lookup_at(&scope, default_freshness(), now).await.unwrap();
        let second = cache.lookup_at(&scope, default_freshness(), now).await.unwrap();
        let third = cache.lookup_at(&scope, default_freshness(), now).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second, third);
        assert_eq!(provider.calls().len(), 1);
        assert_eq!(*store.touches.lock().unwrap(), 2);
        assert_eq!(store.row_count(), 2);
    }

    #[tokio::test]
    async fn test_missing_owner_is_not_found_without_side_effects() {
        let provider = Arc::new(FakeProvider::returning(vec![hit("A")]));
        let store = Arc::new(FakeStore::with_owner(ScopeKind::Exercise, 42, "Two Sum"));

        let err = cache(&provider, &store)
            .lookup_at(&CacheScope::exercise(999, ""), default_freshness(), fixed_now())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CacheError::NotFound {
                kind: ScopeKind::Exercise,
                owner_id: 999
            }
        ));
        assert_eq!(err.to_string(), "Code exercise 999 not found");
        assert!(provider.calls().is_empty());
        assert_eq!(*store.inserts.lock().unwrap(), 0);
        assert_eq!(store.row_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_surfaces_and_writes_nothing() {
        let provider = Arc::new(FakeProvider::failing());
        let store = Arc::new(FakeStore::with_owner(ScopeKind::Exercise, 42, "Two Sum"));
        let now = fixed_now();
        let scope = CacheScope::exercise(42, "x");
        store.seed(&scope, "stale", now - Duration::hours(48));

        let err = cache(&provider, &store)
            .lookup_at(&scope, default_freshness(), now)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CacheError::Provider(ProviderError::Status { status: 503, .. })
        ));
        assert_eq!(*store.inserts.lock().unwrap(), 0);
        assert_eq!(store.row_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_provider_response_is_not_an_error() {
        let provider = Arc::new(FakeProvider::returning(vec![]));
        let store = Arc::new(FakeStore::with_owner(ScopeKind::Lecture, 5, "Heaps"));

        let results = cache(&provider, &store)
            .lookup_at(&CacheScope::lecture(5, ""), default_freshness(), fixed_now())
            .await
            .unwrap();

        assert!(results.is_empty());
        assert_eq!(provider.calls().len(), 1);
        assert_eq!(store.row_count(), 0);
    }

    #[tokio::test]
    async fn test_touch_failure_escalates() {
        let provider = Arc::new(FakeProvider::returning(vec![hit("A")]));
        let mut store = FakeStore::with_owner(ScopeKind::Exercise, 42, "Two Sum");
        store.fail_touch = true;
        let store = Arc::new(store);
        let now = fixed_now();
        let scope = CacheScope::exercise(42, "x");
        store.seed(&scope, "cached", now - Duration::hours(1));

        let err = cache(&provider, &store)
            .lookup_at(&scope, default_freshness(), now)
            .await
            .unwrap_err();

        assert!(matches!(err, CacheError::Persistence(_)));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_scopes_do_not_share_rows() {
        let provider = Arc::new(FakeProvider::returning(vec![hit("A")]));
        let mut store = FakeStore::with_owner(ScopeKind::Exercise, 1, "Arrays");
        store
            .owners
            .insert((ScopeKind::Lecture, 1), "Arrays lecture".to_string());
        let store = Arc::new(store);
        let now = fixed_now();
        store.seed(&CacheScope::exercise(1, "q"), "cached", now - Duration::hours(1));

        cache(&provider, &store)
            .lookup_at(&CacheScope::lecture(1, "q"), default_freshness(), now)
            .await
            .unwrap();
        cache(&provider, &store)
            .lookup_at(&CacheScope::exercise(1, "other"), default_freshness(), now)
            .await
            .unwrap();

        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_result_limit_is_passed_to_provider() {
        let provider = Arc::new(FakeProvider::returning(vec![hit("A"), hit("B"), hit("C")]));
        let store = Arc::new(FakeStore::with_owner(ScopeKind::Exercise, 1, "Arrays"));
        let cache = TimedExternalQueryCache::new(provider.clone(), store.clone(), 2);

        let results = cache
            .lookup_at(&CacheScope::exercise(1, ""), default_freshness(), fixed_now())
            .await
            .unwrap();

        assert_eq!(provider.calls(), vec![("Arrays".to_string(), 2)]);
        assert_eq!(results.len(), 2);
    }
}
