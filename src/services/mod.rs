pub mod search_cache;
pub use search_cache::{
    CacheError, CacheScope, CachedResult, PersistenceError, ProviderError, ScopeKind, SearchHit,
    SearchProvider, SearchResultStore, TimedExternalQueryCache,
};

pub mod study_search;
pub use study_search::StudySearchService;
