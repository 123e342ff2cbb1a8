//! Session schema cache
//!
//! The schema is introspected lazily the first time a prompt needs it and
//! then reused for the rest of the session. Concurrent callers wait on the
//! same fetch instead of issuing their own.

use crate::adapter::{Database, DbError};
use crate::introspect::fetch_schema;
use mosql_core::SchemaSnapshot;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Lazily populated, session scoped schema snapshot
///
/// ## Usage
///
/// ```rust,ignore
/// let cache = SchemaCache::new();
///
/// // First call introspects the database
/// let schema = cache.ensure_schema(&db).await?;
///
/// // Later calls reuse the snapshot
/// let again = cache.ensure_schema(&db).await?;
/// ```
#[derive(Default)]
pub struct SchemaCache {
    snapshot: Mutex<Option<Arc<SchemaSnapshot>>>,
}

impl SchemaCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot, fetching it first if needed
    ///
    /// A failed fetch caches nothing, so the next call tries again.
    pub async fn ensure_schema(&self, db: &dyn Database) -> Result<Arc<SchemaSnapshot>, DbError> {
        let mut slot = self.snapshot.lock().await;

        if let Some(snapshot) = slot.as_ref() {
            tracing::trace!("schema cache hit");
            return Ok(Arc::clone(snapshot));
        }

        tracing::debug!(adapter = db.name(), "schema cache miss, introspecting");
        let snapshot = Arc::new(fetch_schema(db).await?);
        *slot = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// The cached snapshot, without fetching
    pub async fn cached(&self) -> Option<Arc<SchemaSnapshot>> {
        self.snapshot.lock().await.clone()
    }

    /// Whether a snapshot is cached
    pub async fn is_cached(&self) -> bool {
        self.snapshot.lock().await.is_some()
    }

    /// Store a snapshot directly, replacing any cached one
    pub async fn insert(&self, snapshot: SchemaSnapshot) {
        *self.snapshot.lock().await = Some(Arc::new(snapshot));
    }

    /// Drop the cached snapshot so the next use introspects again
    pub async fn invalidate(&self) {
        *self.snapshot.lock().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDatabase;

    #[tokio::test]
    async fn insert_and_invalidate() {
        let cache = SchemaCache::new();
        assert!(!cache.is_cached().await);

        cache.insert(SchemaSnapshot::new("tpch", vec!["CREATE TABLE t ()".to_string()])).await;
        let cached = cache.cached().await.unwrap();
        assert_eq!(cached.database_name, "tpch");

        cache.invalidate().await;
        assert!(cache.cached().await.is_none());
    }

    #[tokio::test]
    async fn inserted_snapshot_skips_introspection() {
        let db = MockDatabase::new();
        let cache = SchemaCache::new();
        cache.insert(SchemaSnapshot::new("preset", Vec::new())).await;

        let snapshot = cache.ensure_schema(&db).await.unwrap();
        assert_eq!(snapshot.database_name, "preset");
        assert_eq!(db.query_count().await, 0);
    }
}
