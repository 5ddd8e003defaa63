use crate::schema::ColumnSet;
use prodex_error::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Read-through cache for the introspected column set.
///
/// Staleness must never permit a query against a column that no longer
/// exists: callers invalidate on any schema-mismatch execution error, so the
/// failing request surfaces the error and the next one re-resolves.
#[derive(Default)]
pub struct SchemaCache {
    inner: RwLock<Option<Arc<ColumnSet>>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached column set, resolving it through `resolve` on a
    /// cold or invalidated cache.
    pub async fn get_or_resolve<F, Fut>(&self, resolve: F) -> Result<Arc<ColumnSet>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ColumnSet>>,
    {
        if let Some(columns) = self.inner.read().await.as_ref() {
            return Ok(columns.clone());
        }

        let mut slot = self.inner.write().await;
        // Another request may have resolved while we waited for the lock.
        if let Some(columns) = slot.as_ref() {
            return Ok(columns.clone());
        }

        let columns = Arc::new(resolve().await?);
        *slot = Some(columns.clone());
        Ok(columns)
    }

    /// Drop the cached set; the next request re-resolves from the backend.
    pub async fn invalidate(&self) {
        *self.inner.write().await = None;
    }
}
