use crate::{PostgresStore, SqliteStore};
use async_trait::async_trait;
use prodex_common::config::{DatabaseSettings, RetrySettings};
use prodex_common::models::Record;
use prodex_common::retry::retry_async;
use prodex_core::{ColumnSet, SelectQuery, SqlDialect, TableIdent};
use prodex_error::Result;
use std::sync::Arc;
use std::time::Duration;

/// The external storage system: schema introspection plus parameterized
/// query execution, treated as an interchangeable backend.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// The SQL text conventions of this backend.
    fn dialect(&self) -> &'static dyn SqlDialect;

    /// Fetch the live column names of `table`, in table order.
    ///
    /// Fails with `SchemaUnavailable` when the table does not exist or the
    /// metadata query itself fails; no data query is attempted against an
    /// unknown schema.
    async fn resolve_columns(&self, table: &TableIdent) -> Result<ColumnSet>;

    /// Execute a parameterized read query, mapping each row to a [`Record`].
    async fn query(&self, query: &SelectQuery) -> Result<Vec<Record>>;
}

/// Open the configured backend, retrying the initial connection with
/// exponential backoff.
pub async fn connect(
    database: &DatabaseSettings,
    retry: RetrySettings,
    query_timeout: Duration,
) -> Result<Arc<dyn ProductStore>> {
    match database {
        DatabaseSettings::Sqlite { path } => {
            let store = retry_async("open_sqlite", retry, || async {
                SqliteStore::new(path, query_timeout)
            })
            .await?;
            Ok(Arc::new(store))
        }
        DatabaseSettings::Postgres { url } => {
            let store = retry_async("connect_postgres", retry, || {
                PostgresStore::new(url, query_timeout)
            })
            .await?;
            Ok(Arc::new(store))
        }
    }
}
