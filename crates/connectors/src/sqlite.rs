use crate::store::ProductStore;
use async_trait::async_trait;
use prodex_common::models::Record;
use prodex_core::{ColumnSet, SelectQuery, SqlDialect, SqliteDialect, TableIdent};
use prodex_error::{ErrorCode, ProdexError, Result};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Embedded file-based backend over a single rusqlite connection.
///
/// All database work runs on the blocking pool; the connection is shared
/// behind a mutex, matching the one-query-at-a-time request model.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    timeout: Duration,
}

impl SqliteStore {
    pub fn new(path: impl AsRef<Path>, timeout: Duration) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path).map_err(|e| {
            ProdexError::new(ErrorCode::ConnectionFailed, e.to_string())
                .with_hint(format!("Check the database file path: {}", path.display()))
        })?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            timeout,
        })
    }

    async fn run_blocking<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        let task = tokio::task::spawn_blocking(move || {
            let conn = conn.lock().expect("SQLite connection lock poisoned");
            op(&conn)
        });

        match tokio::time::timeout(self.timeout, task).await {
            Ok(joined) => joined.map_err(|e| ProdexError::new(ErrorCode::Internal, e.to_string()))?,
            Err(_) => Err(ProdexError::new(
                ErrorCode::QueryTimeout,
                format!("query exceeded the {:?} time bound", self.timeout),
            )),
        }
    }
}

#[async_trait]
impl ProductStore for SqliteStore {
    fn dialect(&self) -> &'static dyn SqlDialect {
        &SqliteDialect
    }

    async fn resolve_columns(&self, table: &TableIdent) -> Result<ColumnSet> {
        let table_name = table.name().to_string();
        let names = self
            .run_blocking(move |conn| {
                // Table-valued pragma so the table name is bound, never
                // interpolated.
                let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
                let names = stmt
                    .query_map([&table_name], |row| row.get(0))?
                    .collect::<std::result::Result<Vec<String>, _>>()?;
                Ok(names)
            })
            .await?;

        if names.is_empty() {
            return Err(ProdexError::new(
                ErrorCode::SchemaUnavailable,
                format!("table '{}' has no columns or does not exist", table.name()),
            ));
        }
        ColumnSet::new(names)
    }

    async fn query(&self, query: &SelectQuery) -> Result<Vec<Record>> {
        let query = query.clone();
        self.run_blocking(move |conn| {
            let mut stmt = conn.prepare(&query.sql)?;
            let column_names: Vec<String> =
                stmt.column_names().iter().map(|s| s.to_string()).collect();

            let mut rows = stmt.query(rusqlite::params_from_iter(query.params.iter()))?;
            let mut records = Vec::new();
            while let Some(row) = rows.next()? {
                let mut record = Record::new();
                for (i, name) in column_names.iter().enumerate() {
                    record.insert(name.clone(), value_to_json(row.get_ref(i)?));
                }
                records.push(record);
            }
            Ok(records)
        })
        .await
    }
}

fn value_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::String(String::from_utf8_lossy(b).into_owned()),
    }
}
