use crate::store::ProductStore;
use async_trait::async_trait;
use prodex_common::models::Record;
use prodex_core::{ColumnSet, PostgresDialect, SelectQuery, SqlDialect, TableIdent};
use prodex_error::{ErrorCode, ProdexError, Result};
use serde_json::Value;
use std::time::Duration;
use tokio_postgres::types::{ToSql, Type};
use tokio_postgres::{NoTls, Row};

/// Networked backend over a tokio-postgres client.
///
/// The connection driver runs on its own task; the store holds only the
/// client handle.
pub struct PostgresStore {
    client: tokio_postgres::Client,
    timeout: Duration,
}

impl PostgresStore {
    pub async fn new(url: &str, timeout: Duration) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(url, NoTls).await.map_err(|e| {
            ProdexError::new(ErrorCode::ConnectionFailed, e.to_string())
                .with_hint("Check DATABASE_URL and that the database is reachable")
        })?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("Postgres connection error: {}", e);
            }
        });

        Ok(Self { client, timeout })
    }

    async fn bounded<T>(
        &self,
        fut: impl std::future::Future<Output = std::result::Result<T, tokio_postgres::Error>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(ProdexError::from),
            Err(_) => Err(ProdexError::new(
                ErrorCode::QueryTimeout,
                format!("query exceeded the {:?} time bound", self.timeout),
            )),
        }
    }
}

#[async_trait]
impl ProductStore for PostgresStore {
    fn dialect(&self) -> &'static dyn SqlDialect {
        &PostgresDialect
    }

    async fn resolve_columns(&self, table: &TableIdent) -> Result<ColumnSet> {
        let name = table.name();
        let rows = self
            .bounded(self.client.query(
                "SELECT column_name FROM information_schema.columns \
                 WHERE table_schema = 'public' AND table_name = $1 \
                 ORDER BY ordinal_position",
                &[&name],
            ))
            .await?;

        if rows.is_empty() {
            return Err(ProdexError::new(
                ErrorCode::SchemaUnavailable,
                format!("table '{}' has no columns or does not exist", table.name()),
            ));
        }
        ColumnSet::new(rows.iter().map(|r| r.get(0)).collect())
    }

    async fn query(&self, query: &SelectQuery) -> Result<Vec<Record>> {
        let params: Vec<&(dyn ToSql + Sync)> = query
            .params
            .iter()
            .map(|v| v as &(dyn ToSql + Sync))
            .collect();

        let rows = self
            .bounded(self.client.query(query.sql.as_str(), &params))
            .await?;

        Ok(rows.iter().map(row_to_record).collect())
    }
}

fn row_to_record(row: &Row) -> Record {
    let mut record = Record::new();
    for (i, col) in row.columns().iter().enumerate() {
        record.insert(col.name().to_string(), pg_value_to_json(row, i, col.type_()));
    }
    record
}

fn pg_value_to_json(row: &Row, idx: usize, ty: &Type) -> Value {
    if ty == &Type::BOOL {
        opt(row.try_get::<_, Option<bool>>(idx)).map_or(Value::Null, Value::from)
    } else if ty == &Type::INT2 {
        opt(row.try_get::<_, Option<i16>>(idx)).map_or(Value::Null, Value::from)
    } else if ty == &Type::INT4 {
        opt(row.try_get::<_, Option<i32>>(idx)).map_or(Value::Null, Value::from)
    } else if ty == &Type::INT8 {
        opt(row.try_get::<_, Option<i64>>(idx)).map_or(Value::Null, Value::from)
    } else if ty == &Type::FLOAT4 {
        opt(row.try_get::<_, Option<f32>>(idx))
            .and_then(|f| serde_json::Number::from_f64(f as f64))
            .map_or(Value::Null, Value::Number)
    } else if ty == &Type::FLOAT8 {
        opt(row.try_get::<_, Option<f64>>(idx))
            .and_then(serde_json::Number::from_f64)
            .map_or(Value::Null, Value::Number)
    } else if ty == &Type::TEXT || ty == &Type::VARCHAR || ty == &Type::BPCHAR || ty == &Type::NAME
    {
        opt(row.try_get::<_, Option<String>>(idx)).map_or(Value::Null, Value::from)
    } else {
        tracing::debug!(column_type = %ty, "unsupported column type, emitting null");
        Value::Null
    }
}

fn opt<T>(result: std::result::Result<Option<T>, tokio_postgres::Error>) -> Option<T> {
    result.ok().flatten()
}
