use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use prodex_common::models::Record;
use prodex_connectors::ProductStore;
use prodex_core::{
    build_lookup, build_search, resolve_filters, ColumnIdent, ColumnSet, Projection, SchemaCache,
    SelectQuery, TableIdent,
};
use prodex_error::{find_closest_match, ErrorCode, ProdexError};
use serde_json::json;
use std::sync::Arc;

const NOT_FOUND_MESSAGE: &str = "Produkt o podanym symbolu nie został znaleziony.";

/// Reserved control parameter naming the projection; never a column filter.
const FIELDS_PARAM: &str = "fields";

pub struct AppState {
    pub store: Arc<dyn ProductStore>,
    pub schema: SchemaCache,
    pub table: TableIdent,
    pub symbol_column: String,
    pub greeting: String,
}

pub fn create_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(read_root))
        .route("/produkt/{symbol}", get(get_product))
        .route("/wyszukaj/", get(search_products))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .with_state(state)
}

async fn read_root(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({ "message": state.greeting }))
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn ready_handler(State(state): State<Arc<AppState>>) -> Response {
    match resolve_schema(&state).await {
        Ok(_) => Json(json!({ "status": "ready" })).into_response(),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, Json(e)).into_response(),
    }
}

async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<Record>, ApiError> {
    let columns = resolve_schema(&state).await?;
    let symbol_column = symbol_ident(&state, &columns)?;

    let query = build_lookup(&state.table, &symbol_column, &symbol, state.store.dialect());
    tracing::info!(sql = query.sql.as_str(), "executing product lookup");

    let mut records = execute(&state, &query).await?;
    if records.is_empty() {
        return Err(ProdexError::new(ErrorCode::ProductNotFound, NOT_FOUND_MESSAGE).into());
    }
    Ok(Json(records.remove(0)))
}

async fn search_products(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let mut fields: Option<String> = None;
    let mut filter_params: Vec<(String, String)> = Vec::new();

    // Duplicate keys: last value wins, key keeps its first position.
    for (key, value) in params {
        if key == FIELDS_PARAM {
            fields = Some(value);
            continue;
        }
        match filter_params.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => filter_params.push((key, value)),
        }
    }

    let columns = resolve_schema(&state).await?;
    let fallback = symbol_ident(&state, &columns)?;
    let projection = Projection::resolve(fields.as_deref(), &columns, &fallback);
    let filters = resolve_filters(&filter_params, &columns);

    let query = build_search(&state.table, &projection, &filters, state.store.dialect());
    tracing::info!(
        sql = query.sql.as_str(),
        filters = filters.len(),
        "executing product search"
    );

    let records = execute(&state, &query).await?;
    Ok(Json(records))
}

async fn resolve_schema(state: &AppState) -> Result<Arc<ColumnSet>, ProdexError> {
    let store = state.store.clone();
    let table = state.table.clone();
    state
        .schema
        .get_or_resolve(|| async move { store.resolve_columns(&table).await })
        .await
}

fn symbol_ident(state: &AppState, columns: &ColumnSet) -> Result<ColumnIdent, ProdexError> {
    columns.resolve(&state.symbol_column).ok_or_else(|| {
        let mut err = ProdexError::new(
            ErrorCode::SchemaUnavailable,
            format!(
                "identifying column '{}' is not part of table '{}'",
                state.symbol_column,
                state.table.name()
            ),
        );
        if let Some(closest) = find_closest_match(&state.symbol_column, columns.names()) {
            err = err.with_hint(format!("Did you mean '{}'?", closest));
        }
        err
    })
}

/// Run a built query against the store. A schema-mismatch failure drops the
/// cached column set before propagating, so the next request re-resolves.
async fn execute(state: &AppState, query: &SelectQuery) -> Result<Vec<Record>, ProdexError> {
    match state.store.query(query).await {
        Ok(records) => Ok(records),
        Err(e) => {
            if e.is_schema_mismatch() {
                state.schema.invalidate().await;
            }
            Err(e)
        }
    }
}

/// Maps `ProdexError` onto HTTP responses; the error's serde form is the
/// payload.
pub struct ApiError(pub ProdexError);

impl From<ProdexError> for ApiError {
    fn from(err: ProdexError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.code.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(code = %self.0.code, "{}", self.0.message);
        }
        (status, Json(self.0)).into_response()
    }
}
