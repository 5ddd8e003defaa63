use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use prodex_connectors::SqliteStore;
use prodex_core::{SchemaCache, TableIdent};
use prodex_server::{create_api_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tower::util::ServiceExt;

const GREETING: &str = "Witaj w API Bazy Produktowej! Gotowy do działania.";
const NOT_FOUND_MESSAGE: &str = "Produkt o podanym symbolu nie został znaleziony.";

fn seed_products(db_path: &str) {
    let conn = rusqlite::Connection::open(db_path).unwrap();
    conn.execute(
        "CREATE TABLE produkty (Symbol TEXT, Name TEXT, Price REAL)",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO produkty (Symbol, Name, Price) VALUES (?, ?, ?)",
        rusqlite::params!["A1", "Widget", 9.99],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO produkty (Symbol, Name, Price) VALUES (?, ?, ?)",
        rusqlite::params!["a2", "Gadget", 5.00],
    )
    .unwrap();
}

fn app(db_path: &str) -> Router {
    let store = SqliteStore::new(db_path, Duration::from_secs(30)).unwrap();
    let state = Arc::new(AppState {
        store: Arc::new(store),
        schema: SchemaCache::new(),
        table: TableIdent::new("produkty").unwrap(),
        symbol_column: "Symbol".to_string(),
        greeting: GREETING.to_string(),
    });
    create_api_router(state)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&body).unwrap();
    (status, value)
}

#[tokio::test]
async fn test_root_returns_greeting() {
    let temp_db = NamedTempFile::new().unwrap();
    let db_path = temp_db.path().to_str().unwrap().to_string();
    seed_products(&db_path);
    let app = app(&db_path);

    let (status, body) = get_json(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": GREETING }));
}

#[tokio::test]
async fn test_get_product_by_symbol() {
    let temp_db = NamedTempFile::new().unwrap();
    let db_path = temp_db.path().to_str().unwrap().to_string();
    seed_products(&db_path);
    let app = app(&db_path);

    let (status, body) = get_json(&app, "/produkt/A1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "Symbol": "A1", "Name": "Widget", "Price": 9.99 })
    );
}

#[tokio::test]
async fn test_get_product_unknown_symbol_is_404() {
    let temp_db = NamedTempFile::new().unwrap();
    let db_path = temp_db.path().to_str().unwrap().to_string();
    seed_products(&db_path);
    let app = app(&db_path);

    let (status, body) = get_json(&app, "/produkt/ZZ").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "PRODEX-2002");
    assert_eq!(body["message"], NOT_FOUND_MESSAGE);
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let temp_db = NamedTempFile::new().unwrap();
    let db_path = temp_db.path().to_str().unwrap().to_string();
    seed_products(&db_path);
    let app = app(&db_path);

    let (status, body) = get_json(&app, "/wyszukaj/?Symbol=a1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{ "Symbol": "A1", "Name": "Widget", "Price": 9.99 }])
    );
}

#[tokio::test]
async fn test_search_matches_numeric_columns_as_text() {
    let temp_db = NamedTempFile::new().unwrap();
    let db_path = temp_db.path().to_str().unwrap().to_string();
    seed_products(&db_path);
    let app = app(&db_path);

    let (status, body) = get_json(&app, "/wyszukaj/?Price=9.99").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Symbol"], "A1");
}

#[tokio::test]
async fn test_search_without_params_returns_everything() {
    let temp_db = NamedTempFile::new().unwrap();
    let db_path = temp_db.path().to_str().unwrap().to_string();
    seed_products(&db_path);
    let app = app(&db_path);

    let (status, body) = get_json(&app, "/wyszukaj/").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert_eq!(row.as_object().unwrap().len(), 3);
    }
}

#[tokio::test]
async fn test_search_ignores_unknown_filters() {
    let temp_db = NamedTempFile::new().unwrap();
    let db_path = temp_db.path().to_str().unwrap().to_string();
    seed_products(&db_path);
    let app = app(&db_path);

    let (baseline_status, baseline) = get_json(&app, "/wyszukaj/").await;
    let (status, body) = get_json(&app, "/wyszukaj/?nonexistent_col=x").await;
    assert_eq!(baseline_status, StatusCode::OK);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, baseline);
}

#[tokio::test]
async fn test_projection_keeps_only_valid_fields() {
    let temp_db = NamedTempFile::new().unwrap();
    let db_path = temp_db.path().to_str().unwrap().to_string();
    seed_products(&db_path);
    let app = app(&db_path);

    let (status, body) = get_json(&app, "/wyszukaj/?fields=Name,Bogus").await;
    assert_eq!(status, StatusCode::OK);
    for row in body.as_array().unwrap() {
        let keys: Vec<&String> = row.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["Name"]);
    }
}

#[tokio::test]
async fn test_projection_falls_back_to_symbol() {
    let temp_db = NamedTempFile::new().unwrap();
    let db_path = temp_db.path().to_str().unwrap().to_string();
    seed_products(&db_path);
    let app = app(&db_path);

    let (status, body) = get_json(&app, "/wyszukaj/?fields=Bogus1,Bogus2").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows {
        let keys: Vec<&String> = row.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["Symbol"]);
    }
}

#[tokio::test]
async fn test_duplicate_filter_key_last_value_wins() {
    let temp_db = NamedTempFile::new().unwrap();
    let db_path = temp_db.path().to_str().unwrap().to_string();
    seed_products(&db_path);
    let app = app(&db_path);

    let (status, body) = get_json(&app, "/wyszukaj/?Name=Widget&Name=Gadget").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Symbol"], "a2");
}

#[tokio::test]
async fn test_health_and_ready() {
    let temp_db = NamedTempFile::new().unwrap();
    let db_path = temp_db.path().to_str().unwrap().to_string();
    seed_products(&db_path);
    let app = app(&db_path);

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let (status, body) = get_json(&app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ready" }));
}

#[tokio::test]
async fn test_ready_reports_unavailable_schema() {
    let temp_db = NamedTempFile::new().unwrap();
    let db_path = temp_db.path().to_str().unwrap().to_string();
    // No table seeded: schema resolution must fail closed.
    let app = app(&db_path);

    let (status, body) = get_json(&app, "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "PRODEX-2001");
}

#[tokio::test]
async fn test_schema_change_invalidates_cache() {
    let temp_db = NamedTempFile::new().unwrap();
    let db_path = temp_db.path().to_str().unwrap().to_string();
    seed_products(&db_path);
    let app = app(&db_path);

    // Warm the schema cache with Price still present.
    let (status, _) = get_json(&app, "/wyszukaj/?Price=9.99").await;
    assert_eq!(status, StatusCode::OK);

    // The column vanishes behind the server's back.
    rusqlite::Connection::open(&db_path)
        .unwrap()
        .execute("ALTER TABLE produkty DROP COLUMN Price", [])
        .unwrap();

    // The stale cache still admits the filter, so the query fails closed
    // and drops the cached column set.
    let (status, body) = get_json(&app, "/wyszukaj/?Price=9.99").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "PRODEX-2001");

    // Re-resolved schema no longer contains Price: the filter is now
    // unknown and silently dropped.
    let (status, body) = get_json(&app, "/wyszukaj/?Price=9.99").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}
