//! Prodex Server: the HTTP API layer.
//!
//! Exposes the products table via:
//! - `GET /`: static greeting.
//! - `GET /produkt/{symbol}`: single-record lookup.
//! - `GET /wyszukaj/`: filtered search with optional column projection.
//! - `GET /health`, `GET /ready`: management surface.
use anyhow::Context;
use prodex_common::config::AppConfig;
use prodex_core::{SchemaCache, TableIdent};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub mod api;

pub use api::{create_api_router, ApiError, AppState};

pub struct ProductServer {
    config_path: String,
}

impl Default for ProductServer {
    fn default() -> Self {
        Self {
            config_path: "config/prodex.yaml".to_string(),
        }
    }
}

impl ProductServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config_path: &str) -> Self {
        self.config_path = config_path.to_string();
        self
    }

    pub async fn run(self) -> anyhow::Result<()> {
        prodex_common::telemetry::init_logging();

        let config = AppConfig::load(&self.config_path)?;

        let query_timeout = Duration::from_secs(config.products.query_timeout_secs);
        let store = prodex_connectors::connect(&config.database, config.retry, query_timeout)
            .await
            .context("Failed to open the products database")?;

        let table = TableIdent::new(config.products.table.as_str())
            .context("Configured table name failed identifier validation")?;

        let state = Arc::new(AppState {
            store,
            schema: SchemaCache::new(),
            table,
            symbol_column: config.products.symbol_column.clone(),
            greeting: config.server.greeting.clone(),
        });

        let app = api::create_api_router(state);

        let addr: SocketAddr = config
            .server
            .listen_addr
            .parse()
            .context("Invalid listen address")?;
        info!("Product API server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .context("Failed to bind listen address")?;
        axum::serve(listener, app).await?;
        Ok(())
    }
}
