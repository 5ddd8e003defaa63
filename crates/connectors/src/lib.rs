//! # prodex-connectors
//!
//! The database collaborator behind the Prodex API: schema introspection and
//! parameterized query execution over swappable backends.
//!
//! [`ProductStore`] is the single seam; [`SqliteStore`] (embedded file) and
//! [`PostgresStore`] (networked) implement it and differ only in connection
//! setup and their [`prodex_core::SqlDialect`].

pub mod postgres;
pub mod sqlite;
mod store;

pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;
pub use store::{connect, ProductStore};
