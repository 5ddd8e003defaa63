//! # prodex-core
//!
//! The schema-driven query builder behind the Prodex API.
//!
//! The safety invariant enforced here: only column names validated against
//! the live, introspected [`ColumnSet`] are ever interpolated into SQL text
//! (as quoted identifiers), and caller-supplied values travel exclusively as
//! bound parameters. [`ColumnIdent`] can only be obtained through
//! [`ColumnSet::resolve`], so the whitelist check is structural, not a
//! convention.

pub mod cache;
pub mod dialect;
pub mod query;
pub mod schema;

pub use cache::SchemaCache;
pub use dialect::{PostgresDialect, SqlDialect, SqliteDialect};
pub use query::{build_lookup, build_search, resolve_filters, Filter, Projection, SelectQuery};
pub use schema::{ColumnIdent, ColumnSet, TableIdent};
