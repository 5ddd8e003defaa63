use crate::dialect::SqlDialect;
use crate::schema::{ColumnIdent, ColumnSet, TableIdent};
use tracing::debug;

/// A validated (column, value) pair used to restrict returned rows via
/// case-insensitive equality.
#[derive(Debug, Clone)]
pub struct Filter {
    pub column: ColumnIdent,
    pub value: String,
}

/// The caller-controlled subset (and order) of columns to return.
#[derive(Debug, Clone)]
pub enum Projection {
    All,
    Columns(Vec<ColumnIdent>),
}

impl Projection {
    /// Resolve the caller's comma-separated field list against the live
    /// column set.
    ///
    /// Entries are trimmed and matched in caller order; names not in the
    /// set are dropped. An entirely invalid list falls back to the single
    /// `fallback` column; an absent list selects all columns.
    pub fn resolve(fields: Option<&str>, columns: &ColumnSet, fallback: &ColumnIdent) -> Self {
        let Some(fields) = fields else {
            return Self::All;
        };

        let mut valid = Vec::new();
        for raw in fields.split(',') {
            let name = raw.trim();
            if name.is_empty() {
                continue;
            }
            match columns.resolve(name) {
                Some(ident) => {
                    if !valid.contains(&ident) {
                        valid.push(ident);
                    }
                }
                None => debug!(field = name, "ignoring unknown projection field"),
            }
        }

        if valid.is_empty() {
            debug!(
                fallback = fallback.name(),
                "no valid projection fields, falling back to identifying column"
            );
            Self::Columns(vec![fallback.clone()])
        } else {
            Self::Columns(valid)
        }
    }

    fn select_list(&self) -> String {
        match self {
            Self::All => "*".to_string(),
            Self::Columns(cols) => cols
                .iter()
                .map(|c| c.quoted())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Validate caller-supplied key/value parameters against the column set.
///
/// Keys not in the set are silently dropped (logged at debug): unknown
/// filters are ignored, never rejected. The reserved `fields` control
/// parameter must be stripped by the caller beforehand.
pub fn resolve_filters(params: &[(String, String)], columns: &ColumnSet) -> Vec<Filter> {
    let mut filters = Vec::new();
    for (key, value) in params {
        match columns.resolve(key) {
            Some(column) => filters.push(Filter {
                column,
                value: value.clone(),
            }),
            None => debug!(filter = key.as_str(), "ignoring unknown filter column"),
        }
    }
    filters
}

/// A fully assembled, parameterized SELECT: SQL text plus bound values in
/// predicate order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub sql: String,
    pub params: Vec<String>,
}

/// Build the filtered-search query.
///
/// `SELECT <projection> FROM <table> [WHERE <p1> AND <p2> ...]`; the WHERE
/// clause is omitted entirely when no filters survived validation.
pub fn build_search(
    table: &TableIdent,
    projection: &Projection,
    filters: &[Filter],
    dialect: &dyn SqlDialect,
) -> SelectQuery {
    let mut sql = format!(
        "SELECT {} FROM {}",
        projection.select_list(),
        table.quoted()
    );

    let mut params = Vec::with_capacity(filters.len());
    if !filters.is_empty() {
        let predicates: Vec<String> = filters
            .iter()
            .enumerate()
            .map(|(i, f)| dialect.ci_match(&f.column, i + 1))
            .collect();
        sql.push_str(" WHERE ");
        sql.push_str(&predicates.join(" AND "));
        for f in filters {
            params.push(dialect.bind_value(&f.value));
        }
    }

    SelectQuery { sql, params }
}

/// Build the single-record lookup: exact, case-sensitive match on the
/// identifying column, first backend row wins.
pub fn build_lookup(
    table: &TableIdent,
    symbol_column: &ColumnIdent,
    symbol: &str,
    dialect: &dyn SqlDialect,
) -> SelectQuery {
    let sql = format!(
        "SELECT * FROM {} WHERE {} = {} LIMIT 1",
        table.quoted(),
        symbol_column.quoted(),
        dialect.placeholder(1)
    );
    SelectQuery {
        sql,
        params: vec![symbol.to_string()],
    }
}
