use crate::schema::ColumnIdent;

/// The per-backend SQL text differences: placeholder style and the
/// case-insensitive exact-match predicate.
///
/// Both implementations must behave as exact, case-insensitive string
/// equality, never substring matching.
pub trait SqlDialect: Send + Sync {
    fn name(&self) -> &'static str;

    /// Positional placeholder for the parameter at `idx` (1-based).
    fn placeholder(&self, idx: usize) -> String;

    /// Case-insensitive equality predicate for `column` against the
    /// parameter at `idx`.
    fn ci_match(&self, column: &ColumnIdent, idx: usize) -> String;

    /// Transform a raw filter value before binding. Dialects whose match
    /// operator assigns meaning to characters in the value escape them here.
    fn bind_value(&self, raw: &str) -> String {
        raw.to_string()
    }
}

/// Embedded file-based backend: anonymous placeholders, `COLLATE NOCASE`
/// equality.
pub struct SqliteDialect;

impl SqlDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn placeholder(&self, _idx: usize) -> String {
        "?".to_string()
    }

    fn ci_match(&self, column: &ColumnIdent, idx: usize) -> String {
        format!("{} = {} COLLATE NOCASE", column.quoted(), self.placeholder(idx))
    }
}

/// Networked backend: `$n` placeholders, `ILIKE` with every pattern
/// metacharacter escaped so it degrades to exact case-insensitive equality.
///
/// The `::text` cast keeps the predicate typed against non-text columns,
/// mirroring SQLite's affinity-based comparison.
pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn placeholder(&self, idx: usize) -> String {
        format!("${}", idx)
    }

    fn ci_match(&self, column: &ColumnIdent, idx: usize) -> String {
        format!(
            "{}::text ILIKE {} ESCAPE '\\'",
            column.quoted(),
            self.placeholder(idx)
        )
    }

    fn bind_value(&self, raw: &str) -> String {
        raw.replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_")
    }
}
