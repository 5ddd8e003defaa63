use prodex_error::{ErrorCode, ProdexError, Result};

pub(crate) fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ProdexError::new(
            ErrorCode::InvalidIdentifier,
            "empty identifier",
        ));
    }
    if name.len() > 128 {
        return Err(ProdexError::new(
            ErrorCode::InvalidIdentifier,
            format!("identifier too long: {}", name.len()),
        ));
    }
    if name.contains('"')
        || name.contains('\x00')
        || name.contains(';')
        || name.contains('`')
        || name.contains('\\')
    {
        return Err(ProdexError::new(
            ErrorCode::InvalidIdentifier,
            format!("forbidden characters in identifier: {}", name),
        ));
    }
    Ok(())
}

// Safe to wrap directly: validation rejects embedded quotes.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name)
}

/// A column name that passed the whitelist check against a live [`ColumnSet`].
///
/// There is no public constructor; the only way to obtain one is
/// [`ColumnSet::resolve`], which makes the identifier-whitelist invariant
/// structural.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIdent {
    name: String,
}

impl ColumnIdent {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render as a double-quoted SQL identifier.
    pub fn quoted(&self) -> String {
        quote_identifier(&self.name)
    }
}

/// A validated table name from trusted configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableIdent {
    name: String,
}

impl TableIdent {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_identifier(&name)?;
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quoted(&self) -> String {
        quote_identifier(&self.name)
    }
}

/// The live set of valid column names for the target table.
///
/// Obtained by backend introspection, passed explicitly into the query
/// builder (never a global) so it can be faked in tests. Construction fails
/// closed if any introspected name is structurally unsafe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet {
    columns: Vec<String>,
}

impl ColumnSet {
    pub fn new(columns: Vec<String>) -> Result<Self> {
        let mut seen: Vec<String> = Vec::with_capacity(columns.len());
        for name in columns {
            validate_identifier(&name)?;
            if !seen.contains(&name) {
                seen.push(name);
            }
        }
        Ok(Self { columns: seen })
    }

    /// Whitelist check: exact, case-sensitive membership.
    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Resolve a caller-supplied name into a validated identifier.
    pub fn resolve(&self, name: &str) -> Option<ColumnIdent> {
        self.columns
            .iter()
            .find(|c| c.as_str() == name)
            .map(|c| ColumnIdent { name: c.clone() })
    }

    pub fn names(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("produkty").is_ok());
        assert!(validate_identifier("unit_price").is_ok());

        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("foo\"bar").is_err());
        assert!(validate_identifier("x; DROP TABLE produkty").is_err());
        assert!(validate_identifier("null\0byte").is_err());
        assert!(validate_identifier("back`tick").is_err());
        assert!(validate_identifier(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_column_set_membership_is_exact() {
        let set = ColumnSet::new(vec!["Symbol".into(), "Name".into(), "Price".into()]).unwrap();
        assert!(set.contains("Symbol"));
        assert!(!set.contains("symbol"));
        assert!(!set.contains("Bogus"));
    }

    #[test]
    fn test_resolve_yields_quoted_ident() {
        let set = ColumnSet::new(vec!["Symbol".into()]).unwrap();
        let ident = set.resolve("Symbol").unwrap();
        assert_eq!(ident.name(), "Symbol");
        assert_eq!(ident.quoted(), "\"Symbol\"");
        assert!(set.resolve("Missing").is_none());
    }

    #[test]
    fn test_hostile_introspected_names_rejected() {
        let err = ColumnSet::new(vec!["ok".into(), "bad\"name".into()]).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidIdentifier);
    }

    #[test]
    fn test_duplicate_columns_deduped() {
        let set = ColumnSet::new(vec!["a".into(), "b".into(), "a".into()]).unwrap();
        assert_eq!(set.names(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_table_ident() {
        let table = TableIdent::new("produkty").unwrap();
        assert_eq!(table.quoted(), "\"produkty\"");
        assert!(TableIdent::new("produkty; --").is_err());
    }
}
