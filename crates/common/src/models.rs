use serde_json::{Map, Value};

/// One result row: a mapping from column name to JSON value.
///
/// Keys are unique and keep insertion order, so projected columns appear in
/// the order the caller asked for.
pub type Record = Map<String, Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_preserves_insertion_order() {
        let mut record = Record::new();
        record.insert("Symbol".to_string(), Value::from("A1"));
        record.insert("Name".to_string(), Value::from("Widget"));
        record.insert("Price".to_string(), Value::from(9.99));

        let keys: Vec<&String> = record.keys().collect();
        assert_eq!(keys, vec!["Symbol", "Name", "Price"]);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"Symbol":"A1","Name":"Widget","Price":9.99}"#);
    }
}
