//! Convert serde_json::Value into the text form bound for a column; the SQL side casts it.

use serde_json::Value;

use crate::config::{ColumnDef, ColumnKind};
use crate::error::StoreError;
use crate::store::check_value;

/// Text representation of `v` for `column`, or `None` for NULL.
pub fn to_text(column: &ColumnDef, v: &Value) -> Result<Option<String>, StoreError> {
    check_value(column, v)?;
    Ok(match (column.kind, v) {
        (_, Value::Null) => None,
        (ColumnKind::Json, v) => Some(v.to_string()),
        (_, Value::String(s)) => Some(s.clone()),
        (_, Value::Number(n)) => Some(n.to_string()),
        (_, other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_columns_are_serialised() {
        let col = ColumnDef::new("address", ColumnKind::Json);
        assert_eq!(
            to_text(&col, &json!({"city": "Tomsk"})).unwrap().as_deref(),
            Some(r#"{"city":"Tomsk"}"#)
        );
        assert_eq!(to_text(&col, &json!("plain")).unwrap().as_deref(), Some(r#""plain""#));
    }

    #[test]
    fn scalars_are_bound_verbatim() {
        let text = ColumnDef::new("name", ColumnKind::Text);
        let int = ColumnDef::new("max_users", ColumnKind::BigInt);
        assert_eq!(to_text(&text, &json!("a'b")).unwrap().as_deref(), Some("a'b"));
        assert_eq!(to_text(&int, &json!(42)).unwrap().as_deref(), Some("42"));
        assert_eq!(to_text(&int, &Value::Null).unwrap(), None);
        assert!(to_text(&int, &json!("42")).is_err());
    }
}
