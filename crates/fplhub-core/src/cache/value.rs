//! Values held by the local store.
//!
//! A stored value is either a table (an ordered sequence of uniform JSON
//! records) or an arbitrary JSON document. Tables are written to disk inside
//! a tagged wrapper so they come back as tables on read:
//!
//! ```json
//! { "is_table": true, "rows": [ { "id": 1, "web_name": "Saka" } ] }
//! ```

use std::cmp::Ordering;

use anyhow::{bail, Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

/// Discriminator field marking a wrapped table.
const TABLE_TAG: &str = "is_table";

/// Field holding the wrapped table's records.
const TABLE_ROWS: &str = "rows";

/// One row of a table.
pub type Record = Map<String, Value>;

/// Ordered sequence of JSON object records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Record>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    /// Build a table from serializable records.
    ///
    /// Every record must serialize to a JSON object; anything else (numbers,
    /// strings, arrays) has no column structure and is rejected.
    pub fn from_records<T: Serialize>(records: &[T]) -> Result<Self> {
        let mut rows = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            match serde_json::to_value(record)
                .with_context(|| format!("Failed to serialize record {}", index))?
            {
                Value::Object(map) => rows.push(map),
                other => bail!(
                    "Record {} is a {}, tables only hold objects",
                    index,
                    json_kind(&other)
                ),
            }
        }
        Ok(Self { rows })
    }

    /// Decode every row into a typed record.
    pub fn to_records<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                serde_json::from_value(Value::Object(row.clone()))
                    .with_context(|| format!("Failed to decode table row {}", index))
            })
            .collect()
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names of the first row, in insertion order.
    pub fn columns(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|row| row.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Keep only rows matching the predicate.
    pub fn retain<F: FnMut(&Record) -> bool>(&mut self, f: F) {
        self.rows.retain(f);
    }

    /// Sort rows by a numeric column, largest first. Rows without a numeric
    /// value in that column sort last.
    pub fn sort_by_number_desc(&mut self, column: &str) {
        self.rows.sort_by(|a, b| {
            match (cell_f64(a, column), cell_f64(b, column)) {
                (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });
    }

    pub fn truncate(&mut self, len: usize) {
        self.rows.truncate(len);
    }
}

/// Numeric value of a record cell, accepting numbers and numeric strings.
pub fn cell_f64(record: &Record, column: &str) -> Option<f64> {
    match record.get(column)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// A value stored under a key: either a table or a plain JSON document.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Table(Table),
    Document(Value),
}

impl CachedValue {
    /// Encode for disk. Tables get the tagged wrapper; documents are written
    /// as-is.
    ///
    /// A document that itself carries the table tag would decode as a table,
    /// so it is refused here instead of being silently reshaped on read.
    pub fn to_json(&self) -> Result<Value> {
        match self {
            CachedValue::Table(table) => {
                let mut wrapper = Map::new();
                wrapper.insert(TABLE_TAG.to_string(), Value::Bool(true));
                wrapper.insert(
                    TABLE_ROWS.to_string(),
                    Value::Array(table.rows.iter().cloned().map(Value::Object).collect()),
                );
                Ok(Value::Object(wrapper))
            }
            CachedValue::Document(value) => {
                if is_tagged_table(value) {
                    bail!("Document carries the reserved '{}' field", TABLE_TAG);
                }
                Ok(value.clone())
            }
        }
    }

    /// Decode a value read from disk.
    pub fn from_json(value: Value) -> Result<Self> {
        if !is_tagged_table(&value) {
            return Ok(CachedValue::Document(value));
        }

        let Value::Object(mut wrapper) = value else {
            bail!("Tagged table is not an object");
        };
        let rows = match wrapper.remove(TABLE_ROWS) {
            Some(Value::Array(rows)) => rows,
            Some(other) => bail!("Table rows are a {}, expected an array", json_kind(&other)),
            None => bail!("Tagged table has no '{}' field", TABLE_ROWS),
        };

        let mut records = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            match row {
                Value::Object(map) => records.push(map),
                other => bail!("Table row {} is a {}, expected an object", index, json_kind(&other)),
            }
        }
        Ok(CachedValue::Table(Table::from_rows(records)))
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            CachedValue::Table(table) => Some(table),
            CachedValue::Document(_) => None,
        }
    }

    pub fn into_table(self) -> Option<Table> {
        match self {
            CachedValue::Table(table) => Some(table),
            CachedValue::Document(_) => None,
        }
    }

    pub fn into_document(self) -> Option<Value> {
        match self {
            CachedValue::Table(_) => None,
            CachedValue::Document(value) => Some(value),
        }
    }
}

impl From<Table> for CachedValue {
    fn from(table: Table) -> Self {
        CachedValue::Table(table)
    }
}

impl From<Value> for CachedValue {
    fn from(value: Value) -> Self {
        CachedValue::Document(value)
    }
}

fn is_tagged_table(value: &Value) -> bool {
    value.get(TABLE_TAG) == Some(&Value::Bool(true))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: i64,
        name: String,
        price: f64,
    }

    #[test]
    fn test_table_wrapper_shape() {
        let table = Table::from_records(&[Row { id: 1, name: "Saka".into(), price: 10.1 }])
            .expect("records are objects");
        let encoded = CachedValue::Table(table).to_json().expect("table encodes");
        assert_eq!(encoded["is_table"], json!(true));
        assert_eq!(encoded["rows"][0]["name"], json!("Saka"));
    }

    #[test]
    fn test_table_decodes_back_to_records() {
        let rows = vec![
            Row { id: 1, name: "Saka".into(), price: 10.1 },
            Row { id: 2, name: "Raya".into(), price: 5.5 },
        ];
        let encoded = CachedValue::Table(Table::from_records(&rows).expect("objects"))
            .to_json()
            .expect("encodes");
        let decoded = CachedValue::from_json(encoded).expect("decodes");
        let table = decoded.into_table().expect("is a table");
        assert_eq!(table.to_records::<Row>().expect("typed rows"), rows);
    }

    #[test]
    fn test_plain_documents_pass_through() {
        let doc = json!({"elements": [1, 2, 3], "last_updated": "2024-08-01"});
        let decoded = CachedValue::from_json(doc.clone()).expect("decodes");
        assert_eq!(decoded, CachedValue::Document(doc));

        // is_table must be literally true to count as a tag
        let not_tagged = json!({"is_table": "yes", "rows": []});
        assert!(matches!(
            CachedValue::from_json(not_tagged).expect("decodes"),
            CachedValue::Document(_)
        ));
    }

    #[test]
    fn test_non_object_records_rejected() {
        assert!(Table::from_records(&[1, 2, 3]).is_err());
        assert!(Table::from_records(&["a"]).is_err());
    }

    #[test]
    fn test_malformed_tagged_table_rejected() {
        assert!(CachedValue::from_json(json!({"is_table": true})).is_err());
        assert!(CachedValue::from_json(json!({"is_table": true, "rows": {}})).is_err());
        assert!(CachedValue::from_json(json!({"is_table": true, "rows": [1]})).is_err());
    }

    #[test]
    fn test_document_with_reserved_tag_refused() {
        let doc = CachedValue::Document(json!({"is_table": true, "rows": []}));
        assert!(doc.to_json().is_err());
    }

    #[test]
    fn test_sort_by_number_desc() {
        let mut table = Table::from_rows(vec![
            json!({"gw": 2}).as_object().cloned().unwrap_or_default(),
            json!({"gw": "x"}).as_object().cloned().unwrap_or_default(),
            json!({"gw": 7}).as_object().cloned().unwrap_or_default(),
            json!({"gw": "3"}).as_object().cloned().unwrap_or_default(),
        ]);
        table.sort_by_number_desc("gw");
        let order: Vec<Option<f64>> = table.rows().iter().map(|r| cell_f64(r, "gw")).collect();
        assert_eq!(order, vec![Some(7.0), Some(3.0), Some(2.0), None]);
    }
}
