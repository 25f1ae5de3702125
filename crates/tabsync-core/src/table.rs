//! In-memory tabular values.
//!
//! A `Table` is an ordered sequence of named columns of equal length.
//! Column names are unique within a table. Tables cross every backend
//! boundary; type fidelity beyond the `Value` scalars is not guaranteed.

use std::collections::HashSet;
use std::fmt;

use crate::error::{Result, TabError};

/// An ordered row mapping, as exchanged with the directory backend.
///
/// `serde_json` is built with `preserve_order`, so key order survives the
/// serialize/deserialize round trip.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// A scalar cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Converts a JSON scalar into a `Value`.
    ///
    /// Integers that fit `i64` stay integral; other numbers become floats.
    /// Non-scalar JSON (arrays, objects) is stringified.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::Text(s.clone()),
            other => Self::Text(other.to_string()),
        }
    }

    /// Converts the value into its JSON representation.
    ///
    /// Non-finite floats have no JSON encoding and become null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::Number((*i).into()),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Text(s) => serde_json::Value::String(s.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// A named column of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

/// An ordered, named-column tabular value.
///
/// Invariants: all columns have equal length; column names are unique.
/// Constructors and mutators enforce both and fail with
/// [`TabError::Schema`] otherwise.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Builds an empty table with the given column names.
    pub fn with_columns<S: Into<String>>(names: Vec<S>) -> Result<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        check_unique(&names)?;
        Ok(Self {
            columns: names
                .into_iter()
                .map(|name| Column {
                    name,
                    values: Vec::new(),
                })
                .collect(),
        })
    }

    /// Builds a table from a header and data rows in row-major order.
    ///
    /// Every row must match the header width.
    pub fn from_rows<S: Into<String>>(header: Vec<S>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut table = Self::with_columns(header)?;
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Rebuilds a table from ordered row records.
    ///
    /// Column order follows first appearance across the records; keys
    /// missing from a record produce nulls in that row.
    pub fn from_records(records: &[Record]) -> Result<Self> {
        let mut names: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !names.iter().any(|n| n == key) {
                    names.push(key.clone());
                }
            }
        }
        let mut table = Self::with_columns(names)?;
        for record in records {
            let row = table
                .columns
                .iter()
                .map(|column| {
                    record
                        .get(&column.name)
                        .map(Value::from_json)
                        .unwrap_or(Value::Null)
                })
                .collect();
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Converts the table into ordered row records.
    pub fn to_records(&self) -> Vec<Record> {
        (0..self.row_count())
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| (column.name.clone(), column.values[row].to_json()))
                    .collect()
            })
            .collect()
    }

    /// Appends one row; its width must match the column count.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(TabError::Schema(format!(
                "row has {} values but the table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        for (column, value) in self.columns.iter_mut().zip(row) {
            column.values.push(value);
        }
        Ok(())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Iterates rows in order, each as a slice of column values.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.row_count()).map(move |row| self.columns.iter().map(|c| &c.values[row]).collect())
    }
}

fn check_unique(names: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(TabError::Schema(format!("duplicate column name '{}'", name)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Table {
        Table::from_rows(
            vec!["id", "name", "score"],
            vec![
                vec![Value::Int(1), "ada".into(), Value::Float(9.5)],
                vec![Value::Int(2), "grace".into(), Value::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_duplicate_column_names() {
        let err = Table::with_columns(vec!["id", "id"]).unwrap_err();
        assert!(matches!(err, TabError::Schema(_)));
    }

    #[test]
    fn rejects_ragged_rows() {
        let mut table = Table::with_columns(vec!["a", "b"]).unwrap();
        let err = table.push_row(vec![Value::Int(1)]).unwrap_err();
        assert!(matches!(err, TabError::Schema(_)));
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn preserves_column_and_row_order() {
        let table = sample();
        assert_eq!(table.column_names(), vec!["id", "name", "score"]);
        let rows: Vec<Vec<&Value>> = table.rows().collect();
        assert_eq!(rows[0][1], &Value::Text("ada".to_string()));
        assert_eq!(rows[1][0], &Value::Int(2));
    }

    #[test]
    fn record_round_trip_preserves_order_and_types() {
        let table = sample();
        let records = table.to_records();
        assert_eq!(
            records[0].keys().collect::<Vec<_>>(),
            vec!["id", "name", "score"]
        );
        let back = Table::from_records(&records).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn json_numbers_keep_integer_vs_float_distinction() {
        assert_eq!(Value::from_json(&serde_json::json!(3)), Value::Int(3));
        assert_eq!(Value::from_json(&serde_json::json!(3.5)), Value::Float(3.5));
        assert_eq!(
            Value::from_json(&serde_json::json!("3")),
            Value::Text("3".to_string())
        );
    }

    #[test]
    fn null_displays_as_empty_cell() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Int(42).to_string(), "42");
    }
}
