//! Embedded DuckDB backend.
//!
//! Tab names map to tables in the `main` schema, with whitespace in the
//! given name collapsed to single underscores to satisfy identifier
//! rules. Writing to an existing table is an explicit conflict unless
//! the document was built with overwrite semantics.

use std::path::Path;

use duckdb::types::Value as DuckValue;
use duckdb::Connection;
use tabsync_core::{Column, Result, TabDocument, TabError, Table, Value};
use tracing::debug;

/// SQL type chosen for a column, inferred from its values.
///
/// Inference priority mirrors the usual spreadsheet-ingestion order:
/// boolean, then integral, then numeric, falling back to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Boolean,
    BigInt,
    Double,
    Varchar,
}

impl ColumnKind {
    const fn sql_type(&self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::BigInt => "BIGINT",
            Self::Double => "DOUBLE",
            Self::Varchar => "VARCHAR",
        }
    }

    fn infer(column: &Column) -> Self {
        let values: Vec<&Value> = column.values.iter().filter(|v| !v.is_null()).collect();
        if values.is_empty() {
            Self::Varchar
        } else if values.iter().all(|v| matches!(v, Value::Bool(_))) {
            Self::Boolean
        } else if values.iter().all(|v| matches!(v, Value::Int(_))) {
            Self::BigInt
        } else if values
            .iter()
            .all(|v| matches!(v, Value::Int(_) | Value::Float(_)))
        {
            Self::Double
        } else {
            Self::Varchar
        }
    }

    /// Coerces a value to the column's declared type for insertion.
    fn coerce(&self, value: &Value) -> DuckValue {
        match (self, value) {
            (_, Value::Null) => DuckValue::Null,
            (Self::Boolean, Value::Bool(b)) => DuckValue::Boolean(*b),
            (Self::BigInt, Value::Int(i)) => DuckValue::BigInt(*i),
            (Self::Double, Value::Int(i)) => DuckValue::Double(*i as f64),
            (Self::Double, Value::Float(f)) => DuckValue::Double(*f),
            (_, other) => DuckValue::Text(other.to_string()),
        }
    }
}

/// A document over one embedded DuckDB connection.
pub struct DuckDbDocument {
    conn: Connection,
    overwrite: bool,
}

impl DuckDbDocument {
    /// Opens an in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Ok(Self {
            conn,
            overwrite: false,
        })
    }

    /// Opens (or creates) a database file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path).map_err(db_err)?;
        Ok(Self {
            conn,
            overwrite: false,
        })
    }

    /// Enables replace semantics: writing to an existing table drops and
    /// recreates it instead of failing with a conflict.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    fn table_exists(&self, table: &str) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT count(*) FROM information_schema.tables \
                 WHERE table_schema = 'main' AND table_name = ?",
                [table],
                |row| row.get(0),
            )
            .map_err(db_err)?;
        Ok(count > 0)
    }

    fn run_query(&self, sql: &str) -> Result<Table> {
        let mut stmt = self.conn.prepare(sql).map_err(db_err)?;
        let mut data: Vec<Vec<Value>> = Vec::new();
        {
            let mut rows = stmt.query([]).map_err(db_err)?;
            while let Some(row) = rows.next().map_err(db_err)? {
                let width = row.as_ref().column_count();
                let mut record = Vec::with_capacity(width);
                for index in 0..width {
                    let value: DuckValue = row.get(index).map_err(db_err)?;
                    record.push(from_duckdb(value));
                }
                data.push(record);
            }
        }
        let names = stmt.column_names();
        Table::from_rows(names, data)
    }
}

impl TabDocument for DuckDbDocument {
    fn backend_name(&self) -> &'static str {
        "duckdb"
    }

    fn tab_names(&self) -> Result<Vec<String>> {
        let table = self.run_query(
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = 'main' ORDER BY table_name",
        )?;
        Ok(table
            .rows()
            .map(|row| row[0].to_string())
            .collect())
    }

    fn read_tab(&self, name: &str) -> Result<Table> {
        let table_name = sanitize_name(name);
        if !self.table_exists(&table_name)? {
            return Err(TabError::NotFound {
                name: name.to_string(),
                backend: "duckdb",
            });
        }
        self.run_query(&format!("SELECT * FROM {}", quote_ident(&table_name)))
    }

    fn write_tab(&self, name: &str, table: &Table) -> Result<()> {
        let table_name = sanitize_name(name);
        if self.table_exists(&table_name)? {
            if !self.overwrite {
                return Err(TabError::Conflict {
                    name: table_name,
                    backend: "duckdb",
                });
            }
            self.conn
                .execute_batch(&format!("DROP TABLE {}", quote_ident(&table_name)))
                .map_err(db_err)?;
        }

        let kinds: Vec<ColumnKind> = table.columns().iter().map(ColumnKind::infer).collect();
        let column_defs: Vec<String> = table
            .columns()
            .iter()
            .zip(&kinds)
            .map(|(column, kind)| format!("{} {}", quote_ident(&column.name), kind.sql_type()))
            .collect();
        self.conn
            .execute_batch(&format!(
                "CREATE TABLE {} ({})",
                quote_ident(&table_name),
                column_defs.join(", ")
            ))
            .map_err(db_err)?;

        let placeholders = vec!["?"; kinds.len()].join(", ");
        let mut insert = self
            .conn
            .prepare(&format!(
                "INSERT INTO {} VALUES ({placeholders})",
                quote_ident(&table_name)
            ))
            .map_err(db_err)?;
        for row in table.rows() {
            let values: Vec<DuckValue> = row
                .into_iter()
                .zip(&kinds)
                .map(|(value, kind)| kind.coerce(value))
                .collect();
            insert
                .execute(duckdb::params_from_iter(values))
                .map_err(db_err)?;
        }

        debug!(
            tab = name,
            table = table_name,
            rows = table.row_count(),
            "wrote table"
        );
        Ok(())
    }

    fn query(&self, sql: &str) -> Result<Table> {
        self.run_query(sql)
    }
}

/// Collapses whitespace runs in a tab name to single underscores.
fn sanitize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Double-quoted SQL identifier with embedded quotes doubled.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn from_duckdb(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(b) => Value::Bool(b),
        DuckValue::TinyInt(i) => Value::Int(i64::from(i)),
        DuckValue::SmallInt(i) => Value::Int(i64::from(i)),
        DuckValue::Int(i) => Value::Int(i64::from(i)),
        DuckValue::BigInt(i) => Value::Int(i),
        DuckValue::HugeInt(i) => i64::try_from(i)
            .map(Value::Int)
            .unwrap_or_else(|_| Value::Text(i.to_string())),
        DuckValue::UTinyInt(u) => Value::Int(i64::from(u)),
        DuckValue::USmallInt(u) => Value::Int(i64::from(u)),
        DuckValue::UInt(u) => Value::Int(i64::from(u)),
        DuckValue::UBigInt(u) => i64::try_from(u)
            .map(Value::Int)
            .unwrap_or_else(|_| Value::Text(u.to_string())),
        DuckValue::Float(f) => Value::Float(f64::from(f)),
        DuckValue::Double(f) => Value::Float(f),
        DuckValue::Text(s) => Value::Text(s),
        // Non-scalar kinds have no Table representation; stringify.
        other => Value::Text(format!("{:?}", other)),
    }
}

fn db_err(e: duckdb::Error) -> TabError {
    TabError::Backend(format!("duckdb error: {e}"))
}
