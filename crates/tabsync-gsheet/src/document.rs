//! Spreadsheet-backed document.

use tabsync_core::{Result, TabDocument, TabError, Table, Value};
use tracing::debug;

use crate::client::SheetsClient;

/// Newly created tabs are never narrower than this, so they stay usable
/// for later manual editing.
const MIN_NEW_TAB_COLUMNS: usize = 5;

/// A document over one remote spreadsheet.
#[derive(Debug)]
pub struct SheetDocument {
    client: SheetsClient,
    spreadsheet_id: String,
}

impl SheetDocument {
    /// Opens the spreadsheet identified by `spreadsheet_id`.
    ///
    /// Performs one metadata fetch so that an unreachable service or bad
    /// credentials fail construction instead of the first table
    /// operation.
    pub fn open(client: SheetsClient, spreadsheet_id: impl Into<String>) -> Result<Self> {
        let document = Self {
            client,
            spreadsheet_id: spreadsheet_id.into(),
        };
        let tabs = document.client.tab_titles(&document.spreadsheet_id)?;
        debug!(
            spreadsheet = document.spreadsheet_id,
            tabs = tabs.len(),
            "opened spreadsheet"
        );
        Ok(document)
    }

    fn require_tab(&self, name: &str) -> Result<Vec<String>> {
        let titles = self.client.tab_titles(&self.spreadsheet_id)?;
        if titles.iter().any(|t| t == name) {
            Ok(titles)
        } else {
            Err(TabError::NotFound {
                name: name.to_string(),
                backend: "gsheet",
            })
        }
    }
}

impl TabDocument for SheetDocument {
    fn backend_name(&self) -> &'static str {
        "gsheet"
    }

    fn tab_names(&self) -> Result<Vec<String>> {
        self.client.tab_titles(&self.spreadsheet_id)
    }

    /// Reads a tab; the first row is consumed as the header and excluded
    /// from the data rows.
    fn read_tab(&self, name: &str) -> Result<Table> {
        self.require_tab(name)?;
        let mut rows = self
            .client
            .get_values(&self.spreadsheet_id, name)?
            .into_iter();

        let header: Vec<String> = rows
            .next()
            .ok_or_else(|| TabError::Schema(format!("tab '{}' has no header row", name)))?
            .into_iter()
            .map(|cell| match cell {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect();

        let width = header.len();
        let data: Vec<Vec<Value>> = rows
            .map(|row| {
                // The API omits trailing empty cells; pad back to width.
                let mut values: Vec<Value> =
                    row.iter().take(width).map(Value::from_json).collect();
                values.resize(width, Value::Null);
                values
            })
            .collect();

        Table::from_rows(header, data)
    }

    /// Writes a table, clearing an existing tab or creating a new one
    /// sized at least `(rows + 1) x max(columns, 5)`.
    fn write_tab(&self, name: &str, table: &Table) -> Result<()> {
        let titles = self.client.tab_titles(&self.spreadsheet_id)?;
        if titles.iter().any(|t| t == name) {
            self.client.clear_tab(&self.spreadsheet_id, name)?;
        } else {
            let row_count = table.row_count() + 1;
            let column_count = table.column_count().max(MIN_NEW_TAB_COLUMNS);
            self.client
                .add_tab(&self.spreadsheet_id, name, row_count, column_count)?;
        }

        let mut values: Vec<Vec<serde_json::Value>> = Vec::with_capacity(table.row_count() + 1);
        values.push(
            table
                .column_names()
                .into_iter()
                .map(|n| serde_json::Value::String(n.to_string()))
                .collect(),
        );
        for row in table.rows() {
            values.push(
                row.into_iter()
                    .map(|value| match value {
                        // RAW updates skip nulls; an empty string clears the cell.
                        Value::Null => serde_json::Value::String(String::new()),
                        other => other.to_json(),
                    })
                    .collect(),
            );
        }

        self.client
            .update_values(&self.spreadsheet_id, name, &values)
    }
}
