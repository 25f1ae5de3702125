//! Sheets API v4 client wrapper.
//!
//! Thin blocking wrapper over the REST endpoints the document layer
//! needs: tab listing, value reads (`UNFORMATTED_VALUE`), range clears,
//! value updates (`RAW`), and tab creation with explicit grid capacity.

use serde::Deserialize;
use tabsync_core::{Result, TabError};
use tracing::debug;

use crate::token::TokenProvider;

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Blocking Sheets API client.
#[derive(Debug)]
pub struct SheetsClient {
    http: reqwest::blocking::Client,
    token: TokenProvider,
    base_url: String,
}

impl SheetsClient {
    pub fn new(token: TokenProvider) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Builds a client against a non-default endpoint (tests point this
    /// at a mock server).
    pub fn with_base_url(token: TokenProvider, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            token,
            base_url: base_url.into(),
        }
    }

    /// Lists the titles of all tabs in the spreadsheet.
    pub fn tab_titles(&self, spreadsheet_id: &str) -> Result<Vec<String>> {
        let url = format!(
            "{}/v4/spreadsheets/{}?fields=sheets.properties",
            self.base_url, spreadsheet_id
        );
        let resp = self.get(&url)?;
        let meta: SpreadsheetMeta = resp
            .json()
            .map_err(|e| TabError::Backend(format!("invalid spreadsheet metadata: {e}")))?;
        Ok(meta
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties.title)
            .collect())
    }

    /// Reads all cell values of a tab as rows of JSON scalars.
    pub fn get_values(&self, spreadsheet_id: &str, title: &str) -> Result<Vec<Vec<serde_json::Value>>> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}?valueRenderOption=UNFORMATTED_VALUE",
            self.base_url,
            spreadsheet_id,
            quoted_range(title)
        );
        let resp = self.get(&url)?;
        let range: ValueRange = resp
            .json()
            .map_err(|e| TabError::Backend(format!("invalid value range: {e}")))?;
        debug!(tab = title, rows = range.values.len(), "fetched values");
        Ok(range.values)
    }

    /// Clears all values of a tab.
    pub fn clear_tab(&self, spreadsheet_id: &str, title: &str) -> Result<()> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}:clear",
            self.base_url,
            spreadsheet_id,
            quoted_range(title)
        );
        let token = self.token.token()?;
        let resp = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&serde_json::json!({}))
            .send()
            .map_err(http_err)?;
        check_status(resp, "clear tab")?;
        debug!(tab = title, "cleared tab");
        Ok(())
    }

    /// Writes rows starting at A1 with `RAW` input semantics.
    pub fn update_values(
        &self,
        spreadsheet_id: &str,
        title: &str,
        values: &[Vec<serde_json::Value>],
    ) -> Result<()> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}!A1?valueInputOption=RAW",
            self.base_url,
            spreadsheet_id,
            quoted_range(title)
        );
        let token = self.token.token()?;
        let resp = self
            .http
            .put(&url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "values": values }))
            .send()
            .map_err(http_err)?;
        check_status(resp, "update values")?;
        debug!(tab = title, rows = values.len(), "updated values");
        Ok(())
    }

    /// Creates a tab with the given grid capacity.
    pub fn add_tab(
        &self,
        spreadsheet_id: &str,
        title: &str,
        row_count: usize,
        column_count: usize,
    ) -> Result<()> {
        let url = format!(
            "{}/v4/spreadsheets/{}:batchUpdate",
            self.base_url, spreadsheet_id
        );
        let body = serde_json::json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": {
                            "rowCount": row_count,
                            "columnCount": column_count,
                        }
                    }
                }
            }]
        });
        let token = self.token.token()?;
        let resp = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .map_err(http_err)?;
        check_status(resp, "add tab")?;
        debug!(
            tab = title,
            rows = row_count,
            columns = column_count,
            "created tab"
        );
        Ok(())
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response> {
        let token = self.token.token()?;
        let resp = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .map_err(http_err)?;
        check_status(resp, "get")
    }
}

/// A1-notation range covering a whole tab, with embedded quotes doubled.
fn quoted_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

fn http_err(e: reqwest::Error) -> TabError {
    TabError::Backend(format!("http error: {e}"))
}

fn check_status(
    resp: reqwest::blocking::Response,
    context: &str,
) -> Result<reqwest::blocking::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(TabError::Auth(format!("{context}: {status} {body}")));
    }
    Err(TabError::Backend(format!("{context}: {status} {body}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_tab_titles_for_a1_notation() {
        assert_eq!(quoted_range("houses"), "'houses'");
        assert_eq!(quoted_range("race results"), "'race results'");
        assert_eq!(quoted_range("it's"), "'it''s'");
    }
}
