//! Backend type selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TabError;

/// The closed set of selectable backend types.
///
/// `Screen` is a recognized placeholder with no document behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    GSheet,
    Directory,
    DuckDb,
    Screen,
}

impl BackendKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GSheet => "gsheet",
            Self::Directory => "directory",
            Self::DuckDb => "duckdb",
            Self::Screen => "screen",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = TabError;

    fn from_str(keyword: &str) -> Result<Self, Self::Err> {
        match keyword {
            "gsheet" | "gcloud" => Ok(Self::GSheet),
            "directory" | "local" => Ok(Self::Directory),
            "duckdb" => Ok(Self::DuckDb),
            "screen" => Ok(Self::Screen),
            _ => Err(TabError::InvalidBackend {
                keyword: keyword.to_string(),
            }),
        }
    }
}
