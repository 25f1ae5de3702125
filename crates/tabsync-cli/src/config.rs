//! Command-line configuration for `tabsync`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tabsync_core::{BackendKind, TabError};

fn parse_backend(keyword: &str) -> Result<BackendKind, TabError> {
    keyword.parse()
}

/// Move tabular data between spreadsheet documents, local JSON
/// directories, and an embedded DuckDB database.
#[derive(Parser, Debug)]
#[command(name = "tabsync")]
#[command(about = "Sync tabular data between spreadsheets, JSON directories, and DuckDB")]
pub struct Cli {
    /// Target backend type (gsheet, directory, duckdb, screen)
    #[arg(long, value_parser = parse_backend, default_value = "gsheet")]
    pub target_type: BackendKind,

    /// Spreadsheet id of the target document
    #[arg(long, env = "GSHEET_ID")]
    pub target_id: Option<String>,

    /// Directory of the target document (directory backend)
    #[arg(long)]
    pub target_path: Option<PathBuf>,

    /// Database file of the target document (duckdb backend; in-memory when omitted)
    #[arg(long)]
    pub target_db: Option<PathBuf>,

    /// Source backend type (gsheet, directory, duckdb, screen)
    #[arg(long, value_parser = parse_backend, default_value = "gsheet")]
    pub source_type: BackendKind,

    /// Spreadsheet id of the source document
    #[arg(long, env = "GSHEET_ID")]
    pub source_id: Option<String>,

    /// Directory of the source document (directory backend)
    #[arg(long)]
    pub source_path: Option<PathBuf>,

    /// Database file of the source document (duckdb backend; in-memory when omitted)
    #[arg(long)]
    pub source_db: Option<PathBuf>,

    #[command(flatten)]
    pub auth: AuthArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Google credentials, either a ready bearer token or an OAuth2 client
/// configuration for the refresh-token grant.
#[derive(Args, Debug, Clone)]
pub struct AuthArgs {
    /// Static OAuth bearer token for the Sheets API
    #[arg(long, env = "GSHEET_ACCESS_TOKEN")]
    pub access_token: Option<String>,

    /// Google OAuth2 client id (for token refresh)
    #[arg(long, env = "GOOGLE_CLIENT_ID")]
    pub google_client_id: Option<String>,

    /// Google OAuth2 client secret (for token refresh)
    #[arg(long, env = "GOOGLE_CLIENT_SECRET")]
    pub google_client_secret: Option<String>,

    /// Google OAuth2 refresh token (for token refresh)
    #[arg(long, env = "GOOGLE_REFRESH_TOKEN")]
    pub google_refresh_token: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Seed the synthetic house-points tables into the target document
    HousepointsSetup {
        /// Seed only the named table
        #[arg(long)]
        only: Option<String>,
    },

    /// Stage every source tab into the target and compute house-points
    /// results back into the source
    HousepointsTransform,

    /// Write synthetic student records into a directory target
    SeedLocal {
        /// Number of records to generate
        #[arg(long, default_value = "100")]
        count: usize,
    },
}
