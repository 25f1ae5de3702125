//! Backend selection: builds a `DocumentHandle` for a selected backend.

use std::path::PathBuf;

use tabsync_core::{BackendKind, DocumentHandle, Result, TabDocument, TabError};
use tabsync_duckdb::DuckDbDocument;
use tabsync_gsheet::{SheetDocument, SheetsClient, TokenProvider};
use tabsync_local::DirectoryDocument;
use tracing::debug;

use crate::config::{AuthArgs, Cli};

/// Connection parameters for one side (target or source).
#[derive(Debug, Clone, Default)]
pub struct BackendParams {
    pub spreadsheet_id: Option<String>,
    pub path: Option<PathBuf>,
    pub database: Option<PathBuf>,
}

pub fn build_target(cli: &Cli) -> Result<DocumentHandle> {
    build_handle(
        cli.target_type,
        BackendParams {
            spreadsheet_id: cli.target_id.clone(),
            path: cli.target_path.clone(),
            database: cli.target_db.clone(),
        },
        &cli.auth,
    )
}

pub fn build_source(cli: &Cli) -> Result<DocumentHandle> {
    build_handle(
        cli.source_type,
        BackendParams {
            spreadsheet_id: cli.source_id.clone(),
            path: cli.source_path.clone(),
            database: cli.source_db.clone(),
        },
        &cli.auth,
    )
}

/// Builds an eagerly opened handle for the selected backend kind.
pub fn build_handle(
    kind: BackendKind,
    params: BackendParams,
    auth: &AuthArgs,
) -> Result<DocumentHandle> {
    debug!(backend = %kind, "building document handle");
    match kind {
        BackendKind::GSheet => {
            let spreadsheet_id = params.spreadsheet_id.ok_or_else(|| {
                TabError::Backend(
                    "missing spreadsheet id (set --target-id/--source-id or GSHEET_ID)".to_string(),
                )
            })?;
            // Credential problems should surface before the first network
            // call, so resolve the provider configuration up front.
            token_provider(auth)?;
            let auth = auth.clone();
            DocumentHandle::new(
                move || -> Result<Box<dyn TabDocument>> {
                    let provider = token_provider(&auth)?;
                    let client = SheetsClient::new(provider);
                    Ok(Box::new(SheetDocument::open(
                        client,
                        spreadsheet_id.clone(),
                    )?))
                },
                true,
            )
        }
        BackendKind::Directory => {
            let path = params.path.ok_or_else(|| {
                TabError::Backend(
                    "missing directory (set --target-path/--source-path)".to_string(),
                )
            })?;
            DocumentHandle::new(
                move || -> Result<Box<dyn TabDocument>> {
                    Ok(Box::new(DirectoryDocument::open(&path)?))
                },
                true,
            )
        }
        BackendKind::DuckDb => {
            let database = params.database.clone();
            DocumentHandle::new(
                move || -> Result<Box<dyn TabDocument>> {
                    let document = match &database {
                        Some(path) => DuckDbDocument::open(path)?,
                        None => DuckDbDocument::open_in_memory()?,
                    };
                    Ok(Box::new(document))
                },
                true,
            )
        }
        BackendKind::Screen => Ok(DocumentHandle::screen()),
    }
}

/// Resolves the configured credentials into a token provider.
fn token_provider(auth: &AuthArgs) -> Result<TokenProvider> {
    if let Some(token) = &auth.access_token {
        return Ok(TokenProvider::static_token(token));
    }
    match (
        &auth.google_client_id,
        &auth.google_client_secret,
        &auth.google_refresh_token,
    ) {
        (Some(id), Some(secret), Some(refresh)) => Ok(TokenProvider::oauth(id, secret, refresh)),
        _ => Err(TabError::Auth(
            "no Google credentials configured; set GSHEET_ACCESS_TOKEN or \
             GOOGLE_CLIENT_ID/GOOGLE_CLIENT_SECRET/GOOGLE_REFRESH_TOKEN"
                .to_string(),
        )),
    }
}
