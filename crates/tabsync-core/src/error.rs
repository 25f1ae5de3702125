//! Error taxonomy shared by all backends.

/// Errors surfaced by documents, handles, and the backend factory.
///
/// The core never silently recovers from a backend failure: every error
/// propagates to the immediate caller unmodified, except `NotOpened`, which
/// the forwarding layer synthesizes in place of an opaque unset-document
/// failure.
#[derive(Debug, thiserror::Error)]
pub enum TabError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("tab '{name}' not found in {backend} backend")]
    NotFound {
        name: String,
        backend: &'static str,
    },

    #[error("document not opened for '{operation}' (did you open it?)")]
    NotOpened { operation: &'static str },

    #[error("operation '{operation}' is not supported by the {backend} backend")]
    Unsupported {
        operation: &'static str,
        backend: &'static str,
    },

    #[error("unknown backend type '{keyword}'")]
    InvalidBackend { keyword: String },

    #[error("tab '{name}' already exists in {backend} backend")]
    Conflict {
        name: String,
        backend: &'static str,
    },

    #[error("invalid table: {0}")]
    Schema(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TabError>;
