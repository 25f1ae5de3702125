//! The uniform document interface and its lifecycle wrapper.
//!
//! `TabDocument` is the capability surface every backend implements.
//! Operations a backend does not support keep the default implementation
//! and fail with [`TabError::Unsupported`], naming both the operation and
//! the concrete backend.
//!
//! `DocumentHandle` decouples backend selection from operation dispatch:
//! it holds the document as an explicit `Unopened | Opened | Screen` sum
//! type and statically delegates every `TabDocument` method, so the
//! "not opened" path is a typed error instead of a null dereference.

use tracing::{debug, warn};

use crate::error::{Result, TabError};
use crate::table::{Record, Table};

/// Uniform read/write interface over named tabular units.
pub trait TabDocument {
    /// Short name of the concrete backend, used in error messages.
    fn backend_name(&self) -> &'static str;

    /// Lists the names of all tabs in the backend.
    fn tab_names(&self) -> Result<Vec<String>>;

    /// Reads the tab `name` into a table.
    ///
    /// Fails with [`TabError::NotFound`] when no tab of that name exists.
    fn read_tab(&self, name: &str) -> Result<Table>;

    /// Writes `table` to the tab `name`, replacing prior contents.
    ///
    /// Supported by the spreadsheet and database backends.
    fn write_tab(&self, name: &str, table: &Table) -> Result<()> {
        let _ = (name, table);
        Err(TabError::Unsupported {
            operation: "write_tab",
            backend: self.backend_name(),
        })
    }

    /// Serializes row records under `name`, fully overwriting any prior
    /// contents. Supported by the directory backend.
    fn save_records(&self, name: &str, records: &[Record]) -> Result<()> {
        let _ = (name, records);
        Err(TabError::Unsupported {
            operation: "save_records",
            backend: self.backend_name(),
        })
    }

    /// Executes a query statement and returns its result as a table.
    ///
    /// Supported by the database backend.
    fn query(&self, sql: &str) -> Result<Table> {
        let _ = sql;
        Err(TabError::Unsupported {
            operation: "query",
            backend: self.backend_name(),
        })
    }
}

impl std::fmt::Debug for dyn TabDocument + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabDocument")
            .field("backend", &self.backend_name())
            .finish_non_exhaustive()
    }
}

/// Deferred constructor for a document.
///
/// Implemented for any `FnMut() -> Result<Box<dyn TabDocument>>`, so
/// factories can hand the handle a closure capturing connection
/// parameters.
pub trait DocumentOpener {
    fn open_document(&mut self) -> Result<Box<dyn TabDocument>>;
}

impl<F> DocumentOpener for F
where
    F: FnMut() -> Result<Box<dyn TabDocument>>,
{
    fn open_document(&mut self) -> Result<Box<dyn TabDocument>> {
        self()
    }
}

enum HandleState {
    Unopened(Box<dyn DocumentOpener>),
    Opened(Box<dyn TabDocument>),
    /// Recognized placeholder backend with no document behind it.
    Screen,
}

/// Lifecycle and ownership wrapper around a [`TabDocument`].
///
/// Owns at most one document. Opening is eager by default; a handle built
/// with `open_eagerly = false` defers construction until [`open`] is
/// called. Forwarded operations on an unopened handle fail with
/// [`TabError::NotOpened`].
///
/// [`open`]: DocumentHandle::open
pub struct DocumentHandle {
    state: HandleState,
}

impl DocumentHandle {
    /// Builds a handle around `opener`.
    ///
    /// With `open_eagerly` the document is constructed immediately and a
    /// backend failure fails the construction itself; no partially-open
    /// handle is returned.
    pub fn new<O>(opener: O, open_eagerly: bool) -> Result<Self>
    where
        O: DocumentOpener + 'static,
    {
        let mut handle = Self {
            state: HandleState::Unopened(Box::new(opener)),
        };
        if open_eagerly {
            handle.open()?;
        }
        Ok(handle)
    }

    /// Builds the placeholder handle for the `screen` backend.
    pub fn screen() -> Self {
        warn!("screen backend is not implemented yet; operations will fail as not-opened");
        Self {
            state: HandleState::Screen,
        }
    }

    /// Opens the document, idempotently.
    ///
    /// A second call returns the already-open document without touching
    /// the backend again.
    pub fn open(&mut self) -> Result<&dyn TabDocument> {
        if let HandleState::Unopened(opener) = &mut self.state {
            let document = opener.open_document()?;
            debug!(backend = document.backend_name(), "opened document");
            self.state = HandleState::Opened(document);
        }
        self.document_for("open")
    }

    /// Borrows the open document, or fails with [`TabError::NotOpened`].
    pub fn document(&self) -> Result<&dyn TabDocument> {
        self.document_for("document")
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, HandleState::Opened(_))
    }

    fn document_for(&self, operation: &'static str) -> Result<&dyn TabDocument> {
        match &self.state {
            HandleState::Opened(document) => Ok(document.as_ref()),
            HandleState::Unopened(_) | HandleState::Screen => {
                Err(TabError::NotOpened { operation })
            }
        }
    }
}

/// Static delegation of every document operation to the held document.
impl TabDocument for DocumentHandle {
    fn backend_name(&self) -> &'static str {
        match &self.state {
            HandleState::Opened(document) => document.backend_name(),
            HandleState::Unopened(_) => "unopened",
            HandleState::Screen => "screen",
        }
    }

    fn tab_names(&self) -> Result<Vec<String>> {
        self.document_for("tab_names")?.tab_names()
    }

    fn read_tab(&self, name: &str) -> Result<Table> {
        self.document_for("read_tab")?.read_tab(name)
    }

    fn write_tab(&self, name: &str, table: &Table) -> Result<()> {
        self.document_for("write_tab")?.write_tab(name, table)
    }

    fn save_records(&self, name: &str, records: &[Record]) -> Result<()> {
        self.document_for("save_records")?.save_records(name, records)
    }

    fn query(&self, sql: &str) -> Result<Table> {
        self.document_for("query")?.query(sql)
    }
}
