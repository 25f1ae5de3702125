//! Core traits and types shared by the tabsync backends.
//!
//! This crate defines the abstractions the backend crates implement:
//! - `Table` / `Value`: the in-memory tabular value exchanged across all
//!   backend boundaries
//! - `TabDocument`: uniform read/write interface over named tabular units
//! - `DocumentHandle`: lifecycle wrapper with deferred open and delegation
//! - `BackendKind`: the closed set of selectable backend types
//! - `TabError`: the shared error taxonomy

mod backend;
mod document;
mod error;
mod table;

pub use backend::BackendKind;
pub use document::{DocumentHandle, DocumentOpener, TabDocument};
pub use error::{Result, TabError};
pub use table::{Column, Record, Table, Value};
