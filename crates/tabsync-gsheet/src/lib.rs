//! Google Sheets backend.
//!
//! The spreadsheet service is reached over plain REST (Sheets API v4)
//! with a blocking client; credentials come from a [`TokenProvider`] that
//! either holds a static bearer token or refreshes one through the OAuth2
//! refresh-token grant.

mod client;
mod document;
mod token;

pub use client::SheetsClient;
pub use document::SheetDocument;
pub use token::TokenProvider;
