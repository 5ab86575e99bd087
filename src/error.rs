//! Error types for the PDF image inventory library

use std::path::PathBuf;
use thiserror::Error;

use crate::pdf::ObjectReference;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the PDF image inventory library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The document declares zero pages
    #[error("PDF has no pages")]
    NoPages,

    /// Page number outside 1..=page_count, or missing from the page tree
    #[error("Page {page} not found (document has {page_count} pages)")]
    PageNotFound { page: u32, page_count: u32 },

    /// Reference to an object that is not in the document
    #[error("Cannot dereference {0}: object not found")]
    Dereference(ObjectReference),

    /// Object exists but has the wrong type
    #[error("Object {reference} is a {found}, expected a {expected}")]
    UnexpectedType {
        reference: ObjectReference,
        expected: &'static str,
        found: &'static str,
    },

    /// Failure while scanning a single page
    #[error("failed to extract images from page {page}")]
    Page {
        page: u32,
        #[source]
        source: Box<Error>,
    },

    /// General error
    #[error("{0}")]
    General(String),
}
