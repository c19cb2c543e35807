//! Custom error types for the quizpack-reader crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
///
/// Only a broken container or an unreadable root document aborts a parse.
/// Every other irregularity inside a package (unresolvable media, odd
/// schema shapes, malformed scores) degrades to a default and is logged.
#[derive(Debug, Error)]
pub enum PackageError {
    /// The byte buffer could not be opened as a zip container.
    #[error("Invalid package archive: {0}")]
    InvalidArchive(String),

    /// The archive has no root `content.xml` entry (matched case-insensitively).
    #[error("Package contains no content.xml root document")]
    MissingRootDocument,

    /// The root document exists but is not well-formed XML.
    #[error("Malformed content.xml: {0}")]
    MalformedDocument(String),
}

/// A convenience `Result` type alias using the crate's `PackageError` type.
pub type Result<T> = std::result::Result<T, PackageError>;
