//! Error types for the file specification validator

use std::path::PathBuf;
use lopdf::ObjectId;
use thiserror::Error;

use crate::version::PdfVersion;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the validator
///
/// Every validation failure names the dictionary and entry it was found in,
/// so a reader can locate the offending node in the source document.
#[derive(Error, Debug)]
pub enum Error {
    /// PDF loading error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// An indirect reference points at an object the document does not contain
    #[error("cannot resolve object {} {} R", .id.0, .id.1)]
    Resolution { id: ObjectId },

    /// A value has the wrong variant for its entry or array position
    #[error("{dict}: entry {entry}: expected {expected}, got {found}")]
    TypeMismatch {
        dict: String,
        entry: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A value resolved to a variant the call site does not accept
    #[error("invalid type for {context}: {found}")]
    InvalidType { context: String, found: &'static str },

    /// A (possibly conditionally) required entry is absent
    #[error("{dict}: missing required entry {entry}")]
    MissingRequiredEntry { dict: String, entry: String },

    /// An entry appears in a document older than the entry's minimum version
    #[error("{dict}: entry {entry} requires PDF {since}, document is PDF {actual}")]
    VersionConstraint {
        dict: String,
        entry: String,
        since: PdfVersion,
        actual: PdfVersion,
    },

    /// A whole feature is not available in the document's version
    #[error("{feature}: unsupported in PDF {actual}, requires PDF {since}")]
    FeatureVersion {
        feature: String,
        since: PdfVersion,
        actual: PdfVersion,
    },

    /// Cross-structure invariant violated
    #[error("{context}: {detail}")]
    StructuralConsistency { context: String, detail: String },

    /// A string entry failed its content grammar (URL strings)
    #[error("{dict}: entry {entry}: invalid string {value:?}")]
    InvalidLiteral {
        dict: String,
        entry: String,
        value: String,
    },

    /// A bare file specification string failed its grammar
    #[error("invalid file spec string: {0}")]
    InvalidFileSpecString(String),

    /// A non-string entry value was rejected by its entry rule
    #[error("{dict}: entry {entry}: invalid value {value}")]
    InvalidEntryValue {
        dict: String,
        entry: String,
        value: String,
    },

    /// Unparseable PDF version string
    #[error("Invalid PDF version: {0}")]
    InvalidVersion(String),

    /// Unparseable PDF date string
    #[error("Invalid PDF date: {0}")]
    InvalidDate(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    pub(crate) fn structural(context: &str, detail: impl Into<String>) -> Self {
        Error::StructuralConsistency {
            context: context.to_string(),
            detail: detail.into(),
        }
    }
}
