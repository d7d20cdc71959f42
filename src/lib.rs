//! PDF File Specification Validator
//!
//! A library for checking file specifications in PDF documents.
//! This library provides functionality to:
//! - Validate file specification strings and dictionaries
//! - Validate embedded file streams and related files arrays
//! - Validate URL specifications
//! - Find and check every file specification reachable from a document catalog
//!
//! # Example
//!
//! ```no_run
//! use pdf_filespec::validate::{validate_file, ValidationOptions};
//! use pdf_filespec::version::ValidationMode;
//! use std::path::Path;
//!
//! let options = ValidationOptions {
//!     mode: ValidationMode::Strict,
//!     version_override: None,
//! };
//!
//! let count = validate_file(Path::new("report.pdf"), &options).expect("Invalid file specification");
//! println!("{} file specifications OK", count);
//! ```

pub mod date;
pub mod error;
pub mod resolve;
pub mod validate;
pub mod version;

// Re-export commonly used items
pub use error::{Error, Result};
