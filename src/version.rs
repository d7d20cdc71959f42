//! PDF versions and validation modes

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A PDF specification version, totally ordered from 1.0 to 2.0
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PdfVersion {
    V1_0,
    V1_1,
    V1_2,
    V1_3,
    V1_4,
    V1_5,
    V1_6,
    V1_7,
    V2_0,
}

impl PdfVersion {
    /// Parse a version string as found in the file header or the catalog,
    /// e.g. `"1.4"`. A leading `%PDF-` is tolerated.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let s = s.strip_prefix("%PDF-").unwrap_or(s);
        match s {
            "1.0" => Ok(PdfVersion::V1_0),
            "1.1" => Ok(PdfVersion::V1_1),
            "1.2" => Ok(PdfVersion::V1_2),
            "1.3" => Ok(PdfVersion::V1_3),
            "1.4" => Ok(PdfVersion::V1_4),
            "1.5" => Ok(PdfVersion::V1_5),
            "1.6" => Ok(PdfVersion::V1_6),
            "1.7" => Ok(PdfVersion::V1_7),
            "2.0" => Ok(PdfVersion::V2_0),
            _ => Err(Error::InvalidVersion(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PdfVersion::V1_0 => "1.0",
            PdfVersion::V1_1 => "1.1",
            PdfVersion::V1_2 => "1.2",
            PdfVersion::V1_3 => "1.3",
            PdfVersion::V1_4 => "1.4",
            PdfVersion::V1_5 => "1.5",
            PdfVersion::V1_6 => "1.6",
            PdfVersion::V1_7 => "1.7",
            PdfVersion::V2_0 => "2.0",
        }
    }
}

impl fmt::Display for PdfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PdfVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PdfVersion::parse(s)
    }
}

/// How strictly a document is held to the grammar
///
/// `Relaxed` lowers some minimum versions and widens some accepted names to
/// tolerate common real-world non-conformance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    Strict,
    #[default]
    Relaxed,
}

impl ValidationMode {
    pub fn is_relaxed(&self) -> bool {
        matches!(self, ValidationMode::Relaxed)
    }
}

/// Effective minimum version of an entry with a lowered threshold in relaxed mode
pub fn since_version(mode: ValidationMode, strict: PdfVersion, relaxed: PdfVersion) -> PdfVersion {
    match mode {
        ValidationMode::Strict => strict,
        ValidationMode::Relaxed => relaxed,
    }
}
