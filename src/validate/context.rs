//! Document-scoped validation state

use lopdf::{Dictionary, Document, Object};
use log::{debug, warn};

use crate::error::{Error, Result};
use crate::resolve::{object_kind, ObjectResolver};
use crate::version::{PdfVersion, ValidationMode};

/// Options for validating a document
#[derive(Debug, Clone, Default)]
pub struct ValidationOptions {
    /// Strict or relaxed conformance
    pub mode: ValidationMode,
    /// Validate against this version instead of the one the document declares
    pub version_override: Option<PdfVersion>,
}

/// Read-only view of a document for the duration of one validation pass
///
/// Holds the resolver together with the effective PDF version and the
/// validation mode. Nothing in here changes once a pass has started.
pub struct ValidationContext<'a> {
    resolver: &'a dyn ObjectResolver,
    version: PdfVersion,
    mode: ValidationMode,
}

impl<'a> ValidationContext<'a> {
    pub fn new(resolver: &'a dyn ObjectResolver, version: PdfVersion, mode: ValidationMode) -> Self {
        Self { resolver, version, mode }
    }

    /// Build a context for a loaded document
    ///
    /// The effective version is the header version, raised by a later
    /// catalog `/Version` entry (PDF 1.4+), unless the options override it.
    pub fn for_document(doc: &'a Document, options: &ValidationOptions) -> Result<Self> {
        let version = match options.version_override {
            Some(version) => version,
            None => effective_version(doc)?,
        };
        debug!("Validating as PDF {} ({:?} mode)", version, options.mode);
        Ok(Self::new(doc, version, options.mode))
    }

    pub fn version(&self) -> PdfVersion {
        self.version
    }

    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    pub fn is_relaxed(&self) -> bool {
        self.mode.is_relaxed()
    }

    /// Follow one level of indirection
    pub fn resolve(&self, object: &'a Object) -> Result<&'a Object> {
        self.resolver.resolve(object)
    }

    /// Resolve to a dictionary; `None` for the null object
    pub fn resolve_dict(&self, object: &'a Object, context: &str) -> Result<Option<&'a Dictionary>> {
        match self.resolve(object)? {
            Object::Dictionary(dict) => Ok(Some(dict)),
            Object::Null => Ok(None),
            other => Err(Error::InvalidType {
                context: context.to_string(),
                found: object_kind(other),
            }),
        }
    }

    /// Resolve to an array; `None` for the null object
    pub fn resolve_array(&self, object: &'a Object, context: &str) -> Result<Option<&'a [Object]>> {
        match self.resolve(object)? {
            Object::Array(items) => Ok(Some(items.as_slice())),
            Object::Null => Ok(None),
            other => Err(Error::InvalidType {
                context: context.to_string(),
                found: object_kind(other),
            }),
        }
    }

    /// Check that a whole feature is permitted at the document's version
    pub fn ensure_minimum_version(&self, feature: &str, since: PdfVersion) -> Result<()> {
        if self.version < since {
            return Err(Error::FeatureVersion {
                feature: feature.to_string(),
                since,
                actual: self.version,
            });
        }
        Ok(())
    }

    /// Check that an entry is permitted at the document's version
    pub(crate) fn check_entry_version(&self, dict_name: &str, entry_name: &str, since: PdfVersion) -> Result<()> {
        if self.version < since {
            return Err(Error::VersionConstraint {
                dict: dict_name.to_string(),
                entry: entry_name.to_string(),
                since,
                actual: self.version,
            });
        }
        Ok(())
    }
}

/// Header version, raised by the catalog's `/Version` name when that is later
fn effective_version(doc: &Document) -> Result<PdfVersion> {
    let header = PdfVersion::parse(&doc.version)?;

    let catalog = doc
        .trailer
        .get(b"Root")
        .ok()
        .and_then(|root| ObjectResolver::resolve(doc, root).ok())
        .and_then(|root| root.as_dict().ok());

    let declared = match catalog.and_then(|catalog| catalog.get(b"Version").ok()) {
        Some(Object::Name(name)) => match PdfVersion::parse(&String::from_utf8_lossy(name)) {
            Ok(version) => Some(version),
            Err(e) => {
                warn!("Ignoring catalog version: {}", e);
                None
            }
        },
        _ => None,
    };

    Ok(match declared {
        Some(version) if version > header => version,
        _ => header,
    })
}
