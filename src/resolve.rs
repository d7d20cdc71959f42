//! Indirect object resolution
//!
//! Validators never look inside a [`Document`] directly. They go through an
//! [`ObjectResolver`], which follows exactly one level of indirection per call.

use lopdf::{Document, Object, ObjectId, StringFormat};
use crate::error::{Error, Result};

/// Access to the indirect objects of a parsed document
pub trait ObjectResolver {
    /// Look up an indirect object by id
    fn lookup(&self, id: ObjectId) -> Option<&Object>;

    /// Follow one reference hop. Direct objects are returned unchanged.
    ///
    /// A reference to an object the document does not contain is an error.
    fn resolve<'a>(&'a self, object: &'a Object) -> Result<&'a Object> {
        match object {
            Object::Reference(id) => self.lookup(*id).ok_or(Error::Resolution { id: *id }),
            direct => Ok(direct),
        }
    }
}

impl ObjectResolver for Document {
    fn lookup(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(&id)
    }
}

/// Short variant name of an object, used in diagnostics
pub fn object_kind(object: &Object) -> &'static str {
    match object {
        Object::Null => "null",
        Object::Boolean(_) => "boolean",
        Object::Integer(_) => "integer",
        Object::Real(_) => "real",
        Object::Name(_) => "name",
        Object::String(_, StringFormat::Literal) => "string literal",
        Object::String(_, StringFormat::Hexadecimal) => "hex string",
        Object::Array(_) => "array",
        Object::Dictionary(_) => "dictionary",
        Object::Stream(_) => "stream",
        Object::Reference(_) => "reference",
    }
}
