//! File specification validation

pub mod context;
pub mod document;
pub mod entry;
pub mod file_spec;
pub mod form;

// Re-export commonly used items
pub use context::{ValidationContext, ValidationOptions};
pub use document::{collect_file_specs, validate_document, validate_file, FileSpecSite, Location, Target};
pub use file_spec::{
    validate_embedded_file_stream_dict, validate_file_spec_dict, validate_file_spec_entry,
    validate_file_specification, validate_file_specification_or_form_object, validate_url_spec_entry,
    validate_url_specification,
};
pub use form::validate_form_stream_dict;
