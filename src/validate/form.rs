//! Form XObject stream dictionaries (PDF 32000 section 8.10)

use lopdf::Stream;
use log::debug;

use crate::error::Result;
use crate::validate::context::ValidationContext;
use crate::validate::entry::{
    validate_date_entry, validate_dict_entry, validate_integer_entry, validate_name_entry,
    validate_number_array_entry, validate_rectangle_entry, validate_stream_dict_entry, OPTIONAL,
    REQUIRED,
};
use crate::version::PdfVersion;

/// Validate the dictionary of a form XObject stream
pub fn validate_form_stream_dict<'a>(ctx: &ValidationContext<'a>, stream: &'a Stream) -> Result<()> {
    let dict_name = "formStreamDict";
    let dict = &stream.dict;
    debug!("Validating {}", dict_name);

    validate_name_entry(ctx, dict, dict_name, "Type", OPTIONAL, PdfVersion::V1_0, Some(&|s: &str| s == "XObject"))?;

    validate_name_entry(ctx, dict, dict_name, "Subtype", REQUIRED, PdfVersion::V1_0, Some(&|s: &str| s == "Form"))?;

    validate_integer_entry(ctx, dict, dict_name, "FormType", OPTIONAL, PdfVersion::V1_0, Some(&|n: i64| n == 1))?;

    validate_rectangle_entry(ctx, dict, dict_name, "BBox", REQUIRED, PdfVersion::V1_0)?;

    validate_number_array_entry(ctx, dict, dict_name, "Matrix", OPTIONAL, PdfVersion::V1_0, Some(&|a: &[f64]| a.len() == 6))?;

    // Resources are inherited from the page before 1.2
    validate_dict_entry(ctx, dict, dict_name, "Resources", OPTIONAL, PdfVersion::V1_2, None)?;

    // Transparency group attributes
    validate_dict_entry(ctx, dict, dict_name, "Group", OPTIONAL, PdfVersion::V1_4, None)?;

    validate_stream_dict_entry(ctx, dict, dict_name, "Metadata", OPTIONAL, PdfVersion::V1_4, None)?;

    validate_date_entry(ctx, dict, dict_name, "LastModified", OPTIONAL, PdfVersion::V1_3)?;

    validate_integer_entry(ctx, dict, dict_name, "StructParent", OPTIONAL, PdfVersion::V1_3, None)?;

    validate_name_entry(ctx, dict, dict_name, "Name", OPTIONAL, PdfVersion::V1_0, None)?;

    Ok(())
}
