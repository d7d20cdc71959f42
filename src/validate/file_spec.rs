//! File specifications, embedded file streams and URL specifications
//!
//! Implements PDF 32000 section 7.11. A file specification is either a bare
//! string or a dictionary; dictionaries may embed the referenced files as
//! streams (`EF`) together with arrays of related files (`RF`).
//!
//! Validation is fail-fast: the first violated rule is returned and nothing
//! after it is inspected.

use lopdf::{decode_text_string, Dictionary, Object, StringFormat};
use log::{debug, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::resolve::object_kind;
use crate::validate::context::ValidationContext;
use crate::validate::entry::{
    type_mismatch, validate_boolean_entry, validate_date_entry, validate_dict_entry, validate_entry,
    validate_integer_entry, validate_name_entry, validate_stream_dict, validate_stream_dict_entry,
    validate_string_array_entry, validate_string_entry, OPTIONAL, REQUIRED,
};
use crate::validate::form::validate_form_stream_dict;
use crate::version::{since_version, PdfVersion};

const FILE_SPEC_DICT: &str = "fileSpecDict";
const EF_DICT: &str = "efDict";
const RF_DICT: &str = "rfDict";
const RF_ARRAY: &str = "rfArray";
const EMBEDDED_FILE_STREAM_DICT: &str = "embeddedFileStreamDict";
const EMBEDDED_FILE_PARAM_DICT: &str = "embeddedFileStreamParmDict";
const MAC_PARAM_DICT: &str = "embeddedFileStreamMacParameterDict";
const URL_SPEC: &str = "urlSpec";

/// Check a bare file specification string
///
/// Formally a string is a `/`-separated path in which literal solidi are
/// escaped as `\\/`. Producers essentially never follow that escaping, so
/// every string is accepted.
pub fn validate_file_spec_string(_s: &str) -> bool {
    true
}

/// Check a URL string: an absolute URI, or an absolute-path request URI
///
/// An empty authority (`http://`) is valid generic URI syntax and is accepted.
pub fn validate_url_string(s: &str) -> bool {
    match Url::parse(s) {
        Ok(_) => true,
        Err(url::ParseError::EmptyHost) => true,
        Err(url::ParseError::RelativeUrlWithoutBase) if s.starts_with('/') => {
            Url::parse("http://localhost/").and_then(|base| base.join(s)).is_ok()
        }
        Err(_) => false,
    }
}

fn validate_embedded_file_stream_mac_param_dict<'a>(ctx: &ValidationContext<'a>, dict: &'a Dictionary) -> Result<()> {
    let dict_name = MAC_PARAM_DICT;

    // Mac OS file type and creator codes
    validate_integer_entry(ctx, dict, dict_name, "Subtype", OPTIONAL, PdfVersion::V1_0, None)?;
    validate_integer_entry(ctx, dict, dict_name, "Creator", OPTIONAL, PdfVersion::V1_0, None)?;

    // Binary contents of the resource fork
    validate_stream_dict_entry(ctx, dict, dict_name, "ResFork", OPTIONAL, PdfVersion::V1_0, None)?;

    Ok(())
}

fn validate_embedded_file_stream_param_dict<'a>(ctx: &ValidationContext<'a>, params: &'a Object) -> Result<()> {
    let Some(dict) = ctx.resolve_dict(params, &format!("{} entry Params", EMBEDDED_FILE_STREAM_DICT))? else {
        return Ok(());
    };
    let dict_name = EMBEDDED_FILE_PARAM_DICT;

    // Uncompressed size in bytes
    validate_integer_entry(ctx, dict, dict_name, "Size", OPTIONAL, PdfVersion::V1_0, None)?;

    validate_date_entry(ctx, dict, dict_name, "CreationDate", OPTIONAL, PdfVersion::V1_0)?;

    validate_date_entry(ctx, dict, dict_name, "ModDate", OPTIONAL, PdfVersion::V1_0)?;

    if let Some(mac) = validate_dict_entry(ctx, dict, dict_name, "Mac", OPTIONAL, PdfVersion::V1_0, None)? {
        validate_embedded_file_stream_mac_param_dict(ctx, mac)?;
    }

    // MD5 digest of the uncompressed contents
    validate_string_entry(ctx, dict, dict_name, "CheckSum", OPTIONAL, PdfVersion::V1_0, None)?;

    Ok(())
}

/// Validate the dictionary of an embedded file stream
pub fn validate_embedded_file_stream_dict<'a>(ctx: &ValidationContext<'a>, dict: &'a Dictionary) -> Result<()> {
    let dict_name = EMBEDDED_FILE_STREAM_DICT;
    debug!("Validating {}", dict_name);

    validate_name_entry(ctx, dict, dict_name, "Type", OPTIONAL, PdfVersion::V1_0, Some(&|s: &str| s == "EmbeddedFile"))?;

    // MIME type, encoded as a name
    validate_name_entry(ctx, dict, dict_name, "Subtype", OPTIONAL, PdfVersion::V1_0, None)?;

    // Embedded file parameters, a direct or indirect dictionary
    if let Ok(params) = dict.get(b"Params") {
        validate_embedded_file_stream_param_dict(ctx, params)?;
    }

    Ok(())
}

fn is_ef_or_rf_key(key: &str) -> bool {
    matches!(key, "F" | "UF" | "DOS" | "Mac" | "Unix")
}

fn validate_ef_dict<'a>(ctx: &ValidationContext<'a>, ef: &'a Dictionary) -> Result<()> {
    for (key, value) in ef.iter() {
        // Only the file name keys of a file specification are allowed
        let key = String::from_utf8_lossy(key);
        if !is_ef_or_rf_key(&key) {
            return Err(Error::structural(EF_DICT, format!("invalid key: {}", key)));
        }

        let stream = match validate_stream_dict(ctx, value, EF_DICT, &key) {
            Ok(Some(stream)) => stream,
            Ok(None) => continue,
            // A reference to a missing object is the null object
            Err(Error::Resolution { id }) => {
                warn!("{}: entry {} refers to missing object {} {} R", EF_DICT, key, id.0, id.1);
                continue;
            }
            Err(e) => return Err(e),
        };

        validate_embedded_file_stream_dict(ctx, &stream.dict)?;
    }
    Ok(())
}

/// Validate a related-files array: `[stream1 (name1) stream2 (name2) ...]`
pub fn validate_related_files_array<'a>(ctx: &ValidationContext<'a>, files: &'a [Object]) -> Result<()> {
    if files.len() % 2 != 0 {
        return Err(Error::structural(RF_ARRAY, "rfDict array corrupt"));
    }

    for (i, item) in files.iter().enumerate() {
        let entry = format!("[{}]", i);
        match (i % 2, ctx.resolve(item)?) {
            (_, Object::Null) => {
                return Err(Error::structural(RF_ARRAY, format!("array entry {} is null", i)));
            }
            (0, Object::Stream(stream)) => validate_embedded_file_stream_dict(ctx, &stream.dict)?,
            (0, other) => return Err(type_mismatch(RF_ARRAY, &entry, "embedded file stream", other)),
            (_, Object::String(_, StringFormat::Literal)) => {}
            (_, other) => return Err(type_mismatch(RF_ARRAY, &entry, "string literal", other)),
        }
    }
    Ok(())
}

/// Validate the embedded files dictionary against its related files dictionary
///
/// Every `EF` entry must be an embedded file stream, and every `RF` key
/// must name an existing `EF` entry.
pub fn validate_file_spec_dict_entries_ef_and_rf<'a>(
    ctx: &ValidationContext<'a>,
    ef: Option<&'a Dictionary>,
    rf: Option<&'a Dictionary>,
) -> Result<()> {
    let Some(ef) = ef else {
        return Err(Error::structural(FILE_SPEC_DICT, "missing required efDict"));
    };

    validate_ef_dict(ctx, ef)?;

    let Some(rf) = rf else {
        return Ok(());
    };
    for (key, value) in rf.iter() {
        let key_name = String::from_utf8_lossy(key);
        if !ef.has(key) {
            return Err(Error::structural(
                RF_DICT,
                format!("entry {} missing corresponding efDict entry", key_name),
            ));
        }

        let Some(files) = ctx.resolve_array(value, &format!("{} entry {}", RF_DICT, key_name))? else {
            continue;
        };
        validate_related_files_array(ctx, files)?;
    }
    Ok(())
}

/// A dictionary with embedded files must declare itself a file specification
pub fn validate_file_spec_dict_type<'a>(ctx: &ValidationContext<'a>, dict: &'a Dictionary) -> Result<()> {
    let declared = match dict.get(b"Type") {
        Ok(value) => Some(ctx.resolve(value)?),
        Err(_) => None,
    };
    match declared {
        Some(Object::Name(name)) if name.as_slice() == b"Filespec" => Ok(()),
        Some(Object::Name(name)) if name.as_slice() == b"F" && ctx.is_relaxed() => Ok(()),
        _ => Err(Error::structural(FILE_SPEC_DICT, "missing type: Filespec")),
    }
}

fn validate_file_spec_dict_ef_and_rf<'a>(ctx: &ValidationContext<'a>, dict: &'a Dictionary, dict_name: &str) -> Result<()> {
    // Related files arrays
    let rf = validate_dict_entry(ctx, dict, dict_name, "RF", OPTIONAL, PdfVersion::V1_3, None)?;

    // Embedded file streams, required if RF is present
    let ef = validate_dict_entry(ctx, dict, dict_name, "EF", rf.is_some(), PdfVersion::V1_3, None)?;

    // Type, required if EF is present
    let relaxed = ctx.is_relaxed();
    let valid_type = |s: &str| s == "Filespec" || (relaxed && s == "F");
    validate_name_entry(ctx, dict, dict_name, "Type", ef.is_some(), PdfVersion::V1_0, Some(&valid_type))?;

    if ef.is_some() {
        validate_file_spec_dict_type(ctx, dict)?;
        validate_file_spec_dict_entries_ef_and_rf(ctx, ef, rf)?;
    }
    Ok(())
}

/// `F` is required unless a platform-specific file name is given
fn required_f(dos_found: bool, mac_found: bool, unix_found: bool) -> bool {
    !dos_found && !mac_found && !unix_found
}

/// Validate a file specification dictionary
pub fn validate_file_spec_dict<'a>(ctx: &ValidationContext<'a>, dict: &'a Dictionary) -> Result<()> {
    let dict_name = FILE_SPEC_DICT;
    debug!("Validating {}", dict_name);

    // DOS, Mac and Unix are obsolete; only their presence matters.
    // Requiredness of F is settled before any value is looked at.
    let f_required = required_f(dict.has(b"DOS"), dict.has(b"Mac"), dict.has(b"Unix"));

    // File system name
    let fs = validate_name_entry(ctx, dict, dict_name, "FS", OPTIONAL, PdfVersion::V1_0, None)?;

    let validate_f: fn(&str) -> bool = if fs.as_deref() == Some("URL") {
        validate_url_string
    } else {
        validate_file_spec_string
    };
    validate_string_entry(ctx, dict, dict_name, "F", f_required, PdfVersion::V1_0, Some(&validate_f))?;

    // Unicode file name
    let since = since_version(ctx.mode(), PdfVersion::V1_7, PdfVersion::V1_3);
    validate_string_entry(ctx, dict, dict_name, "UF", OPTIONAL, since, Some(&validate_file_spec_string))?;

    // File identifier, two byte strings
    validate_string_array_entry(ctx, dict, dict_name, "ID", OPTIONAL, PdfVersion::V1_1, Some(&|a: &[Object]| a.len() == 2))?;

    // Volatile
    validate_boolean_entry(ctx, dict, dict_name, "V", OPTIONAL, PdfVersion::V1_2, None)?;

    validate_file_spec_dict_ef_and_rf(ctx, dict, dict_name)?;

    let since = since_version(ctx.mode(), PdfVersion::V1_6, PdfVersion::V1_0);
    validate_string_entry(ctx, dict, dict_name, "Desc", OPTIONAL, since, None)?;

    // Collection item
    validate_dict_entry(ctx, dict, dict_name, "CI", OPTIONAL, PdfVersion::V1_7, None)?;

    Ok(())
}

/// Validate a file specification: a bare string or a file specification dictionary
///
/// Returns the resolved object so callers can read the specification.
pub fn validate_file_specification<'a>(ctx: &ValidationContext<'a>, object: &'a Object) -> Result<&'a Object> {
    let resolved = ctx.resolve(object)?;

    match resolved {
        Object::String(..) => {
            let s = decode_text_string(resolved)?;
            if !validate_file_spec_string(&s) {
                return Err(Error::InvalidFileSpecString(s));
            }
        }
        Object::Dictionary(dict) => validate_file_spec_dict(ctx, dict)?,
        other => {
            return Err(Error::InvalidType {
                context: "file specification".to_string(),
                found: object_kind(other),
            })
        }
    }

    Ok(resolved)
}

/// Validate a value that may be a file specification or a form XObject
pub fn validate_file_specification_or_form_object<'a>(ctx: &ValidationContext<'a>, object: &'a Object) -> Result<()> {
    match ctx.resolve(object)? {
        Object::Stream(stream) => validate_form_stream_dict(ctx, stream),
        resolved => validate_file_specification(ctx, resolved).map(|_| ()),
    }
}

/// Validate a URL specification, a file specification dictionary with `FS /URL`
///
/// Returns the object as given.
pub fn validate_url_specification<'a>(ctx: &ValidationContext<'a>, object: &'a Object) -> Result<&'a Object> {
    let Some(dict) = ctx.resolve_dict(object, "URL specification")? else {
        return Err(Error::structural(URL_SPEC, "missing dict"));
    };
    let dict_name = URL_SPEC;

    // File system must be URL
    validate_name_entry(ctx, dict, dict_name, "FS", REQUIRED, PdfVersion::V1_0, Some(&|s: &str| s == "URL"))?;

    // RFC 1738 URL
    validate_string_entry(ctx, dict, dict_name, "F", REQUIRED, PdfVersion::V1_0, Some(&validate_url_string))?;

    Ok(object)
}

/// Validate a dictionary entry holding a file specification
pub fn validate_file_spec_entry<'a>(
    ctx: &ValidationContext<'a>,
    dict: &'a Dictionary,
    dict_name: &str,
    entry_name: &str,
    required: bool,
    since: PdfVersion,
) -> Result<Option<&'a Object>> {
    let Some(object) = validate_entry(ctx, dict, dict_name, entry_name, required, since)? else {
        return Ok(None);
    };

    // The entry's own version also gates the whole structure
    ctx.ensure_minimum_version("fileSpec", since)?;

    validate_file_specification(ctx, object).map(Some)
}

/// Validate a dictionary entry holding a URL specification
pub fn validate_url_spec_entry<'a>(
    ctx: &ValidationContext<'a>,
    dict: &'a Dictionary,
    dict_name: &str,
    entry_name: &str,
    required: bool,
    since: PdfVersion,
) -> Result<Option<&'a Object>> {
    let Some(object) = validate_entry(ctx, dict, dict_name, entry_name, required, since)? else {
        return Ok(None);
    };

    ctx.ensure_minimum_version("URLSpec", since)?;

    validate_url_specification(ctx, object).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::ValidationMode;
    use lopdf::{dictionary, Document, ObjectId, Stream};

    fn strict(doc: &Document, version: PdfVersion) -> ValidationContext<'_> {
        ValidationContext::new(doc, version, ValidationMode::Strict)
    }

    fn relaxed(doc: &Document, version: PdfVersion) -> ValidationContext<'_> {
        ValidationContext::new(doc, version, ValidationMode::Relaxed)
    }

    fn add_embedded_file(doc: &mut Document, params: Option<Dictionary>) -> ObjectId {
        let mut dict = dictionary! { "Type" => "EmbeddedFile" };
        if let Some(params) = params {
            dict.set("Params", params);
        }
        doc.add_object(Stream::new(dict, b"attachment".to_vec()))
    }

    fn embedded_file_spec(stream_id: ObjectId) -> Dictionary {
        dictionary! {
            "Type" => "Filespec",
            "F" => Object::string_literal("note.txt"),
            "EF" => dictionary! { "F" => stream_id },
        }
    }

    #[test]
    fn test_file_spec_string_accepts_anything() {
        assert!(validate_file_spec_string(""));
        assert!(validate_file_spec_string("in\\\\/out"));
        assert!(validate_file_spec_string("/C/My Documents/a.pdf"));
    }

    #[test]
    fn test_url_string() {
        assert!(validate_url_string("https://example.com/doc"));
        assert!(validate_url_string("http://example.com:8080/a/b?q=1#frag"));
        assert!(validate_url_string("ftp://ftp.example.org/pub/file.pdf"));
        assert!(validate_url_string("mailto:someone@example.com"));
        assert!(validate_url_string("/cgi-bin/submit"));
        assert!(validate_url_string("http://"));

        assert!(!validate_url_string(""));
        assert!(!validate_url_string("doc.pdf"));
        assert!(!validate_url_string("not a url"));
        assert!(!validate_url_string("http://exa mple.com/"));
    }

    #[test]
    fn test_f_required_without_platform_names() {
        let doc = Document::with_version("1.7");
        let ctx = strict(&doc, PdfVersion::V1_7);

        let dict = dictionary! { "Type" => "Filespec" };
        let err = validate_file_spec_dict(&ctx, &dict).unwrap_err();
        assert!(matches!(err, Error::MissingRequiredEntry { ref entry, .. } if entry == "F"));

        for platform in ["DOS", "Mac", "Unix"] {
            let mut dict = dictionary! { "Type" => "Filespec" };
            dict.set(platform, Object::string_literal("a.txt"));
            assert!(validate_file_spec_dict(&ctx, &dict).is_ok(), "{} should make F optional", platform);
        }
    }

    #[test]
    fn test_platform_entries_only_count_by_presence() {
        let doc = Document::with_version("1.7");
        let ctx = strict(&doc, PdfVersion::V1_7);

        // The content of the obsolete entries is never checked
        let dict = dictionary! { "DOS" => Object::Integer(1) };
        assert!(validate_file_spec_dict(&ctx, &dict).is_ok());
    }

    #[test]
    fn test_fs_url_selects_url_validator() {
        let doc = Document::with_version("1.7");
        let ctx = strict(&doc, PdfVersion::V1_7);

        let good = dictionary! { "FS" => "URL", "F" => Object::string_literal("https://example.com/doc") };
        assert!(validate_file_spec_dict(&ctx, &good).is_ok());

        let bad = dictionary! { "FS" => "URL", "F" => Object::string_literal("no scheme here") };
        let err = validate_file_spec_dict(&ctx, &bad).unwrap_err();
        assert!(matches!(err, Error::InvalidLiteral { ref entry, .. } if entry == "F"));

        // Without FS /URL the same string is a plain file name
        let plain = dictionary! { "F" => Object::string_literal("no scheme here") };
        assert!(validate_file_spec_dict(&ctx, &plain).is_ok());
    }

    #[test]
    fn test_url_file_spec_round_trip() {
        let doc = Document::with_version("1.7");
        let ctx = strict(&doc, PdfVersion::V1_7);
        let spec = Object::Dictionary(dictionary! {
            "FS" => "URL",
            "F" => Object::string_literal("https://example.com/doc"),
        });

        let returned = validate_file_specification(&ctx, &spec).unwrap();
        assert!(std::ptr::eq(returned, &spec));
    }

    #[test]
    fn test_file_specification_dispatch() {
        let mut doc = Document::with_version("1.7");
        let string_id = doc.add_object(Object::string_literal("readme.txt"));
        let ctx = strict(&doc, PdfVersion::V1_7);

        let literal = Object::Reference(string_id);
        assert!(matches!(validate_file_specification(&ctx, &literal), Ok(Object::String(..))));

        let hex = Object::String(b"readme.txt".to_vec(), StringFormat::Hexadecimal);
        assert!(validate_file_specification(&ctx, &hex).is_ok());

        let name = Object::Name(b"readme".to_vec());
        let err = validate_file_specification(&ctx, &name).unwrap_err();
        assert_eq!(err.to_string(), "invalid type for file specification: name");

        let stream = Object::Stream(Stream::new(dictionary! {}, Vec::new()));
        assert!(validate_file_specification(&ctx, &stream).is_err());
    }

    #[test]
    fn test_dangling_file_specification_reference() {
        let doc = Document::with_version("1.7");
        let ctx = strict(&doc, PdfVersion::V1_7);
        let dangling = Object::Reference((12, 0));
        assert!(matches!(
            validate_file_specification(&ctx, &dangling),
            Err(Error::Resolution { id: (12, 0) })
        ));
    }

    #[test]
    fn test_uf_version_gate_depends_on_mode() {
        let doc = Document::with_version("1.4");
        let dict = dictionary! {
            "F" => Object::string_literal("a.txt"),
            "UF" => Object::string_literal("a.txt"),
        };

        let err = validate_file_spec_dict(&strict(&doc, PdfVersion::V1_4), &dict).unwrap_err();
        assert!(matches!(err, Error::VersionConstraint { ref entry, since: PdfVersion::V1_7, .. } if entry == "UF"));

        assert!(validate_file_spec_dict(&relaxed(&doc, PdfVersion::V1_4), &dict).is_ok());
    }

    #[test]
    fn test_desc_version_gate_depends_on_mode() {
        let doc = Document::with_version("1.3");
        let dict = dictionary! {
            "F" => Object::string_literal("a.txt"),
            "Desc" => Object::string_literal("an attachment"),
        };
        assert!(validate_file_spec_dict(&strict(&doc, PdfVersion::V1_3), &dict).is_err());
        assert!(validate_file_spec_dict(&relaxed(&doc, PdfVersion::V1_3), &dict).is_ok());
    }

    #[test]
    fn test_id_must_have_two_strings() {
        let doc = Document::with_version("1.7");
        let ctx = strict(&doc, PdfVersion::V1_7);

        let dict = dictionary! {
            "F" => Object::string_literal("a.txt"),
            "ID" => vec![Object::string_literal("a"), Object::string_literal("b"), Object::string_literal("c")],
        };
        assert!(matches!(
            validate_file_spec_dict(&ctx, &dict),
            Err(Error::InvalidEntryValue { ref entry, .. }) if entry == "ID"
        ));
    }

    #[test]
    fn test_ci_requires_dictionary() {
        let doc = Document::with_version("1.7");
        let ctx = strict(&doc, PdfVersion::V1_7);
        let dict = dictionary! { "F" => Object::string_literal("a.txt"), "CI" => Object::Integer(3) };
        assert!(matches!(validate_file_spec_dict(&ctx, &dict), Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn test_ef_requires_type() {
        let mut doc = Document::with_version("1.7");
        let stream_id = add_embedded_file(&mut doc, None);

        let mut dict = embedded_file_spec(stream_id);
        dict.remove(b"Type");

        for ctx in [strict(&doc, PdfVersion::V1_7), relaxed(&doc, PdfVersion::V1_7)] {
            let err = validate_file_spec_dict(&ctx, &dict).unwrap_err();
            assert!(matches!(err, Error::MissingRequiredEntry { ref entry, .. } if entry == "Type"));
        }
    }

    #[test]
    fn test_ef_type_f_only_in_relaxed_mode() {
        let mut doc = Document::with_version("1.7");
        let stream_id = add_embedded_file(&mut doc, None);

        let mut dict = embedded_file_spec(stream_id);
        dict.set("Type", "F");

        assert!(validate_file_spec_dict(&strict(&doc, PdfVersion::V1_7), &dict).is_err());
        assert!(validate_file_spec_dict(&relaxed(&doc, PdfVersion::V1_7), &dict).is_ok());

        let dict = embedded_file_spec(stream_id);
        assert!(validate_file_spec_dict(&strict(&doc, PdfVersion::V1_7), &dict).is_ok());
        assert!(validate_file_spec_dict(&relaxed(&doc, PdfVersion::V1_7), &dict).is_ok());
    }

    #[test]
    fn test_file_spec_dict_type_recheck() {
        let doc = Document::with_version("1.7");
        let ctx = strict(&doc, PdfVersion::V1_7);

        assert!(validate_file_spec_dict_type(&ctx, &dictionary! { "Type" => "Filespec" }).is_ok());

        let err = validate_file_spec_dict_type(&ctx, &dictionary! {}).unwrap_err();
        assert_eq!(err.to_string(), "fileSpecDict: missing type: Filespec");

        let f_type = dictionary! { "Type" => "F" };
        assert!(validate_file_spec_dict_type(&ctx, &f_type).is_err());
        assert!(validate_file_spec_dict_type(&relaxed(&doc, PdfVersion::V1_7), &f_type).is_ok());
    }

    #[test]
    fn test_ef_requires_version_1_3() {
        let mut doc = Document::with_version("1.2");
        let stream_id = add_embedded_file(&mut doc, None);
        let ctx = relaxed(&doc, PdfVersion::V1_2);
        let err = validate_file_spec_dict(&ctx, &embedded_file_spec(stream_id)).unwrap_err();
        assert!(matches!(err, Error::VersionConstraint { ref entry, .. } if entry == "EF"));
    }

    #[test]
    fn test_rf_requires_ef() {
        let mut doc = Document::with_version("1.7");
        let stream_id = add_embedded_file(&mut doc, None);
        let ctx = strict(&doc, PdfVersion::V1_7);

        let dict = dictionary! {
            "Type" => "Filespec",
            "F" => Object::string_literal("note.txt"),
            "RF" => dictionary! { "F" => vec![Object::Reference(stream_id), Object::string_literal("a.txt")] },
        };
        let err = validate_file_spec_dict(&ctx, &dict).unwrap_err();
        assert!(matches!(err, Error::MissingRequiredEntry { ref entry, .. } if entry == "EF"));
    }

    #[test]
    fn test_ef_keys() {
        let mut doc = Document::with_version("1.7");
        let stream_id = add_embedded_file(&mut doc, None);
        let ctx = strict(&doc, PdfVersion::V1_7);

        for key in ["F", "UF", "DOS", "Mac", "Unix"] {
            let mut ef = Dictionary::new();
            ef.set(key, stream_id);
            assert!(validate_file_spec_dict_entries_ef_and_rf(&ctx, Some(&ef), None).is_ok(), "key {}", key);
        }

        let ef = dictionary! { "Windows" => stream_id };
        let err = validate_file_spec_dict_entries_ef_and_rf(&ctx, Some(&ef), None).unwrap_err();
        assert!(matches!(err, Error::StructuralConsistency { .. }));
        assert!(err.to_string().contains("Windows"));
    }

    #[test]
    fn test_ef_missing_dict() {
        let doc = Document::with_version("1.7");
        let ctx = strict(&doc, PdfVersion::V1_7);
        let rf = dictionary! {};
        let err = validate_file_spec_dict_entries_ef_and_rf(&ctx, None, Some(&rf)).unwrap_err();
        assert!(err.to_string().contains("missing required efDict"));
    }

    #[test]
    fn test_ef_null_and_dangling_entries_are_skipped() {
        let doc = Document::with_version("1.7");
        let ctx = strict(&doc, PdfVersion::V1_7);
        let ef = dictionary! { "F" => Object::Null, "UF" => Object::Reference((40, 0)) };
        assert!(validate_file_spec_dict_entries_ef_and_rf(&ctx, Some(&ef), None).is_ok());
    }

    #[test]
    fn test_ef_entry_must_be_stream() {
        let doc = Document::with_version("1.7");
        let ctx = strict(&doc, PdfVersion::V1_7);
        let ef = dictionary! { "F" => Object::string_literal("not a stream") };
        assert!(matches!(
            validate_file_spec_dict_entries_ef_and_rf(&ctx, Some(&ef), None),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_rf_key_without_ef_key() {
        let mut doc = Document::with_version("1.7");
        let stream_id = add_embedded_file(&mut doc, None);
        let ctx = strict(&doc, PdfVersion::V1_7);

        let ef = dictionary! { "F" => stream_id };
        let rf = dictionary! { "UF" => vec![Object::Reference(stream_id), Object::string_literal("a.txt")] };
        let err = validate_file_spec_dict_entries_ef_and_rf(&ctx, Some(&ef), Some(&rf)).unwrap_err();
        assert!(matches!(err, Error::StructuralConsistency { .. }));
        assert!(err.to_string().contains("UF"));
    }

    #[test]
    fn test_rf_null_array_is_skipped() {
        let mut doc = Document::with_version("1.7");
        let stream_id = add_embedded_file(&mut doc, None);
        let ctx = strict(&doc, PdfVersion::V1_7);

        let ef = dictionary! { "F" => stream_id };
        let rf = dictionary! { "F" => Object::Null };
        assert!(validate_file_spec_dict_entries_ef_and_rf(&ctx, Some(&ef), Some(&rf)).is_ok());
    }

    #[test]
    fn test_related_files_array_odd_length() {
        let doc = Document::with_version("1.7");
        let ctx = strict(&doc, PdfVersion::V1_7);

        // Content is never looked at when the length is odd
        let files = vec![Object::Integer(1), Object::Integer(2), Object::Integer(3)];
        let err = validate_related_files_array(&ctx, &files).unwrap_err();
        assert!(matches!(err, Error::StructuralConsistency { .. }));
        assert!(err.to_string().contains("array corrupt"));
    }

    #[test]
    fn test_related_files_array_alternation() {
        let mut doc = Document::with_version("1.7");
        let stream_id = add_embedded_file(&mut doc, None);
        let ctx = strict(&doc, PdfVersion::V1_7);

        let good = vec![
            Object::Reference(stream_id),
            Object::string_literal("a.txt"),
            Object::Reference(stream_id),
            Object::string_literal("b.txt"),
        ];
        assert!(validate_related_files_array(&ctx, &good).is_ok());

        let swapped = vec![Object::string_literal("a.txt"), Object::Reference(stream_id)];
        assert!(matches!(
            validate_related_files_array(&ctx, &swapped),
            Err(Error::TypeMismatch { ref entry, .. }) if entry == "[0]"
        ));

        let hex_name = vec![
            Object::Reference(stream_id),
            Object::String(b"a.txt".to_vec(), StringFormat::Hexadecimal),
        ];
        assert!(matches!(
            validate_related_files_array(&ctx, &hex_name),
            Err(Error::TypeMismatch { ref entry, .. }) if entry == "[1]"
        ));

        let null_name = vec![Object::Reference(stream_id), Object::Null];
        assert!(matches!(
            validate_related_files_array(&ctx, &null_name),
            Err(Error::StructuralConsistency { .. })
        ));
    }

    #[test]
    fn test_embedded_scenario_end_to_end() {
        let mut doc = Document::with_version("1.7");
        let stream_id = add_embedded_file(&mut doc, None);
        let ctx = strict(&doc, PdfVersion::V1_7);

        let mut dict = embedded_file_spec(stream_id);
        dict.set(
            "RF",
            dictionary! { "F" => vec![Object::Reference(stream_id), Object::string_literal("note.txt")] },
        );
        let spec = Object::Dictionary(dict);
        assert!(validate_file_specification(&ctx, &spec).is_ok());
    }

    #[test]
    fn test_embedded_scenario_odd_related_files() {
        let mut doc = Document::with_version("1.7");
        let stream_id = add_embedded_file(&mut doc, None);
        let ctx = strict(&doc, PdfVersion::V1_7);

        let mut dict = embedded_file_spec(stream_id);
        dict.set("RF", dictionary! { "F" => vec![Object::Reference(stream_id)] });
        let err = validate_file_spec_dict(&ctx, &dict).unwrap_err();
        assert!(err.to_string().contains("rfDict array corrupt"));
    }

    #[test]
    fn test_embedded_file_stream_type() {
        let doc = Document::with_version("1.7");
        let ctx = strict(&doc, PdfVersion::V1_7);

        let good = dictionary! { "Type" => "EmbeddedFile", "Subtype" => "text#2Fplain" };
        assert!(validate_embedded_file_stream_dict(&ctx, &good).is_ok());
        assert!(validate_embedded_file_stream_dict(&ctx, &dictionary! {}).is_ok());

        let bad = dictionary! { "Type" => "XObject" };
        assert!(validate_embedded_file_stream_dict(&ctx, &bad).is_err());
    }

    #[test]
    fn test_embedded_file_params() {
        let mut doc = Document::with_version("1.7");
        let fork_id = doc.add_object(Stream::new(dictionary! {}, vec![0u8; 4]));
        let ctx = strict(&doc, PdfVersion::V1_7);

        let params = dictionary! {
            "Size" => Object::Integer(10),
            "CreationDate" => Object::string_literal("D:20240102030405+01'00'"),
            "ModDate" => Object::string_literal("D:2024"),
            "CheckSum" => Object::String(vec![0xAB; 16], StringFormat::Hexadecimal),
            "Mac" => dictionary! {
                "Subtype" => Object::Integer(0x54455854),
                "Creator" => Object::Integer(0x74747874),
                "ResFork" => fork_id,
            },
        };
        let stream = dictionary! { "Type" => "EmbeddedFile", "Params" => params };
        assert!(validate_embedded_file_stream_dict(&ctx, &stream).is_ok());
    }

    #[test]
    fn test_embedded_file_params_errors() {
        let mut doc = Document::with_version("1.7");
        let null_id = doc.add_object(Object::Null);
        let ctx = strict(&doc, PdfVersion::V1_7);

        // Params resolving to null is skipped
        let stream = dictionary! { "Params" => null_id };
        assert!(validate_embedded_file_stream_dict(&ctx, &stream).is_ok());

        let stream = dictionary! { "Params" => Object::Integer(1) };
        assert!(matches!(
            validate_embedded_file_stream_dict(&ctx, &stream),
            Err(Error::InvalidType { .. })
        ));

        let stream = dictionary! { "Params" => dictionary! { "Size" => Object::string_literal("10") } };
        assert!(matches!(
            validate_embedded_file_stream_dict(&ctx, &stream),
            Err(Error::TypeMismatch { ref dict, .. }) if dict == "embeddedFileStreamParmDict"
        ));

        let stream = dictionary! { "Params" => dictionary! { "ModDate" => Object::string_literal("last week") } };
        assert!(validate_embedded_file_stream_dict(&ctx, &stream).is_err());

        let stream = dictionary! {
            "Params" => dictionary! { "Mac" => dictionary! { "ResFork" => Object::Integer(0) } },
        };
        assert!(matches!(
            validate_embedded_file_stream_dict(&ctx, &stream),
            Err(Error::TypeMismatch { ref dict, .. }) if dict == "embeddedFileStreamMacParameterDict"
        ));
    }

    #[test]
    fn test_url_specification() {
        let mut doc = Document::with_version("1.7");
        let spec_id = doc.add_object(dictionary! {
            "FS" => "URL",
            "F" => Object::string_literal("https://example.com/submit"),
        });
        let ctx = strict(&doc, PdfVersion::V1_7);

        let reference = Object::Reference(spec_id);
        let returned = validate_url_specification(&ctx, &reference).unwrap();
        assert!(std::ptr::eq(returned, &reference));

        let no_fs = Object::Dictionary(dictionary! { "F" => Object::string_literal("https://example.com") });
        assert!(matches!(
            validate_url_specification(&ctx, &no_fs),
            Err(Error::MissingRequiredEntry { ref entry, .. }) if entry == "FS"
        ));

        let wrong_fs = Object::Dictionary(dictionary! { "FS" => "File", "F" => Object::string_literal("https://example.com") });
        assert!(validate_url_specification(&ctx, &wrong_fs).is_err());

        let bad_url = Object::Dictionary(dictionary! { "FS" => "URL", "F" => Object::string_literal("example") });
        assert!(matches!(validate_url_specification(&ctx, &bad_url), Err(Error::InvalidLiteral { .. })));

        let err = validate_url_specification(&ctx, &Object::Null).unwrap_err();
        assert!(err.to_string().contains("missing dict"));

        let string = Object::string_literal("https://example.com");
        assert!(matches!(validate_url_specification(&ctx, &string), Err(Error::InvalidType { .. })));
    }

    #[test]
    fn test_file_spec_entry() {
        let doc = Document::with_version("1.1");
        let ctx = strict(&doc, PdfVersion::V1_1);
        let action = dictionary! { "S" => "GoToR", "F" => Object::string_literal("other.pdf") };

        let spec = validate_file_spec_entry(&ctx, &action, "gotoRActionDict", "F", REQUIRED, PdfVersion::V1_1).unwrap();
        assert!(matches!(spec, Some(Object::String(..))));

        let missing = validate_file_spec_entry(&ctx, &action, "launchActionDict", "Win", OPTIONAL, PdfVersion::V1_0).unwrap();
        assert!(missing.is_none());

        let err = validate_file_spec_entry(&ctx, &action, "gotoEActionDict", "F", REQUIRED, PdfVersion::V1_6).unwrap_err();
        assert!(matches!(err, Error::VersionConstraint { .. }));
    }

    #[test]
    fn test_url_spec_entry() {
        let doc = Document::with_version("1.2");
        let ctx = strict(&doc, PdfVersion::V1_2);
        let action = dictionary! {
            "S" => "SubmitForm",
            "F" => dictionary! { "FS" => "URL", "F" => Object::string_literal("https://example.com/cgi") },
        };
        let spec = validate_url_spec_entry(&ctx, &action, "submitFormActionDict", "F", REQUIRED, PdfVersion::V1_0).unwrap();
        assert!(matches!(spec, Some(Object::Dictionary(_))));

        let empty = dictionary! {};
        assert!(validate_url_spec_entry(&ctx, &empty, "submitFormActionDict", "F", REQUIRED, PdfVersion::V1_0).is_err());
    }

    #[test]
    fn test_file_specification_or_form_object() {
        let mut doc = Document::with_version("1.7");
        let form_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(10), Object::Integer(10)],
            },
            Vec::new(),
        ));
        let ctx = strict(&doc, PdfVersion::V1_7);

        let form = Object::Reference(form_id);
        assert!(validate_file_specification_or_form_object(&ctx, &form).is_ok());

        let string = Object::string_literal("movie.mp4");
        assert!(validate_file_specification_or_form_object(&ctx, &string).is_ok());

        let not_form = Object::Stream(Stream::new(dictionary! { "Subtype" => "Image" }, Vec::new()));
        assert!(validate_file_specification_or_form_object(&ctx, &not_form).is_err());

        let integer = Object::Integer(5);
        assert!(matches!(
            validate_file_specification_or_form_object(&ctx, &integer),
            Err(Error::InvalidType { .. })
        ));
    }
}
