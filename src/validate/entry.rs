//! Primitive dictionary entry validators
//!
//! Each validator looks up one entry, resolves it one hop, and checks
//! presence, type, minimum version and an optional value predicate, in
//! that order. Absent optional entries (and entries resolving to `null`)
//! yield `Ok(None)`.

use chrono::{DateTime, FixedOffset};
use lopdf::{decode_text_string, Dictionary, Object, Stream};
use log::trace;

use crate::date::parse_pdf_date;
use crate::error::{Error, Result};
use crate::resolve::object_kind;
use crate::validate::context::ValidationContext;
use crate::version::PdfVersion;

pub const REQUIRED: bool = true;
pub const OPTIONAL: bool = false;

fn missing<T>(dict_name: &str, entry_name: &str, required: bool) -> Result<Option<T>> {
    if required {
        return Err(Error::MissingRequiredEntry {
            dict: dict_name.to_string(),
            entry: entry_name.to_string(),
        });
    }
    Ok(None)
}

pub(crate) fn type_mismatch(dict_name: &str, entry_name: &str, expected: &'static str, found: &Object) -> Error {
    Error::TypeMismatch {
        dict: dict_name.to_string(),
        entry: entry_name.to_string(),
        expected,
        found: object_kind(found),
    }
}

fn invalid_value(dict_name: &str, entry_name: &str, value: impl Into<String>) -> Error {
    Error::InvalidEntryValue {
        dict: dict_name.to_string(),
        entry: entry_name.to_string(),
        value: value.into(),
    }
}

/// Look up and resolve an entry of any type
pub fn validate_entry<'a>(
    ctx: &ValidationContext<'a>,
    dict: &'a Dictionary,
    dict_name: &str,
    entry_name: &str,
    required: bool,
    since: PdfVersion,
) -> Result<Option<&'a Object>> {
    let Ok(value) = dict.get(entry_name.as_bytes()) else {
        return missing(dict_name, entry_name, required);
    };

    let value = ctx.resolve(value)?;
    if let Object::Null = value {
        return missing(dict_name, entry_name, required);
    }

    ctx.check_entry_version(dict_name, entry_name, since)?;

    trace!("{}: entry {} is {}", dict_name, entry_name, object_kind(value));
    Ok(Some(value))
}

pub fn validate_integer_entry<'a>(
    ctx: &ValidationContext<'a>,
    dict: &'a Dictionary,
    dict_name: &str,
    entry_name: &str,
    required: bool,
    since: PdfVersion,
    predicate: Option<&dyn Fn(i64) -> bool>,
) -> Result<Option<i64>> {
    let Some(value) = validate_entry(ctx, dict, dict_name, entry_name, required, since)? else {
        return Ok(None);
    };
    let Object::Integer(n) = value else {
        return Err(type_mismatch(dict_name, entry_name, "integer", value));
    };
    if let Some(predicate) = predicate {
        if !predicate(*n) {
            return Err(invalid_value(dict_name, entry_name, n.to_string()));
        }
    }
    Ok(Some(*n))
}

pub fn validate_name_entry<'a>(
    ctx: &ValidationContext<'a>,
    dict: &'a Dictionary,
    dict_name: &str,
    entry_name: &str,
    required: bool,
    since: PdfVersion,
    predicate: Option<&dyn Fn(&str) -> bool>,
) -> Result<Option<String>> {
    let Some(value) = validate_entry(ctx, dict, dict_name, entry_name, required, since)? else {
        return Ok(None);
    };
    let Object::Name(name) = value else {
        return Err(type_mismatch(dict_name, entry_name, "name", value));
    };
    let name = String::from_utf8_lossy(name).into_owned();
    if let Some(predicate) = predicate {
        if !predicate(&name) {
            return Err(invalid_value(dict_name, entry_name, format!("/{}", name)));
        }
    }
    Ok(Some(name))
}

/// Validate a text or byte string entry; the predicate sees the decoded text
pub fn validate_string_entry<'a>(
    ctx: &ValidationContext<'a>,
    dict: &'a Dictionary,
    dict_name: &str,
    entry_name: &str,
    required: bool,
    since: PdfVersion,
    predicate: Option<&dyn Fn(&str) -> bool>,
) -> Result<Option<String>> {
    let Some(value) = validate_entry(ctx, dict, dict_name, entry_name, required, since)? else {
        return Ok(None);
    };
    let Object::String(..) = value else {
        return Err(type_mismatch(dict_name, entry_name, "string", value));
    };
    // PDFDocEncoding or UTF-16BE with BOM
    let text = decode_text_string(value)?;
    if let Some(predicate) = predicate {
        if !predicate(&text) {
            return Err(Error::InvalidLiteral {
                dict: dict_name.to_string(),
                entry: entry_name.to_string(),
                value: text,
            });
        }
    }
    Ok(Some(text))
}

/// Validate an array whose every element resolves to a string
pub fn validate_string_array_entry<'a>(
    ctx: &ValidationContext<'a>,
    dict: &'a Dictionary,
    dict_name: &str,
    entry_name: &str,
    required: bool,
    since: PdfVersion,
    predicate: Option<&dyn Fn(&[Object]) -> bool>,
) -> Result<Option<&'a [Object]>> {
    let Some(value) = validate_entry(ctx, dict, dict_name, entry_name, required, since)? else {
        return Ok(None);
    };
    let Object::Array(items) = value else {
        return Err(type_mismatch(dict_name, entry_name, "array", value));
    };
    for (i, item) in items.iter().enumerate() {
        let item = ctx.resolve(item)?;
        if !matches!(item, Object::String(..)) {
            return Err(type_mismatch(dict_name, &format!("{}[{}]", entry_name, i), "string", item));
        }
    }
    if let Some(predicate) = predicate {
        if !predicate(items.as_slice()) {
            return Err(invalid_value(
                dict_name,
                entry_name,
                format!("array of {} strings", items.len()),
            ));
        }
    }
    Ok(Some(items.as_slice()))
}

/// Validate an array of integers and reals, returned as `f64`
pub fn validate_number_array_entry<'a>(
    ctx: &ValidationContext<'a>,
    dict: &'a Dictionary,
    dict_name: &str,
    entry_name: &str,
    required: bool,
    since: PdfVersion,
    predicate: Option<&dyn Fn(&[f64]) -> bool>,
) -> Result<Option<Vec<f64>>> {
    let Some(value) = validate_entry(ctx, dict, dict_name, entry_name, required, since)? else {
        return Ok(None);
    };
    let Object::Array(items) = value else {
        return Err(type_mismatch(dict_name, entry_name, "array", value));
    };
    let mut numbers = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match ctx.resolve(item)? {
            Object::Integer(n) => numbers.push(*n as f64),
            Object::Real(r) => numbers.push(f64::from(*r)),
            other => {
                return Err(type_mismatch(dict_name, &format!("{}[{}]", entry_name, i), "number", other));
            }
        }
    }
    if let Some(predicate) = predicate {
        if !predicate(numbers.as_slice()) {
            return Err(invalid_value(dict_name, entry_name, format!("{:?}", numbers)));
        }
    }
    Ok(Some(numbers))
}

/// Validate a rectangle, an array of exactly four numbers
pub fn validate_rectangle_entry<'a>(
    ctx: &ValidationContext<'a>,
    dict: &'a Dictionary,
    dict_name: &str,
    entry_name: &str,
    required: bool,
    since: PdfVersion,
) -> Result<Option<Vec<f64>>> {
    validate_number_array_entry(ctx, dict, dict_name, entry_name, required, since, Some(&|a: &[f64]| a.len() == 4))
}

pub fn validate_boolean_entry<'a>(
    ctx: &ValidationContext<'a>,
    dict: &'a Dictionary,
    dict_name: &str,
    entry_name: &str,
    required: bool,
    since: PdfVersion,
    predicate: Option<&dyn Fn(bool) -> bool>,
) -> Result<Option<bool>> {
    let Some(value) = validate_entry(ctx, dict, dict_name, entry_name, required, since)? else {
        return Ok(None);
    };
    let Object::Boolean(b) = value else {
        return Err(type_mismatch(dict_name, entry_name, "boolean", value));
    };
    if let Some(predicate) = predicate {
        if !predicate(*b) {
            return Err(invalid_value(dict_name, entry_name, b.to_string()));
        }
    }
    Ok(Some(*b))
}

/// Validate a date string entry (`D:YYYYMMDDHHmmSSOHH'mm'`)
pub fn validate_date_entry<'a>(
    ctx: &ValidationContext<'a>,
    dict: &'a Dictionary,
    dict_name: &str,
    entry_name: &str,
    required: bool,
    since: PdfVersion,
) -> Result<Option<DateTime<FixedOffset>>> {
    let Some(value) = validate_entry(ctx, dict, dict_name, entry_name, required, since)? else {
        return Ok(None);
    };
    let Object::String(..) = value else {
        return Err(type_mismatch(dict_name, entry_name, "date string", value));
    };
    let text = decode_text_string(value)?;
    match parse_pdf_date(&text, ctx.is_relaxed()) {
        Ok(date) => Ok(Some(date)),
        Err(_) => Err(invalid_value(dict_name, entry_name, text)),
    }
}

pub fn validate_dict_entry<'a>(
    ctx: &ValidationContext<'a>,
    dict: &'a Dictionary,
    dict_name: &str,
    entry_name: &str,
    required: bool,
    since: PdfVersion,
    predicate: Option<&dyn Fn(&Dictionary) -> bool>,
) -> Result<Option<&'a Dictionary>> {
    let Some(value) = validate_entry(ctx, dict, dict_name, entry_name, required, since)? else {
        return Ok(None);
    };
    let Object::Dictionary(entry) = value else {
        return Err(type_mismatch(dict_name, entry_name, "dictionary", value));
    };
    if let Some(predicate) = predicate {
        if !predicate(entry) {
            return Err(invalid_value(dict_name, entry_name, "dictionary"));
        }
    }
    Ok(Some(entry))
}

pub fn validate_stream_dict_entry<'a>(
    ctx: &ValidationContext<'a>,
    dict: &'a Dictionary,
    dict_name: &str,
    entry_name: &str,
    required: bool,
    since: PdfVersion,
    predicate: Option<&dyn Fn(&Stream) -> bool>,
) -> Result<Option<&'a Stream>> {
    let Some(value) = validate_entry(ctx, dict, dict_name, entry_name, required, since)? else {
        return Ok(None);
    };
    let Object::Stream(stream) = value else {
        return Err(type_mismatch(dict_name, entry_name, "stream", value));
    };
    if let Some(predicate) = predicate {
        if !predicate(stream) {
            return Err(invalid_value(dict_name, entry_name, "stream"));
        }
    }
    Ok(Some(stream))
}

/// Resolve a value that must be a stream; `None` for the null object
pub fn validate_stream_dict<'a>(
    ctx: &ValidationContext<'a>,
    object: &'a Object,
    dict_name: &str,
    entry_name: &str,
) -> Result<Option<&'a Stream>> {
    match ctx.resolve(object)? {
        Object::Stream(stream) => Ok(Some(stream)),
        Object::Null => Ok(None),
        other => Err(type_mismatch(dict_name, entry_name, "stream", other)),
    }
}
