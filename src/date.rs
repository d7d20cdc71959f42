//! PDF date parsing module
//!
//! Parses date strings of the form `D:YYYYMMDDHHmmSSOHH'mm'` (PDF 32000 section 7.9.4).
//! Every field after the year is optional, but fields may only be dropped from the end.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use crate::error::{Error, Result};

/// Parse a PDF date string into a timestamp with its UTC offset
///
/// Supported formats:
/// - `"D:2024"` → 2024-01-01 00:00:00 UTC
/// - `"D:20241120153000Z"` → UTC
/// - `"D:20241120153000+01'00'"` → explicit offset (trailing apostrophe optional)
///
/// In relaxed mode the `D:` prefix may be missing and the apostrophe between
/// offset hours and minutes may be omitted (`+0100`).
pub fn parse_pdf_date(input: &str, relaxed: bool) -> Result<DateTime<FixedOffset>> {
    let invalid = || Error::InvalidDate(input.to_string());

    let body = match input.strip_prefix("D:") {
        Some(rest) => rest,
        None if relaxed => input,
        None => return Err(invalid()),
    };
    // Some writers pad dates with NUL bytes or spaces
    let body = body.trim_end_matches(['\0', ' ']);

    let mut cursor = Cursor { s: body.as_bytes(), pos: 0 };

    let year = cursor.digits(4).ok_or_else(invalid)?;
    let mut fields = [1u32, 1, 0, 0, 0];
    for field in fields.iter_mut() {
        match cursor.digits(2) {
            Some(value) => *field = value,
            None => break,
        }
    }
    // A partial field (e.g. a single trailing digit) is never valid
    if cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let [month, day, hour, minute, second] = fields;

    let offset_seconds = match cursor.next() {
        None => 0,
        Some(b'Z') => {
            // "Z00'00'" is common in older producers
            cursor.offset(relaxed).ok_or_else(invalid)?;
            0
        }
        Some(sign @ (b'+' | b'-')) => {
            // A bare sign carries no offset
            if !relaxed && cursor.peek().is_none() {
                return Err(invalid());
            }
            let seconds = cursor.offset(relaxed).ok_or_else(invalid)?;
            if sign == b'-' { -seconds } else { seconds }
        }
        Some(_) => return Err(invalid()),
    };
    if cursor.peek().is_some() {
        return Err(invalid());
    }

    let date = NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(invalid)?;
    let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(invalid)?;
    let offset = FixedOffset::east_opt(offset_seconds).ok_or_else(invalid)?;

    offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .ok_or_else(invalid)
}

/// Check whether a string is a valid PDF date
pub fn is_valid_pdf_date(input: &str, relaxed: bool) -> bool {
    parse_pdf_date(input, relaxed).is_ok()
}

struct Cursor<'s> {
    s: &'s [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<u8> {
        self.s.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// Consume exactly `n` ASCII digits, or nothing
    fn digits(&mut self, n: usize) -> Option<u32> {
        let run = self.s.get(self.pos..self.pos + n)?;
        if !run.iter().all(u8::is_ascii_digit) {
            return None;
        }
        self.pos += n;
        Some(run.iter().fold(0, |acc, d| acc * 10 + u32::from(d - b'0')))
    }

    /// Parse `HH'mm'` after an offset sign, returning seconds
    fn offset(&mut self, relaxed: bool) -> Option<i32> {
        if self.peek().is_none() {
            return Some(0);
        }
        let hours = self.digits(2)?;
        let mut minutes = 0;
        match self.peek() {
            Some(b'\'') => {
                self.pos += 1;
                if let Some(m) = self.digits(2) {
                    minutes = m;
                    if self.peek() == Some(b'\'') {
                        self.pos += 1;
                    }
                }
            }
            Some(c) if relaxed && c.is_ascii_digit() => {
                minutes = self.digits(2)?;
            }
            _ => {}
        }
        if hours > 23 || minutes > 59 {
            return None;
        }
        Some((hours * 3600 + minutes * 60) as i32)
    }
}
