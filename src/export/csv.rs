//! Minimal CSV row writer.
//!
//! Fields containing a comma, quote, CR or LF are quoted, with inner quotes
//! doubled. Rows end with CRLF.

use std::borrow::Cow;
use std::io::{self, Write};

fn needs_quoting(field: &str) -> bool {
    field.contains([',', '"', '\r', '\n'])
}

/// Quote a single field if required.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if needs_quoting(field) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Write one row.
pub fn write_row<W: Write>(writer: &mut W, fields: &[&str]) -> io::Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            writer.write_all(b",")?;
        }
        writer.write_all(escape_field(field).as_bytes())?;
    }
    writer.write_all(b"\r\n")
}
