//! Splitting raw import text into rows of fields.
//!
//! Import files are semicolon-delimited with no quoting: a field can never
//! contain the delimiter, and fields are passed on exactly as written apart
//! from the surrounding whitespace of each line.

use crate::error::Result;
use csv::{ReaderBuilder, StringRecord, Terminator};

/// Field delimiter used by import files.
pub const DELIMITER: u8 = b';';

/// One line of an import file split into its raw fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    /// Position among the retained lines; 0 is the header.
    pub index: usize,

    /// Raw fields, untrimmed.
    pub fields: Vec<String>,
}

impl ImportRow {
    /// Returns the field at `column`, or `""` if the row is too short.
    pub fn field(&self, column: usize) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    /// The fields joined back with the delimiter.
    pub fn joined(&self) -> String {
        self.fields.join(";")
    }
}

/// Splits `text` into rows.
///
/// Blank lines (including lines holding only whitespace) are dropped and
/// do not consume a row index. Rows may have any number of fields; shape
/// checks happen during validation.
pub fn parse_rows(text: &str) -> Result<Vec<ImportRow>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .terminator(Terminator::Any(b'\n'))
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let fields = trim_line(&record);
        if fields.len() == 1 && fields[0].is_empty() {
            continue;
        }
        rows.push(ImportRow {
            index: rows.len(),
            fields,
        });
    }

    Ok(rows)
}

/// Strips the whitespace around a whole line: leading whitespace of the
/// first field and trailing whitespace of the last one.
fn trim_line(record: &StringRecord) -> Vec<String> {
    let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
    if let Some(first) = fields.first_mut() {
        *first = first.trim_start().to_string();
    }
    if let Some(last) = fields.last_mut() {
        *last = last.trim_end().to_string();
    }
    fields
}
