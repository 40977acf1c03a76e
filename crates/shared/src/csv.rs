//! Minimal RFC 4180 style CSV reading and writing.
//!
//! Exports quote a field only when it contains the delimiter, a quote, or a
//! line break. Imports accept quoted fields with doubled quotes and embedded
//! line breaks, an optional UTF-8 BOM, and skip blank lines.

use thiserror::Error;

/// UTF-8 byte order mark, prepended to templates opened in spreadsheet tools.
pub const UTF8_BOM: &str = "\u{feff}";

/// Marker appended to required column names in templates.
pub const REQUIRED_MARKER: &str = "[*]";

/// Error type for CSV parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CsvError {
    #[error("CSV is empty")]
    Empty,

    #[error("CSV header row is empty")]
    EmptyHeader,

    #[error("Unterminated quoted field starting on line {0}")]
    UnterminatedQuote(usize),

    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

/// Escapes a single field for output.
pub fn escape_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Joins fields into one output line (without terminator).
pub fn write_row<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Builds a complete document from a header and data rows.
pub fn write_document<S: AsRef<str>>(header: &[S], rows: &[Vec<String>]) -> String {
    let mut out = String::with_capacity(64 * (rows.len() + 1));
    out.push_str(&write_row(header));
    out.push('\n');
    for row in rows {
        out.push_str(&write_row(row));
        out.push('\n');
    }
    out
}

/// Normalizes a header cell for lookups: strips the required marker and
/// surrounding whitespace, and lowercases.
pub fn normalize_header(name: &str) -> String {
    name.trim()
        .trim_start_matches(UTF8_BOM)
        .trim_end_matches(REQUIRED_MARKER)
        .trim()
        .to_lowercase()
}

/// Splits raw text into records of fields.
pub fn parse_records(text: &str) -> Result<Vec<Vec<String>>, CsvError> {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1usize;
    let mut quote_started_on = 0usize;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(ch);
                }
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            '"' => {
                in_quotes = true;
                quote_started_on = line;
            }
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                line += 1;
                record.push(std::mem::take(&mut field));
                push_record(&mut records, std::mem::take(&mut record));
            }
            _ => field.push(ch),
        }
    }

    if in_quotes {
        return Err(CsvError::UnterminatedQuote(quote_started_on));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        push_record(&mut records, record);
    }

    Ok(records)
}

fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    if record.iter().all(|f| f.trim().is_empty()) {
        return;
    }
    records.push(record);
}

/// A parsed document: header plus data rows, with name based cell access.
#[derive(Debug, Clone)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Parses text whose first non-blank record is the header.
    pub fn parse(text: &str) -> Result<Self, CsvError> {
        let mut records = parse_records(text)?.into_iter();
        let header = records.next().ok_or(CsvError::Empty)?;
        let headers: Vec<String> = header.iter().map(|h| normalize_header(h)).collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(CsvError::EmptyHeader);
        }

        Ok(Self {
            headers,
            rows: records.collect(),
        })
    }

    /// Normalized header names.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by (unnormalized) name.
    pub fn column(&self, name: &str) -> Option<usize> {
        let wanted = normalize_header(name);
        self.headers.iter().position(|h| *h == wanted)
    }

    /// Fails if any of the given columns is absent from the header.
    pub fn require_columns(&self, names: &[&str]) -> Result<(), CsvError> {
        for name in names {
            if self.column(name).is_none() {
                return Err(CsvError::MissingColumn(
                    name.trim_end_matches(REQUIRED_MARKER).to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Iterates data rows as name-addressable views.
    pub fn rows(&self) -> impl Iterator<Item = CsvRow<'_>> {
        self.rows.iter().map(move |cells| CsvRow {
            table: self,
            cells: cells.as_slice(),
        })
    }
}

/// A single data row borrowed from a [`CsvTable`].
#[derive(Debug, Clone, Copy)]
pub struct CsvRow<'a> {
    table: &'a CsvTable,
    cells: &'a [String],
}

impl<'a> CsvRow<'a> {
    /// Trimmed cell value for a column, empty when the column or cell is absent.
    pub fn get(&self, name: &str) -> &'a str {
        self.table
            .column(name)
            .and_then(|idx| self.cells.get(idx))
            .map(|s| s.trim())
            .unwrap_or("")
    }

    /// Cell value as `Some` only when non-empty.
    pub fn opt(&self, name: &str) -> Option<String> {
        let value = self.get(name);
        (!value.is_empty()).then(|| value.to_string())
    }
}
