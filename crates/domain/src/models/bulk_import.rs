//! Bulk CSV import results.

use serde::Serialize;

/// Error for a single rejected CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkImportError {
    /// Data row number, 1-indexed, header excluded.
    pub row: usize,

    /// Identifier from the row, when one was present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    pub error: String,
}

impl BulkImportError {
    pub fn new(row: usize, key: Option<String>, error: impl Into<String>) -> Self {
        Self {
            row,
            key,
            error: error.into(),
        }
    }
}

/// A row that passed validation, with its source row number.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedRow<T> {
    pub row: usize,
    pub record: T,
}

/// Outcome of parsing and validating an import file.
#[derive(Debug, Clone)]
pub struct ImportBatch<T> {
    pub processed: usize,
    pub accepted: Vec<ImportedRow<T>>,
    pub errors: Vec<BulkImportError>,
}

impl<T> ImportBatch<T> {
    pub fn new(processed: usize) -> Self {
        Self {
            processed,
            accepted: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn reject(&mut self, row: usize, key: Option<String>, error: impl Into<String>) {
        self.errors.push(BulkImportError::new(row, key, error));
    }
}

/// Response for bulk import endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct BulkImportResponse {
    /// Number of data rows read.
    pub processed: usize,

    /// Number of records written.
    pub created: usize,

    pub errors: Vec<BulkImportError>,
}
