//! CSV mapping for bulk order import.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::DomainError;
use crate::models::{CreateOrderRequest, ImportBatch, ImportedRow, MAX_ORDER_QUANTITY};
use crate::services::orders::{prepare_order, PreparedOrder};
use shared::csv::{write_document, CsvRow, CsvTable, UTF8_BOM};

/// Header of the bulk order template.
pub const ORDER_TEMPLATE_HEADER: [&str; 15] = [
    "Sales Order",
    "Employee ID",
    "Employee Name",
    "Order Type",
    "Asset Type",
    "Model",
    "Configuration",
    "Product",
    "SD Card Size",
    "Profile ID",
    "Location",
    "Quantity",
    "Serial Number",
    "Asset Status",
    "Asset Group",
];

const REQUIRED_COLUMNS: [&str; 5] = ["Order Type", "Asset Type", "Model", "Location", "Quantity"];

lazy_static! {
    static ref SERIAL_SEPARATOR: Regex = Regex::new(r"[;|\s]+").unwrap();
}

/// BOM-prefixed template so spreadsheet tools detect UTF-8.
pub fn order_template() -> String {
    format!("{}{}", UTF8_BOM, write_document(&ORDER_TEMPLATE_HEADER, &[]))
}

/// Splits a serial cell on `;`, `|` or whitespace.
pub fn split_serials(cell: &str) -> Vec<String> {
    SERIAL_SEPARATOR
        .split(cell.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses an order import file; each data row becomes one order.
pub fn import_orders(
    text: &str,
    actor: &str,
    now: DateTime<Utc>,
    max_rows: usize,
) -> Result<ImportBatch<PreparedOrder>, DomainError> {
    let table = CsvTable::parse(text)?;
    table.require_columns(&REQUIRED_COLUMNS)?;
    if table.len() > max_rows {
        return Err(DomainError::validation(format!(
            "Import is limited to {} rows, file has {}",
            max_rows,
            table.len()
        )));
    }

    let mut batch = ImportBatch::new(table.len());
    for (idx, row) in table.rows().enumerate() {
        let row_number = idx + 1;
        let key = row.opt("Sales Order");

        let prepared = request_from_row(&row)
            .and_then(|req| prepare_order(&req, actor, now).map_err(|e| e.to_string()));
        match prepared {
            Ok(order) => batch.accepted.push(ImportedRow {
                row: row_number,
                record: order,
            }),
            Err(message) => batch.reject(row_number, key, message),
        }
    }
    Ok(batch)
}

fn request_from_row(row: &CsvRow<'_>) -> Result<CreateOrderRequest, String> {
    for column in REQUIRED_COLUMNS {
        if row.get(column).is_empty() {
            return Err(format!("{} is required", column));
        }
    }
    let quantity = row
        .get("Quantity")
        .parse::<i32>()
        .ok()
        .filter(|q| *q > 0)
        .ok_or_else(|| format!("Quantity must be greater than 0: {}", row.get("Quantity")))?;
    if quantity > MAX_ORDER_QUANTITY {
        return Err(format!("Quantity must be at most {}", MAX_ORDER_QUANTITY));
    }

    let serial_numbers = split_serials(row.get("Serial Number"));
    let per_unit = |column: &str| -> Vec<String> {
        row.opt(column)
            .map(|value| vec![value; quantity as usize])
            .unwrap_or_default()
    };

    Ok(CreateOrderRequest {
        order_type: row.get("Order Type").to_string(),
        asset_type: row.get("Asset Type").to_string(),
        model: row.get("Model").to_string(),
        configuration: row.opt("Configuration"),
        product: row.opt("Product"),
        sd_card_size: row.opt("SD Card Size"),
        profile_id: row.opt("Profile ID"),
        quantity,
        warehouse: row.get("Location").to_string(),
        sales_order: row.opt("Sales Order"),
        employee_id: row.opt("Employee ID"),
        employee_name: row.opt("Employee Name"),
        serial_numbers,
        asset_statuses: per_unit("Asset Status"),
        asset_groups: per_unit("Asset Group"),
        asset_conditions: Vec::new(),
        remarks: None,
    })
}
