//! CSV mapping for assets: template, exports and bulk import.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::DomainError;
use crate::models::{Asset, AssetStatus, ImportBatch, ImportedRow};
use crate::services::asset_rules::check_uniqueness;
use shared::csv::{write_document, CsvRow, CsvTable};
use shared::validation::parse_flexible_date;

/// Header of the import template and the template-format export.
pub const TEMPLATE_HEADER: [&str; 12] = [
    "Asset ID[*]",
    "Asset Name[*]",
    "Asset Type[*]",
    "Brand[*]",
    "Configuration",
    "Serial Number[*]",
    "Provider",
    "Warranty Start",
    "Warranty End",
    "Location[*]",
    "Employee ID",
    "Employee Name",
];

/// Header of the full dashboard export.
pub const FULL_EXPORT_HEADER: [&str; 24] = [
    "Asset ID",
    "Asset Name",
    "Asset Type",
    "Brand",
    "Configuration",
    "Serial Number",
    "Provider",
    "Warranty Start",
    "Warranty End",
    "Warranty Status",
    "Location",
    "Status",
    "Assigned To",
    "Employee ID",
    "Assigned Date",
    "Return Date",
    "Received By",
    "Asset Condition",
    "Recovery Amount",
    "Remarks",
    "Created By",
    "Created At",
    "Updated By",
    "Updated At",
];

/// Columns that must be present and non-empty on every imported row.
const REQUIRED_COLUMNS: [&str; 6] = [
    "Asset ID",
    "Asset Name",
    "Asset Type",
    "Brand",
    "Serial Number",
    "Location",
];

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn date(value: Option<NaiveDate>) -> String {
    value.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

fn timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Import template, optionally with one example row.
pub fn template(with_example: bool) -> String {
    let rows: Vec<Vec<String>> = if with_example {
        vec![[
            "AST-001",
            "MacBook Pro 14",
            "Laptop",
            "Apple",
            "M3 Pro / 18GB / 512GB",
            "C02XK1ABCD12",
            "Apple Store",
            "2025-01-15",
            "2028-01-14",
            "Bengaluru",
            "",
            "",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()]
    } else {
        Vec::new()
    };
    write_document(&TEMPLATE_HEADER, &rows)
}

/// Exports assets in the import template layout.
pub fn export_template<'a, I>(assets: I) -> String
where
    I: IntoIterator<Item = &'a Asset>,
{
    let rows: Vec<Vec<String>> = assets
        .into_iter()
        .map(|a| {
            vec![
                a.asset_id.clone(),
                a.name.clone(),
                a.asset_type.clone(),
                a.brand.clone(),
                opt(&a.configuration),
                a.serial_number.clone(),
                opt(&a.provider),
                date(a.warranty_start),
                date(a.warranty_end),
                opt(&a.location),
                opt(&a.employee_id),
                opt(&a.assigned_to),
            ]
        })
        .collect();
    write_document(&TEMPLATE_HEADER, &rows)
}

/// Exports every asset attribute, including derived warranty status.
pub fn export_full<'a, I>(assets: I, today: NaiveDate) -> String
where
    I: IntoIterator<Item = &'a Asset>,
{
    let rows: Vec<Vec<String>> = assets
        .into_iter()
        .map(|a| {
            vec![
                a.asset_id.clone(),
                a.name.clone(),
                a.asset_type.clone(),
                a.brand.clone(),
                opt(&a.configuration),
                a.serial_number.clone(),
                opt(&a.provider),
                date(a.warranty_start),
                date(a.warranty_end),
                a.warranty_status(today).as_str().to_string(),
                opt(&a.location),
                a.status.as_str().to_string(),
                opt(&a.assigned_to),
                opt(&a.employee_id),
                timestamp(a.assigned_date),
                timestamp(a.return_date),
                opt(&a.received_by),
                opt(&a.asset_condition),
                a.recovery_amount.map(|v| v.to_string()).unwrap_or_default(),
                opt(&a.remarks),
                opt(&a.created_by),
                timestamp(Some(a.created_at)),
                opt(&a.updated_by),
                timestamp(Some(a.updated_at)),
            ]
        })
        .collect();
    write_document(&FULL_EXPORT_HEADER, &rows)
}

/// Parses and validates an asset import file.
///
/// Rows are checked against `existing` and against rows accepted earlier in
/// the same file. Invalid rows are reported and never block valid ones.
pub fn import_assets(
    text: &str,
    existing: &[Asset],
    actor: &str,
    now: DateTime<Utc>,
    max_rows: usize,
) -> Result<ImportBatch<Asset>, DomainError> {
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
    let mut seen: Vec<(String, String)> = Vec::new();

    for (idx, row) in table.rows().enumerate() {
        let row_number = idx + 1;
        let key = row.opt("Asset ID");

        let asset = match asset_from_row(&row, actor, now) {
            Ok(asset) => asset,
            Err(message) => {
                batch.reject(row_number, key, message);
                continue;
            }
        };

        let known = existing
            .iter()
            .map(|a| (a.asset_id.as_str(), a.serial_number.as_str()))
            .chain(seen.iter().map(|(id, serial)| (id.as_str(), serial.as_str())));
        if let Some(message) = check_uniqueness(&asset.asset_id, &asset.serial_number, known) {
            batch.reject(row_number, key, message);
            continue;
        }

        seen.push((asset.asset_id.clone(), asset.serial_number.clone()));
        batch.accepted.push(ImportedRow {
            row: row_number,
            record: asset,
        });
    }

    Ok(batch)
}

fn asset_from_row(row: &CsvRow<'_>, actor: &str, now: DateTime<Utc>) -> Result<Asset, String> {
    for column in REQUIRED_COLUMNS {
        if row.get(column).is_empty() {
            return Err(format!("{} is required", column));
        }
    }

    let warranty_start = parse_date_cell(row, "Warranty Start")?;
    let warranty_end = parse_date_cell(row, "Warranty End")?;
    shared::validation::validate_date_window(warranty_start, warranty_end)
        .map_err(|e| e.message.map(|m| m.to_string()).unwrap_or_else(|| e.code.to_string()))?;

    let mut asset = Asset::new(
        row.get("Asset ID"),
        row.get("Asset Name"),
        row.get("Asset Type"),
        row.get("Brand"),
        row.get("Serial Number"),
        now,
    );
    asset.configuration = row.opt("Configuration");
    asset.provider = row.opt("Provider");
    asset.location = row.opt("Location");
    asset.warranty_start = warranty_start;
    asset.warranty_end = warranty_end;
    asset.created_by = Some(actor.to_string());
    asset.updated_by = Some(actor.to_string());

    let employee_id = row.opt("Employee ID");
    let employee_name = row.opt("Employee Name");
    if let (Some(id), Some(name)) = (employee_id, employee_name) {
        asset.status = AssetStatus::Assigned;
        asset.employee_id = Some(id);
        asset.assigned_to = Some(name);
        asset.assigned_date = Some(now);
    }

    match asset.check_lengths() {
        Some(message) => Err(message),
        None => Ok(asset),
    }
}

fn parse_date_cell(row: &CsvRow<'_>, column: &str) -> Result<Option<NaiveDate>, String> {
    let raw = row.get(column);
    if raw.is_empty() {
        return Ok(None);
    }
    parse_flexible_date(raw)
        .map(Some)
        .ok_or_else(|| format!("Invalid {} date: {}", column, raw))
}
