//! CSV mapping for employees.

use std::collections::HashSet;

use crate::error::DomainError;
use crate::models::{Employee, ImportBatch, ImportedRow, UpsertEmployeeRequest};
use shared::csv::{write_document, CsvTable};

pub const EMPLOYEE_HEADER: [&str; 5] = ["employee_id", "employee_name", "email", "role", "department"];

pub fn employee_template() -> String {
    write_document(&EMPLOYEE_HEADER, &[])
}

pub fn export_employees<'a, I>(employees: I) -> String
where
    I: IntoIterator<Item = &'a Employee>,
{
    let rows: Vec<Vec<String>> = employees
        .into_iter()
        .map(|e| {
            vec![
                e.employee_id.clone(),
                e.employee_name.clone(),
                e.email.clone().unwrap_or_default(),
                e.role.clone().unwrap_or_default(),
                e.department.clone().unwrap_or_default(),
            ]
        })
        .collect();
    write_document(&EMPLOYEE_HEADER, &rows)
}

/// Parses an employee import file, rejecting rows without an id or name and
/// ids that already exist (in the store or earlier in the file).
pub fn import_employees(
    text: &str,
    existing_ids: &HashSet<String>,
    max_rows: usize,
) -> Result<ImportBatch<UpsertEmployeeRequest>, DomainError> {
    let table = CsvTable::parse(text)?;
    table.require_columns(&["employee_id", "employee_name"])?;
    if table.len() > max_rows {
        return Err(DomainError::validation(format!(
            "Import is limited to {} rows, file has {}",
            max_rows,
            table.len()
        )));
    }

    let mut batch = ImportBatch::new(table.len());
    let mut seen: HashSet<String> = HashSet::new();

    for (idx, row) in table.rows().enumerate() {
        let row_number = idx + 1;
        let employee_id = row.get("employee_id");
        let key = row.opt("employee_id");

        if employee_id.is_empty() {
            batch.reject(row_number, key, "Employee ID is required");
            continue;
        }
        if row.get("employee_name").is_empty() {
            batch.reject(row_number, key, "Employee name is required");
            continue;
        }
        if existing_ids.contains(employee_id) || seen.contains(employee_id) {
            batch.reject(
                row_number,
                key,
                format!("Employee ID {} already exists", employee_id),
            );
            continue;
        }

        seen.insert(employee_id.to_string());
        batch.accepted.push(ImportedRow {
            row: row_number,
            record: UpsertEmployeeRequest {
                employee_id: employee_id.to_string(),
                employee_name: row.get("employee_name").to_string(),
                email: row.opt("email"),
                role: row.opt("role"),
                department: row.opt("department"),
            },
        });
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_template_header() {
        assert_eq!(
            employee_template(),
            "employee_id,employee_name,email,role,department\n"
        );
    }

    #[test]
    fn test_export() {
        let now = Utc::now();
        let employee = Employee {
            id: Uuid::new_v4(),
            employee_id: "E1".into(),
            employee_name: "Rao, Asha".into(),
            email: None,
            role: Some("Engineer".into()),
            department: None,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(
            export_employees(&[employee]),
            "employee_id,employee_name,email,role,department\nE1,\"Rao, Asha\",,Engineer,\n"
        );
    }

    #[test]
    fn test_import_reports_bad_rows() {
        let existing: HashSet<String> = ["E1".to_string()].into_iter().collect();
        let text = "employee_id,employee_name,email,role,department\n\
                    E1,Dup,,,\n\
                    ,No Id,,,\n\
                    E2,,,,\n\
                    E3,Asha,asha@example.com,Engineer,IT\n\
                    E3,Again,,,\n";
        let batch = import_employees(text, &existing, 100).unwrap();

        assert_eq!(batch.processed, 5);
        assert_eq!(batch.accepted.len(), 1);
        assert_eq!(batch.accepted[0].record.department.as_deref(), Some("IT"));

        let errors: Vec<_> = batch.errors.iter().map(|e| (e.row, e.error.as_str())).collect();
        assert_eq!(
            errors,
            vec![
                (1, "Employee ID E1 already exists"),
                (2, "Employee ID is required"),
                (3, "Employee name is required"),
                (5, "Employee ID E3 already exists"),
            ]
        );
    }
}
