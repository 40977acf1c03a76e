//! Employee reference data routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use domain::models::{
    BulkImportResponse, EditEntity, Employee, FieldChange, UpsertEmployeeRequest, UserRole,
};
use domain::services::{employee_csv, record_changes};
use persistence::repositories::{EditHistoryRepository, EmployeeRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_import_rejections;
use crate::routes::csv_response;

/// Per-field differences between two versions of an employee.
fn employee_changes(before: &Employee, after: &Employee) -> Vec<FieldChange> {
    let fields: [(&str, Option<&str>, Option<&str>); 5] = [
        (
            "employee_id",
            Some(before.employee_id.as_str()),
            Some(after.employee_id.as_str()),
        ),
        (
            "employee_name",
            Some(before.employee_name.as_str()),
            Some(after.employee_name.as_str()),
        ),
        ("email", before.email.as_deref(), after.email.as_deref()),
        ("role", before.role.as_deref(), after.role.as_deref()),
        (
            "department",
            before.department.as_deref(),
            after.department.as_deref(),
        ),
    ];

    fields
        .into_iter()
        .filter(|(_, old, new)| old != new)
        .map(|(field, old, new)| FieldChange {
            field: field.to_string(),
            old_value: old.map(str::to_string),
            new_value: new.map(str::to_string),
        })
        .collect()
}

/// GET /api/v1/employees
pub async fn list_employees(
    State(state): State<AppState>,
    _user_auth: UserAuth,
) -> Result<Json<Vec<Employee>>, ApiError> {
    let employees = EmployeeRepository::new(state.pool.clone()).list().await?;
    Ok(Json(employees.into_iter().map(Employee::from).collect()))
}

/// POST /api/v1/employees
pub async fn create_employee(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<UpsertEmployeeRequest>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    let request = request.normalized();
    request.validate()?;

    let employee: Employee = EmployeeRepository::new(state.pool.clone())
        .create(&request)
        .await?
        .into();

    info!(
        id = %employee.id,
        employee_id = %employee.employee_id,
        user_id = %user_auth.user_id,
        "Employee created"
    );
    Ok((StatusCode::CREATED, Json(employee)))
}

/// PUT /api/v1/employees/:id
pub async fn update_employee(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<UpsertEmployeeRequest>,
) -> Result<Json<Employee>, ApiError> {
    let request = request.normalized();
    request.validate()?;

    let repo = EmployeeRepository::new(state.pool.clone());
    let before: Employee = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?
        .into();
    let after: Employee = repo
        .update(id, &request)
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found".to_string()))?
        .into();

    let changes = employee_changes(&before, &after);
    record_changes(
        &EditHistoryRepository::new(state.pool.clone()),
        EditEntity::Employee,
        id,
        &changes,
        user_auth.actor(),
    )
    .await?;

    info!(id = %id, changed = changes.len(), user_id = %user_auth.user_id, "Employee updated");
    Ok(Json(after))
}

/// Delete an employee. Super admins only.
///
/// DELETE /api/v1/employees/:id
pub async fn delete_employee(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    user_auth.require(
        UserRole::can_delete_employees,
        "Only super admins can delete employees",
    )?;

    if !EmployeeRepository::new(state.pool.clone()).delete(id).await? {
        return Err(ApiError::NotFound("Employee not found".to_string()));
    }

    info!(id = %id, user_id = %user_auth.user_id, "Employee deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/employees/export
pub async fn export_employees(
    State(state): State<AppState>,
    _user_auth: UserAuth,
) -> Result<Response, ApiError> {
    let employees: Vec<Employee> = EmployeeRepository::new(state.pool.clone())
        .list()
        .await?
        .into_iter()
        .map(Employee::from)
        .collect();
    Ok(csv_response(
        "employees.csv",
        employee_csv::export_employees(&employees),
    ))
}

/// GET /api/v1/employees/template
pub async fn employee_template(_user_auth: UserAuth) -> Response {
    csv_response("employee_template.csv", employee_csv::employee_template())
}

/// Bulk employee import from a CSV body. Admins only.
///
/// POST /api/v1/employees/import
pub async fn import_employees(
    State(state): State<AppState>,
    user_auth: UserAuth,
    body: String,
) -> Result<Json<BulkImportResponse>, ApiError> {
    user_auth.require(UserRole::can_import, "Only admins can import employees")?;

    let repo = EmployeeRepository::new(state.pool.clone());
    let existing = repo.existing_ids().await?;
    let batch =
        employee_csv::import_employees(&body, &existing, state.config.limits.max_import_rows)?;

    let records: Vec<UpsertEmployeeRequest> =
        batch.accepted.into_iter().map(|r| r.record).collect();
    let created = repo.create_many(&records).await?;

    let response = BulkImportResponse {
        processed: batch.processed,
        created: created as usize,
        errors: batch.errors,
    };
    record_import_rejections("employee", response.errors.len());
    info!(
        processed = response.processed,
        created = response.created,
        failed = response.errors.len(),
        user_id = %user_auth.user_id,
        "Employee import completed"
    );
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn employee() -> Employee {
        let now = Utc::now();
        Employee {
            id: Uuid::new_v4(),
            employee_id: "E1".into(),
            employee_name: "Asha Rao".into(),
            email: None,
            role: Some("Engineer".into()),
            department: Some("IT".into()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_employee_changes() {
        let before = employee();
        let mut after = before.clone();
        after.email = Some("asha@example.com".into());
        after.department = None;

        let changes = employee_changes(&before, &after);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].field, "email");
        assert_eq!(changes[0].old_value, None);
        assert_eq!(changes[0].new_value.as_deref(), Some("asha@example.com"));
        assert_eq!(changes[1].field, "department");
        assert_eq!(changes[1].new_value, None);
    }

    #[test]
    fn test_unchanged_employee_has_no_changes() {
        let e = employee();
        assert!(employee_changes(&e, &e.clone()).is_empty());
    }
}
