//! Employee reference records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub employee_id: String,
    pub employee_name: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating or updating an employee.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertEmployeeRequest {
    #[validate(custom(function = "shared::validation::validate_not_blank", message = "Employee ID is required"))]
    #[validate(length(max = 64, message = "Employee ID must be at most 64 characters"))]
    pub employee_id: String,

    #[validate(custom(function = "shared::validation::validate_not_blank", message = "Employee name is required"))]
    #[validate(length(max = 200, message = "Employee name must be at most 200 characters"))]
    pub employee_name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    pub role: Option<String>,
    pub department: Option<String>,
}

impl UpsertEmployeeRequest {
    /// Trims identifiers and drops empty optional values.
    pub fn normalized(mut self) -> Self {
        self.employee_id = self.employee_id.trim().to_string();
        self.employee_name = self.employee_name.trim().to_string();
        self.email = non_empty(self.email);
        self.role = non_empty(self.role);
        self.department = non_empty(self.department);
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;

    fn request() -> UpsertEmployeeRequest {
        UpsertEmployeeRequest {
            employee_id: " E-204 ".into(),
            employee_name: Name().fake(),
            email: Some(SafeEmail().fake()),
            role: Some("  ".into()),
            department: Some("Field Ops".into()),
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_blank_id_rejected() {
        let mut req = request();
        req.employee_id = "   ".into();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("employee_id"));
    }

    #[test]
    fn test_normalized_trims_and_drops_empty() {
        let req = request().normalized();
        assert_eq!(req.employee_id, "E-204");
        assert_eq!(req.role, None);
        assert_eq!(req.department.as_deref(), Some("Field Ops"));
    }
}
