//! Employee entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the employees table.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeEntity {
    pub id: Uuid,
    pub employee_id: String,
    pub employee_name: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EmployeeEntity> for domain::models::Employee {
    fn from(entity: EmployeeEntity) -> Self {
        Self {
            id: entity.id,
            employee_id: entity.employee_id,
            employee_name: entity.employee_name,
            email: entity.email,
            role: entity.role,
            department: entity.department,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
