//! Edit history entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{EditEntity, EditHistoryEntry};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the edit_history table.
#[derive(Debug, Clone, FromRow)]
pub struct EditHistoryEntity {
    pub id: i64,
    pub entity: String,
    pub entity_id: Uuid,
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub edited_by: Option<String>,
    pub edited_at: DateTime<Utc>,
}

impl From<EditHistoryEntity> for EditHistoryEntry {
    fn from(row: EditHistoryEntity) -> Self {
        let entity = match row.entity.as_str() {
            "order" => EditEntity::Order,
            "employee" => EditEntity::Employee,
            _ => EditEntity::Asset,
        };
        Self {
            id: row.id,
            entity,
            entity_id: row.entity_id,
            field: row.field,
            old_value: row.old_value,
            new_value: row.new_value,
            edited_by: row.edited_by,
            edited_at: row.edited_at,
        }
    }
}
