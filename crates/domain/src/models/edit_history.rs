//! Immutable per-field edit history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of record an edit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditEntity {
    Asset,
    Order,
    Employee,
}

impl EditEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditEntity::Asset => "asset",
            EditEntity::Order => "order",
            EditEntity::Employee => "employee",
        }
    }
}

/// One recorded field change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditHistoryEntry {
    pub id: i64,
    pub entity: EditEntity,
    pub entity_id: Uuid,
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub edited_by: Option<String>,
    pub edited_at: DateTime<Utc>,
}
