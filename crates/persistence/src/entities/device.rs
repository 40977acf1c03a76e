//! Device entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Device, MaterialType};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the devices table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceEntity {
    pub id: Uuid,
    pub serial_number: String,
    pub asset_type: String,
    pub model: String,
    pub warehouse: String,
    pub material_type: String,
    pub status: Option<String>,
    pub asset_group: Option<String>,
    pub asset_condition: Option<String>,
    pub far_code: Option<String>,
    pub order_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

pub const DEVICE_COLUMNS: &str = "id, serial_number, asset_type, model, warehouse, material_type, \
     status, asset_group, asset_condition, far_code, order_id, created_at, updated_at, deleted_at";

impl From<DeviceEntity> for Device {
    fn from(entity: DeviceEntity) -> Self {
        Self {
            id: entity.id,
            serial_number: entity.serial_number,
            asset_type: entity.asset_type,
            model: entity.model,
            warehouse: entity.warehouse,
            material_type: entity.material_type.parse().unwrap_or(MaterialType::Inward),
            status: entity.status,
            asset_group: entity.asset_group,
            asset_condition: entity.asset_condition,
            far_code: entity.far_code,
            order_id: entity.order_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            deleted_at: entity.deleted_at,
        }
    }
}
