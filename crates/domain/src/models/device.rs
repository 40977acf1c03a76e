//! Serialized unit records created from orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::order::MaterialType;

/// One serialized unit of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: Uuid,
    pub serial_number: String,
    pub asset_type: String,
    pub model: String,
    pub warehouse: String,
    pub material_type: MaterialType,
    pub status: Option<String>,
    pub asset_group: Option<String>,
    pub asset_condition: Option<String>,
    pub far_code: Option<String>,
    pub order_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Device {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Most recent known position of a serial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerialState {
    pub serial_number: String,
    pub warehouse: String,
    pub material_type: MaterialType,
    pub updated_at: DateTime<Utc>,
}

impl From<&Device> for SerialState {
    fn from(device: &Device) -> Self {
        Self {
            serial_number: device.serial_number.clone(),
            warehouse: device.warehouse.clone(),
            material_type: device.material_type,
            updated_at: device.updated_at,
        }
    }
}

/// Query parameters for device lookups.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceQuery {
    pub serial: Option<String>,
    pub asset_type: Option<String>,
}
