//! Order entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::{MaterialType, Order, OrderHistoryEntry};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the orders table.
#[derive(Debug, Clone, FromRow)]
pub struct OrderEntity {
    pub id: Uuid,
    pub order_type: String,
    pub material_type: String,
    pub asset_type: String,
    pub model: String,
    pub configuration: Option<String>,
    pub product: Option<String>,
    pub sd_card_size: Option<String>,
    pub profile_id: Option<String>,
    pub quantity: i32,
    pub warehouse: String,
    pub sales_order: String,
    pub employee_id: Option<String>,
    pub employee_name: Option<String>,
    pub serial_numbers: Vec<String>,
    pub remarks: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const ORDER_COLUMNS: &str = "id, order_type, material_type, asset_type, model, configuration, \
     product, sd_card_size, profile_id, quantity, warehouse, sales_order, employee_id, employee_name, \
     serial_numbers, remarks, created_by, created_at, updated_at";

impl From<OrderEntity> for Order {
    fn from(entity: OrderEntity) -> Self {
        let material_type = entity
            .material_type
            .parse()
            .unwrap_or_else(|_| MaterialType::from_order_type(&entity.order_type));
        Self {
            id: entity.id,
            order_type: entity.order_type,
            material_type,
            asset_type: entity.asset_type,
            model: entity.model,
            configuration: entity.configuration,
            product: entity.product,
            sd_card_size: entity.sd_card_size,
            profile_id: entity.profile_id,
            quantity: entity.quantity,
            warehouse: entity.warehouse,
            sales_order: entity.sales_order,
            employee_id: entity.employee_id,
            employee_name: entity.employee_name,
            serial_numbers: entity.serial_numbers,
            remarks: entity.remarks,
            created_by: entity.created_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the order_history table.
#[derive(Debug, Clone, FromRow)]
pub struct OrderHistoryEntity {
    pub id: i64,
    pub order_id: Uuid,
    pub action: String,
    pub snapshot: serde_json::Value,
    pub actor: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<OrderHistoryEntity> for OrderHistoryEntry {
    fn from(entity: OrderHistoryEntity) -> Self {
        Self {
            id: entity.id,
            order_id: entity.order_id,
            action: entity.action,
            snapshot: entity.snapshot,
            actor: entity.actor,
            created_at: entity.created_at,
        }
    }
}

/// Aggregate row from the stock summary query.
#[derive(Debug, Clone, FromRow)]
pub struct StockRowEntity {
    pub warehouse: String,
    pub asset_type: String,
    pub model: String,
    pub inward: i64,
    pub outward: i64,
}

impl From<StockRowEntity> for domain::services::StockRow {
    fn from(entity: StockRowEntity) -> Self {
        Self {
            stock: entity.inward - entity.outward,
            warehouse: entity.warehouse,
            asset_type: entity.asset_type,
            model: entity.model,
            inward: entity.inward,
            outward: entity.outward,
        }
    }
}

/// Aggregate row from the employee summary query.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeStockEntity {
    pub employee_id: String,
    pub employee_name: Option<String>,
    pub asset_type: String,
    pub model: String,
    pub dispatched: i64,
    pub received: i64,
}

impl From<EmployeeStockEntity> for domain::services::EmployeeStockRow {
    fn from(entity: EmployeeStockEntity) -> Self {
        Self {
            pending: entity.dispatched - entity.received,
            employee_id: entity.employee_id,
            employee_name: entity.employee_name,
            asset_type: entity.asset_type,
            model: entity.model,
            dispatched: entity.dispatched,
            received: entity.received,
        }
    }
}
