//! Order preparation: schema checks, serial counts and device expansion.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;
use crate::models::{
    generate_sales_order_code, CreateOrderRequest, Device, Order, OrderLine, MAX_ORDER_QUANTITY,
};
use crate::services::schema::{missing_required, AssetTypeSchema, OrderTypeSchema};

/// An order ready to be written, with its per-unit line.
#[derive(Debug, Clone)]
pub struct PreparedOrder {
    pub order: Order,
    pub line: OrderLine,
    pub tracks_serials: bool,
}

impl PreparedOrder {
    /// One device row per serialized unit.
    pub fn devices(&self) -> Vec<Device> {
        if !self.tracks_serials {
            return Vec::new();
        }
        self.line
            .units()
            .filter(|unit| !unit.serial_number.is_empty())
            .map(|unit| Device {
                id: Uuid::new_v4(),
                serial_number: unit.serial_number.to_string(),
                asset_type: self.order.asset_type.clone(),
                model: self.order.model.clone(),
                warehouse: self.order.warehouse.clone(),
                material_type: self.order.material_type,
                status: non_empty(unit.status),
                asset_group: non_empty(unit.group),
                asset_condition: non_empty(unit.condition),
                far_code: None,
                order_id: Some(self.order.id),
                created_at: self.order.created_at,
                updated_at: self.order.updated_at,
                deleted_at: None,
            })
            .collect()
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Validates a create request against its order-type schema and serial rules.
///
/// Serial movement checks against existing stock happen separately, since
/// they need the device ledger.
pub fn prepare_order(
    req: &CreateOrderRequest,
    actor: &str,
    now: DateTime<Utc>,
) -> Result<PreparedOrder, DomainError> {
    let order_schema = OrderTypeSchema::for_type(&req.order_type);
    let missing = missing_required(&order_schema.required, |field| match field {
        "order_type" => Some(req.order_type.clone()),
        "asset_type" => Some(req.asset_type.clone()),
        "model" => Some(req.model.clone()),
        "warehouse" => Some(req.warehouse.clone()),
        "quantity" => (req.quantity > 0).then(|| req.quantity.to_string()),
        "employee_id" => req.employee_id.clone(),
        "employee_name" => req.employee_name.clone(),
        _ => None,
    });
    if let Some(field) = missing.first() {
        return Err(DomainError::validation(format!(
            "{} is required",
            order_field_label(field)
        )));
    }

    if req.quantity > MAX_ORDER_QUANTITY {
        return Err(DomainError::validation(format!(
            "Quantity must be at most {}",
            MAX_ORDER_QUANTITY
        )));
    }
    if let Some(message) = check_lengths(req) {
        return Err(DomainError::validation(message));
    }

    let type_schema = AssetTypeSchema::for_type(&req.asset_type);
    let line = req.line();
    if type_schema.tracks_serials {
        let filled = line.filled_serials().len();
        if filled != line.quantity() {
            return Err(DomainError::validation(format!(
                "Expected {} serial numbers for quantity {}, got {}",
                line.quantity(),
                line.quantity(),
                filled
            )));
        }
    }

    let sales_order = req
        .sales_order
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| generate_sales_order_code(now));

    let order = Order {
        id: Uuid::new_v4(),
        order_type: req.order_type.trim().to_string(),
        material_type: req.material_type(),
        asset_type: req.asset_type.trim().to_string(),
        model: req.model.trim().to_string(),
        configuration: req.configuration.clone(),
        product: req.product.clone(),
        sd_card_size: req.sd_card_size.clone(),
        profile_id: req.profile_id.clone(),
        quantity: req.quantity,
        warehouse: req.warehouse.trim().to_string(),
        sales_order,
        employee_id: req.employee_id.as_deref().and_then(non_empty),
        employee_name: req.employee_name.as_deref().and_then(non_empty),
        serial_numbers: if type_schema.tracks_serials {
            line.filled_serials()
        } else {
            Vec::new()
        },
        remarks: req.remarks.clone(),
        created_by: Some(actor.to_string()),
        created_at: now,
        updated_at: now,
    };

    Ok(PreparedOrder {
        order,
        line,
        tracks_serials: type_schema.tracks_serials,
    })
}

/// First value wider than its `orders` or `devices` column.
fn check_lengths(req: &CreateOrderRequest) -> Option<String> {
    let scalars = [
        ("Order Type", Some(req.order_type.as_str()), 64),
        ("Asset Type", Some(req.asset_type.as_str()), 100),
        ("Model", Some(req.model.as_str()), 200),
        ("Product", req.product.as_deref(), 200),
        ("SD Card Size", req.sd_card_size.as_deref(), 50),
        ("Profile ID", req.profile_id.as_deref(), 100),
        ("Location", Some(req.warehouse.as_str()), 200),
        ("Sales Order", req.sales_order.as_deref(), 64),
        ("Employee ID", req.employee_id.as_deref(), 64),
        ("Employee Name", req.employee_name.as_deref(), 200),
    ];
    let units = [
        ("Serial Number", &req.serial_numbers, 128),
        ("Asset Status", &req.asset_statuses, 32),
        ("Asset Group", &req.asset_groups, 100),
        ("Asset Condition", &req.asset_conditions, 100),
    ];

    let too_long = |value: &str, max: usize| value.trim().chars().count() > max;
    let label = scalars
        .iter()
        .find(|(_, value, max)| value.map(|v| too_long(v, *max)).unwrap_or(false))
        .map(|(label, _, max)| (*label, *max))
        .or_else(|| {
            units
                .iter()
                .find(|(_, values, max)| values.iter().any(|v| too_long(v, *max)))
                .map(|(label, _, max)| (*label, *max))
        });
    label.map(|(label, max)| format!("{} must be at most {} characters", label, max))
}

fn order_field_label(field: &str) -> &str {
    match field {
        "order_type" => "Order Type",
        "asset_type" => "Asset Type",
        "model" => "Model",
        "warehouse" => "Location",
        "quantity" => "Quantity",
        "employee_id" => "Employee ID",
        "employee_name" => "Employee Name",
        other => other,
    }
}
