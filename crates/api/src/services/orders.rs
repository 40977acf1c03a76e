//! Order writes checked against the device ledger.

use chrono::Utc;
use domain::models::{
    BulkImportError, BulkImportResponse, CreateOrderRequest, Device, Order, SerialState,
};
use domain::services::{latest_states, order_csv, prepare_order, validate_serials, PreparedOrder};
use domain::DomainError;
use persistence::repositories::{DeviceRepository, OrderRepository};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ApiError;

pub struct OrderService {
    orders: OrderRepository,
    devices: DeviceRepository,
}

impl OrderService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool.clone()),
            devices: DeviceRepository::new(pool),
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Order, ApiError> {
        self.orders
            .find_by_id(id)
            .await?
            .map(Order::from)
            .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))
    }

    /// Latest ledger state of the prepared serials.
    ///
    /// Devices belonging to `replacing` are ignored, since an edit retires them.
    async fn latest_for(
        &self,
        prepared: &PreparedOrder,
        replacing: Option<Uuid>,
    ) -> Result<HashMap<String, SerialState>, ApiError> {
        if !prepared.tracks_serials || prepared.order.serial_numbers.is_empty() {
            return Ok(HashMap::new());
        }

        let ledger: Vec<Device> = self
            .devices
            .find_by_serials(&prepared.order.serial_numbers)
            .await?
            .into_iter()
            .map(Device::from)
            .filter(|d| replacing.is_none() || d.order_id != replacing)
            .collect();
        Ok(latest_states(&ledger))
    }

    /// Validates and writes a new order with its devices.
    pub async fn create(&self, request: &CreateOrderRequest, actor: &str) -> Result<Order, ApiError> {
        let prepared = prepare_order(request, actor, Utc::now())?;
        let latest = self.latest_for(&prepared, None).await?;
        check_serials(&prepared, &latest)?;
        self.write(&prepared).await
    }

    async fn write(&self, prepared: &PreparedOrder) -> Result<Order, ApiError> {
        let created = self
            .orders
            .create_with_devices(&prepared.order, &prepared.devices())
            .await?;
        Ok(created.into())
    }

    /// Replaces an order's contents, keeping its identity and creator.
    pub async fn update(
        &self,
        existing: &Order,
        request: &CreateOrderRequest,
        actor: &str,
    ) -> Result<Order, ApiError> {
        let mut prepared = prepare_order(request, actor, Utc::now())?;
        prepared.order.id = existing.id;
        prepared.order.created_at = existing.created_at;
        prepared.order.created_by = existing.created_by.clone();
        if is_blank(request.sales_order.as_deref()) {
            prepared.order.sales_order = existing.sales_order.clone();
        }

        let latest = self.latest_for(&prepared, Some(existing.id)).await?;
        check_serials(&prepared, &latest)?;

        self.orders
            .update_with_devices(&prepared.order, &prepared.devices(), actor)
            .await?
            .map(Order::from)
            .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))
    }

    /// Imports an order CSV row by row. Each accepted row is written before
    /// the next is checked, so later rows see earlier rows' serials.
    ///
    /// A row that fails to save is reported against its row number and the
    /// remaining rows still run.
    pub async fn import(
        &self,
        text: &str,
        actor: &str,
        max_rows: usize,
    ) -> Result<(BulkImportResponse, Vec<Order>), ApiError> {
        let batch = order_csv::import_orders(text, actor, Utc::now(), max_rows)?;
        let mut errors = batch.errors;
        let mut created = Vec::new();

        for imported in batch.accepted {
            let key = Some(imported.record.order.sales_order.clone());
            let latest = match self.latest_for(&imported.record, None).await {
                Ok(latest) => latest,
                Err(e) => {
                    errors.push(store_failure(imported.row, key, &e));
                    continue;
                }
            };
            if let Err(e) = check_serials(&imported.record, &latest) {
                errors.push(BulkImportError::new(imported.row, key, e.to_string()));
                continue;
            }
            match self.write(&imported.record).await {
                Ok(order) => created.push(order),
                Err(e) => errors.push(store_failure(imported.row, key, &e)),
            }
        }
        errors.sort_by_key(|e| e.row);

        let response = BulkImportResponse {
            processed: batch.processed,
            created: created.len(),
            errors,
        };
        Ok((response, created))
    }
}

/// Row error for an import row the store refused. Internal details stay in
/// the log.
fn store_failure(row: usize, key: Option<String>, err: &ApiError) -> BulkImportError {
    tracing::warn!(row, error = %err, "Order import row failed to save");
    let message = match err {
        ApiError::Conflict(msg)
        | ApiError::Validation(msg)
        | ApiError::NotFound(msg)
        | ApiError::InvalidFields(msg, _) => msg.clone(),
        _ => "Order could not be saved".to_string(),
    };
    BulkImportError::new(row, key, message)
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

fn check_serials(
    prepared: &PreparedOrder,
    latest: &HashMap<String, SerialState>,
) -> Result<(), DomainError> {
    if !prepared.tracks_serials {
        return Ok(());
    }
    validate_serials(
        &prepared.order.serial_numbers,
        prepared.order.material_type,
        &prepared.order.warehouse,
        latest,
    )
}
