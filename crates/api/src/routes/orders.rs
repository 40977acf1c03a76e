//! Order, stock and device ledger routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use domain::models::{
    BulkImportResponse, CreateOrderRequest, Device, DeviceQuery, Order, OrderHistoryEntry,
    UserRole,
};
use domain::services::{order_csv, EmployeeStockRow, StockRow};
use persistence::repositories::{DeviceRepository, OrderRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::{record_import_rejections, record_orders_created};
use crate::routes::csv_response;
use crate::services::orders::OrderService;

fn ensure_owner(order: &Order, user_auth: &UserAuth, action: &str) -> Result<(), ApiError> {
    if order.is_owned_by(user_auth.actor()) {
        Ok(())
    } else {
        tracing::warn!(
            order_id = %order.id,
            user_id = %user_auth.user_id,
            "Order {} refused: caller is not the creator",
            action
        );
        Err(ApiError::Forbidden(format!(
            "Only the user who created this order can {} it",
            action
        )))
    }
}

/// GET /api/v1/orders
pub async fn list_orders(
    State(state): State<AppState>,
    _user_auth: UserAuth,
) -> Result<Json<Vec<Order>>, ApiError> {
    let orders = OrderRepository::new(state.pool.clone()).list().await?;
    Ok(Json(orders.into_iter().map(Order::from).collect()))
}

/// Create an order and its device rows.
///
/// POST /api/v1/orders
pub async fn create_order(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    request.validate()?;

    let order = OrderService::new(state.pool.clone())
        .create(&request, user_auth.actor())
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Order rejected");
            e
        })?;

    record_orders_created(order.material_type.as_str(), 1);
    info!(
        order_id = %order.id,
        sales_order = %order.sales_order,
        material_type = order.material_type.as_str(),
        quantity = order.quantity,
        user_id = %user_auth.user_id,
        "Order created"
    );
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/v1/orders/:id
pub async fn get_order(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(OrderService::new(state.pool.clone()).get(id).await?))
}

/// Replace an order. Creator only.
///
/// PUT /api/v1/orders/:id
pub async fn update_order(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<Order>, ApiError> {
    request.validate()?;

    let service = OrderService::new(state.pool.clone());
    let existing = service.get(id).await?;
    ensure_owner(&existing, &user_auth, "edit")?;

    let order = service
        .update(&existing, &request, user_auth.actor())
        .await?;

    info!(order_id = %id, user_id = %user_auth.user_id, "Order updated");
    Ok(Json(order))
}

/// Delete an order and retire its devices. Creator only.
///
/// DELETE /api/v1/orders/:id
pub async fn delete_order(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let existing = OrderService::new(state.pool.clone()).get(id).await?;
    ensure_owner(&existing, &user_auth, "delete")?;

    let deleted = OrderRepository::new(state.pool.clone())
        .delete(&existing, user_auth.actor())
        .await?;
    if !deleted {
        return Err(ApiError::NotFound("Order not found".to_string()));
    }

    info!(order_id = %id, user_id = %user_auth.user_id, "Order deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Snapshots written on create, edit and delete.
///
/// GET /api/v1/orders/:id/history
pub async fn order_history(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<OrderHistoryEntry>>, ApiError> {
    let entries = OrderRepository::new(state.pool.clone()).history(id).await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// Bulk order import from a CSV body. Admins only.
///
/// POST /api/v1/orders/import
pub async fn import_orders(
    State(state): State<AppState>,
    user_auth: UserAuth,
    body: String,
) -> Result<Json<BulkImportResponse>, ApiError> {
    user_auth.require(UserRole::can_import, "Only admins can import orders")?;

    let (response, created) = OrderService::new(state.pool.clone())
        .import(
            &body,
            user_auth.actor(),
            state.config.limits.max_import_rows,
        )
        .await?;

    for order in &created {
        record_orders_created(order.material_type.as_str(), 1);
    }
    record_import_rejections("order", response.errors.len());
    info!(
        processed = response.processed,
        created = response.created,
        failed = response.errors.len(),
        user_id = %user_auth.user_id,
        "Order import completed"
    );
    Ok(Json(response))
}

/// GET /api/v1/orders/template
pub async fn order_template(_user_auth: UserAuth) -> Response {
    csv_response("order_template.csv", order_csv::order_template())
}

/// Stock per warehouse, asset type and model.
///
/// GET /api/v1/stock
pub async fn stock(
    State(state): State<AppState>,
    _user_auth: UserAuth,
) -> Result<Json<Vec<StockRow>>, ApiError> {
    let rows = OrderRepository::new(state.pool.clone()).stock_summary().await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// Dispatched, received and pending quantities per employee.
///
/// GET /api/v1/stock/employees
pub async fn employee_stock(
    State(state): State<AppState>,
    _user_auth: UserAuth,
) -> Result<Json<Vec<EmployeeStockRow>>, ApiError> {
    let rows = OrderRepository::new(state.pool.clone())
        .employee_summary()
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// Device ledger, optionally narrowed by serial or asset type.
///
/// GET /api/v1/devices?serial=
pub async fn list_devices(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Query(query): Query<DeviceQuery>,
) -> Result<Json<Vec<Device>>, ApiError> {
    let devices = DeviceRepository::new(state.pool.clone())
        .list(query.serial.as_deref(), query.asset_type.as_deref())
        .await?;
    Ok(Json(devices.into_iter().map(Device::from).collect()))
}
