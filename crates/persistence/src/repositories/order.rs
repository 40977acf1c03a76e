//! Order repository for database operations.
//!
//! An order, its devices and its history row are always written in one
//! transaction.

use domain::models::{Device, Order};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::{
    EmployeeStockEntity, OrderEntity, OrderHistoryEntity, StockRowEntity, ORDER_COLUMNS,
};
use crate::metrics::QueryTimer;

/// Repository for orders and their devices.
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All orders, newest first.
    pub async fn list(&self) -> Result<Vec<OrderEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_orders");
        let sql = format!("SELECT {} FROM orders ORDER BY created_at DESC", ORDER_COLUMNS);
        let result = sqlx::query_as::<_, OrderEntity>(&sql)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<OrderEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_order_by_id");
        let sql = format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS);
        let result = sqlx::query_as::<_, OrderEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Insert an order with its devices and a "created" history row.
    pub async fn create_with_devices(
        &self,
        order: &Order,
        devices: &[Device],
    ) -> Result<OrderEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_order");
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO orders (
                id, order_type, material_type, asset_type, model, configuration, product,
                sd_card_size, profile_id, quantity, warehouse, sales_order, employee_id,
                employee_name, serial_numbers, remarks, created_by, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING {}
            "#,
            ORDER_COLUMNS
        );
        let row = sqlx::query_as::<_, OrderEntity>(&sql)
            .bind(order.id)
            .bind(&order.order_type)
            .bind(order.material_type.as_str())
            .bind(&order.asset_type)
            .bind(&order.model)
            .bind(&order.configuration)
            .bind(&order.product)
            .bind(&order.sd_card_size)
            .bind(&order.profile_id)
            .bind(order.quantity)
            .bind(&order.warehouse)
            .bind(&order.sales_order)
            .bind(&order.employee_id)
            .bind(&order.employee_name)
            .bind(&order.serial_numbers)
            .bind(&order.remarks)
            .bind(&order.created_by)
            .bind(order.created_at)
            .bind(order.updated_at)
            .fetch_one(&mut *tx)
            .await?;

        insert_devices(&mut tx, devices).await?;
        insert_history(&mut tx, order, "created", order.created_by.as_deref()).await?;

        tx.commit().await?;
        timer.record();
        Ok(row)
    }

    /// Replace an order's fields and devices, recording an "updated" history row.
    pub async fn update_with_devices(
        &self,
        order: &Order,
        devices: &[Device],
        actor: &str,
    ) -> Result<Option<OrderEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_order");
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            r#"
            UPDATE orders SET
                order_type = $2, material_type = $3, asset_type = $4, model = $5,
                configuration = $6, product = $7, sd_card_size = $8, profile_id = $9,
                quantity = $10, warehouse = $11, sales_order = $12, employee_id = $13,
                employee_name = $14, serial_numbers = $15, remarks = $16, updated_at = $17
            WHERE id = $1
            RETURNING {}
            "#,
            ORDER_COLUMNS
        );
        let row = sqlx::query_as::<_, OrderEntity>(&sql)
            .bind(order.id)
            .bind(&order.order_type)
            .bind(order.material_type.as_str())
            .bind(&order.asset_type)
            .bind(&order.model)
            .bind(&order.configuration)
            .bind(&order.product)
            .bind(&order.sd_card_size)
            .bind(&order.profile_id)
            .bind(order.quantity)
            .bind(&order.warehouse)
            .bind(&order.sales_order)
            .bind(&order.employee_id)
            .bind(&order.employee_name)
            .bind(&order.serial_numbers)
            .bind(&order.remarks)
            .bind(order.updated_at)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            timer.record();
            return Ok(None);
        };

        retire_devices(&mut tx, order.id).await?;
        insert_devices(&mut tx, devices).await?;
        insert_history(&mut tx, order, "updated", Some(actor)).await?;

        tx.commit().await?;
        timer.record();
        Ok(Some(row))
    }

    /// Delete an order, retiring its devices. Returns false if it did not exist.
    pub async fn delete(&self, order: &Order, actor: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_order");
        let mut tx = self.pool.begin().await?;

        retire_devices(&mut tx, order.id).await?;
        insert_history(&mut tx, order, "deleted", Some(actor)).await?;
        let deleted = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order.id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        timer.record();
        Ok(deleted > 0)
    }

    /// History rows of one order, oldest first.
    pub async fn history(&self, order_id: Uuid) -> Result<Vec<OrderHistoryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_order_history");
        let result = sqlx::query_as::<_, OrderHistoryEntity>(
            r#"
            SELECT id, order_id, action, snapshot, actor, created_at
            FROM order_history
            WHERE order_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Inward minus outward quantity per (warehouse, asset type, model).
    pub async fn stock_summary(&self) -> Result<Vec<StockRowEntity>, sqlx::Error> {
        let timer = QueryTimer::new("stock_summary");
        let result = sqlx::query_as::<_, StockRowEntity>(
            r#"
            SELECT warehouse, asset_type, model,
                   COALESCE(SUM(quantity) FILTER (WHERE material_type = 'Inward'), 0)::BIGINT AS inward,
                   COALESCE(SUM(quantity) FILTER (WHERE material_type = 'Outward'), 0)::BIGINT AS outward
            FROM orders
            GROUP BY warehouse, asset_type, model
            ORDER BY warehouse, asset_type, model
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Dispatched versus received quantity per (employee, asset type, model).
    pub async fn employee_summary(&self) -> Result<Vec<EmployeeStockEntity>, sqlx::Error> {
        let timer = QueryTimer::new("employee_stock_summary");
        let result = sqlx::query_as::<_, EmployeeStockEntity>(
            r#"
            SELECT TRIM(employee_id) AS employee_id,
                   MIN(employee_name) AS employee_name,
                   asset_type, model,
                   COALESCE(SUM(quantity) FILTER (WHERE material_type = 'Outward'), 0)::BIGINT AS dispatched,
                   COALESCE(SUM(quantity) FILTER (WHERE material_type = 'Inward'), 0)::BIGINT AS received
            FROM orders
            WHERE employee_id IS NOT NULL AND TRIM(employee_id) <> ''
            GROUP BY TRIM(employee_id), asset_type, model
            ORDER BY 1, asset_type, model
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

async fn insert_devices(
    tx: &mut Transaction<'_, Postgres>,
    devices: &[Device],
) -> Result<(), sqlx::Error> {
    for device in devices {
        sqlx::query(
            r#"
            INSERT INTO devices (
                id, serial_number, asset_type, model, warehouse, material_type, status,
                asset_group, asset_condition, far_code, order_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(device.id)
        .bind(&device.serial_number)
        .bind(&device.asset_type)
        .bind(&device.model)
        .bind(&device.warehouse)
        .bind(device.material_type.as_str())
        .bind(&device.status)
        .bind(&device.asset_group)
        .bind(&device.asset_condition)
        .bind(&device.far_code)
        .bind(device.order_id)
        .bind(device.created_at)
        .bind(device.updated_at)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn retire_devices(tx: &mut Transaction<'_, Postgres>, order_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE devices SET deleted_at = NOW() WHERE order_id = $1 AND deleted_at IS NULL")
        .bind(order_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn insert_history(
    tx: &mut Transaction<'_, Postgres>,
    order: &Order,
    action: &str,
    actor: Option<&str>,
) -> Result<(), sqlx::Error> {
    let snapshot = serde_json::to_value(order).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
    sqlx::query(
        r#"
        INSERT INTO order_history (order_id, action, snapshot, actor)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(order.id)
    .bind(action)
    .bind(snapshot)
    .bind(actor)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
