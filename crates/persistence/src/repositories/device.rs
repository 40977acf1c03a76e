//! Device repository for database operations.

use sqlx::PgPool;

use crate::entities::{DeviceEntity, DEVICE_COLUMNS};
use crate::metrics::QueryTimer;

/// Repository for serialized unit records.
#[derive(Clone)]
pub struct DeviceRepository {
    pool: PgPool,
}

impl DeviceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Non-deleted device rows for any of the given serials.
    pub async fn find_by_serials(&self, serials: &[String]) -> Result<Vec<DeviceEntity>, sqlx::Error> {
        if serials.is_empty() {
            return Ok(Vec::new());
        }
        let timer = QueryTimer::new("find_devices_by_serials");
        let sql = format!(
            r#"
            SELECT {} FROM devices
            WHERE serial_number = ANY($1) AND deleted_at IS NULL
            ORDER BY serial_number, updated_at DESC
            "#,
            DEVICE_COLUMNS
        );
        let result = sqlx::query_as::<_, DeviceEntity>(&sql)
            .bind(serials)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Device rows filtered by serial substring and exact asset type.
    pub async fn list(
        &self,
        serial: Option<&str>,
        asset_type: Option<&str>,
    ) -> Result<Vec<DeviceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_devices");
        let sql = format!(
            r#"
            SELECT {} FROM devices
            WHERE deleted_at IS NULL
              AND ($1::text IS NULL OR serial_number ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR asset_type = $2)
            ORDER BY updated_at DESC
            LIMIT 500
            "#,
            DEVICE_COLUMNS
        );
        let result = sqlx::query_as::<_, DeviceEntity>(&sql)
            .bind(serial)
            .bind(asset_type)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }
}
