//! Asset repository for database operations.

use chrono::Utc;
use domain::models::Asset;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::entities::{AssetEntity, ASSET_COLUMNS};
use crate::metrics::QueryTimer;

/// Repository for asset database operations.
#[derive(Clone)]
pub struct AssetRepository {
    pool: PgPool,
}

impl AssetRepository {
    /// Creates a new AssetRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// All non-deleted assets, newest first.
    pub async fn list_active(&self) -> Result<Vec<AssetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_active_assets");
        let sql = format!(
            "SELECT {} FROM assets WHERE deleted_at IS NULL ORDER BY created_at DESC",
            ASSET_COLUMNS
        );
        let result = sqlx::query_as::<_, AssetEntity>(&sql)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Non-deleted asset counts grouped by status.
    pub async fn count_by_status(&self) -> Result<Vec<(String, i64)>, sqlx::Error> {
        let timer = QueryTimer::new("count_assets_by_status");
        let result = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM assets WHERE deleted_at IS NULL GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a non-deleted asset by internal id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<AssetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_asset_by_id");
        let sql = format!(
            "SELECT {} FROM assets WHERE id = $1 AND deleted_at IS NULL",
            ASSET_COLUMNS
        );
        let result = sqlx::query_as::<_, AssetEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Insert a new asset.
    pub async fn create(&self, asset: &Asset) -> Result<AssetEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_asset");
        let result = insert_asset(&self.pool, asset).await;
        timer.record();
        result
    }

    /// Insert several assets in one transaction.
    pub async fn create_many(&self, assets: &[Asset]) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("create_assets_bulk");
        let mut tx = self.pool.begin().await?;
        for asset in assets {
            insert_asset(&mut *tx, asset).await?;
        }
        tx.commit().await?;
        timer.record();
        Ok(assets.len() as u64)
    }

    /// Overwrite every mutable column of an asset.
    pub async fn update(&self, asset: &Asset) -> Result<Option<AssetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_asset");
        let result = update_asset(&self.pool, asset).await;
        timer.record();
        result
    }

    /// Mark an asset deleted. Returns false when it was already gone.
    pub async fn soft_delete(&self, id: Uuid, actor: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("soft_delete_asset");
        let result = sqlx::query(
            r#"
            UPDATE assets
            SET deleted_at = $2, updated_by = $3, updated_at = $2
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .bind(actor)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}

pub(crate) async fn insert_asset<'e, E>(executor: E, asset: &Asset) -> Result<AssetEntity, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        r#"
        INSERT INTO assets (
            id, asset_id, name, asset_type, brand, configuration, serial_number, provider,
            status, location, assigned_to, employee_id, assigned_date, return_date, received_by,
            remarks, asset_condition, recovery_amount, asset_check, far_code, warranty_start,
            warranty_end, created_by, created_at, updated_by, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18, $19, $20, $21, $22, $23, $24, $25, $26)
        RETURNING {}
        "#,
        ASSET_COLUMNS
    );
    sqlx::query_as::<_, AssetEntity>(&sql)
        .bind(asset.id)
        .bind(&asset.asset_id)
        .bind(&asset.name)
        .bind(&asset.asset_type)
        .bind(&asset.brand)
        .bind(&asset.configuration)
        .bind(&asset.serial_number)
        .bind(&asset.provider)
        .bind(asset.status.as_str())
        .bind(&asset.location)
        .bind(&asset.assigned_to)
        .bind(&asset.employee_id)
        .bind(asset.assigned_date)
        .bind(asset.return_date)
        .bind(&asset.received_by)
        .bind(&asset.remarks)
        .bind(&asset.asset_condition)
        .bind(asset.recovery_amount)
        .bind(&asset.asset_check)
        .bind(&asset.far_code)
        .bind(asset.warranty_start)
        .bind(asset.warranty_end)
        .bind(&asset.created_by)
        .bind(asset.created_at)
        .bind(&asset.updated_by)
        .bind(asset.updated_at)
        .fetch_one(executor)
        .await
}

pub(crate) async fn update_asset<'e, E>(
    executor: E,
    asset: &Asset,
) -> Result<Option<AssetEntity>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        r#"
        UPDATE assets SET
            asset_id = $2, name = $3, asset_type = $4, brand = $5, configuration = $6,
            serial_number = $7, provider = $8, status = $9, location = $10, assigned_to = $11,
            employee_id = $12, assigned_date = $13, return_date = $14, received_by = $15,
            remarks = $16, asset_condition = $17, recovery_amount = $18, asset_check = $19,
            far_code = $20, warranty_start = $21, warranty_end = $22, updated_by = $23,
            updated_at = $24
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING {}
        "#,
        ASSET_COLUMNS
    );
    sqlx::query_as::<_, AssetEntity>(&sql)
        .bind(asset.id)
        .bind(&asset.asset_id)
        .bind(&asset.name)
        .bind(&asset.asset_type)
        .bind(&asset.brand)
        .bind(&asset.configuration)
        .bind(&asset.serial_number)
        .bind(&asset.provider)
        .bind(asset.status.as_str())
        .bind(&asset.location)
        .bind(&asset.assigned_to)
        .bind(&asset.employee_id)
        .bind(asset.assigned_date)
        .bind(asset.return_date)
        .bind(&asset.received_by)
        .bind(&asset.remarks)
        .bind(&asset.asset_condition)
        .bind(asset.recovery_amount)
        .bind(&asset.asset_check)
        .bind(&asset.far_code)
        .bind(asset.warranty_start)
        .bind(asset.warranty_end)
        .bind(&asset.updated_by)
        .bind(asset.updated_at)
        .fetch_optional(executor)
        .await
}
