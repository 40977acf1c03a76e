//! Pending request repository.
//!
//! Status transitions are guarded with `WHERE status = 'pending'`, so of two
//! concurrent reviewers only the first one changes the row.

use domain::models::{Asset, EditEntity, FieldChange, PendingRequest, RequestStatus};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{AssetEntity, PendingRequestEntity, PENDING_REQUEST_COLUMNS};
use crate::metrics::QueryTimer;
use crate::repositories::asset::update_asset;
use crate::repositories::edit_history::insert_changes;

/// Repository for pending request database operations.
#[derive(Clone)]
pub struct PendingRequestRepository {
    pool: PgPool,
}

impl PendingRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a new pending request.
    pub async fn create(&self, request: &PendingRequest) -> Result<PendingRequestEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_pending_request");
        let payload = serde_json::to_value(&request.payload)
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        let sql = format!(
            r#"
            INSERT INTO pending_requests (id, asset_id, kind, payload, status, requested_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            PENDING_REQUEST_COLUMNS
        );
        let result = sqlx::query_as::<_, PendingRequestEntity>(&sql)
            .bind(request.id)
            .bind(request.asset_id)
            .bind(request.payload.kind())
            .bind(payload)
            .bind(request.status.as_str())
            .bind(&request.requested_by)
            .bind(request.created_at)
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PendingRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_pending_request");
        let sql = format!(
            "SELECT {} FROM pending_requests WHERE id = $1",
            PENDING_REQUEST_COLUMNS
        );
        let result = sqlx::query_as::<_, PendingRequestEntity>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Requests newest first, optionally restricted to one status.
    pub async fn list(
        &self,
        status: Option<RequestStatus>,
    ) -> Result<Vec<PendingRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_pending_requests");
        let sql = format!(
            r#"
            SELECT {} FROM pending_requests
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
            PENDING_REQUEST_COLUMNS
        );
        let result = sqlx::query_as::<_, PendingRequestEntity>(&sql)
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Number of requests still waiting for review.
    pub async fn count_pending(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_pending_requests");
        let result = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM pending_requests WHERE status = 'pending'",
        )
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Move a pending request to a terminal state.
    ///
    /// Returns `None` when the row is no longer pending.
    pub async fn transition(
        &self,
        request: &PendingRequest,
    ) -> Result<Option<PendingRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("transition_pending_request");
        let result = transition_row(&self.pool, request).await;
        timer.record();
        result
    }

    /// Approve a request and write the resulting asset mutation atomically.
    ///
    /// Returns `None` (and writes nothing) when the request is no longer
    /// pending or the asset has been deleted meanwhile.
    pub async fn approve_with_asset(
        &self,
        request: &PendingRequest,
        asset: &Asset,
        changes: &[FieldChange],
    ) -> Result<Option<(PendingRequestEntity, AssetEntity)>, sqlx::Error> {
        let timer = QueryTimer::new("approve_pending_request");
        let mut tx = self.pool.begin().await?;

        let Some(request_row) = transition_row(&mut *tx, request).await? else {
            tx.rollback().await?;
            timer.record();
            return Ok(None);
        };
        let Some(asset_row) = update_asset(&mut *tx, asset).await? else {
            tx.rollback().await?;
            timer.record();
            return Ok(None);
        };
        let reviewer = request.reviewed_by.as_deref().unwrap_or_default();
        insert_changes(&mut tx, EditEntity::Asset, asset.id, changes, reviewer).await?;

        tx.commit().await?;
        timer.record();
        Ok(Some((request_row, asset_row)))
    }
}

async fn transition_row<'e, E>(
    executor: E,
    request: &PendingRequest,
) -> Result<Option<PendingRequestEntity>, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    let sql = format!(
        r#"
        UPDATE pending_requests
        SET status = $2, reviewed_by = $3, review_note = $4, reviewed_at = $5
        WHERE id = $1 AND status = 'pending'
        RETURNING {}
        "#,
        PENDING_REQUEST_COLUMNS
    );
    sqlx::query_as::<_, PendingRequestEntity>(&sql)
        .bind(request.id)
        .bind(request.status.as_str())
        .bind(&request.reviewed_by)
        .bind(&request.review_note)
        .bind(request.reviewed_at)
        .fetch_optional(executor)
        .await
}
