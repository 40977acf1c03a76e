//! Pending request entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{PendingRequest, RequestPayload, RequestStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the pending_requests table.
#[derive(Debug, Clone, FromRow)]
pub struct PendingRequestEntity {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub status: String,
    pub requested_by: String,
    pub reviewed_by: Option<String>,
    pub review_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

pub const PENDING_REQUEST_COLUMNS: &str = "id, asset_id, kind, payload, status, requested_by, \
     reviewed_by, review_note, created_at, reviewed_at";

impl TryFrom<PendingRequestEntity> for PendingRequest {
    type Error = serde_json::Error;

    fn try_from(entity: PendingRequestEntity) -> Result<Self, Self::Error> {
        let payload: RequestPayload = serde_json::from_value(entity.payload)?;
        Ok(Self {
            id: entity.id,
            asset_id: entity.asset_id,
            payload,
            status: entity.status.parse().unwrap_or(RequestStatus::Pending),
            requested_by: entity.requested_by,
            reviewed_by: entity.reviewed_by,
            review_note: entity.review_note,
            created_at: entity.created_at,
            reviewed_at: entity.reviewed_at,
        })
    }
}
