//! Pending request review routes.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use domain::models::{ListRequestsQuery, PendingRequest, RejectRequestBody, UserRole};
use domain::services::approve_request as approve;
use persistence::entities::PendingRequestEntity;
use persistence::repositories::PendingRequestRepository;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::{record_asset_transition, record_request_reviewed};
use crate::services::assets::AssetService;

fn to_domain(entity: PendingRequestEntity) -> Result<PendingRequest, ApiError> {
    PendingRequest::try_from(entity).map_err(|e| {
        tracing::error!(error = %e, "Stored request payload is unreadable");
        ApiError::Internal("Failed to read pending request".to_string())
    })
}

fn already_reviewed() -> ApiError {
    ApiError::Conflict("Request is no longer pending".to_string())
}

async fn load(repo: &PendingRequestRepository, id: Uuid) -> Result<PendingRequest, ApiError> {
    let entity = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".to_string()))?;
    to_domain(entity)
}

/// Reviewers see every request; everyone else sees their own.
///
/// GET /api/v1/requests?status=pending
pub async fn list_requests(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<Vec<PendingRequest>>, ApiError> {
    let entities = PendingRequestRepository::new(state.pool.clone())
        .list(query.status)
        .await?;

    let mut requests = entities
        .into_iter()
        .map(to_domain)
        .collect::<Result<Vec<_>, _>>()?;
    if !user_auth.role.can_review_requests() {
        requests.retain(|r| r.requested_by.eq_ignore_ascii_case(user_auth.actor()));
    }
    Ok(Json(requests))
}

/// Approve a request and apply its action to the asset.
///
/// POST /api/v1/requests/:id/approve
pub async fn approve_request(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<PendingRequest>, ApiError> {
    user_auth.require(UserRole::can_review_requests, "Only admins can approve requests")?;

    let repo = PendingRequestRepository::new(state.pool.clone());
    let request = load(&repo, id).await?;
    let asset = AssetService::new(state.pool.clone())
        .get(request.asset_id)
        .await?;

    let (approved, mutation) = approve(&request, &asset, user_auth.actor(), Utc::now())
        .map_err(|e| {
            tracing::warn!(request_id = %id, error = %e, "Approval aborted");
            ApiError::from(e)
        })?;

    let (stored, _) = repo
        .approve_with_asset(&approved, &mutation.asset, &mutation.changes)
        .await?
        .ok_or_else(already_reviewed)?;

    record_request_reviewed("approved");
    record_asset_transition(request.payload.kind());
    info!(
        request_id = %id,
        asset_id = %asset.id,
        action = request.payload.kind(),
        user_id = %user_auth.user_id,
        "Request approved"
    );
    Ok(Json(to_domain(stored)?))
}

/// Reject a request with an optional note.
///
/// POST /api/v1/requests/:id/reject
pub async fn reject_request(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
    body: Option<Json<RejectRequestBody>>,
) -> Result<Json<PendingRequest>, ApiError> {
    user_auth.require(UserRole::can_review_requests, "Only admins can reject requests")?;

    let repo = PendingRequestRepository::new(state.pool.clone());
    let mut request = load(&repo, id).await?;
    let note = body
        .and_then(|Json(b)| b.note)
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    request.reject(user_auth.actor(), note, Utc::now())?;

    let stored = repo.transition(&request).await?.ok_or_else(already_reviewed)?;

    record_request_reviewed("rejected");
    info!(request_id = %id, user_id = %user_auth.user_id, "Request rejected");
    Ok(Json(to_domain(stored)?))
}

/// Withdraw one's own pending request.
///
/// POST /api/v1/requests/:id/cancel
pub async fn cancel_request(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<PendingRequest>, ApiError> {
    let repo = PendingRequestRepository::new(state.pool.clone());
    let mut request = load(&repo, id).await?;
    request.cancel(user_auth.actor(), Utc::now())?;

    let stored = repo.transition(&request).await?.ok_or_else(already_reviewed)?;

    record_request_reviewed("cancelled");
    info!(request_id = %id, user_id = %user_auth.user_id, "Request cancelled");
    Ok(Json(to_domain(stored)?))
}
