//! Routing of assign/return actions through pending requests.

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::models::{Asset, PendingRequest, RequestPayload, UserRole};
use crate::services::lifecycle::{apply, AssetMutation, Transition};

impl From<&RequestPayload> for Transition {
    fn from(payload: &RequestPayload) -> Self {
        match payload {
            RequestPayload::Assign(req) => Transition::Assign(req.clone()),
            RequestPayload::Return(req) => Transition::Return(req.clone()),
        }
    }
}

/// What happened to a submitted assign/return action.
#[derive(Debug, Clone)]
pub enum ActionOutcome {
    /// Applied to the asset immediately.
    Applied(AssetMutation),
    /// Stored for admin review.
    Queued(PendingRequest),
}

/// Applies the action directly for admins and queues it for everyone else.
///
/// Queued actions are validated against the asset's current state first, so
/// requests that could never be approved are refused up front.
pub fn submit_action(
    role: UserRole,
    asset: &Asset,
    payload: RequestPayload,
    actor: &str,
    now: DateTime<Utc>,
) -> Result<ActionOutcome, DomainError> {
    let mutation = apply(asset, &Transition::from(&payload), actor, now)?;
    if role.applies_directly() {
        Ok(ActionOutcome::Applied(mutation))
    } else {
        Ok(ActionOutcome::Queued(PendingRequest::new(
            asset.id, payload, actor, now,
        )))
    }
}

/// Approves a pending request and applies its payload to the asset.
///
/// If the payload no longer applies, the request stays pending and the
/// lifecycle error is returned.
pub fn approve_request(
    request: &PendingRequest,
    asset: &Asset,
    reviewer: &str,
    now: DateTime<Utc>,
) -> Result<(PendingRequest, AssetMutation), DomainError> {
    let mut approved = request.clone();
    approved.approve(reviewer, now)?;
    let mutation = apply(asset, &Transition::from(&request.payload), reviewer, now)?;
    Ok((approved, mutation))
}
