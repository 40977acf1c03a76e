//! Assign/return requests awaiting administrative approval.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::asset::{AssignAssetRequest, ReturnAssetRequest};
use crate::error::DomainError;

/// Review state of a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            "cancelled" => Ok(RequestStatus::Cancelled),
            _ => Err(format!("Invalid request status: {}", s)),
        }
    }
}

/// The asset action a request asks for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RequestPayload {
    Assign(AssignAssetRequest),
    Return(ReturnAssetRequest),
}

impl RequestPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            RequestPayload::Assign(_) => "assign",
            RequestPayload::Return(_) => "return",
        }
    }
}

/// A request to mutate an asset once an admin approves it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingRequest {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub payload: RequestPayload,
    pub status: RequestStatus,
    pub requested_by: String,
    pub reviewed_by: Option<String>,
    pub review_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl PendingRequest {
    pub fn new(asset_id: Uuid, payload: RequestPayload, requested_by: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            asset_id,
            payload,
            status: RequestStatus::Pending,
            requested_by: requested_by.to_string(),
            reviewed_by: None,
            review_note: None,
            created_at: now,
            reviewed_at: None,
        }
    }

    fn ensure_pending(&self) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::invalid_state(format!(
                "Request is already {}",
                self.status
            )));
        }
        Ok(())
    }

    pub fn approve(&mut self, reviewer: &str, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.ensure_pending()?;
        self.status = RequestStatus::Approved;
        self.reviewed_by = Some(reviewer.to_string());
        self.reviewed_at = Some(now);
        Ok(())
    }

    pub fn reject(
        &mut self,
        reviewer: &str,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.ensure_pending()?;
        self.status = RequestStatus::Rejected;
        self.reviewed_by = Some(reviewer.to_string());
        self.review_note = note;
        self.reviewed_at = Some(now);
        Ok(())
    }

    /// Withdraws the request; only the original requester may do this.
    pub fn cancel(&mut self, actor: &str, now: DateTime<Utc>) -> Result<(), DomainError> {
        if !self.requested_by.eq_ignore_ascii_case(actor) {
            return Err(DomainError::forbidden(
                "Only the requester can cancel this request",
            ));
        }
        self.ensure_pending()?;
        self.status = RequestStatus::Cancelled;
        self.reviewed_by = Some(actor.to_string());
        self.reviewed_at = Some(now);
        Ok(())
    }
}

/// Body of a reject call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RejectRequestBody {
    pub note: Option<String>,
}

/// Query parameters for listing requests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListRequestsQuery {
    pub status: Option<RequestStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PendingRequest {
        PendingRequest::new(
            Uuid::new_v4(),
            RequestPayload::Assign(AssignAssetRequest {
                employee_id: "E100".into(),
                employee_name: "Asha Rao".into(),
            }),
            "user@example.com",
            Utc::now(),
        )
    }

    #[test]
    fn test_approve_records_reviewer() {
        let mut req = request();
        req.approve("admin@example.com", Utc::now()).unwrap();
        assert_eq!(req.status, RequestStatus::Approved);
        assert_eq!(req.reviewed_by.as_deref(), Some("admin@example.com"));
        assert!(req.reviewed_at.is_some());
    }

    #[test]
    fn test_terminal_states_are_immutable() {
        let mut req = request();
        req.reject("admin@example.com", Some("No stock".into()), Utc::now())
            .unwrap();

        let err = req.approve("admin@example.com", Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
        assert_eq!(err.to_string(), "Request is already rejected");
        assert!(req.cancel("user@example.com", Utc::now()).is_err());
    }

    #[test]
    fn test_cancel_only_by_requester() {
        let mut req = request();
        let err = req.cancel("someone@example.com", Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        req.cancel("USER@example.com", Utc::now()).unwrap();
        assert_eq!(req.status, RequestStatus::Cancelled);
    }

    #[test]
    fn test_payload_serialization_is_tagged() {
        let json = serde_json::to_value(&request().payload).unwrap();
        assert_eq!(json["kind"], "assign");
        assert_eq!(json["employee_id"], "E100");
    }
}
