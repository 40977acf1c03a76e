//! Asset lifecycle transitions.
//!
//! Every transition is applied to a copy of the asset and returns the copy
//! together with the list of changed fields, which callers pass on to the
//! edit history.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::DomainError;
use crate::models::{
    Asset, AssetField, AssetStatus, AssignAssetRequest, FieldChange, ReturnAssetRequest,
};
use shared::validation::is_blank_opt;

/// A requested change to an asset.
#[derive(Debug, Clone)]
pub enum Transition {
    Assign(AssignAssetRequest),
    Return(ReturnAssetRequest),
    /// Administrative override to any status.
    SetStatus {
        status: Option<AssetStatus>,
        remarks: Option<String>,
    },
    SetLocation(Option<String>),
    SetAssetCheck(Option<String>),
}

/// The asset after a transition, plus what changed.
#[derive(Debug, Clone)]
pub struct AssetMutation {
    pub asset: Asset,
    pub changes: Vec<FieldChange>,
}

impl AssetMutation {
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Applies a transition, stamping `updated_by`/`updated_at`.
pub fn apply(
    asset: &Asset,
    transition: &Transition,
    actor: &str,
    now: DateTime<Utc>,
) -> Result<AssetMutation, DomainError> {
    let mut next = asset.clone();

    match transition {
        Transition::Assign(req) => assign(&mut next, req, now)?,
        Transition::Return(req) => return_asset(&mut next, req, now)?,
        Transition::SetStatus { status, remarks } => {
            let status =
                status.ok_or_else(|| DomainError::validation("Status is required"))?;
            if next.status == AssetStatus::Assigned && status != AssetStatus::Assigned {
                clear_assignment(&mut next);
            }
            next.status = status;
            if let Some(remarks) = remarks.as_ref().filter(|r| !r.trim().is_empty()) {
                next.remarks = Some(remarks.trim().to_string());
            }
        }
        Transition::SetLocation(location) => {
            next.location = trimmed(location);
        }
        Transition::SetAssetCheck(check) => {
            next.asset_check = trimmed(check);
        }
    }

    next.updated_by = Some(actor.to_string());
    next.updated_at = now;
    let changes = next.changes_since(asset);

    Ok(AssetMutation {
        asset: next,
        changes,
    })
}

fn assign(asset: &mut Asset, req: &AssignAssetRequest, now: DateTime<Utc>) -> Result<(), DomainError> {
    if asset.status != AssetStatus::Available {
        return Err(DomainError::invalid_state(format!(
            "Asset {} is {} and cannot be assigned",
            asset.asset_id, asset.status
        )));
    }
    if req.employee_name.trim().is_empty() {
        return Err(DomainError::validation("Employee name is required"));
    }
    if req.employee_id.trim().is_empty() {
        return Err(DomainError::validation("Employee ID is required"));
    }

    asset.assigned_to = Some(req.employee_name.trim().to_string());
    asset.employee_id = Some(req.employee_id.trim().to_string());
    asset.assigned_date = Some(now);
    asset.status = AssetStatus::Assigned;
    Ok(())
}

fn return_asset(
    asset: &mut Asset,
    req: &ReturnAssetRequest,
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    if asset.status != AssetStatus::Assigned {
        return Err(DomainError::invalid_state(format!(
            "Asset {} is {} and cannot be returned",
            asset.asset_id, asset.status
        )));
    }
    if req.target_status == AssetStatus::Assigned {
        return Err(DomainError::validation("Return status cannot be Assigned"));
    }
    if is_blank_opt(req.received_by.as_deref()) {
        return Err(DomainError::validation("Received by is required"));
    }
    if req.target_status != AssetStatus::Available && is_blank_opt(req.location.as_deref()) {
        return Err(DomainError::validation("Location is required"));
    }
    if req.target_status.requires_recovery_amount() {
        match req.recovery_amount {
            Some(amount) if amount.is_finite() && amount >= 0.0 => {}
            Some(_) => {
                return Err(DomainError::validation(
                    "Recovery amount must be a non-negative number",
                ))
            }
            None => return Err(DomainError::validation("Recovery amount is required")),
        }
    }

    clear_assignment(asset);
    asset.status = req.target_status;
    asset.return_date = Some(now);
    asset.received_by = trimmed(&req.received_by);
    if let Some(location) = trimmed(&req.location) {
        asset.location = Some(location);
    }
    if req.recovery_amount.is_some() {
        asset.recovery_amount = req.recovery_amount;
    }
    if let Some(remarks) = trimmed(&req.remarks) {
        asset.remarks = Some(remarks);
    }
    if let Some(condition) = trimmed(&req.asset_condition) {
        asset.asset_condition = Some(condition);
    }
    Ok(())
}

fn clear_assignment(asset: &mut Asset) {
    asset.assigned_to = None;
    asset.employee_id = None;
    asset.assigned_date = None;
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// How a status target is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Assign,
    Return,
    Override,
}

/// One selectable target in the status dialog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusTarget {
    pub status: AssetStatus,
    pub via: TransitionKind,
    pub required_fields: Vec<AssetField>,
}

/// Options shown when changing an asset's status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusDialog {
    pub current: AssetStatus,
    pub targets: Vec<StatusTarget>,
}

/// Lists the statuses reachable from the asset's current status and which
/// fields each one requires.
///
/// Assign and return targets come first; every other status is reachable
/// through an administrative override that requires nothing.
pub fn status_options(asset: &Asset) -> StatusDialog {
    let mut targets = Vec::new();

    match asset.status {
        AssetStatus::Available => targets.push(StatusTarget {
            status: AssetStatus::Assigned,
            via: TransitionKind::Assign,
            required_fields: vec![AssetField::AssignedTo, AssetField::EmployeeId],
        }),
        AssetStatus::Assigned => {
            for status in AssetStatus::ALL {
                if status == AssetStatus::Assigned {
                    continue;
                }
                let mut required_fields = vec![AssetField::ReceivedBy];
                if status != AssetStatus::Available {
                    required_fields.push(AssetField::Location);
                }
                if status.requires_recovery_amount() {
                    required_fields.push(AssetField::RecoveryAmount);
                }
                targets.push(StatusTarget {
                    status,
                    via: TransitionKind::Return,
                    required_fields,
                });
            }
        }
        _ => {}
    }

    for status in AssetStatus::ALL {
        if status == asset.status || targets.iter().any(|t| t.status == status) {
            continue;
        }
        targets.push(StatusTarget {
            status,
            via: TransitionKind::Override,
            required_fields: Vec::new(),
        });
    }

    StatusDialog {
        current: asset.status,
        targets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn available() -> Asset {
        let mut asset = Asset::new("AST-001", "ThinkPad", "Laptop", "Lenovo", "LNV-1", now());
        asset.location = Some("Bengaluru".into());
        asset
    }

    fn assign_req() -> Transition {
        Transition::Assign(AssignAssetRequest {
            employee_id: "E100".into(),
            employee_name: "Asha Rao".into(),
        })
    }

    fn return_req(target: AssetStatus) -> ReturnAssetRequest {
        ReturnAssetRequest {
            target_status: target,
            received_by: Some("Store".into()),
            location: None,
            recovery_amount: None,
            remarks: None,
            asset_condition: None,
        }
    }

    #[test]
    fn test_assign_sets_fields() {
        let result = apply(&available(), &assign_req(), "admin@example.com", now()).unwrap();
        let asset = result.asset;
        assert_eq!(asset.status, AssetStatus::Assigned);
        assert_eq!(asset.assigned_to.as_deref(), Some("Asha Rao"));
        assert_eq!(asset.employee_id.as_deref(), Some("E100"));
        assert_eq!(asset.assigned_date, Some(now()));
        assert_eq!(asset.updated_by.as_deref(), Some("admin@example.com"));
        assert_eq!(asset.location.as_deref(), Some("Bengaluru"));

        let fields: Vec<_> = result.changes.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, vec!["status", "assigned_to", "employee_id", "assigned_date"]);
    }

    #[test]
    fn test_assign_requires_available() {
        let mut asset = available();
        asset.status = AssetStatus::Lost;
        let err = apply(&asset, &assign_req(), "a", now()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[test]
    fn test_assign_requires_employee() {
        let transition = Transition::Assign(AssignAssetRequest {
            employee_id: "E1".into(),
            employee_name: " ".into(),
        });
        let err = apply(&available(), &transition, "a", now()).unwrap_err();
        assert_eq!(err, DomainError::validation("Employee name is required"));
    }

    #[test]
    fn test_assign_then_return_restores_available() {
        let assigned = apply(&available(), &assign_req(), "a", now()).unwrap().asset;
        let later = now() + Duration::days(30);
        let returned = apply(
            &assigned,
            &Transition::Return(return_req(AssetStatus::Available)),
            "a",
            later,
        )
        .unwrap()
        .asset;

        assert_eq!(returned.status, AssetStatus::Available);
        assert_eq!(returned.assigned_to, None);
        assert_eq!(returned.employee_id, None);
        assert_eq!(returned.assigned_date, None);
        assert_eq!(returned.return_date, Some(later));
        assert_eq!(returned.received_by.as_deref(), Some("Store"));
    }

    #[test]
    fn test_return_requires_assigned() {
        let err = apply(
            &available(),
            &Transition::Return(return_req(AssetStatus::Available)),
            "a",
            now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[test]
    fn test_return_requires_received_by() {
        let assigned = apply(&available(), &assign_req(), "a", now()).unwrap().asset;
        let mut req = return_req(AssetStatus::Available);
        req.received_by = None;
        let err = apply(&assigned, &Transition::Return(req), "a", now()).unwrap_err();
        assert_eq!(err.to_string(), "Received by is required");
    }

    #[test]
    fn test_return_to_terminal_requires_location_and_amount() {
        let assigned = apply(&available(), &assign_req(), "a", now()).unwrap().asset;

        let req = return_req(AssetStatus::Lost);
        let err = apply(&assigned, &Transition::Return(req.clone()), "a", now()).unwrap_err();
        assert_eq!(err.to_string(), "Location is required");

        let mut req = req;
        req.location = Some("HQ".into());
        let err = apply(&assigned, &Transition::Return(req.clone()), "a", now()).unwrap_err();
        assert_eq!(err.to_string(), "Recovery amount is required");

        req.recovery_amount = Some(-5.0);
        assert!(apply(&assigned, &Transition::Return(req.clone()), "a", now()).is_err());

        req.recovery_amount = Some(1500.0);
        let returned = apply(&assigned, &Transition::Return(req), "a", now()).unwrap().asset;
        assert_eq!(returned.status, AssetStatus::Lost);
        assert_eq!(returned.recovery_amount, Some(1500.0));
        assert_eq!(returned.location.as_deref(), Some("HQ"));
    }

    #[test]
    fn test_scrap_needs_location_but_no_amount() {
        let assigned = apply(&available(), &assign_req(), "a", now()).unwrap().asset;
        let mut req = return_req(AssetStatus::ScrapDamage);
        req.location = Some("Scrap yard".into());
        let returned = apply(&assigned, &Transition::Return(req), "a", now()).unwrap().asset;
        assert_eq!(returned.status, AssetStatus::ScrapDamage);
        assert_eq!(returned.recovery_amount, None);
    }

    #[test]
    fn test_override_requires_status_and_clears_assignment() {
        let assigned = apply(&available(), &assign_req(), "a", now()).unwrap().asset;

        let missing = Transition::SetStatus {
            status: None,
            remarks: None,
        };
        assert_eq!(
            apply(&assigned, &missing, "a", now()).unwrap_err().to_string(),
            "Status is required"
        );

        let sold = Transition::SetStatus {
            status: Some(AssetStatus::Sold),
            remarks: Some("Sold to employee".into()),
        };
        let asset = apply(&assigned, &sold, "a", now()).unwrap().asset;
        assert_eq!(asset.status, AssetStatus::Sold);
        assert_eq!(asset.assigned_to, None);
        assert_eq!(asset.employee_id, None);
        assert_eq!(asset.remarks.as_deref(), Some("Sold to employee"));
    }

    #[test]
    fn test_location_and_check_updates_stamp_actor() {
        let later = now() + Duration::hours(1);
        let result = apply(
            &available(),
            &Transition::SetLocation(Some(" Pune ".into())),
            "ops@example.com",
            later,
        )
        .unwrap();
        assert_eq!(result.asset.location.as_deref(), Some("Pune"));
        assert_eq!(result.asset.updated_at, later);
        assert_eq!(result.changes.len(), 1);

        let result = apply(
            &available(),
            &Transition::SetAssetCheck(Some("Verified".into())),
            "ops@example.com",
            later,
        )
        .unwrap();
        assert_eq!(result.asset.asset_check.as_deref(), Some("Verified"));
    }

    #[test]
    fn test_unchanged_location_is_noop() {
        let result = apply(
            &available(),
            &Transition::SetLocation(Some("Bengaluru".into())),
            "a",
            now(),
        )
        .unwrap();
        assert!(result.is_noop());
    }

    #[test]
    fn test_status_options_for_available() {
        let dialog = status_options(&available());
        assert_eq!(dialog.current, AssetStatus::Available);
        assert_eq!(dialog.targets[0].status, AssetStatus::Assigned);
        assert_eq!(dialog.targets[0].via, TransitionKind::Assign);
        assert!(dialog.targets.iter().all(|t| t.status != AssetStatus::Available));
        assert_eq!(dialog.targets.len(), AssetStatus::ALL.len() - 1);
    }

    #[test]
    fn test_status_options_for_assigned() {
        let assigned = apply(&available(), &assign_req(), "a", now()).unwrap().asset;
        let dialog = status_options(&assigned);
        assert!(dialog.targets.iter().all(|t| t.via == TransitionKind::Return));

        let lost = dialog
            .targets
            .iter()
            .find(|t| t.status == AssetStatus::Lost)
            .unwrap();
        assert_eq!(
            lost.required_fields,
            vec![
                AssetField::ReceivedBy,
                AssetField::Location,
                AssetField::RecoveryAmount
            ]
        );
        let available = dialog
            .targets
            .iter()
            .find(|t| t.status == AssetStatus::Available)
            .unwrap();
        assert_eq!(available.required_fields, vec![AssetField::ReceivedBy]);
    }
}
