//! Asset domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use shared::validation::{validate_amount, validate_not_blank};

/// Lifecycle status of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetStatus {
    #[serde(rename = "Available")]
    Available,
    #[serde(rename = "Assigned")]
    Assigned,
    #[serde(rename = "Scrap/Damage")]
    ScrapDamage,
    #[serde(rename = "Sold")]
    Sold,
    #[serde(rename = "Sale")]
    Sale,
    #[serde(rename = "Lost")]
    Lost,
    #[serde(rename = "Emp Damage")]
    EmpDamage,
    #[serde(rename = "Courier Damage")]
    CourierDamage,
    #[serde(rename = "Others")]
    Others,
}

impl AssetStatus {
    pub const ALL: [AssetStatus; 9] = [
        AssetStatus::Available,
        AssetStatus::Assigned,
        AssetStatus::ScrapDamage,
        AssetStatus::Sold,
        AssetStatus::Sale,
        AssetStatus::Lost,
        AssetStatus::EmpDamage,
        AssetStatus::CourierDamage,
        AssetStatus::Others,
    ];

    /// Stored and displayed form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Assigned => "Assigned",
            Self::ScrapDamage => "Scrap/Damage",
            Self::Sold => "Sold",
            Self::Sale => "Sale",
            Self::Lost => "Lost",
            Self::EmpDamage => "Emp Damage",
            Self::CourierDamage => "Courier Damage",
            Self::Others => "Others",
        }
    }

    /// Statuses that are neither Available nor Assigned.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Available | Self::Assigned)
    }

    /// Returning into these statuses requires a recovery amount.
    pub fn requires_recovery_amount(&self) -> bool {
        matches!(
            self,
            Self::Sale | Self::Lost | Self::EmpDamage | Self::CourierDamage
        )
    }
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown asset status: {}", s))
    }
}

/// Warranty state derived from `warranty_end` and the current date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarrantyStatus {
    InWarranty,
    Expired,
    Unknown,
}

impl WarrantyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InWarranty => "In Warranty",
            Self::Expired => "Expired",
            Self::Unknown => "Unknown",
        }
    }
}

/// A tracked physical inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: Uuid,
    pub asset_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub brand: String,
    pub configuration: Option<String>,
    pub serial_number: String,
    pub provider: Option<String>,
    pub status: AssetStatus,
    pub location: Option<String>,
    pub assigned_to: Option<String>,
    pub employee_id: Option<String>,
    pub assigned_date: Option<DateTime<Utc>>,
    pub return_date: Option<DateTime<Utc>>,
    pub received_by: Option<String>,
    pub remarks: Option<String>,
    pub asset_condition: Option<String>,
    pub recovery_amount: Option<f64>,
    pub asset_check: Option<String>,
    pub far_code: Option<String>,
    pub warranty_start: Option<NaiveDate>,
    pub warranty_end: Option<NaiveDate>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    /// Creates a new Available asset with only the identifying fields set.
    pub fn new(
        asset_id: impl Into<String>,
        name: impl Into<String>,
        asset_type: impl Into<String>,
        brand: impl Into<String>,
        serial_number: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            asset_id: asset_id.into(),
            name: name.into(),
            asset_type: asset_type.into(),
            brand: brand.into(),
            configuration: None,
            serial_number: serial_number.into(),
            provider: None,
            status: AssetStatus::Available,
            location: None,
            assigned_to: None,
            employee_id: None,
            assigned_date: None,
            return_date: None,
            received_by: None,
            remarks: None,
            asset_condition: None,
            recovery_amount: None,
            asset_check: None,
            far_code: None,
            warranty_start: None,
            warranty_end: None,
            created_by: None,
            created_at: now,
            updated_by: None,
            updated_at: now,
        }
    }

    pub fn warranty_status(&self, today: NaiveDate) -> WarrantyStatus {
        match self.warranty_end {
            Some(end) if end >= today => WarrantyStatus::InWarranty,
            Some(_) => WarrantyStatus::Expired,
            None => WarrantyStatus::Unknown,
        }
    }

    /// First field longer than its column allows, as a validation message.
    pub fn check_lengths(&self) -> Option<String> {
        AssetField::TRACKED
            .iter()
            .chain([AssetField::CreatedBy, AssetField::UpdatedBy].iter())
            .find_map(|field| {
                let max = field.max_len()?;
                let value = self.field(*field)?;
                (value.chars().count() > max)
                    .then(|| format!("{} must be at most {} characters", field.label(), max))
            })
    }

    /// String form of a field, `None` when unset.
    pub fn field(&self, field: AssetField) -> Option<String> {
        fn date(d: &Option<NaiveDate>) -> Option<String> {
            d.map(|d| d.format("%Y-%m-%d").to_string())
        }
        fn stamp(d: &Option<DateTime<Utc>>) -> Option<String> {
            d.map(|d| d.to_rfc3339())
        }

        match field {
            AssetField::AssetId => Some(self.asset_id.clone()),
            AssetField::Name => Some(self.name.clone()),
            AssetField::Type => Some(self.asset_type.clone()),
            AssetField::Brand => Some(self.brand.clone()),
            AssetField::Configuration => self.configuration.clone(),
            AssetField::SerialNumber => Some(self.serial_number.clone()),
            AssetField::Provider => self.provider.clone(),
            AssetField::Status => Some(self.status.as_str().to_string()),
            AssetField::Location => self.location.clone(),
            AssetField::AssignedTo => self.assigned_to.clone(),
            AssetField::EmployeeId => self.employee_id.clone(),
            AssetField::AssignedDate => stamp(&self.assigned_date),
            AssetField::ReturnDate => stamp(&self.return_date),
            AssetField::ReceivedBy => self.received_by.clone(),
            AssetField::Remarks => self.remarks.clone(),
            AssetField::AssetCondition => self.asset_condition.clone(),
            AssetField::RecoveryAmount => self.recovery_amount.map(|a| a.to_string()),
            AssetField::AssetCheck => self.asset_check.clone(),
            AssetField::FarCode => self.far_code.clone(),
            AssetField::WarrantyStart => date(&self.warranty_start),
            AssetField::WarrantyEnd => date(&self.warranty_end),
            AssetField::CreatedBy => self.created_by.clone(),
            AssetField::UpdatedBy => self.updated_by.clone(),
        }
    }

    /// Field level differences from `before` to `self`, ignoring audit stamps.
    pub fn changes_since(&self, before: &Asset) -> Vec<FieldChange> {
        AssetField::TRACKED
            .iter()
            .filter_map(|&field| {
                let old = before.field(field);
                let new = self.field(field);
                (old != new).then(|| FieldChange {
                    field: field.as_str().to_string(),
                    old_value: old,
                    new_value: new,
                })
            })
            .collect()
    }
}

/// Asset fields addressable by filters, search, schemas and edit history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetField {
    AssetId,
    Name,
    Type,
    Brand,
    Configuration,
    SerialNumber,
    Provider,
    Status,
    Location,
    AssignedTo,
    EmployeeId,
    AssignedDate,
    ReturnDate,
    ReceivedBy,
    Remarks,
    AssetCondition,
    RecoveryAmount,
    AssetCheck,
    FarCode,
    WarrantyStart,
    WarrantyEnd,
    CreatedBy,
    UpdatedBy,
}

impl AssetField {
    /// Fields whose changes are written to the edit history.
    pub const TRACKED: [AssetField; 21] = [
        AssetField::AssetId,
        AssetField::Name,
        AssetField::Type,
        AssetField::Brand,
        AssetField::Configuration,
        AssetField::SerialNumber,
        AssetField::Provider,
        AssetField::Status,
        AssetField::Location,
        AssetField::AssignedTo,
        AssetField::EmployeeId,
        AssetField::AssignedDate,
        AssetField::ReturnDate,
        AssetField::ReceivedBy,
        AssetField::Remarks,
        AssetField::AssetCondition,
        AssetField::RecoveryAmount,
        AssetField::AssetCheck,
        AssetField::FarCode,
        AssetField::WarrantyStart,
        AssetField::WarrantyEnd,
    ];

    /// Column name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssetId => "asset_id",
            Self::Name => "name",
            Self::Type => "type",
            Self::Brand => "brand",
            Self::Configuration => "configuration",
            Self::SerialNumber => "serial_number",
            Self::Provider => "provider",
            Self::Status => "status",
            Self::Location => "location",
            Self::AssignedTo => "assigned_to",
            Self::EmployeeId => "employee_id",
            Self::AssignedDate => "assigned_date",
            Self::ReturnDate => "return_date",
            Self::ReceivedBy => "received_by",
            Self::Remarks => "remarks",
            Self::AssetCondition => "asset_condition",
            Self::RecoveryAmount => "recovery_amount",
            Self::AssetCheck => "asset_check",
            Self::FarCode => "far_code",
            Self::WarrantyStart => "warranty_start",
            Self::WarrantyEnd => "warranty_end",
            Self::CreatedBy => "created_by",
            Self::UpdatedBy => "updated_by",
        }
    }

    /// Human label used in validation messages and CSV headers.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AssetId => "Asset ID",
            Self::Name => "Asset Name",
            Self::Type => "Asset Type",
            Self::Brand => "Brand",
            Self::Configuration => "Configuration",
            Self::SerialNumber => "Serial Number",
            Self::Provider => "Provider",
            Self::Status => "Status",
            Self::Location => "Location",
            Self::AssignedTo => "Employee Name",
            Self::EmployeeId => "Employee ID",
            Self::AssignedDate => "Assigned Date",
            Self::ReturnDate => "Return Date",
            Self::ReceivedBy => "Received By",
            Self::Remarks => "Remarks",
            Self::AssetCondition => "Asset Condition",
            Self::RecoveryAmount => "Recovery Amount",
            Self::AssetCheck => "Asset Check",
            Self::FarCode => "FAR Code",
            Self::WarrantyStart => "Warranty Start",
            Self::WarrantyEnd => "Warranty End",
            Self::CreatedBy => "Created By",
            Self::UpdatedBy => "Updated By",
        }
    }

    /// Column width in characters for bounded text columns.
    pub fn max_len(&self) -> Option<usize> {
        match self {
            Self::AssetId => Some(limits::ASSET_ID),
            Self::Name => Some(limits::NAME),
            Self::Type => Some(limits::ASSET_TYPE),
            Self::Brand => Some(limits::BRAND),
            Self::SerialNumber => Some(limits::SERIAL_NUMBER),
            Self::Provider => Some(limits::PROVIDER),
            Self::Location => Some(limits::LOCATION),
            Self::AssignedTo => Some(limits::EMPLOYEE_NAME),
            Self::EmployeeId => Some(limits::EMPLOYEE_ID),
            Self::ReceivedBy => Some(limits::RECEIVED_BY),
            Self::AssetCondition => Some(limits::ASSET_CONDITION),
            Self::AssetCheck => Some(limits::ASSET_CHECK),
            Self::FarCode => Some(limits::FAR_CODE),
            Self::CreatedBy | Self::UpdatedBy => Some(limits::ACTOR),
            _ => None,
        }
    }
}

/// Widths of the bounded `assets` columns. The `validator` attributes on the
/// request payloads use the same numbers.
pub mod limits {
    pub const ASSET_ID: usize = 64;
    pub const NAME: usize = 200;
    pub const ASSET_TYPE: usize = 100;
    pub const BRAND: usize = 100;
    pub const SERIAL_NUMBER: usize = 128;
    pub const PROVIDER: usize = 200;
    pub const LOCATION: usize = 200;
    pub const EMPLOYEE_ID: usize = 64;
    pub const EMPLOYEE_NAME: usize = 200;
    pub const RECEIVED_BY: usize = 200;
    pub const ASSET_CONDITION: usize = 100;
    pub const ASSET_CHECK: usize = 100;
    pub const FAR_CODE: usize = 100;
    pub const ACTOR: usize = 255;
}

impl FromStr for AssetField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.trim().to_lowercase()))
            .map_err(|_| format!("Unknown asset field: {}", s))
    }
}

/// A single field change, as written to the edit history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// Asset with derived fields, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct AssetView {
    #[serde(flatten)]
    pub asset: Asset,
    pub warranty_status: WarrantyStatus,
}

impl AssetView {
    pub fn new(asset: Asset, today: NaiveDate) -> Self {
        let warranty_status = asset.warranty_status(today);
        Self {
            asset,
            warranty_status,
        }
    }
}

/// Request payload for creating an asset.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAssetRequest {
    #[validate(length(max = 64, message = "Asset ID must be at most 64 characters"))]
    pub asset_id: String,

    #[validate(length(max = 200, message = "Asset name must be at most 200 characters"))]
    pub name: String,

    #[serde(rename = "type")]
    #[validate(length(max = 100, message = "Asset type must be at most 100 characters"))]
    pub asset_type: String,

    #[validate(length(max = 100, message = "Brand must be at most 100 characters"))]
    pub brand: String,

    pub configuration: Option<String>,

    #[validate(length(max = 128, message = "Serial number must be at most 128 characters"))]
    pub serial_number: String,

    #[validate(length(max = 200, message = "Provider must be at most 200 characters"))]
    pub provider: Option<String>,
    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: Option<String>,
    pub warranty_start: Option<NaiveDate>,
    pub warranty_end: Option<NaiveDate>,
    pub remarks: Option<String>,
    #[validate(length(max = 100, message = "Asset condition must be at most 100 characters"))]
    pub asset_condition: Option<String>,
    #[validate(length(max = 100, message = "FAR code must be at most 100 characters"))]
    pub far_code: Option<String>,

    /// Employee to assign on creation; both fields must be present.
    #[validate(length(max = 64, message = "Employee ID must be at most 64 characters"))]
    pub employee_id: Option<String>,
    #[validate(length(max = 200, message = "Employee name must be at most 200 characters"))]
    pub assigned_to: Option<String>,
}

impl CreateAssetRequest {
    /// Builds the new asset. It starts Assigned only when both the employee
    /// ID and name are given.
    pub fn into_asset(self, actor: &str, now: DateTime<Utc>) -> Asset {
        let mut asset = Asset::new(
            self.asset_id.trim(),
            self.name.trim(),
            self.asset_type.trim(),
            self.brand.trim(),
            self.serial_number.trim(),
            now,
        );
        asset.configuration = trimmed(self.configuration);
        asset.provider = trimmed(self.provider);
        asset.location = trimmed(self.location);
        asset.warranty_start = self.warranty_start;
        asset.warranty_end = self.warranty_end;
        asset.remarks = trimmed(self.remarks);
        asset.asset_condition = trimmed(self.asset_condition);
        asset.far_code = trimmed(self.far_code);

        if let (Some(employee_id), Some(name)) = (trimmed(self.employee_id), trimmed(self.assigned_to)) {
            asset.status = AssetStatus::Assigned;
            asset.employee_id = Some(employee_id);
            asset.assigned_to = Some(name);
            asset.assigned_date = Some(now);
        }

        asset.created_by = Some(actor.to_string());
        asset.updated_by = Some(actor.to_string());
        asset
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Request payload for editing descriptive asset fields.
///
/// Lifecycle fields change only through the dedicated transitions.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAssetRequest {
    #[validate(length(min = 1, max = 64, message = "Asset ID must be 1-64 characters"))]
    pub asset_id: Option<String>,
    #[validate(length(min = 1, max = 200, message = "Asset name must be 1-200 characters"))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 100, message = "Asset type must be 1-100 characters"))]
    pub asset_type: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Brand must be 1-100 characters"))]
    pub brand: Option<String>,
    pub configuration: Option<String>,
    #[validate(length(min = 1, max = 128, message = "Serial number must be 1-128 characters"))]
    pub serial_number: Option<String>,
    #[validate(length(max = 200, message = "Provider must be at most 200 characters"))]
    pub provider: Option<String>,
    pub warranty_start: Option<NaiveDate>,
    pub warranty_end: Option<NaiveDate>,
    pub remarks: Option<String>,
    #[validate(length(max = 100, message = "Asset condition must be at most 100 characters"))]
    pub asset_condition: Option<String>,
    #[validate(length(max = 100, message = "FAR code must be at most 100 characters"))]
    pub far_code: Option<String>,
}

impl UpdateAssetRequest {
    /// Returns a copy of `asset` with the provided fields overwritten.
    pub fn apply_to(&self, asset: &Asset) -> Asset {
        let mut updated = asset.clone();
        if let Some(v) = &self.asset_id {
            updated.asset_id = v.trim().to_string();
        }
        if let Some(v) = &self.name {
            updated.name = v.trim().to_string();
        }
        if let Some(v) = &self.asset_type {
            updated.asset_type = v.trim().to_string();
        }
        if let Some(v) = &self.brand {
            updated.brand = v.trim().to_string();
        }
        if let Some(v) = &self.serial_number {
            updated.serial_number = v.trim().to_string();
        }
        if self.configuration.is_some() {
            updated.configuration = self.configuration.clone();
        }
        if self.provider.is_some() {
            updated.provider = self.provider.clone();
        }
        if self.warranty_start.is_some() {
            updated.warranty_start = self.warranty_start;
        }
        if self.warranty_end.is_some() {
            updated.warranty_end = self.warranty_end;
        }
        if self.remarks.is_some() {
            updated.remarks = self.remarks.clone();
        }
        if self.asset_condition.is_some() {
            updated.asset_condition = self.asset_condition.clone();
        }
        if self.far_code.is_some() {
            updated.far_code = self.far_code.clone();
        }
        updated
    }
}

/// Request payload for assigning an asset to an employee.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssignAssetRequest {
    #[validate(
        custom(function = "validate_not_blank", message = "Employee ID is required"),
        length(max = 64, message = "Employee ID must be at most 64 characters")
    )]
    pub employee_id: String,
    #[validate(
        custom(function = "validate_not_blank", message = "Employee name is required"),
        length(max = 200, message = "Employee name must be at most 200 characters")
    )]
    pub employee_name: String,
}

/// Request payload for returning an assigned asset.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReturnAssetRequest {
    /// Status after return; defaults to Available.
    #[serde(default = "default_return_status")]
    pub target_status: AssetStatus,
    #[validate(length(max = 200, message = "Received by must be at most 200 characters"))]
    pub received_by: Option<String>,
    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: Option<String>,
    #[validate(custom(function = "validate_amount"))]
    pub recovery_amount: Option<f64>,
    pub remarks: Option<String>,
    #[validate(length(max = 100, message = "Asset condition must be at most 100 characters"))]
    pub asset_condition: Option<String>,
}

fn default_return_status() -> AssetStatus {
    AssetStatus::Available
}

/// Request payload for a direct administrative status change.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: Option<AssetStatus>,
    pub remarks: Option<String>,
}

/// Request payload for a location change.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangeLocationRequest {
    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: Option<String>,
}

/// Request payload for an asset-check update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssetCheckRequest {
    #[validate(length(max = 100, message = "Asset check must be at most 100 characters"))]
    pub asset_check: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateAssetRequest {
        CreateAssetRequest {
            asset_id: " AST-009 ".into(),
            name: "ThinkPad".into(),
            asset_type: "Laptop".into(),
            brand: "Lenovo".into(),
            configuration: Some("  ".into()),
            serial_number: "PF-9".into(),
            provider: None,
            location: Some("Pune".into()),
            warranty_start: None,
            warranty_end: None,
            remarks: None,
            asset_condition: None,
            far_code: None,
            employee_id: None,
            assigned_to: None,
        }
    }

    #[test]
    fn test_create_request_builds_available_asset() {
        let now = Utc::now();
        let asset = create_request().into_asset("ops@example.com", now);
        assert_eq!(asset.asset_id, "AST-009");
        assert_eq!(asset.status, AssetStatus::Available);
        assert_eq!(asset.configuration, None);
        assert_eq!(asset.created_by.as_deref(), Some("ops@example.com"));
        assert!(asset.assigned_date.is_none());
    }

    #[test]
    fn test_create_request_with_employee_is_assigned() {
        let now = Utc::now();
        let mut req = create_request();
        req.employee_id = Some("E1".into());
        req.assigned_to = Some("Asha".into());
        let asset = req.into_asset("ops@example.com", now);
        assert_eq!(asset.status, AssetStatus::Assigned);
        assert_eq!(asset.assigned_date, Some(now));

        let mut req = create_request();
        req.employee_id = Some("E1".into());
        let asset = req.into_asset("ops@example.com", now);
        assert_eq!(asset.status, AssetStatus::Available);
        assert!(asset.employee_id.is_none());
    }
    use chrono::TimeZone;

    fn sample() -> Asset {
        let now = Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap();
        Asset::new("AST-001", "MacBook Pro", "Laptop", "Apple", "MBP-001", now)
    }

    #[test]
    fn test_status_roundtrip_strings() {
        for status in AssetStatus::ALL {
            assert_eq!(status.as_str().parse::<AssetStatus>().unwrap(), status);
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        assert_eq!(
            "scrap/damage".parse::<AssetStatus>().unwrap(),
            AssetStatus::ScrapDamage
        );
        assert!("Borrowed".parse::<AssetStatus>().is_err());
    }

    #[test]
    fn test_status_classification() {
        assert!(!AssetStatus::Available.is_terminal());
        assert!(!AssetStatus::Assigned.is_terminal());
        assert!(AssetStatus::Sold.is_terminal());
        assert!(AssetStatus::Lost.requires_recovery_amount());
        assert!(AssetStatus::CourierDamage.requires_recovery_amount());
        assert!(!AssetStatus::ScrapDamage.requires_recovery_amount());
        assert!(!AssetStatus::Available.requires_recovery_amount());
    }

    #[test]
    fn test_warranty_status() {
        let mut asset = sample();
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(asset.warranty_status(today), WarrantyStatus::Unknown);

        asset.warranty_end = NaiveDate::from_ymd_opt(2025, 6, 1);
        assert_eq!(asset.warranty_status(today), WarrantyStatus::InWarranty);

        asset.warranty_end = NaiveDate::from_ymd_opt(2025, 5, 31);
        assert_eq!(asset.warranty_status(today), WarrantyStatus::Expired);
    }

    #[test]
    fn test_changes_since_lists_only_changed_fields() {
        let before = sample();
        let mut after = before.clone();
        after.location = Some("Pune".to_string());
        after.updated_by = Some("ops@example.com".to_string());

        let changes = after.changes_since(&before);
        assert_eq!(
            changes,
            vec![FieldChange {
                field: "location".to_string(),
                old_value: None,
                new_value: Some("Pune".to_string()),
            }]
        );
    }

    #[test]
    fn test_asset_serializes_type_field() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["type"], "Laptop");
        assert_eq!(json["status"], "Available");
    }

    #[test]
    fn test_asset_field_parse() {
        assert_eq!("brand".parse::<AssetField>().unwrap(), AssetField::Brand);
        assert_eq!(
            "serial_number".parse::<AssetField>().unwrap(),
            AssetField::SerialNumber
        );
        assert!("colour".parse::<AssetField>().is_err());
    }

    #[test]
    fn test_update_request_applies_only_present_fields() {
        let asset = sample();
        let update = UpdateAssetRequest {
            brand: Some(" Dell ".to_string()),
            remarks: Some("Keyboard replaced".to_string()),
            ..Default::default()
        };
        let updated = update.apply_to(&asset);
        assert_eq!(updated.brand, "Dell");
        assert_eq!(updated.remarks.as_deref(), Some("Keyboard replaced"));
        assert_eq!(updated.asset_id, asset.asset_id);
    }

    #[test]
    fn test_return_request_defaults_to_available() {
        let req: ReturnAssetRequest =
            serde_json::from_str(r#"{"received_by":"Store"}"#).unwrap();
        assert_eq!(req.target_status, AssetStatus::Available);
    }

    #[test]
    fn test_assign_request_rejects_blank_employee() {
        let req = AssignAssetRequest {
            employee_id: " ".to_string(),
            employee_name: "Asha".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_check_lengths_reports_first_overlong_column() {
        let mut asset = sample();
        assert_eq!(asset.check_lengths(), None);

        asset.brand = "B".repeat(limits::BRAND);
        assert_eq!(asset.check_lengths(), None);

        asset.brand = "B".repeat(limits::BRAND + 1);
        assert_eq!(
            asset.check_lengths().as_deref(),
            Some("Brand must be at most 100 characters")
        );

        asset.brand = "Apple".to_string();
        asset.remarks = Some("r".repeat(5000));
        asset.updated_by = Some("u".repeat(limits::ACTOR + 1));
        assert_eq!(
            asset.check_lengths().as_deref(),
            Some("Updated By must be at most 255 characters")
        );
    }

    #[test]
    fn test_check_lengths_counts_characters_not_bytes() {
        let mut asset = sample();
        asset.asset_id = "é".repeat(limits::ASSET_ID);
        assert_eq!(asset.check_lengths(), None);
    }

    #[test]
    fn test_requests_reject_values_wider_than_their_columns() {
        let mut req = create_request();
        assert!(req.validate().is_ok());
        req.brand = "B".repeat(limits::BRAND + 1);
        assert!(req.validate().is_err());

        let mut req = create_request();
        req.far_code = Some("F".repeat(limits::FAR_CODE + 1));
        assert!(req.validate().is_err());

        let update = UpdateAssetRequest {
            provider: Some("P".repeat(limits::PROVIDER + 1)),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let assign = AssignAssetRequest {
            employee_id: "E".repeat(limits::EMPLOYEE_ID + 1),
            employee_name: "Asha".to_string(),
        };
        assert!(assign.validate().is_err());

        let returned = ReturnAssetRequest {
            target_status: AssetStatus::Available,
            received_by: Some("R".repeat(limits::RECEIVED_BY + 1)),
            location: None,
            recovery_amount: None,
            remarks: None,
            asset_condition: None,
        };
        assert!(returned.validate().is_err());

        let location = ChangeLocationRequest {
            location: Some("L".repeat(limits::LOCATION + 1)),
        };
        assert!(location.validate().is_err());

        let check = AssetCheckRequest {
            asset_check: Some("C".repeat(limits::ASSET_CHECK + 1)),
        };
        assert!(check.validate().is_err());
        let check = AssetCheckRequest {
            asset_check: Some("Verified".to_string()),
        };
        assert!(check.validate().is_ok());
    }
}
