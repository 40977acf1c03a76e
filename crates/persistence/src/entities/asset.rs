//! Asset entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::{Asset, AssetStatus};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the assets table.
#[derive(Debug, Clone, FromRow)]
pub struct AssetEntity {
    pub id: Uuid,
    pub asset_id: String,
    pub name: String,
    pub asset_type: String,
    pub brand: String,
    pub configuration: Option<String>,
    pub serial_number: String,
    pub provider: Option<String>,
    pub status: String,
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

/// Column list shared by every asset query.
pub const ASSET_COLUMNS: &str = "id, asset_id, name, asset_type, brand, configuration, serial_number, \
     provider, status, location, assigned_to, employee_id, assigned_date, return_date, received_by, \
     remarks, asset_condition, recovery_amount, asset_check, far_code, warranty_start, warranty_end, \
     created_by, created_at, updated_by, updated_at";

impl From<AssetEntity> for Asset {
    fn from(entity: AssetEntity) -> Self {
        Self {
            id: entity.id,
            asset_id: entity.asset_id,
            name: entity.name,
            asset_type: entity.asset_type,
            brand: entity.brand,
            configuration: entity.configuration,
            serial_number: entity.serial_number,
            provider: entity.provider,
            status: entity.status.parse().unwrap_or(AssetStatus::Others), // Unknown legacy values
            location: entity.location,
            assigned_to: entity.assigned_to,
            employee_id: entity.employee_id,
            assigned_date: entity.assigned_date,
            return_date: entity.return_date,
            received_by: entity.received_by,
            remarks: entity.remarks,
            asset_condition: entity.asset_condition,
            recovery_amount: entity.recovery_amount,
            asset_check: entity.asset_check,
            far_code: entity.far_code,
            warranty_start: entity.warranty_start,
            warranty_end: entity.warranty_end,
            created_by: entity.created_by,
            created_at: entity.created_at,
            updated_by: entity.updated_by,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::company::en::CompanyName;
    use fake::Fake;

    fn entity(status: &str) -> AssetEntity {
        let now = Utc::now();
        AssetEntity {
            id: Uuid::new_v4(),
            asset_id: "AST-100".into(),
            name: "Latitude".into(),
            asset_type: "Laptop".into(),
            brand: CompanyName().fake(),
            configuration: None,
            serial_number: "DL-100".into(),
            provider: None,
            status: status.into(),
            location: Some("Pune".into()),
            assigned_to: None,
            employee_id: None,
            assigned_date: None,
            return_date: None,
            received_by: None,
            remarks: None,
            asset_condition: None,
            recovery_amount: Some(10.0),
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

    #[test]
    fn test_asset_entity_to_domain() {
        let entity = entity("Scrap/Damage");
        let asset: Asset = entity.clone().into();
        assert_eq!(asset.id, entity.id);
        assert_eq!(asset.brand, entity.brand);
        assert_eq!(asset.status, AssetStatus::ScrapDamage);
        assert_eq!(asset.recovery_amount, Some(10.0));
    }

    #[test]
    fn test_unknown_status_falls_back() {
        let asset: Asset = entity("In Repair").into();
        assert_eq!(asset.status, AssetStatus::Others);
    }
}
