//! Required-field and uniqueness rules for assets.
//!
//! Rules run against the full current collection before any write. The first
//! violated rule is reported.

use uuid::Uuid;

use crate::error::DomainError;
use crate::models::{Asset, AssetField};

/// Fields that must be non-blank on every asset.
const REQUIRED_FIELDS: [AssetField; 5] = [
    AssetField::AssetId,
    AssetField::Name,
    AssetField::Type,
    AssetField::Brand,
    AssetField::SerialNumber,
];

/// Returns the first rule the candidate violates, if any.
///
/// `exclude` is the internal id of the record being edited; it is skipped in
/// all comparisons. `require_location` is set for order and import flows.
pub fn check_asset<'a, I>(
    candidate: &Asset,
    existing: I,
    exclude: Option<Uuid>,
    require_location: bool,
) -> Option<String>
where
    I: IntoIterator<Item = &'a Asset>,
{
    for field in REQUIRED_FIELDS {
        if candidate
            .field(field)
            .map(|v| v.trim().is_empty())
            .unwrap_or(true)
        {
            return Some(format!("{} is required", field.label()));
        }
    }
    if require_location && shared::validation::is_blank_opt(candidate.location.as_deref()) {
        return Some(format!("{} is required", AssetField::Location.label()));
    }
    if let Some(message) = candidate.check_lengths() {
        return Some(message);
    }

    check_uniqueness(
        candidate.asset_id.trim(),
        candidate.serial_number.trim(),
        existing
            .into_iter()
            .filter(|a| Some(a.id) != exclude)
            .map(|a| (a.asset_id.as_str(), a.serial_number.as_str())),
    )
}

/// Checks an (asset_id, serial_number) pair against existing pairs.
///
/// Used directly by bulk import, which also checks against rows accepted
/// earlier in the same file.
pub fn check_uniqueness<'a, I>(asset_id: &str, serial_number: &str, existing: I) -> Option<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let asset_id = asset_id.trim();
    let serial_number = serial_number.trim();
    let mut id_match: Option<&str> = None;
    let mut serial_match: Option<&str> = None;

    for (other_id, other_serial) in existing {
        let other_id = other_id.trim();
        let other_serial = other_serial.trim();
        if id_match.is_none() && other_id == asset_id {
            id_match = Some(other_serial);
        }
        if serial_match.is_none() && other_serial == serial_number {
            serial_match = Some(other_id);
        }
    }

    match (id_match, serial_match) {
        (Some(serial), _) if serial != serial_number => Some(format!(
            "Asset ID {} is already in use by serial number {}",
            asset_id, serial
        )),
        (_, Some(id)) if id != asset_id => Some(format!(
            "Serial number {} is already in use by asset {}",
            serial_number, id
        )),
        (Some(_), _) | (_, Some(_)) => Some(format!("Asset ID {} is already in use", asset_id)),
        (None, None) => None,
    }
}

/// [`check_asset`] as a `Result`.
pub fn validate_asset<'a, I>(
    candidate: &Asset,
    existing: I,
    exclude: Option<Uuid>,
    require_location: bool,
) -> Result<(), DomainError>
where
    I: IntoIterator<Item = &'a Asset>,
{
    match check_asset(candidate, existing, exclude, require_location) {
        Some(message) => Err(DomainError::Validation(message)),
        None => Ok(()),
    }
}
