//! Asset list filtering, filter options and the audit view.
//!
//! Filtering is a pure function of an [`AssetFilter`] and a collection, so the
//! list view, the option lists and the dashboard all see the same subset.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::models::{Asset, AssetField, AssetStatus};

/// Fields with a multi-select filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Type,
    Brand,
    Configuration,
    Location,
    Status,
}

impl FilterField {
    pub fn asset_field(&self) -> AssetField {
        match self {
            FilterField::Type => AssetField::Type,
            FilterField::Brand => AssetField::Brand,
            FilterField::Configuration => AssetField::Configuration,
            FilterField::Location => AssetField::Location,
            FilterField::Status => AssetField::Status,
        }
    }
}

impl FromStr for FilterField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "type" | "asset_type" => Ok(FilterField::Type),
            "brand" => Ok(FilterField::Brand),
            "configuration" => Ok(FilterField::Configuration),
            "location" => Ok(FilterField::Location),
            "status" => Ok(FilterField::Status),
            _ => Err(format!("Unknown filter field: {}", s)),
        }
    }
}

/// Fields the free-text search looks at.
const SEARCH_FIELDS: [AssetField; 17] = [
    AssetField::AssetId,
    AssetField::Name,
    AssetField::Type,
    AssetField::Brand,
    AssetField::Configuration,
    AssetField::SerialNumber,
    AssetField::EmployeeId,
    AssetField::AssignedTo,
    AssetField::Status,
    AssetField::Location,
    AssetField::CreatedBy,
    AssetField::UpdatedBy,
    AssetField::ReceivedBy,
    AssetField::Remarks,
    AssetField::WarrantyStart,
    AssetField::WarrantyEnd,
    AssetField::AssetCheck,
];

/// Filter criteria for the asset list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFilter {
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub brands: Vec<String>,
    #[serde(default)]
    pub configurations: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub statuses: Vec<String>,
    pub search: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl AssetFilter {
    pub fn values(&self, field: FilterField) -> &[String] {
        match field {
            FilterField::Type => &self.types,
            FilterField::Brand => &self.brands,
            FilterField::Configuration => &self.configurations,
            FilterField::Location => &self.locations,
            FilterField::Status => &self.statuses,
        }
    }

    /// Copy of the criteria with one field's selection cleared.
    pub fn without(&self, field: FilterField) -> Self {
        let mut copy = self.clone();
        match field {
            FilterField::Type => copy.types.clear(),
            FilterField::Brand => copy.brands.clear(),
            FilterField::Configuration => copy.configurations.clear(),
            FilterField::Location => copy.locations.clear(),
            FilterField::Status => copy.statuses.clear(),
        }
        copy
    }

    pub fn matches(&self, asset: &Asset) -> bool {
        const FIELDS: [FilterField; 5] = [
            FilterField::Type,
            FilterField::Brand,
            FilterField::Configuration,
            FilterField::Location,
            FilterField::Status,
        ];

        FIELDS.iter().all(|&field| {
            let selected = self.values(field);
            selected.is_empty()
                || asset
                    .field(field.asset_field())
                    .map(|value| selected.iter().any(|s| *s == value))
                    .unwrap_or(false)
        }) && self.matches_search(asset)
            && self.matches_dates(asset)
    }

    fn matches_search(&self, asset: &Asset) -> bool {
        let query = match self.search.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => q.to_lowercase(),
            _ => return true,
        };
        SEARCH_FIELDS.iter().any(|&field| {
            asset
                .field(field)
                .map(|value| value.to_lowercase().contains(&query))
                .unwrap_or(false)
        })
    }

    fn matches_dates(&self, asset: &Asset) -> bool {
        if self.from.is_none() && self.to.is_none() {
            return true;
        }
        let start = self.from.map(start_of_day);
        let end = self.to.map(end_of_day);
        let in_range = |ts: DateTime<Utc>| {
            start.map(|s| ts >= s).unwrap_or(true) && end.map(|e| ts <= e).unwrap_or(true)
        };
        asset.assigned_date.map(in_range).unwrap_or(false)
            || asset.return_date.map(in_range).unwrap_or(false)
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + Duration::days(1) - Duration::milliseconds(1)
}

/// Query string form of [`AssetFilter`]; list values are comma separated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetFilterQuery {
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
    pub brand: Option<String>,
    pub configuration: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl AssetFilterQuery {
    pub fn into_filter(self) -> AssetFilter {
        AssetFilter {
            types: split_list(self.asset_type),
            brands: split_list(self.brand),
            configurations: split_list(self.configuration),
            locations: split_list(self.location),
            statuses: split_list(self.status),
            search: self.search.filter(|s| !s.trim().is_empty()),
            from: self.from,
            to: self.to,
        }
    }
}

fn split_list(value: Option<String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Assets matching the criteria, in input order.
pub fn filter_assets<'a>(assets: &'a [Asset], filter: &AssetFilter) -> Vec<&'a Asset> {
    assets.iter().filter(|a| filter.matches(a)).collect()
}

/// Sorted unique values of `field` among assets matching every criterion
/// except the field's own selection.
pub fn options_for(field: FilterField, filter: &AssetFilter, assets: &[Asset]) -> Vec<String> {
    let relaxed = filter.without(field);
    assets
        .iter()
        .filter(|a| relaxed.matches(a))
        .filter_map(|a| a.field(field.asset_field()))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The audit view: the filtered list without Assigned assets.
pub fn audit_view<'a>(assets: &'a [Asset], filter: &AssetFilter) -> Vec<&'a Asset> {
    assets
        .iter()
        .filter(|a| a.status != AssetStatus::Assigned && filter.matches(a))
        .collect()
}

/// Filter options for the audit view; Assigned never appears as a status.
pub fn audit_options_for(field: FilterField, filter: &AssetFilter, assets: &[Asset]) -> Vec<String> {
    let visible: Vec<Asset> = assets
        .iter()
        .filter(|a| a.status != AssetStatus::Assigned)
        .cloned()
        .collect();
    options_for(field, filter, &visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::lorem::en::Word;
    use fake::Fake;

    fn asset(id: &str, asset_type: &str, brand: &str, location: &str, status: AssetStatus) -> Asset {
        let serial = format!("SN-{}-{}", id, Word().fake::<String>());
        let mut asset = Asset::new(id, "Device", asset_type, brand, serial, Utc::now());
        asset.location = Some(location.to_string());
        asset.status = status;
        asset
    }

    fn fleet() -> Vec<Asset> {
        vec![
            asset("A1", "Laptop", "Dell", "Pune", AssetStatus::Available),
            asset("A2", "Laptop", "Apple", "Mumbai", AssetStatus::Assigned),
            asset("A3", "Mobile", "Samsung", "Pune", AssetStatus::Assigned),
            asset("A4", "Mobile", "Apple", "Delhi", AssetStatus::Sold),
        ]
    }

    fn ids(assets: &[&Asset]) -> Vec<String> {
        assets.iter().map(|a| a.asset_id.clone()).collect()
    }

    #[test]
    fn test_empty_filter_returns_everything() {
        let assets = fleet();
        assert_eq!(filter_assets(&assets, &AssetFilter::default()).len(), 4);
    }

    #[test]
    fn test_multi_select_and_intersection() {
        let assets = fleet();
        let filter = AssetFilter {
            types: vec!["Laptop".into(), "Mobile".into()],
            locations: vec!["Pune".into()],
            ..Default::default()
        };
        assert_eq!(ids(&filter_assets(&assets, &filter)), vec!["A1", "A3"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let assets = fleet();
        let filter = AssetFilter {
            brands: vec!["Apple".into()],
            ..Default::default()
        };
        let once: Vec<Asset> = filter_assets(&assets, &filter).into_iter().cloned().collect();
        let twice: Vec<Asset> = filter_assets(&once, &filter).into_iter().cloned().collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let mut assets = fleet();
        assets[1].assigned_to = Some("Asha Rao".into());
        assets[2].remarks = Some("Screen cracked".into());

        let by_name = AssetFilter {
            search: Some("asha".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_assets(&assets, &by_name)), vec!["A2"]);

        let by_remark = AssetFilter {
            search: Some("CRACKED".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_assets(&assets, &by_remark)), vec!["A3"]);

        let blank = AssetFilter {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(filter_assets(&assets, &blank).len(), 4);
    }

    #[test]
    fn test_date_range_is_inclusive_of_whole_days() {
        let mut assets = fleet();
        assets[0].assigned_date = Some(Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 59).unwrap());
        assets[1].return_date = Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        assets[2].assigned_date = Some(Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap());

        let filter = AssetFilter {
            from: NaiveDate::from_ymd_opt(2025, 1, 1),
            to: NaiveDate::from_ymd_opt(2025, 1, 31),
            ..Default::default()
        };
        assert_eq!(ids(&filter_assets(&assets, &filter)), vec!["A1", "A2"]);

        let open_ended = AssetFilter {
            from: NaiveDate::from_ymd_opt(2025, 1, 15),
            ..Default::default()
        };
        assert_eq!(ids(&filter_assets(&assets, &open_ended)), vec!["A1", "A3"]);
    }

    #[test]
    fn test_options_ignore_own_selection() {
        let assets = fleet();
        let filter = AssetFilter {
            brands: vec!["Apple".into()],
            locations: vec!["Pune".into(), "Mumbai".into()],
            ..Default::default()
        };
        assert_eq!(
            options_for(FilterField::Brand, &filter, &assets),
            vec!["Apple", "Dell", "Samsung"]
        );
        assert_eq!(
            options_for(FilterField::Location, &filter, &assets),
            vec!["Delhi", "Mumbai"]
        );
    }

    #[test]
    fn test_options_skip_empty_values() {
        let mut assets = fleet();
        assets[0].configuration = Some("16GB".into());
        assets[1].configuration = Some("  ".into());
        assert_eq!(
            options_for(FilterField::Configuration, &AssetFilter::default(), &assets),
            vec!["16GB"]
        );
    }

    #[test]
    fn test_audit_view_excludes_assigned() {
        let assets = fleet();
        assert_eq!(ids(&audit_view(&assets, &AssetFilter::default())), vec!["A1", "A4"]);
        assert_eq!(
            audit_options_for(FilterField::Status, &AssetFilter::default(), &assets),
            vec!["Available", "Sold"]
        );
    }

    #[test]
    fn test_query_parsing() {
        let query = AssetFilterQuery {
            asset_type: Some("Laptop, Mobile,".into()),
            status: Some("Scrap/Damage".into()),
            search: Some(" ".into()),
            ..Default::default()
        };
        let filter = query.into_filter();
        assert_eq!(filter.types, vec!["Laptop", "Mobile"]);
        assert_eq!(filter.statuses, vec!["Scrap/Damage"]);
        assert_eq!(filter.search, None);
        assert_eq!("asset_type".parse::<FilterField>().unwrap(), FilterField::Type);
    }
}
