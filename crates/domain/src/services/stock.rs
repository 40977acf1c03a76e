//! Stock levels, employee holdings and serial movement checks over the order ledger.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::DomainError;
use crate::models::{Device, MaterialType, Order, SerialState};

/// Stock for one (warehouse, asset type, model).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockRow {
    pub warehouse: String,
    pub asset_type: String,
    pub model: String,
    pub inward: i64,
    pub outward: i64,
    pub stock: i64,
}

/// Holdings of one employee for one (asset type, model).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeStockRow {
    pub employee_id: String,
    pub employee_name: Option<String>,
    pub asset_type: String,
    pub model: String,
    pub dispatched: i64,
    pub received: i64,
    pub pending: i64,
}

/// Inward minus outward quantity per (warehouse, asset type, model), sorted by key.
pub fn stock_summary<'a, I>(orders: I) -> Vec<StockRow>
where
    I: IntoIterator<Item = &'a Order>,
{
    let mut totals: BTreeMap<(String, String, String), (i64, i64)> = BTreeMap::new();
    for order in orders {
        let entry = totals
            .entry((
                order.warehouse.clone(),
                order.asset_type.clone(),
                order.model.clone(),
            ))
            .or_default();
        match order.material_type {
            MaterialType::Inward => entry.0 += i64::from(order.quantity),
            MaterialType::Outward => entry.1 += i64::from(order.quantity),
        }
    }

    totals
        .into_iter()
        .map(|((warehouse, asset_type, model), (inward, outward))| StockRow {
            warehouse,
            asset_type,
            model,
            inward,
            outward,
            stock: inward - outward,
        })
        .collect()
}

/// Dispatched (outward) versus received (inward) quantity per employee.
///
/// Orders without an employee are ignored.
pub fn employee_summary<'a, I>(orders: I) -> Vec<EmployeeStockRow>
where
    I: IntoIterator<Item = &'a Order>,
{
    let mut totals: BTreeMap<(String, String, String), (Option<String>, i64, i64)> =
        BTreeMap::new();
    for order in orders {
        let employee_id = match order.employee_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => continue,
        };
        let entry = totals
            .entry((employee_id, order.asset_type.clone(), order.model.clone()))
            .or_default();
        if entry.0.is_none() {
            entry.0 = order.employee_name.clone();
        }
        match order.material_type {
            MaterialType::Outward => entry.1 += i64::from(order.quantity),
            MaterialType::Inward => entry.2 += i64::from(order.quantity),
        }
    }

    totals
        .into_iter()
        .map(
            |((employee_id, asset_type, model), (employee_name, dispatched, received))| {
                EmployeeStockRow {
                    employee_id,
                    employee_name,
                    asset_type,
                    model,
                    dispatched,
                    received,
                    pending: dispatched - received,
                }
            },
        )
        .collect()
}

/// Latest non-deleted state of every serial in `devices`.
pub fn latest_states<'a, I>(devices: I) -> HashMap<String, SerialState>
where
    I: IntoIterator<Item = &'a Device>,
{
    let mut latest: HashMap<String, SerialState> = HashMap::new();
    for device in devices.into_iter().filter(|d| !d.is_deleted()) {
        let serial = device.serial_number.trim();
        match latest.get(serial) {
            Some(current) if current.updated_at >= device.updated_at => {}
            _ => {
                latest.insert(serial.to_string(), SerialState::from(device));
            }
        }
    }
    latest
}

/// Checks that every serial may move in the given direction at `warehouse`.
///
/// All offending serials are reported together.
pub fn validate_serials(
    serials: &[String],
    material_type: MaterialType,
    warehouse: &str,
    latest: &HashMap<String, SerialState>,
) -> Result<(), DomainError> {
    let warehouse = warehouse.trim();
    let mut seen = HashSet::new();
    let mut problems = Vec::new();

    for serial in serials.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        if !seen.insert(serial) {
            problems.push(format!("{} is duplicated in this order", serial));
            continue;
        }

        let state = latest.get(serial);
        match material_type {
            MaterialType::Inward => {
                if let Some(state) = state {
                    if state.material_type == MaterialType::Inward && state.warehouse != warehouse {
                        problems.push(format!(
                            "{} is already in stock at {}",
                            serial, state.warehouse
                        ));
                    }
                }
            }
            MaterialType::Outward => match state {
                None => problems.push(format!("{} has no stock record", serial)),
                Some(state) if state.warehouse != warehouse => problems.push(format!(
                    "{} is at {}, not {}",
                    serial, state.warehouse, warehouse
                )),
                Some(state) if state.material_type == MaterialType::Outward => {
                    problems.push(format!("{} is not in stock at {}", serial, warehouse))
                }
                Some(_) => {}
            },
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(DomainError::SerialConflicts(problems))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn order(order_type: &str, warehouse: &str, asset_type: &str, quantity: i32, employee: Option<&str>) -> Order {
        let now = Utc::now();
        Order {
            id: Uuid::new_v4(),
            order_type: order_type.into(),
            material_type: MaterialType::from_order_type(order_type),
            asset_type: asset_type.into(),
            model: "M1".into(),
            configuration: None,
            product: None,
            sd_card_size: None,
            profile_id: None,
            quantity,
            warehouse: warehouse.into(),
            sales_order: "SO-1".into(),
            employee_id: employee.map(str::to_string),
            employee_name: employee.map(|e| format!("Employee {}", e)),
            serial_numbers: vec![],
            remarks: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn device(serial: &str, warehouse: &str, material: MaterialType, at: DateTime<Utc>) -> Device {
        Device {
            id: Uuid::new_v4(),
            serial_number: serial.into(),
            asset_type: "Laptop".into(),
            model: "M1".into(),
            warehouse: warehouse.into(),
            material_type: material,
            status: None,
            asset_group: None,
            asset_condition: None,
            far_code: None,
            order_id: None,
            created_at: at,
            updated_at: at,
            deleted_at: None,
        }
    }

    #[test]
    fn test_stock_is_inward_minus_outward() {
        let orders = vec![
            order("Stock", "WH1", "TypeA", 5, None),
            order("New Joinee", "WH1", "TypeA", 2, Some("E1")),
        ];
        let rows = stock_summary(&orders);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].inward, 5);
        assert_eq!(rows[0].outward, 2);
        assert_eq!(rows[0].stock, 3);
    }

    #[test]
    fn test_stock_rows_sorted_by_key() {
        let orders = vec![
            order("Stock", "WH2", "Laptop", 1, None),
            order("Stock", "WH1", "Mobile", 1, None),
            order("Stock", "WH1", "Laptop", 1, None),
        ];
        let keys: Vec<_> = stock_summary(&orders)
            .into_iter()
            .map(|r| (r.warehouse, r.asset_type))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("WH1".to_string(), "Laptop".to_string()),
                ("WH1".to_string(), "Mobile".to_string()),
                ("WH2".to_string(), "Laptop".to_string()),
            ]
        );
    }

    #[test]
    fn test_employee_summary() {
        let orders = vec![
            order("New Joinee", "WH1", "Laptop", 3, Some("E1")),
            order("Return", "WH1", "Laptop", 1, Some("E1")),
            order("Stock", "WH1", "Laptop", 10, None),
        ];
        let rows = employee_summary(&orders);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].employee_id, "E1");
        assert_eq!(rows[0].employee_name.as_deref(), Some("Employee E1"));
        assert_eq!(rows[0].dispatched, 3);
        assert_eq!(rows[0].received, 1);
        assert_eq!(rows[0].pending, 2);
    }

    #[test]
    fn test_latest_state_ignores_deleted_and_older_rows() {
        let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut deleted = device("SN1", "WH9", MaterialType::Inward, t0 + Duration::days(5));
        deleted.deleted_at = Some(t0 + Duration::days(6));
        let devices = vec![
            device("SN1", "WH1", MaterialType::Outward, t0 + Duration::days(2)),
            device("SN1", "WH1", MaterialType::Inward, t0),
            deleted,
        ];

        let latest = latest_states(&devices);
        let state = &latest["SN1"];
        assert_eq!(state.material_type, MaterialType::Outward);
        assert_eq!(state.warehouse, "WH1");
    }

    #[test]
    fn test_duplicate_serial_in_submission() {
        let err = validate_serials(
            &["A".into(), "B".into(), " A ".into()],
            MaterialType::Inward,
            "WH1",
            &HashMap::new(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            DomainError::SerialConflicts(vec!["A is duplicated in this order".into()])
        );
    }

    #[test]
    fn test_inward_rejected_when_in_stock_elsewhere() {
        let t0 = Utc::now();
        let latest = latest_states(&[
            device("SN1", "WH2", MaterialType::Inward, t0),
            device("SN2", "WH2", MaterialType::Outward, t0),
        ]);
        let err = validate_serials(&["SN1".into(), "SN2".into()], MaterialType::Inward, "WH1", &latest)
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::SerialConflicts(vec!["SN1 is already in stock at WH2".into()])
        );
    }

    #[test]
    fn test_outward_reports_all_offenders() {
        let t0 = Utc::now();
        let latest = latest_states(&[
            device("IN-WH1", "WH1", MaterialType::Inward, t0),
            device("OUT-WH1", "WH1", MaterialType::Outward, t0),
            device("IN-WH2", "WH2", MaterialType::Inward, t0),
        ]);
        let serials: Vec<String> = ["IN-WH1", "OUT-WH1", "IN-WH2", "GHOST"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let err = validate_serials(&serials, MaterialType::Outward, "WH1", &latest).unwrap_err();
        match err {
            DomainError::SerialConflicts(problems) => assert_eq!(
                problems,
                vec![
                    "OUT-WH1 is not in stock at WH1".to_string(),
                    "IN-WH2 is at WH2, not WH1".to_string(),
                    "GHOST has no stock record".to_string(),
                ]
            ),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_outward_in_stock_passes() {
        let latest = latest_states(&[device("SN1", "WH1", MaterialType::Inward, Utc::now())]);
        assert!(validate_serials(&["SN1".into()], MaterialType::Outward, "WH1", &latest).is_ok());
    }
}
