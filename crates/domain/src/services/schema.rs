//! Declarative required/optional field schemas per asset type and order type.

use serde::Serialize;

/// Field requirements for one asset type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetTypeSchema {
    pub asset_type: String,
    pub required: Vec<&'static str>,
    pub optional: Vec<&'static str>,
    /// Whether each unit carries its own serial number.
    pub tracks_serials: bool,
}

const BASE_REQUIRED: [&str; 5] = ["asset_id", "name", "brand", "serial_number", "location"];

impl AssetTypeSchema {
    pub fn for_type(asset_type: &str) -> Self {
        let normalized = asset_type.trim().to_lowercase();
        let (extra_optional, tracks_serials): (&[&'static str], bool) = match normalized.as_str() {
            "laptop" | "desktop" => (&["configuration", "provider", "warranty_start", "warranty_end", "far_code"], true),
            "tablet" | "mobile" => (&["configuration", "provider", "warranty_start", "warranty_end"], true),
            "pos device" | "pos" => (&["configuration", "provider", "far_code"], true),
            "monitor" | "printer" => (&["provider", "warranty_start", "warranty_end", "far_code"], true),
            "sd card" => (&["configuration"], false),
            "accessory" => (&["provider"], false),
            _ => (&["configuration", "provider", "warranty_start", "warranty_end"], true),
        };

        let required = if tracks_serials {
            BASE_REQUIRED.to_vec()
        } else {
            BASE_REQUIRED
                .iter()
                .copied()
                .filter(|f| *f != "serial_number")
                .collect()
        };
        let mut optional = extra_optional.to_vec();
        if !tracks_serials {
            optional.push("serial_number");
        }

        Self {
            asset_type: asset_type.trim().to_string(),
            required,
            optional,
            tracks_serials,
        }
    }
}

/// Field requirements for one order type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderTypeSchema {
    pub order_type: String,
    pub required: Vec<&'static str>,
}

const ORDER_BASE_REQUIRED: [&str; 5] = ["order_type", "asset_type", "model", "warehouse", "quantity"];

impl OrderTypeSchema {
    /// Outward order types need the receiving employee; inward ones do not.
    pub fn for_type(order_type: &str) -> Self {
        let mut required = ORDER_BASE_REQUIRED.to_vec();
        let normalized = order_type.trim().to_lowercase();
        match normalized.as_str() {
            "stock" => {}
            "return" => required.push("employee_id"),
            _ => {
                required.push("employee_id");
                required.push("employee_name");
            }
        }
        Self {
            order_type: order_type.trim().to_string(),
            required,
        }
    }
}

/// Required fields whose value, looked up with `value_of`, is missing or blank.
pub fn missing_required<F>(required: &[&'static str], value_of: F) -> Vec<&'static str>
where
    F: Fn(&str) -> Option<String>,
{
    required
        .iter()
        .copied()
        .filter(|field| {
            value_of(field)
                .map(|v| v.trim().is_empty())
                .unwrap_or(true)
        })
        .collect()
}
