//! Stock movement orders.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialType {
    Inward,
    Outward,
}

impl MaterialType {
    /// Stock and Return orders bring material in; every other order type sends it out.
    pub fn from_order_type(order_type: &str) -> Self {
        let normalized = order_type.trim();
        if normalized.eq_ignore_ascii_case("stock") || normalized.eq_ignore_ascii_case("return") {
            MaterialType::Inward
        } else {
            MaterialType::Outward
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialType::Inward => "Inward",
            MaterialType::Outward => "Outward",
        }
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MaterialType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inward" => Ok(MaterialType::Inward),
            "outward" => Ok(MaterialType::Outward),
            _ => Err(format!("Invalid material type: {}", s)),
        }
    }
}

/// A stock movement record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_type: String,
    pub material_type: MaterialType,
    pub asset_type: String,
    pub model: String,
    pub configuration: Option<String>,
    pub product: Option<String>,
    pub sd_card_size: Option<String>,
    pub profile_id: Option<String>,
    pub quantity: i32,
    pub warehouse: String,
    pub sales_order: String,
    pub employee_id: Option<String>,
    pub employee_name: Option<String>,
    pub serial_numbers: Vec<String>,
    pub remarks: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Only the user who created an order may edit or delete it.
    pub fn is_owned_by(&self, email: &str) -> bool {
        self.created_by
            .as_deref()
            .map(|creator| creator.eq_ignore_ascii_case(email))
            .unwrap_or(false)
    }
}

/// Generates a sales order code of the form `SO-YYYYMMDD-XXXXXX`.
pub fn generate_sales_order_code(now: DateTime<Utc>) -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("SO-{}-{}", now.format("%Y%m%d"), suffix)
}

/// Per-unit attributes of an order, kept aligned with its quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    quantity: usize,
    serial_numbers: Vec<String>,
    statuses: Vec<String>,
    groups: Vec<String>,
    conditions: Vec<String>,
}

impl OrderLine {
    pub fn new(quantity: usize) -> Self {
        let mut line = Self::default();
        line.resize(quantity);
        line
    }

    /// Builds a line from submitted per-unit values, aligning them to `quantity`.
    pub fn from_parts(
        quantity: usize,
        serial_numbers: Vec<String>,
        statuses: Vec<String>,
        groups: Vec<String>,
        conditions: Vec<String>,
    ) -> Self {
        let mut line = Self {
            quantity,
            serial_numbers,
            statuses,
            groups,
            conditions,
        };
        line.resize(quantity);
        line
    }

    /// Changes the quantity, truncating or padding every per-unit list.
    ///
    /// New units start with an empty serial, status `Available`, no group and
    /// condition `Good`.
    pub fn resize(&mut self, quantity: usize) {
        self.quantity = quantity;
        self.serial_numbers.resize(quantity, String::new());
        self.statuses.resize(quantity, "Available".to_string());
        self.groups.resize(quantity, String::new());
        self.conditions.resize(quantity, "Good".to_string());
    }

    pub fn quantity(&self) -> usize {
        self.quantity
    }

    pub fn serial_numbers(&self) -> &[String] {
        &self.serial_numbers
    }

    /// Serial numbers that were actually filled in.
    pub fn filled_serials(&self) -> Vec<String> {
        self.serial_numbers
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn units(&self) -> impl Iterator<Item = OrderUnit<'_>> {
        (0..self.quantity).map(move |i| OrderUnit {
            serial_number: self.serial_numbers[i].trim(),
            status: &self.statuses[i],
            group: &self.groups[i],
            condition: &self.conditions[i],
        })
    }
}

/// One unit of an [`OrderLine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderUnit<'a> {
    pub serial_number: &'a str,
    pub status: &'a str,
    pub group: &'a str,
    pub condition: &'a str,
}

/// Largest quantity a single order line may carry.
pub const MAX_ORDER_QUANTITY: i32 = 100_000;

/// Request payload for creating or replacing an order.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, max = 64, message = "Order type is required"))]
    pub order_type: String,

    #[validate(length(min = 1, max = 100, message = "Asset type is required"))]
    pub asset_type: String,

    #[validate(length(min = 1, max = 200, message = "Model is required"))]
    pub model: String,

    pub configuration: Option<String>,
    #[validate(length(max = 200, message = "Product must be at most 200 characters"))]
    pub product: Option<String>,
    #[validate(length(max = 50, message = "SD card size must be at most 50 characters"))]
    pub sd_card_size: Option<String>,
    #[validate(length(max = 100, message = "Profile ID must be at most 100 characters"))]
    pub profile_id: Option<String>,

    #[validate(range(min = 1, max = 100000, message = "Quantity must be between 1 and 100000"))]
    pub quantity: i32,

    #[validate(length(min = 1, max = 200, message = "Location is required"))]
    pub warehouse: String,

    #[validate(length(max = 64, message = "Sales order must be at most 64 characters"))]
    pub sales_order: Option<String>,
    #[validate(length(max = 64, message = "Employee ID must be at most 64 characters"))]
    pub employee_id: Option<String>,
    #[validate(length(max = 200, message = "Employee name must be at most 200 characters"))]
    pub employee_name: Option<String>,

    #[serde(default)]
    pub serial_numbers: Vec<String>,
    #[serde(default)]
    pub asset_statuses: Vec<String>,
    #[serde(default)]
    pub asset_groups: Vec<String>,
    #[serde(default)]
    pub asset_conditions: Vec<String>,

    pub remarks: Option<String>,
}

impl CreateOrderRequest {
    pub fn material_type(&self) -> MaterialType {
        MaterialType::from_order_type(&self.order_type)
    }

    pub fn line(&self) -> OrderLine {
        OrderLine::from_parts(
            self.quantity.max(0) as usize,
            self.serial_numbers.clone(),
            self.asset_statuses.clone(),
            self.asset_groups.clone(),
            self.asset_conditions.clone(),
        )
    }
}

/// Immutable order history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderHistoryEntry {
    pub id: i64,
    pub order_id: Uuid,
    pub action: String,
    pub snapshot: serde_json::Value,
    pub actor: Option<String>,
    pub created_at: DateTime<Utc>,
}
