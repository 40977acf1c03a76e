//! Dashboard aggregate models.

use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregates over a filtered asset collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Number of assets, Sold excluded.
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    /// Counts per asset type within each status.
    pub by_type_within_status: BTreeMap<String, BTreeMap<String, usize>>,
    /// Counts per brand, Sold excluded.
    pub by_brand: BTreeMap<String, usize>,
    /// Sum of recovery amounts over Sold assets.
    pub sold_recovery_total: f64,
}
