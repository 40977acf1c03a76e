//! Dashboard aggregates.

use crate::models::{Asset, AssetStatus, DashboardSummary};

/// Aggregates an (already filtered) asset collection.
pub fn summarize<'a, I>(assets: I) -> DashboardSummary
where
    I: IntoIterator<Item = &'a Asset>,
{
    let mut summary = DashboardSummary::default();

    for asset in assets {
        let status = asset.status.as_str().to_string();
        *summary.by_status.entry(status.clone()).or_default() += 1;
        *summary
            .by_type_within_status
            .entry(status)
            .or_default()
            .entry(asset.asset_type.clone())
            .or_default() += 1;

        if asset.status == AssetStatus::Sold {
            summary.sold_recovery_total += asset.recovery_amount.unwrap_or(0.0);
        } else {
            summary.total += 1;
            *summary.by_brand.entry(asset.brand.clone()).or_default() += 1;
        }
    }

    summary
}
