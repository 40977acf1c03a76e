//! Dashboard aggregates over the filtered asset list.

use axum::{
    extract::{Query, State},
    Json,
};
use domain::models::DashboardSummary;
use domain::services::{dashboard::summarize, filter_assets, AssetFilterQuery};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::services::assets::AssetService;

/// Counts per status, type and brand plus the sold recovery total.
///
/// GET /api/v1/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Query(query): Query<AssetFilterQuery>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let assets = AssetService::new(state.pool.clone()).all().await?;
    let filter = query.into_filter();
    Ok(Json(summarize(filter_assets(&assets, &filter))))
}
