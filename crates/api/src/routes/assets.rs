//! Asset routes: listing, filters, CRUD, lifecycle actions and CSV.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::Utc;
use domain::models::{
    Asset, AssetCheckRequest, AssetView, AssignAssetRequest, BulkImportResponse,
    ChangeLocationRequest, ChangeStatusRequest, CreateAssetRequest, EditEntity, EditHistoryEntry, PendingRequest,
    RequestPayload, ReturnAssetRequest, UpdateAssetRequest, UserRole,
};
use domain::services::{
    asset_csv, audit_options_for, audit_view, filter_assets, options_for,
    status_options as status_dialog, AssetFilterQuery, FilterField, StatusDialog, Transition,
};
use persistence::repositories::{AssetRepository, EditHistoryRepository};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::{
    record_asset_transition, record_assets_imported, record_import_rejections,
};
use crate::routes::csv_response;
use crate::services::assets::{AssetService, StoredAction};

/// Export query: `format=template` (default) or `format=full`.
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

/// Template query: `example=true` adds a sample row.
#[derive(Debug, Default, Deserialize)]
pub struct TemplateQuery {
    #[serde(default)]
    pub example: bool,
}

/// Outcome of an assign or return action.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionResponse {
    /// Applied immediately.
    Applied { asset: Asset },
    /// Waiting for an admin to review.
    Queued { request: PendingRequest },
}

fn parse_field(field: &str) -> Result<FilterField, ApiError> {
    field.parse::<FilterField>().map_err(ApiError::Validation)
}

fn views<'a>(assets: impl IntoIterator<Item = &'a Asset>) -> Vec<AssetView> {
    let today = Utc::now().date_naive();
    assets
        .into_iter()
        .map(|a| AssetView::new(a.clone(), today))
        .collect()
}

/// List assets matching the filter query.
///
/// GET /api/v1/assets
pub async fn list_assets(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Query(query): Query<AssetFilterQuery>,
) -> Result<Json<Vec<AssetView>>, ApiError> {
    let assets = AssetService::new(state.pool.clone()).all().await?;
    let filter = query.into_filter();
    Ok(Json(views(filter_assets(&assets, &filter))))
}

/// Values available for one filter, given the other active filters.
///
/// GET /api/v1/assets/options/:field
pub async fn filter_options(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Path(field): Path<String>,
    Query(query): Query<AssetFilterQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let field = parse_field(&field)?;
    let assets = AssetService::new(state.pool.clone()).all().await?;
    Ok(Json(options_for(field, &query.into_filter(), &assets)))
}

/// Audit list: the filtered assets that are not currently assigned.
///
/// GET /api/v1/assets/audit
pub async fn audit_assets(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Query(query): Query<AssetFilterQuery>,
) -> Result<Json<Vec<AssetView>>, ApiError> {
    let assets = AssetService::new(state.pool.clone()).all().await?;
    let filter = query.into_filter();
    Ok(Json(views(audit_view(&assets, &filter))))
}

/// GET /api/v1/assets/audit/options/:field
pub async fn audit_filter_options(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Path(field): Path<String>,
    Query(query): Query<AssetFilterQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let field = parse_field(&field)?;
    let assets = AssetService::new(state.pool.clone()).all().await?;
    Ok(Json(audit_options_for(field, &query.into_filter(), &assets)))
}

/// Create an asset.
///
/// POST /api/v1/assets
pub async fn create_asset(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<CreateAssetRequest>,
) -> Result<(StatusCode, Json<AssetView>), ApiError> {
    request.validate()?;

    let asset = request.into_asset(user_auth.actor(), Utc::now());
    let created = AssetService::new(state.pool.clone())
        .create(asset)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Asset rejected");
            e
        })?;

    info!(
        id = %created.id,
        asset_id = %created.asset_id,
        user_id = %user_auth.user_id,
        "Asset created"
    );

    let today = Utc::now().date_naive();
    Ok((StatusCode::CREATED, Json(AssetView::new(created, today))))
}

/// GET /api/v1/assets/:id
pub async fn get_asset(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<AssetView>, ApiError> {
    let asset = AssetService::new(state.pool.clone()).get(id).await?;
    Ok(Json(AssetView::new(asset, Utc::now().date_naive())))
}

/// Edit descriptive fields.
///
/// PUT /api/v1/assets/:id
pub async fn update_asset(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAssetRequest>,
) -> Result<Json<AssetView>, ApiError> {
    request.validate()?;

    let service = AssetService::new(state.pool.clone());
    let current = service.get(id).await?;
    let next = request.apply_to(&current);
    let updated = service.update(&current, next, user_auth.actor()).await?;

    info!(id = %id, user_id = %user_auth.user_id, "Asset updated");
    Ok(Json(AssetView::new(updated, Utc::now().date_naive())))
}

/// Soft-delete an asset. Admins only.
///
/// DELETE /api/v1/assets/:id
pub async fn delete_asset(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    user_auth.require(UserRole::can_delete_assets, "Only admins can delete assets")?;

    let deleted = AssetRepository::new(state.pool.clone())
        .soft_delete(id, user_auth.actor())
        .await?;
    if !deleted {
        return Err(ApiError::NotFound("Asset not found".to_string()));
    }

    info!(id = %id, user_id = %user_auth.user_id, "Asset deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn submit(
    state: &AppState,
    user_auth: &UserAuth,
    id: Uuid,
    payload: RequestPayload,
) -> Result<(StatusCode, Json<ActionResponse>), ApiError> {
    let kind = payload.kind();
    let outcome = AssetService::new(state.pool.clone())
        .submit(user_auth.role, id, payload, user_auth.actor())
        .await?;

    match outcome {
        StoredAction::Applied(asset) => {
            record_asset_transition(kind);
            info!(id = %id, action = kind, user_id = %user_auth.user_id, "Asset action applied");
            Ok((StatusCode::OK, Json(ActionResponse::Applied { asset })))
        }
        StoredAction::Queued(request) => {
            info!(
                id = %id,
                request_id = %request.id,
                action = kind,
                user_id = %user_auth.user_id,
                "Asset action queued for approval"
            );
            Ok((StatusCode::ACCEPTED, Json(ActionResponse::Queued { request })))
        }
    }
}

/// Assign an available asset to an employee.
///
/// POST /api/v1/assets/:id/assign
pub async fn assign_asset(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignAssetRequest>,
) -> Result<(StatusCode, Json<ActionResponse>), ApiError> {
    request.validate()?;
    submit(&state, &user_auth, id, RequestPayload::Assign(request)).await
}

/// Return an assigned asset.
///
/// POST /api/v1/assets/:id/return
pub async fn return_asset(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<ReturnAssetRequest>,
) -> Result<(StatusCode, Json<ActionResponse>), ApiError> {
    request.validate()?;
    submit(&state, &user_auth, id, RequestPayload::Return(request)).await
}

/// Statuses reachable from the current one and the fields each requires.
///
/// GET /api/v1/assets/:id/status-options
pub async fn status_options(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<StatusDialog>, ApiError> {
    let asset = AssetService::new(state.pool.clone()).get(id).await?;
    Ok(Json(status_dialog(&asset)))
}

async fn transition(
    state: &AppState,
    user_auth: &UserAuth,
    id: Uuid,
    kind: &'static str,
    transition: Transition,
) -> Result<Json<Asset>, ApiError> {
    let asset = AssetService::new(state.pool.clone())
        .transition(id, &transition, user_auth.actor())
        .await?;

    record_asset_transition(kind);
    info!(id = %id, action = kind, user_id = %user_auth.user_id, "Asset updated");
    Ok(Json(asset))
}

/// Set any status directly.
///
/// Open to every signed-in user and applied immediately. Unlike `/return`,
/// this override never goes through the review queue.
///
/// POST /api/v1/assets/:id/status
pub async fn change_status(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<ChangeStatusRequest>,
) -> Result<Json<Asset>, ApiError> {
    let t = Transition::SetStatus {
        status: request.status,
        remarks: request.remarks,
    };
    transition(&state, &user_auth, id, "status", t).await
}

/// POST /api/v1/assets/:id/location
pub async fn change_location(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<ChangeLocationRequest>,
) -> Result<Json<Asset>, ApiError> {
    request.validate()?;
    let t = Transition::SetLocation(request.location);
    transition(&state, &user_auth, id, "location", t).await
}

/// POST /api/v1/assets/:id/asset-check
pub async fn set_asset_check(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<AssetCheckRequest>,
) -> Result<Json<Asset>, ApiError> {
    request.validate()?;
    let t = Transition::SetAssetCheck(request.asset_check);
    transition(&state, &user_auth, id, "asset_check", t).await
}

/// Field edit history, newest first.
///
/// GET /api/v1/assets/:id/history
pub async fn asset_history(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<EditHistoryEntry>>, ApiError> {
    let entries = EditHistoryRepository::new(state.pool.clone())
        .list_for(EditEntity::Asset, id)
        .await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// Export the filtered assets as CSV.
///
/// GET /api/v1/assets/export?format=full|template
pub async fn export_assets(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Query(export): Query<ExportQuery>,
    Query(query): Query<AssetFilterQuery>,
) -> Result<Response, ApiError> {
    let assets = AssetService::new(state.pool.clone()).all().await?;
    let filter = query.into_filter();
    let selected = filter_assets(&assets, &filter);

    let body = match export.format.as_deref().map(str::trim) {
        None | Some("") | Some("template") => asset_csv::export_template(selected),
        Some("full") => asset_csv::export_full(selected, Utc::now().date_naive()),
        Some(other) => {
            return Err(ApiError::Validation(format!(
                "Unknown export format: {}",
                other
            )))
        }
    };
    Ok(csv_response("assets.csv", body))
}

/// Blank import template.
///
/// GET /api/v1/assets/template?example=true
pub async fn asset_template(
    _user_auth: UserAuth,
    Query(query): Query<TemplateQuery>,
) -> Response {
    csv_response("asset_template.csv", asset_csv::template(query.example))
}

/// Bulk import from a CSV body. Admins only.
///
/// POST /api/v1/assets/import
pub async fn import_assets(
    State(state): State<AppState>,
    user_auth: UserAuth,
    body: String,
) -> Result<Json<BulkImportResponse>, ApiError> {
    user_auth.require(UserRole::can_import, "Only admins can import assets")?;

    let response = AssetService::new(state.pool.clone())
        .import(
            &body,
            user_auth.actor(),
            state.config.limits.max_import_rows,
        )
        .await?;

    record_assets_imported(response.created);
    record_import_rejections("asset", response.errors.len());
    info!(
        processed = response.processed,
        created = response.created,
        failed = response.errors.len(),
        user_id = %user_auth.user_id,
        "Asset import completed"
    );
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field() {
        assert_eq!(parse_field("brand").unwrap(), FilterField::Brand);
        assert!(matches!(parse_field("colour"), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_action_response_tagging() {
        let asset = Asset::new("AST-1", "iPad", "Tablet", "Apple", "SN-1", Utc::now());
        let json = serde_json::to_value(ActionResponse::Applied { asset }).unwrap();
        assert_eq!(json["outcome"], "applied");
        assert_eq!(json["asset"]["asset_id"], "AST-1");
    }

    #[test]
    fn test_template_query_defaults_to_header_only() {
        let query: TemplateQuery = serde_json::from_str("{}").unwrap();
        assert!(!query.example);
    }
}
