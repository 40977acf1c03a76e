//! Asset persistence flows: validate, write, then record edit history.

use chrono::Utc;
use domain::models::{
    Asset, BulkImportResponse, EditEntity, PendingRequest, RequestPayload, UserRole,
};
use domain::services::{
    apply, asset_csv, record_changes, submit_action, validate_asset, ActionOutcome,
    AssetMutation, Transition,
};
use persistence::repositories::{AssetRepository, EditHistoryRepository, PendingRequestRepository};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

/// Result of an assign/return submission after it has been stored.
#[derive(Debug)]
pub enum StoredAction {
    Applied(Asset),
    Queued(PendingRequest),
}

pub struct AssetService {
    assets: AssetRepository,
    history: EditHistoryRepository,
    requests: PendingRequestRepository,
}

impl AssetService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            assets: AssetRepository::new(pool.clone()),
            history: EditHistoryRepository::new(pool.clone()),
            requests: PendingRequestRepository::new(pool),
        }
    }

    /// All non-deleted assets.
    pub async fn all(&self) -> Result<Vec<Asset>, ApiError> {
        let entities = self.assets.list_active().await?;
        Ok(entities.into_iter().map(Asset::from).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<Asset, ApiError> {
        self.assets
            .find_by_id(id)
            .await?
            .map(Asset::from)
            .ok_or_else(|| ApiError::NotFound("Asset not found".to_string()))
    }

    /// Validates a new asset against the whole collection and stores it.
    pub async fn create(&self, asset: Asset) -> Result<Asset, ApiError> {
        let existing = self.all().await?;
        validate_asset(&asset, &existing, None, false)?;
        Ok(self.assets.create(&asset).await?.into())
    }

    /// Stores an edited asset, excluding itself from the uniqueness checks.
    pub async fn update(
        &self,
        current: &Asset,
        mut next: Asset,
        actor: &str,
    ) -> Result<Asset, ApiError> {
        let existing = self.all().await?;
        validate_asset(&next, &existing, Some(current.id), false)?;

        next.updated_by = Some(actor.to_string());
        next.updated_at = Utc::now();
        let changes = next.changes_since(current);
        let mutation = AssetMutation {
            asset: next,
            changes,
        };
        self.persist(mutation, actor).await
    }

    /// Applies a lifecycle transition and stores the result.
    pub async fn transition(
        &self,
        id: Uuid,
        transition: &Transition,
        actor: &str,
    ) -> Result<Asset, ApiError> {
        let current = self.get(id).await?;
        let mutation = apply(&current, transition, actor, Utc::now())?;
        self.persist(mutation, actor).await
    }

    /// Assign/return: applied directly for admins, queued for everyone else.
    pub async fn submit(
        &self,
        role: UserRole,
        id: Uuid,
        payload: RequestPayload,
        actor: &str,
    ) -> Result<StoredAction, ApiError> {
        let current = self.get(id).await?;
        match submit_action(role, &current, payload, actor, Utc::now())? {
            ActionOutcome::Applied(mutation) => {
                Ok(StoredAction::Applied(self.persist(mutation, actor).await?))
            }
            ActionOutcome::Queued(request) => {
                let stored = self.requests.create(&request).await?;
                let request = PendingRequest::try_from(stored).map_err(|e| {
                    tracing::error!(error = %e, "Stored request payload is unreadable");
                    ApiError::Internal("Failed to read pending request".to_string())
                })?;
                Ok(StoredAction::Queued(request))
            }
        }
    }

    /// Imports an asset CSV. Valid rows are written together; invalid rows
    /// are reported back.
    pub async fn import(
        &self,
        text: &str,
        actor: &str,
        max_rows: usize,
    ) -> Result<BulkImportResponse, ApiError> {
        let existing = self.all().await?;
        let batch = asset_csv::import_assets(text, &existing, actor, Utc::now(), max_rows)?;
        let assets: Vec<Asset> = batch.accepted.into_iter().map(|r| r.record).collect();
        let created = self.assets.create_many(&assets).await?;

        Ok(BulkImportResponse {
            processed: batch.processed,
            created: created as usize,
            errors: batch.errors,
        })
    }

    async fn persist(&self, mutation: AssetMutation, actor: &str) -> Result<Asset, ApiError> {
        let stored: Asset = self
            .assets
            .update(&mutation.asset)
            .await?
            .ok_or_else(|| ApiError::NotFound("Asset not found".to_string()))?
            .into();

        record_changes(
            &self.history,
            EditEntity::Asset,
            stored.id,
            &mutation.changes,
            actor,
        )
        .await?;
        Ok(stored)
    }
}
