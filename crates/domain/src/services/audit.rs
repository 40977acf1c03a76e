//! Edit history recording.
//!
//! Every asset mutation hands its field changes to an [`EditRecorder`]. The
//! PostgreSQL implementation lives in the persistence crate; the in-memory
//! one here backs tests and local tooling.

use std::sync::Mutex;
use uuid::Uuid;

use crate::models::{EditEntity, FieldChange};

/// Sink for per-field edit history.
#[async_trait::async_trait]
pub trait EditRecorder: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn record_edit(
        &self,
        entity: EditEntity,
        entity_id: Uuid,
        field: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
        actor: &str,
    ) -> Result<(), Self::Error>;
}

/// Records each change in order and returns how many were written.
pub async fn record_changes<R>(
    recorder: &R,
    entity: EditEntity,
    entity_id: Uuid,
    changes: &[FieldChange],
    actor: &str,
) -> Result<usize, R::Error>
where
    R: EditRecorder + ?Sized,
{
    for change in changes {
        recorder
            .record_edit(
                entity,
                entity_id,
                &change.field,
                change.old_value.as_deref(),
                change.new_value.as_deref(),
                actor,
            )
            .await?;
    }

    if !changes.is_empty() {
        tracing::debug!(
            entity = entity.as_str(),
            entity_id = %entity_id,
            count = changes.len(),
            "Recorded field edits"
        );
    }
    Ok(changes.len())
}

/// A recorded edit, as kept by [`MemoryEditRecorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEdit {
    pub entity: EditEntity,
    pub entity_id: Uuid,
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub actor: String,
}

/// In-memory recorder.
#[derive(Debug, Default)]
pub struct MemoryEditRecorder {
    edits: Mutex<Vec<RecordedEdit>>,
}

impl MemoryEditRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edits(&self) -> Vec<RecordedEdit> {
        self.edits
            .lock()
            .map(|edits| edits.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("edit recorder lock poisoned")]
pub struct RecorderPoisoned;

#[async_trait::async_trait]
impl EditRecorder for MemoryEditRecorder {
    type Error = RecorderPoisoned;

    async fn record_edit(
        &self,
        entity: EditEntity,
        entity_id: Uuid,
        field: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
        actor: &str,
    ) -> Result<(), Self::Error> {
        let mut edits = self.edits.lock().map_err(|_| RecorderPoisoned)?;
        edits.push(RecordedEdit {
            entity,
            entity_id,
            field: field.to_string(),
            old_value: old_value.map(str::to_string),
            new_value: new_value.map(str::to_string),
            actor: actor.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Asset, AssignAssetRequest};
    use crate::services::lifecycle::{apply, Transition};
    use chrono::Utc;

    #[tokio::test]
    async fn test_lifecycle_changes_reach_recorder() {
        let asset = Asset::new("AST-7", "iPad", "Tablet", "Apple", "IPD-7", Utc::now());
        let mutation = apply(
            &asset,
            &Transition::Assign(AssignAssetRequest {
                employee_id: "E7".into(),
                employee_name: "Kiran".into(),
            }),
            "admin@example.com",
            Utc::now(),
        )
        .unwrap();

        let recorder = MemoryEditRecorder::new();
        let written = record_changes(
            &recorder,
            EditEntity::Asset,
            asset.id,
            &mutation.changes,
            "admin@example.com",
        )
        .await
        .unwrap();

        let edits = recorder.edits();
        assert_eq!(written, edits.len());
        let status = edits.iter().find(|e| e.field == "status").unwrap();
        assert_eq!(status.old_value.as_deref(), Some("Available"));
        assert_eq!(status.new_value.as_deref(), Some("Assigned"));
        assert_eq!(status.actor, "admin@example.com");
        assert_eq!(status.entity_id, asset.id);
    }

    #[tokio::test]
    async fn test_no_changes_writes_nothing() {
        let recorder = MemoryEditRecorder::new();
        let written = record_changes(&recorder, EditEntity::Asset, Uuid::new_v4(), &[], "a")
            .await
            .unwrap();
        assert_eq!(written, 0);
        assert!(recorder.edits().is_empty());
    }
}
