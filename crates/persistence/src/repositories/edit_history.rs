//! Edit history repository.

use domain::models::{EditEntity, FieldChange};
use domain::services::EditRecorder;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::entities::EditHistoryEntity;
use crate::metrics::QueryTimer;

/// Repository for per-field edit history.
#[derive(Clone)]
pub struct EditHistoryRepository {
    pool: PgPool,
}

impl EditHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// History of one entity, newest first.
    pub async fn list_for(
        &self,
        entity: EditEntity,
        entity_id: Uuid,
    ) -> Result<Vec<EditHistoryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_edit_history");
        let result = sqlx::query_as::<_, EditHistoryEntity>(
            r#"
            SELECT id, entity, entity_id, field, old_value, new_value, edited_by, edited_at
            FROM edit_history
            WHERE entity = $1 AND entity_id = $2
            ORDER BY edited_at DESC, id DESC
            "#,
        )
        .bind(entity.as_str())
        .bind(entity_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[async_trait::async_trait]
impl EditRecorder for EditHistoryRepository {
    type Error = sqlx::Error;

    async fn record_edit(
        &self,
        entity: EditEntity,
        entity_id: Uuid,
        field: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
        actor: &str,
    ) -> Result<(), Self::Error> {
        let timer = QueryTimer::new("record_edit");
        let result = insert_edit(&self.pool, entity, entity_id, field, old_value, new_value, actor).await;
        timer.record();
        result
    }
}

pub(crate) async fn insert_edit<'e, E>(
    executor: E,
    entity: EditEntity,
    entity_id: Uuid,
    field: &str,
    old_value: Option<&str>,
    new_value: Option<&str>,
    actor: &str,
) -> Result<(), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO edit_history (entity, entity_id, field, old_value, new_value, edited_by)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(entity.as_str())
    .bind(entity_id)
    .bind(field)
    .bind(old_value)
    .bind(new_value)
    .bind(actor)
    .execute(executor)
    .await?;
    Ok(())
}

/// Insert a batch of changes on an open transaction.
pub(crate) async fn insert_changes(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    entity: EditEntity,
    entity_id: Uuid,
    changes: &[FieldChange],
    actor: &str,
) -> Result<(), sqlx::Error> {
    for change in changes {
        insert_edit(
            &mut **tx,
            entity,
            entity_id,
            &change.field,
            change.old_value.as_deref(),
            change.new_value.as_deref(),
            actor,
        )
        .await?;
    }
    Ok(())
}
