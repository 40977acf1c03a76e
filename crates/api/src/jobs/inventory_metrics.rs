//! Inventory gauges: assets per status and open review requests.

use persistence::repositories::{AssetRepository, PendingRequestRepository};
use sqlx::PgPool;

use super::scheduler::{Job, JobFrequency};
use crate::middleware::metrics::{record_assets_in_status, record_open_requests};

pub struct InventoryMetricsJob {
    assets: AssetRepository,
    requests: PendingRequestRepository,
}

impl InventoryMetricsJob {
    pub fn new(pool: PgPool) -> Self {
        Self {
            assets: AssetRepository::new(pool.clone()),
            requests: PendingRequestRepository::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl Job for InventoryMetricsJob {
    fn name(&self) -> &'static str {
        "inventory_metrics"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(1)
    }

    async fn execute(&self) -> Result<(), String> {
        let by_status = self
            .assets
            .count_by_status()
            .await
            .map_err(|e| format!("failed to count assets: {}", e))?;
        for (status, count) in &by_status {
            record_assets_in_status(status, *count);
        }

        let open = self
            .requests
            .count_pending()
            .await
            .map_err(|e| format!("failed to count pending requests: {}", e))?;
        record_open_requests(open);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn test_job_identity() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/asset_manager_test")
            .unwrap();
        let job = InventoryMetricsJob::new(pool);
        assert_eq!(job.name(), "inventory_metrics");
        assert_eq!(job.frequency().duration().as_secs(), 60);
    }
}
